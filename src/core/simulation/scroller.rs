//=========================================================================
// World Scroller
//=========================================================================
//
// Horizontal background offset. The raw offset only ever grows; the
// rendered value wraps on the viewport width for seamless tiling.
//
//=========================================================================

//=== WorldScroller =======================================================

/// Accumulated background scroll.
#[derive(Debug, Clone, Default)]
pub struct WorldScroller {
    offset: f64,
    frame_delta: f64,
}

impl WorldScroller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the offset by `base_speed * dt * speed_multiplier` and
    /// returns that distance. The multiplier is passed every frame, so a
    /// state change shows up on the next update.
    pub fn update(&mut self, dt: f64, base_speed: f64, speed_multiplier: f64) -> f64 {
        self.frame_delta = base_speed * dt * speed_multiplier;
        self.offset += self.frame_delta;
        self.frame_delta
    }

    /// Distance scrolled in the last update.
    pub fn frame_delta(&self) -> f64 {
        self.frame_delta
    }

    /// Total distance scrolled.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// `offset mod viewport_width`, in `[0, viewport_width)`.
    ///
    /// A degenerate viewport (zero or negative width) yields zero.
    pub fn wrapped(&self, viewport_width: f64) -> f64 {
        if viewport_width <= 0.0 {
            return 0.0;
        }

        let wrapped = self.offset.rem_euclid(viewport_width);
        // rem_euclid can round up to the divisor for tiny negative inputs.
        if wrapped >= viewport_width { 0.0 } else { wrapped }
    }

    /// Horizontal position to draw the background at.
    pub fn render_position(&self, viewport_width: f64) -> f64 {
        -self.wrapped(viewport_width)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BASE: f64 = 1280.0 / 3.0;

    #[test]
    fn update_scales_with_multiplier() {
        let mut scroller = WorldScroller::new();

        let walking = scroller.update(0.5, BASE, 1.0);
        let running = scroller.update(0.5, BASE, 2.0);

        assert_relative_eq!(running, walking * 2.0);
        assert_eq!(scroller.frame_delta(), running);
        assert_relative_eq!(scroller.offset(), walking + running);
    }

    #[test]
    fn offset_is_monotonic() {
        let mut scroller = WorldScroller::new();
        let mut last = scroller.offset();

        for i in 0..500 {
            let multiplier = if i % 3 == 0 { 2.0 } else { 1.0 };
            scroller.update(0.016, BASE, multiplier);
            assert!(scroller.offset() >= last);
            last = scroller.offset();
        }
    }

    #[test]
    fn wrapped_value_stays_in_viewport() {
        let mut scroller = WorldScroller::new();
        let width = 1280.0;

        for _ in 0..2000 {
            scroller.update(0.033, BASE, 2.0);
            let wrapped = scroller.wrapped(width);
            assert!((0.0..width).contains(&wrapped), "wrapped {} out of range", wrapped);
        }
        assert!(scroller.offset() > width, "offset must never be reset");
    }

    #[test]
    fn render_position_is_negated_wrap() {
        let mut scroller = WorldScroller::new();
        scroller.update(1.0, 1500.0, 1.0);

        assert_eq!(scroller.wrapped(1000.0), 500.0);
        assert_eq!(scroller.render_position(1000.0), -500.0);
    }

    #[test]
    fn zero_viewport_wraps_to_zero() {
        let mut scroller = WorldScroller::new();
        scroller.update(1.0, BASE, 1.0);
        assert_eq!(scroller.wrapped(0.0), 0.0);
    }
}
