//=========================================================================
// Frame Snapshot
//=========================================================================
//
// Output boundary of the simulation: plain numbers a renderer applies to
// its sprites. Snapshots are produced in simulation units; RenderScale
// converts them (and incoming viewport widths) to render units.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::cadence::VisualFrame;
use super::locomotion::LocomotionState;
use super::obstacles::{EntityHandle, ObstacleKind};

//=== ObstacleView ========================================================

/// Render values for one live obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleView {
    pub handle: EntityHandle,
    pub kind: ObstacleKind,
    pub horizontal_offset: f64,
    /// Only clouds carry a vertical offset.
    pub vertical_offset: Option<f64>,
}

//=== FrameSnapshot =======================================================

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Index of the frame that produced this snapshot (1-based).
    pub frame: u64,

    /// Character height above the baseline.
    pub character_offset: f64,

    pub state: LocomotionState,

    /// Background position, already wrapped on the viewport width.
    pub background_offset: f64,

    /// Sprite frame to show, `None` until the cadence first ticks.
    pub visual_frame: Option<VisualFrame>,

    /// Live obstacles in spawn order.
    pub obstacles: Vec<ObstacleView>,
}

impl FrameSnapshot {
    /// Diagnostic state label (`q0`, `q1`, `q2`).
    pub fn state_label(&self) -> &'static str {
        self.state.label()
    }
}

//=== RenderScale =========================================================

/// Pixels per simulation unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderScale {
    pixels_per_unit: f64,
}

impl RenderScale {
    /// One pixel per unit.
    pub const IDENTITY: Self = Self { pixels_per_unit: 1.0 };

    /// # Panics
    ///
    /// Panics if `pixels_per_unit` is not strictly positive.
    pub fn new(pixels_per_unit: f64) -> Self {
        assert!(
            pixels_per_unit.is_finite() && pixels_per_unit > 0.0,
            "Render scale must be positive, got {}",
            pixels_per_unit
        );
        Self { pixels_per_unit }
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    pub fn to_pixels(&self, units: f64) -> f64 {
        units * self.pixels_per_unit
    }

    pub fn to_units(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_unit
    }

    /// Converts every positional value of a snapshot to pixels.
    pub fn project(&self, snapshot: &FrameSnapshot) -> FrameSnapshot {
        FrameSnapshot {
            frame: snapshot.frame,
            character_offset: self.to_pixels(snapshot.character_offset),
            state: snapshot.state,
            background_offset: self.to_pixels(snapshot.background_offset),
            visual_frame: snapshot.visual_frame,
            obstacles: snapshot
                .obstacles
                .iter()
                .map(|view| ObstacleView {
                    horizontal_offset: self.to_pixels(view.horizontal_offset),
                    vertical_offset: view.vertical_offset.map(|y| self.to_pixels(y)),
                    ..view.clone()
                })
                .collect(),
        }
    }
}

impl Default for RenderScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
