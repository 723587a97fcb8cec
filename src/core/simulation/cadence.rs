//=========================================================================
// Cadence
//=========================================================================
//
// Repeating visual-frame cycles for the locomotion states.
//
// Architecture:
//   CadenceSlot ── holds at most one ──> Cadence ──> VisualFrame
//
// A cadence runs on its own period, independent of the frame rate: it
// accumulates elapsed time and advances one frame per elapsed period.
// The slot is the only owner of a running cadence, so replacing it stops
// the previous one before the next starts.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use super::config::CadenceSpec;

//=== CadenceHandle =======================================================

/// Identifies one started cadence. Every start yields a fresh handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CadenceHandle(u64);

//=== VisualFrame =========================================================

/// Visual frame identifier shown on the sprite (`walking-1`, `flying-5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualFrame {
    label: &'static str,
    index: usize,
}

impl VisualFrame {
    /// Zero-based position within the cycle.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl fmt::Display for VisualFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.label, self.index + 1)
    }
}

//=== Cadence =============================================================

/// A running visual-frame cycle.
#[derive(Debug, Clone)]
pub struct Cadence {
    handle: CadenceHandle,
    spec: CadenceSpec,
    cursor: usize,
    visible: bool,
    accumulated: f64,
}

impl Cadence {
    fn start(handle: CadenceHandle, spec: CadenceSpec) -> Self {
        Self {
            handle,
            spec,
            cursor: 0,
            visible: spec.show_first_on_entry,
            accumulated: 0.0,
        }
    }

    /// Advances by `dt` seconds. Returns `true` if the frame changed.
    fn advance(&mut self, dt: f64) -> bool {
        self.accumulated += dt;
        let mut changed = false;

        while self.accumulated >= self.spec.period {
            self.accumulated -= self.spec.period;
            self.cursor = (self.cursor + 1) % self.spec.frame_count;
            self.visible = true;
            changed = true;
        }

        changed
    }

    pub fn handle(&self) -> CadenceHandle {
        self.handle
    }

    /// Frame currently shown, or `None` before the first tick of a cadence
    /// that does not show its first frame on entry.
    pub fn frame(&self) -> Option<VisualFrame> {
        self.visible.then_some(VisualFrame {
            label: self.spec.label,
            index: self.cursor,
        })
    }
}

//=== CadenceSlot =========================================================

/// Holds the single active cadence.
#[derive(Debug, Default)]
pub struct CadenceSlot {
    active: Option<Cadence>,
    next_handle: u64,
}

impl CadenceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the active cadence (if any) and starts a new one from `spec`.
    pub fn replace(&mut self, spec: CadenceSpec) -> CadenceHandle {
        if let Some(old) = self.active.take() {
            debug!(target: "sim::cadence", "Stopped {} cadence {:?}", old.spec.label, old.handle);
        }

        let handle = CadenceHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(Cadence::start(handle, spec));

        debug!(
            target: "sim::cadence",
            "Started {} cadence {:?} ({} frames / {}s)",
            spec.label,
            handle,
            spec.frame_count,
            spec.period
        );
        handle
    }

    /// Advances the active cadence. Returns `true` if its frame changed.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.active.as_mut().is_some_and(|cadence| cadence.advance(dt))
    }

    pub fn active(&self) -> Option<&Cadence> {
        self.active.as_ref()
    }

    pub fn frame(&self) -> Option<VisualFrame> {
        self.active.as_ref().and_then(Cadence::frame)
    }

    /// Total number of cadences ever started in this slot.
    pub fn started(&self) -> u64 {
        self.next_handle
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(label: &'static str, frame_count: usize, period: f64, show_first: bool) -> CadenceSpec {
        CadenceSpec {
            label,
            frame_count,
            period,
            show_first_on_entry: show_first,
        }
    }

    //=====================================================================
    // Frame Cycling
    //=====================================================================

    #[test]
    fn hidden_until_first_tick() {
        let mut slot = CadenceSlot::new();
        slot.replace(spec("walking", 2, 0.25, false));

        assert_eq!(slot.frame(), None);
        assert!(!slot.advance(0.125));
        assert_eq!(slot.frame(), None);

        assert!(slot.advance(0.125));
        assert_eq!(slot.frame().map(|f| f.to_string()), Some("walking-2".to_string()));
    }

    #[test]
    fn first_frame_forced_on_entry() {
        let mut slot = CadenceSlot::new();
        slot.replace(spec("flying", 5, 0.125, true));

        assert_eq!(slot.frame().map(|f| f.to_string()), Some("flying-1".to_string()));
    }

    #[test]
    fn cycle_wraps_around() {
        let mut slot = CadenceSlot::new();
        slot.replace(spec("running", 4, 0.125, false));

        let mut seen = Vec::new();
        for _ in 0..5 {
            slot.advance(0.125);
            seen.push(slot.frame().map(|f| f.index()));
        }

        assert_eq!(seen, vec![Some(1), Some(2), Some(3), Some(0), Some(1)]);
    }

    #[test]
    fn long_delta_advances_multiple_frames() {
        let mut slot = CadenceSlot::new();
        slot.replace(spec("flying", 5, 0.125, true));

        assert!(slot.advance(0.375));
        assert_eq!(slot.frame().map(|f| f.index()), Some(3));
    }

    //=====================================================================
    // Slot Ownership
    //=====================================================================

    #[test]
    fn replace_issues_fresh_handle() {
        let mut slot = CadenceSlot::new();
        let first = slot.replace(spec("walking", 2, 0.25, false));
        let second = slot.replace(spec("running", 4, 0.125, false));

        assert_ne!(first, second);
        assert_eq!(slot.active().map(Cadence::handle), Some(second));
        assert_eq!(slot.started(), 2);
    }

    #[test]
    fn replace_resets_progress() {
        let mut slot = CadenceSlot::new();
        slot.replace(spec("running", 4, 0.125, false));
        slot.advance(0.25);

        slot.replace(spec("walking", 2, 0.25, false));
        assert_eq!(slot.frame(), None);
    }

    #[test]
    fn empty_slot_never_advances() {
        let mut slot = CadenceSlot::new();

        assert!(!slot.advance(10.0));
        assert!(slot.active().is_none());
        assert_eq!(slot.frame(), None);
    }
}
