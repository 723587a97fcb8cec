//=========================================================================
// Key Tracker
//=========================================================================
//
// Held-key state with per-batch edge detection.
//
// Architecture:
//   InputEvent → process_events() → HashSet (keys held) → pressed edges
//
// A KeyDown for a key that is already held is auto-repeat and produces
// no edge. A KeyUp for a key that is not held is ignored.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode};

//=== KeyTracker ==========================================================

#[derive(Debug, Default)]
pub struct KeyTracker {
    //--- Persistent State (survives batches) -----------------------------
    keys_down: HashSet<KeyCode>,

    //--- Batch Deltas (reset each process_events call) -------------------
    pressed: Vec<KeyCode>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Batch Processing -------------------------------------------------

    /// Processes one batch and returns the keys that went UP → DOWN, in
    /// event order. A key pressed, released and pressed again inside one
    /// batch yields two edges.
    pub fn process_events(&mut self, events: &[InputEvent]) -> &[KeyCode] {
        self.pressed.clear();

        for event in events {
            match *event {
                InputEvent::KeyDown { key } => {
                    if self.keys_down.insert(key) {
                        self.pressed.push(key);
                    }
                }
                InputEvent::KeyUp { key } => {
                    self.keys_down.remove(&key);
                }
            }
        }

        &self.pressed
    }

    /// Forgets every held key (e.g. after focus loss).
    pub fn reset(&mut self) {
        self.keys_down.clear();
        self.pressed.clear();
    }

    //--- Query API --------------------------------------------------------

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key }
    }

    fn up(key: KeyCode) -> InputEvent {
        InputEvent::KeyUp { key }
    }

    #[test]
    fn first_down_is_an_edge() {
        let mut tracker = KeyTracker::new();
        assert_eq!(tracker.process_events(&[down(KeyCode::Space)]), &[KeyCode::Space]);
        assert!(tracker.is_key_down(KeyCode::Space));
    }

    #[test]
    fn auto_repeat_is_not_an_edge() {
        let mut tracker = KeyTracker::new();
        tracker.process_events(&[down(KeyCode::KeyD)]);

        let edges = tracker.process_events(&[down(KeyCode::KeyD), down(KeyCode::KeyD)]);
        assert!(edges.is_empty(), "held key must not repeat");
    }

    #[test]
    fn release_then_press_is_a_new_edge() {
        let mut tracker = KeyTracker::new();
        let edges = tracker
            .process_events(&[down(KeyCode::KeyD), up(KeyCode::KeyD), down(KeyCode::KeyD)])
            .to_vec();

        assert_eq!(edges, vec![KeyCode::KeyD, KeyCode::KeyD]);
        assert!(tracker.is_key_down(KeyCode::KeyD));
    }

    #[test]
    fn stray_release_is_ignored() {
        let mut tracker = KeyTracker::new();
        assert!(tracker.process_events(&[up(KeyCode::KeyW)]).is_empty());
        assert!(!tracker.is_key_down(KeyCode::KeyW));

        assert_eq!(tracker.process_events(&[down(KeyCode::KeyW)]), &[KeyCode::KeyW]);
    }

    #[test]
    fn edges_keep_event_order() {
        let mut tracker = KeyTracker::new();
        let edges = tracker
            .process_events(&[down(KeyCode::KeyW), down(KeyCode::KeyS), down(KeyCode::Space)])
            .to_vec();
        assert_eq!(edges, vec![KeyCode::KeyW, KeyCode::KeyS, KeyCode::Space]);
    }

    #[test]
    fn reset_forgets_held_keys() {
        let mut tracker = KeyTracker::new();
        tracker.process_events(&[down(KeyCode::KeyS)]);
        tracker.reset();

        assert!(!tracker.is_key_down(KeyCode::KeyS));
        assert_eq!(tracker.process_events(&[down(KeyCode::KeyS)]), &[KeyCode::KeyS]);
    }
}
