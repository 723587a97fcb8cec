//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-frame store for key events between two redraws. Events keep their
// arrival order; back-to-back duplicates (typically OS key repeat) are
// collapsed so a held key cannot flood the channel.
//
// The buffer is drained on every RedrawRequested and reused.
//
//=========================================================================

//=== Internal Modules ====================================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
    collapsed: u64,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 64;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
            collapsed: 0,
        }
    }

    //--- Event Handling ---------------------------------------------------

    /// Appends an event unless it repeats the previous one.
    pub(crate) fn push(&mut self, event: InputEvent) {
        if self.events.last() == Some(&event) {
            self.collapsed += 1;
        } else {
            self.events.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------

    /// Takes this frame's events, or `None` if there were none.
    pub(crate) fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.events.is_empty() {
            return None;
        }
        Some(self.events.drain(..).collect())
    }

    //--- Utilities --------------------------------------------------------

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Duplicates dropped since creation.
    pub(crate) fn collapsed(&self) -> u64 {
        self.collapsed
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
