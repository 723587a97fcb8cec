//=========================================================================
// Input Event Types
//=========================================================================
//
// Platform-neutral keyboard events. The platform layer converts winit key
// events into these before they cross the thread boundary.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    KeyTracker (key-down edges)
//         ↓
//    CommandMapper → Command
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced, so
/// `KeyS` is the same key on QWERTY and AZERTY layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,

    /// Any key the input layer does not map.
    Unidentified,
}

//=== InputEvent ==========================================================

/// Low-level keyboard event from the platform layer.
///
/// Auto-repeat arrives as repeated `KeyDown` events without a `KeyUp` in
/// between; edge detection happens in the core, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },
}

impl InputEvent {
    pub fn key(&self) -> KeyCode {
        match self {
            Self::KeyDown { key } | Self::KeyUp { key } => *key,
        }
    }

    pub fn is_down(&self) -> bool {
        matches!(self, Self::KeyDown { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
