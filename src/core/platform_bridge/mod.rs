//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the winit platform layer and the logic thread.
//
// Components:
// - `interface`: event and error types that cross the thread boundary
// - `event_collector`: core-side bounded draining of platform events
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, FrameInput, TickControl};
pub use interface::{PlatformError, PlatformEvent};
