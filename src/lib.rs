//=========================================================================
// Sprite Runner: Library Root
//
// A side-scrolling runner: a character switches between walking, running
// and flying, jumps under constant gravity, and scrolls past obstacles
// that are spawned off-screen and retired once they leave it.
//
// Typical usage:
// ```no_run
// use sprite_runner::EngineBuilder;
//
// fn main() -> Result<(), sprite_runner::EngineError> {
//     EngineBuilder::new().build()?.run()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the simulation, input mapping and the logic-thread loop.
// The simulation can be driven directly (e.g. headless, with a fixed-step
// clock) without the window.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` wraps winit and stays private.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};
