//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use sprite_runner::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Input
pub use crate::core::input::{Command, CommandMapper, KeyCode};

// Simulation
pub use crate::core::simulation::{
    Clock, EntityHandle, EntityHost, EntityRegistry, FixedStepClock, FrameDriver, FrameSnapshot,
    LocomotionState, ObstacleKind, RenderScale, SimConfig, Simulation, SystemClock,
};
