//=========================================================================
// Frame Driver
//=========================================================================
//
// Pulls one delta from a Clock per tick and steps the simulation with it.
// Tests drive it with FixedStepClock or ManualClock for determinism; the
// logic thread drives it with SystemClock.
//
//=========================================================================

//=== External Dependencies ===============================================

use rand::Rng;

//=== Internal Dependencies ===============================================

use super::clock::Clock;
use super::obstacles::EntityHost;
use super::snapshot::FrameSnapshot;
use super::Simulation;
use crate::core::input::Command;

//=== FrameDriver =========================================================

pub struct FrameDriver<C: Clock, R: Rng, H: EntityHost> {
    clock: C,
    simulation: Simulation<R, H>,
    last_delta: f64,
}

impl<C: Clock, R: Rng, H: EntityHost> FrameDriver<C, R, H> {
    pub fn new(clock: C, simulation: Simulation<R, H>) -> Self {
        Self {
            clock,
            simulation,
            last_delta: 0.0,
        }
    }

    /// Runs exactly one frame.
    pub fn tick(&mut self) -> FrameSnapshot {
        self.last_delta = self.clock.delta_seconds();
        self.simulation.step(self.last_delta)
    }

    /// Forwards a command to the simulation between frames.
    pub fn apply(&mut self, command: Command) -> bool {
        self.simulation.apply(command)
    }

    /// Delta used by the most recent tick.
    pub fn last_delta(&self) -> f64 {
        self.last_delta
    }

    pub fn simulation(&self) -> &Simulation<R, H> {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation<R, H> {
        &mut self.simulation
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
