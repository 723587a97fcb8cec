//=========================================================================
// Locomotion State Machine
//=========================================================================
//
// Discrete movement mode of the character and its transition table.
//
//   command \ state | Walking  Running  Flying
//   ----------------+--------------------------
//   Slow            | Walking  Walking  Walking
//   Speed           | Running  Flying   Running
//   Lift            | Flying   Flying   Flying
//
// Entering a different state replaces the active cadence. Requesting the
// current state changes nothing. Jump is orthogonal and never transitions.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use super::cadence::{CadenceSlot, VisualFrame};
use super::config::{LocomotionProfile, SimConfig};
use crate::core::input::Command;

//=== LocomotionState =====================================================

/// Movement mode of the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocomotionState {
    #[default]
    Walking,
    Running,
    Flying,
}

impl LocomotionState {
    pub const ALL: [Self; 3] = [Self::Walking, Self::Running, Self::Flying];

    /// Target state for a directional command; `None` for `Jump`.
    pub fn transition(self, command: Command) -> Option<Self> {
        use LocomotionState::*;

        let next = match (command, self) {
            (Command::Slow, _) => Walking,
            (Command::Speed, Walking) => Running,
            (Command::Speed, Running) => Flying,
            (Command::Speed, Flying) => Running,
            (Command::Lift, _) => Flying,
            (Command::Jump, _) => return None,
        };

        Some(next)
    }

    /// Automaton label shown on the diagnostic display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Walking => "q0",
            Self::Running => "q1",
            Self::Flying => "q2",
        }
    }
}

impl fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.label(), self)
    }
}

//=== LocomotionMachine ===================================================

/// Current locomotion state plus the cadence that belongs to it.
#[derive(Debug)]
pub struct LocomotionMachine {
    state: LocomotionState,
    profile: LocomotionProfile,
    cadence: CadenceSlot,
}

impl LocomotionMachine {
    /// Starts in Walking with the walking cadence running.
    pub fn new(config: &SimConfig) -> Self {
        let state = LocomotionState::default();
        let profile = *config.profile(state);
        let mut cadence = CadenceSlot::new();
        cadence.replace(profile.cadence);

        Self { state, profile, cadence }
    }

    //--- Transitions ------------------------------------------------------

    /// Applies a directional command. Returns the entered state, or `None`
    /// if the command is `Jump` or targets the current state.
    pub fn apply(&mut self, command: Command, config: &SimConfig) -> Option<LocomotionState> {
        let target = self.state.transition(command)?;
        self.enter(target, config).then_some(target)
    }

    /// Enters `target` unless it is already current.
    ///
    /// Stop-old-cadence, profile swap and start-new-cadence happen in one
    /// call, so no other code observes a half-entered state.
    pub fn enter(&mut self, target: LocomotionState, config: &SimConfig) -> bool {
        if target == self.state {
            return false;
        }

        let previous = self.state;
        self.state = target;
        self.profile = *config.profile(target);
        self.cadence.replace(self.profile.cadence);

        debug!(
            target: "sim::locomotion",
            "{} -> {} (ground {}, speed x{})",
            previous,
            target,
            self.profile.ground_level,
            self.profile.speed_multiplier
        );
        true
    }

    //--- Cadence ----------------------------------------------------------

    /// Advances the active cadence. Returns `true` if the frame changed.
    pub fn advance_cadence(&mut self, dt: f64) -> bool {
        self.cadence.advance(dt)
    }

    pub fn cadence(&self) -> &CadenceSlot {
        &self.cadence
    }

    pub fn visual_frame(&self) -> Option<VisualFrame> {
        self.cadence.frame()
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    pub fn ground_level(&self) -> f64 {
        self.profile.ground_level
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.profile.speed_multiplier
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
