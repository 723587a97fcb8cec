//=========================================================================
// Simulation Configuration
//=========================================================================
//
// Tunable constants for the runner simulation.
//
// Architecture:
//   SimConfig
//     ├─ physics: gravity, jump impulse
//     ├─ walking / running / flying: LocomotionProfile
//     │     └─ ground level, scroll multiplier, CadenceSpec
//     ├─ scroll: base background speed
//     └─ spawning: timer range, lookahead, cloud band, ObstacleProfile
//
// All values are in simulation units (see RenderScale for pixels).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::locomotion::LocomotionState;
use super::obstacles::ObstacleKind;

//=== CadenceSpec =========================================================

/// Shape of one state's visual-frame cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CadenceSpec {
    /// Prefix of the visual frame identifiers (`walking` → `walking-1`).
    pub label: &'static str,

    /// Number of frames in the cycle.
    pub frame_count: usize,

    /// Seconds between two frame advances.
    pub period: f64,

    /// Show the first frame immediately on entry instead of waiting for
    /// the first tick.
    pub show_first_on_entry: bool,
}

//=== LocomotionProfile ===================================================

/// Per-state constants applied when a locomotion state is entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionProfile {
    /// Lowest vertical position the character may occupy.
    pub ground_level: f64,

    /// Factor applied to the base scroll speed.
    pub speed_multiplier: f64,

    /// Visual cadence started on entry.
    pub cadence: CadenceSpec,
}

//=== ObstacleProfile =====================================================

/// Per-kind constants for scrolling entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleProfile {
    /// Visual extent, used for the off-screen retirement test.
    pub width: f64,

    /// Fraction of the scroller's frame delta applied to the entity.
    pub parallax: f64,
}

//=== SimConfig ===========================================================

/// Complete set of simulation constants.
///
/// `SimConfig::default()` reproduces the reference tuning: gravity 2500,
/// impulse 800, ground levels 22 / 100, a base scroll of 1280/3 units per
/// second and spawn intervals drawn from `[0.7, 1.8]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    //--- Physics ----------------------------------------------------------
    pub gravity: f64,
    pub jump_impulse: f64,

    //--- Locomotion -------------------------------------------------------
    pub walking: LocomotionProfile,
    pub running: LocomotionProfile,
    pub flying: LocomotionProfile,

    //--- Scrolling --------------------------------------------------------
    pub base_scroll_speed: f64,

    //--- Spawning ---------------------------------------------------------
    /// Countdown value before the first spawn.
    pub initial_spawn_delay: f64,

    /// The timer fires once `remaining` drops to this value.
    pub spawn_lookahead: f64,

    pub min_spawn_interval: f64,
    pub max_spawn_interval: f64,

    /// Vertical band clouds are placed in.
    pub min_cloud_y: f64,
    pub max_cloud_y: f64,

    pub ground_obstacle: ObstacleProfile,
    pub cloud: ObstacleProfile,
}

impl SimConfig {
    //--- Lookups ----------------------------------------------------------

    /// Returns the profile applied while in `state`.
    pub fn profile(&self, state: LocomotionState) -> &LocomotionProfile {
        match state {
            LocomotionState::Walking => &self.walking,
            LocomotionState::Running => &self.running,
            LocomotionState::Flying => &self.flying,
        }
    }

    /// Returns the width/parallax profile for an obstacle kind.
    ///
    /// The tall ground variant is cosmetic and shares the ground profile.
    pub fn obstacle(&self, kind: ObstacleKind) -> &ObstacleProfile {
        match kind {
            ObstacleKind::GroundObstacle | ObstacleKind::GroundObstacleTall => {
                &self.ground_obstacle
            }
            ObstacleKind::Cloud => &self.cloud,
        }
    }

    //--- Validation -------------------------------------------------------

    /// Checks that every constant is usable by the simulation.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("gravity", self.gravity)?;
        positive("jump_impulse", self.jump_impulse)?;
        positive("base_scroll_speed", self.base_scroll_speed)?;
        positive("min_spawn_interval", self.min_spawn_interval)?;

        if !self.initial_spawn_delay.is_finite() || self.initial_spawn_delay < 0.0 {
            return Err(ConfigError::NotPositive {
                field: "initial_spawn_delay",
                value: self.initial_spawn_delay,
            });
        }

        ordered(
            "spawn_interval",
            self.min_spawn_interval,
            self.max_spawn_interval,
        )?;
        ordered("cloud_y", self.min_cloud_y, self.max_cloud_y)?;

        for state in LocomotionState::ALL {
            let profile = self.profile(state);
            positive("speed_multiplier", profile.speed_multiplier)?;
            positive("cadence.period", profile.cadence.period)?;
            if profile.cadence.frame_count == 0 {
                return Err(ConfigError::EmptyCadence { state });
            }
        }

        positive("ground_obstacle.width", self.ground_obstacle.width)?;
        positive("cloud.width", self.cloud.width)?;
        positive("cloud.parallax", self.cloud.parallax)?;
        positive("ground_obstacle.parallax", self.ground_obstacle.parallax)?;

        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 2500.0,
            jump_impulse: 800.0,

            walking: LocomotionProfile {
                ground_level: 22.0,
                speed_multiplier: 1.0,
                cadence: CadenceSpec {
                    label: "walking",
                    frame_count: 2,
                    period: 0.2,
                    show_first_on_entry: false,
                },
            },
            running: LocomotionProfile {
                ground_level: 22.0,
                speed_multiplier: 2.0,
                cadence: CadenceSpec {
                    label: "running",
                    frame_count: 4,
                    period: 0.1,
                    show_first_on_entry: false,
                },
            },
            flying: LocomotionProfile {
                ground_level: 100.0,
                speed_multiplier: 2.0,
                cadence: CadenceSpec {
                    label: "flying",
                    frame_count: 5,
                    period: 0.1,
                    show_first_on_entry: true,
                },
            },

            base_scroll_speed: 1280.0 / 3.0,

            initial_spawn_delay: 2.0,
            spawn_lookahead: 0.5,
            min_spawn_interval: 0.7,
            max_spawn_interval: 1.8,
            min_cloud_y: 100.0,
            max_cloud_y: 270.0,

            ground_obstacle: ObstacleProfile {
                width: 50.0,
                parallax: 1.0,
            },
            cloud: ObstacleProfile {
                width: 120.0,
                parallax: 0.5,
            },
        }
    }
}

//--- Validation Helpers --------------------------------------------------

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn ordered(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}

//=== ConfigError =========================================================

/// Rejected simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A quantity that must be strictly positive (and finite) is not.
    NotPositive { field: &'static str, value: f64 },

    /// A `[min, max]` range has `min > max` or a non-finite bound.
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    /// A locomotion state has a cadence with no frames.
    EmptyCadence { state: LocomotionState },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{} must be positive, got {}", field, value)
            }
            Self::InvertedRange { field, min, max } => {
                write!(f, "{} range is invalid: [{}, {}]", field, min, max)
            }
            Self::EmptyCadence { state } => {
                write!(f, "{:?} cadence has no frames", state)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

//=========================================================================
// Unit Tests
//=========================================================================
