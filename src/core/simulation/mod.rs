//=========================================================================
// Runner Simulation
//=========================================================================
//
// Explicit simulation context: every piece of mutable game state lives in
// one `Simulation` value owned by the frame driver.
//
// Architecture:
//   Simulation
//     ├─ Character          (physics)
//     ├─ LocomotionMachine  (state + cadence slot)
//     ├─ WorldScroller      (background offset)
//     ├─ ObstacleSpawner    (live obstacles + spawn timer)
//     ├─ R: Rng             (spawn randomness)
//     └─ H: EntityHost      (renderable entity lifecycle)
//
// step(dt), in fixed order:
//   1. character.integrate        position from last frame's velocity
//   2. scroller.update            background offset
//   3. spawner.update             spawn decision, sweep, retirement
//   4. character.apply_gravity    velocity for the next frame
//   5. locomotion.advance_cadence visual frame, on its own period
//
// Commands go through apply() between steps and never advance time.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod cadence;
pub mod clock;
pub mod config;
pub mod frame_driver;
pub mod locomotion;
pub mod obstacles;
pub mod physics;
pub mod scroller;
pub mod snapshot;

//=== Public API ==========================================================

pub use cadence::{CadenceHandle, CadenceSlot, VisualFrame};
pub use clock::{Clock, FixedStepClock, ManualClock, SystemClock};
pub use config::{CadenceSpec, ConfigError, LocomotionProfile, ObstacleProfile, SimConfig};
pub use frame_driver::FrameDriver;
pub use locomotion::{LocomotionMachine, LocomotionState};
pub use obstacles::{
    EntityHandle, EntityHost, EntityRegistry, Obstacle, ObstacleKind, ObstacleSpawner,
    SpawnFrame, SpawnReport, SpawnTimer,
};
pub use physics::Character;
pub use scroller::WorldScroller;
pub use snapshot::{FrameSnapshot, ObstacleView, RenderScale};

//=== External Dependencies ===============================================

use log::{debug, trace, warn};
use rand::Rng;

//=== Internal Dependencies ===============================================

use crate::core::input::Command;

//=== Simulation ==========================================================

/// All mutable state of one run.
pub struct Simulation<R: Rng, H: EntityHost> {
    config: SimConfig,
    character: Character,
    locomotion: LocomotionMachine,
    scroller: WorldScroller,
    spawner: ObstacleSpawner,
    viewport_width: f64,
    rng: R,
    host: H,
    frame: u64,
    elapsed: f64,
}

impl<R: Rng, H: EntityHost> Simulation<R, H> {
    //--- Construction -----------------------------------------------------

    /// Creates a simulation in Walking, resting on the walking ground.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: SimConfig, viewport_width: f64, rng: R, host: H) -> Result<Self, ConfigError> {
        config.validate()?;

        let locomotion = LocomotionMachine::new(&config);
        let character = Character::new(locomotion.ground_level());
        let spawner = ObstacleSpawner::new(&config);

        Ok(Self {
            config,
            character,
            locomotion,
            scroller: WorldScroller::new(),
            spawner,
            viewport_width: viewport_width.max(0.0),
            rng,
            host,
            frame: 0,
            elapsed: 0.0,
        })
    }

    //--- Commands ---------------------------------------------------------

    /// Applies one command immediately. Returns `true` if it changed
    /// anything (a state was entered or a jump started).
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Jump => {
                let jumped = self
                    .character
                    .jump(self.config.jump_impulse, self.locomotion.ground_level());
                if !jumped {
                    trace!(target: "sim", "Jump ignored: not on the ground");
                }
                jumped
            }
            // The new ground level is resolved by the next step's integrate.
            _ => self.locomotion.apply(command, &self.config).is_some(),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances the world by `dt` seconds and returns the resulting frame.
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn step(&mut self, dt: f64) -> FrameSnapshot {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.character.integrate(dt, self.locomotion.ground_level());

        let speed_multiplier = self.locomotion.speed_multiplier();
        let frame_delta = self
            .scroller
            .update(dt, self.config.base_scroll_speed, speed_multiplier);

        let report = self.spawner.update(
            dt,
            SpawnFrame {
                viewport_width: self.viewport_width,
                speed_multiplier,
                frame_delta,
            },
            &self.config,
            &mut self.rng,
            &mut self.host,
        );

        self.character.apply_gravity(self.config.gravity, dt);

        if self.locomotion.advance_cadence(dt) {
            trace!(target: "sim::cadence", "Frame {:?}", self.locomotion.visual_frame());
        }

        self.frame += 1;
        self.elapsed += dt;

        if report.spawned.is_some() || !report.retired.is_empty() {
            trace!(
                target: "sim",
                "Frame {}: {} live obstacles",
                self.frame,
                self.spawner.live().len()
            );
        }

        self.snapshot()
    }

    /// Builds the render values for the current state.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            character_offset: self.character.vertical_position(),
            state: self.locomotion.state(),
            background_offset: self.scroller.render_position(self.viewport_width),
            visual_frame: self.locomotion.visual_frame(),
            obstacles: self
                .spawner
                .live()
                .iter()
                .map(|obstacle| ObstacleView {
                    handle: obstacle.handle(),
                    kind: obstacle.kind(),
                    horizontal_offset: obstacle.horizontal_position(),
                    vertical_offset: obstacle
                        .kind()
                        .is_cloud()
                        .then_some(obstacle.vertical_position()),
                })
                .collect(),
        }
    }

    //--- Viewport ---------------------------------------------------------

    /// Updates the width used for wrapping and for future spawns.
    /// Live obstacles keep their positions.
    pub fn set_viewport_width(&mut self, width: f64) {
        if !width.is_finite() || width <= 0.0 {
            warn!(target: "sim", "Ignoring invalid viewport width {}", width);
            return;
        }
        if width != self.viewport_width {
            debug!(target: "sim", "Viewport width {} -> {}", self.viewport_width, width);
            self.viewport_width = width;
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn locomotion(&self) -> &LocomotionMachine {
        &self.locomotion
    }

    pub fn scroller(&self) -> &WorldScroller {
        &self.scroller
    }

    pub fn spawner(&self) -> &ObstacleSpawner {
        &self.spawner
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Number of completed steps.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds across all steps.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
