//=========================================================================
// Sprite Runner Engine
//
// Main entry point and coordinator for the runtime.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              └─ spawns logic thread
//         ├─ with_channel_capacity()    runs platform
//         ├─ with_config()              blocks until exit
//         ├─ with_seed()
//         ├─ with_render_scale()
//         ├─ with_window_size()
//         └─ with_key_binding()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::io;

use crossbeam_channel::bounded;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

//=== Internal Dependencies ===============================================

use crate::core::input::{Command, InputSystem, KeyCode};
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::simulation::{ConfigError, EntityRegistry, RenderScale, SimConfig, Simulation};
use crate::core::{CoreReport, CoreSystemsOrchestrator, SnapshotPublisher};
use crate::platform::{Platform, WindowSettings};

//=== EngineError =========================================================

/// Failures while building or running the engine.
#[derive(Debug)]
pub enum EngineError {
    /// The simulation configuration was rejected.
    Config(ConfigError),

    /// The window or event loop failed.
    Platform(PlatformError),

    /// The logic thread could not be started.
    ThreadSpawn(io::Error),

    /// The logic thread panicked.
    CoreThreadPanicked,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Invalid configuration: {}", e),
            Self::Platform(e) => write!(f, "Platform failure: {}", e),
            Self::ThreadSpawn(e) => write!(f, "Failed to spawn core thread: {}", e),
            Self::CoreThreadPanicked => write!(f, "Core thread panicked"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Platform(e) => Some(e),
            Self::ThreadSpawn(e) => Some(e),
            Self::CoreThreadPanicked => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PlatformError> for EngineError {
    fn from(e: PlatformError) -> Self {
        Self::Platform(e)
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Config**: [`SimConfig::default()`]
/// - **Seed**: none (entropy)
/// - **Render scale**: 1 pixel per unit
/// - **Window**: 1280x400 logical pixels
///
/// # Examples
///
/// ```no_run
/// use sprite_runner::EngineBuilder;
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_seed(7)
///     .build()?
///     .run()?;
/// # Ok::<(), sprite_runner::EngineError>(())
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    config: SimConfig,
    seed: Option<u64>,
    render_scale: RenderScale,
    window_size: (u32, u32),
    input_system: InputSystem,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            config: SimConfig::default(),
            seed: None,
            render_scale: RenderScale::IDENTITY,
            window_size: (1280, 400),
            input_system: InputSystem::new(),
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the capacity of the platform → core event channel.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Replaces the simulation constants. Validated in [`build`](Self::build).
    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Seeds the spawn randomness for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_render_scale(mut self, scale: RenderScale) -> Self {
        self.render_scale = scale;
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.window_size = (width, height);
        self
    }

    /// Binds an extra key (or rebinds an existing one).
    pub fn with_key_binding(mut self, key: KeyCode, command: Command) -> Self {
        self.input_system.mapper_mut().bind(key, command);
        self
    }

    /// Validates the configuration and assembles the engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration is invalid.
    pub fn build(self) -> Result<Engine, EngineError> {
        info!(
            "Building engine (TPS: {}, channel: {}, seed: {:?})",
            self.tps, self.channel_capacity, self.seed
        );

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let window = WindowSettings {
            width: self.window_size.0,
            height: self.window_size.1,
            render_scale: self.render_scale,
        };
        let viewport_width = self.render_scale.to_units(window.width as f64);

        let simulation = Simulation::new(self.config, viewport_width, rng, EntityRegistry::new())?;

        Ok(Engine {
            orchestrator: CoreSystemsOrchestrator::new(
                self.input_system,
                simulation,
                self.render_scale,
            ),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Sprite runner runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► InputSystem, Simulation
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Input Polling, Title
///
/// Communication: PlatformEvent channel in, FrameSnapshot channel out
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
    window: WindowSettings,
}

impl Engine {
    //--- Execution --------------------------------------------------------

    /// Starts the runtime and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the event and snapshot channels
    /// 2. Spawns the logic thread running at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: platform exits → channel disconnects → logic
    ///    thread terminates and is joined
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the logic thread cannot start, the
    /// platform fails, or the logic thread panics.
    pub fn run(self) -> Result<CoreReport, EngineError> {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channels -----------------------------
        let (event_tx, event_rx) = bounded::<PlatformEvent>(self.channel_capacity);
        let (snapshot_tx, snapshot_rx) = bounded(2);
        let publisher = SnapshotPublisher::new(snapshot_tx, snapshot_rx.clone());

        info!("Channels created (events: {}, snapshots: 2)", self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = self
            .orchestrator
            .spawn_core_thread(event_rx, publisher, self.tps)
            .map_err(EngineError::ThreadSpawn)?;
        info!("Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(event_tx, snapshot_rx, self.window);
        info!("Platform initialized, entering event loop");

        // Platform is consumed here, so the event sender is dropped and the
        // core thread sees a disconnect even on error.
        let platform_result = platform.run();
        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup: Wait for logic thread to terminate --------------
        let report = match core_handle.join() {
            Ok(report) => {
                info!("Core thread terminated cleanly");
                report
            }
            Err(e) => {
                error!("Core thread panicked: {:?}", e);
                return Err(EngineError::CoreThreadPanicked);
            }
        };

        platform_result?;
        info!("Engine shutdown complete");
        Ok(report)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
