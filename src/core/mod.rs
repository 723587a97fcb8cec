//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for everything that runs on the logic thread.
//
// Responsibilities:
// - Receive platform events through the bridge (input, resize, close)
// - Turn key edges into commands and apply them before the frame
// - Step the simulation once per tick and publish the snapshot
// - Maintain pacing at a fixed tick rate (TPS)
//
// Tick order:
//   1. EventCollector::collect_frame   (exit on close / disconnect)
//   2. viewport resize                 (affects wrap and future spawns)
//   3. InputSystem::update → commands  (applied in arrival order; held
//                                       keys released where focus was lost)
//   4. FrameDriver::tick               (one simulation step)
//   5. publish snapshot                (latest wins on a full channel)
//
//=========================================================================

//=== Module Declarations =================================================

pub mod input;
pub mod platform_bridge;
pub mod simulation;

//=== Standard Library Imports ============================================

use std::io;
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, info, trace};
use rand::rngs::StdRng;

//=== Internal Modules ====================================================

use input::{InputEvent, InputSystem};
use platform_bridge::{EventCollector, FrameInput, PlatformEvent, TickControl};
use simulation::{
    Clock, EntityRegistry, FrameDriver, FrameSnapshot, RenderScale, Simulation, SystemClock,
};

//=== Runtime Types =======================================================

/// Simulation as assembled by the engine.
pub(crate) type RuntimeSimulation = Simulation<StdRng, EntityRegistry>;

//=== CoreReport ==========================================================

/// Totals reported by the logic thread when it exits.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoreReport {
    pub frames: u64,
    pub simulated_seconds: f64,
    pub spawned: u64,
    pub retired: u64,
    pub dropped_snapshots: u64,
}

//=== SnapshotPublisher ===================================================

/// Non-blocking core → platform snapshot sender.
///
/// Holds a receiver clone so it can evict the oldest queued snapshot when
/// the platform falls behind.
pub(crate) struct SnapshotPublisher {
    sender: Sender<FrameSnapshot>,
    evict: Receiver<FrameSnapshot>,
    dropped: u64,
    disconnected: bool,
}

impl SnapshotPublisher {
    pub(crate) fn new(sender: Sender<FrameSnapshot>, evict: Receiver<FrameSnapshot>) -> Self {
        Self {
            sender,
            evict,
            dropped: 0,
            disconnected: false,
        }
    }

    pub(crate) fn publish(&mut self, snapshot: FrameSnapshot) {
        match self.sender.try_send(snapshot) {
            Ok(()) => {}
            Err(TrySendError::Full(snapshot)) => {
                if self.evict.try_recv().is_ok() {
                    self.dropped += 1;
                    trace!(target: "core", "Dropped stale snapshot ({} total)", self.dropped);
                }
                if self.sender.try_send(snapshot).is_err() {
                    self.dropped += 1;
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                if !self.disconnected {
                    debug!(target: "core", "Snapshot receiver gone, frames no longer published");
                    self.disconnected = true;
                }
            }
        }
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.dropped
    }
}

//=== CoreLoop ============================================================

/// One logic thread's worth of state, stepped by `tick()`.
pub(crate) struct CoreLoop<C: Clock> {
    collector: EventCollector,
    input_system: InputSystem,
    driver: FrameDriver<C, StdRng, EntityRegistry>,
    publisher: SnapshotPublisher,
    render_scale: RenderScale,
}

impl<C: Clock> CoreLoop<C> {
    pub(crate) fn new(
        collector: EventCollector,
        input_system: InputSystem,
        driver: FrameDriver<C, StdRng, EntityRegistry>,
        publisher: SnapshotPublisher,
        render_scale: RenderScale,
    ) -> Self {
        Self {
            collector,
            input_system,
            driver,
            publisher,
            render_scale,
        }
    }

    /// Runs one full tick. Returns `Exit` once the platform is gone.
    pub(crate) fn tick(&mut self) -> TickControl {
        //--- Step 1: Gather platform events ------------------------------
        if self.collector.collect_frame() == TickControl::Exit {
            return TickControl::Exit;
        }

        //--- Step 2: Viewport --------------------------------------------
        if let Some(width) = self.collector.viewport_width() {
            self.driver.simulation_mut().set_viewport_width(width);
        }

        //--- Step 3: Commands --------------------------------------------
        let mut batches = Vec::new();
        for input in self.collector.take_inputs() {
            match input {
                FrameInput::Keys(batch) => batches.push(batch),
                FrameInput::FocusLost => {
                    self.apply_batches(&mut batches);
                    self.input_system.release_all();
                }
            }
        }
        self.apply_batches(&mut batches);

        //--- Step 4: Simulation step -------------------------------------
        let snapshot = self.driver.tick();

        //--- Step 5: Publish ---------------------------------------------
        self.publisher.publish(self.render_scale.project(&snapshot));

        TickControl::Continue
    }

    fn apply_batches(&mut self, batches: &mut Vec<Vec<InputEvent>>) {
        for command in self.input_system.update(batches) {
            self.driver.apply(command);
        }
    }

    pub(crate) fn report(&self) -> CoreReport {
        let simulation = self.driver.simulation();
        CoreReport {
            frames: simulation.frame(),
            simulated_seconds: simulation.elapsed(),
            spawned: simulation.spawner().spawned_total(),
            retired: simulation.spawner().retired_total(),
            dropped_snapshots: self.publisher.dropped(),
        }
    }

    #[cfg(test)]
    pub(crate) fn driver(&self) -> &FrameDriver<C, StdRng, EntityRegistry> {
        &self.driver
    }
}

//=== CoreSystemsOrchestrator =============================================

/// Owns the core systems until the logic thread takes them over.
pub(crate) struct CoreSystemsOrchestrator {
    input_system: InputSystem,
    simulation: RuntimeSimulation,
    render_scale: RenderScale,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(
        input_system: InputSystem,
        simulation: RuntimeSimulation,
        render_scale: RenderScale,
    ) -> Self {
        Self {
            input_system,
            simulation,
            render_scale,
        }
    }

    #[cfg(test)]
    pub(crate) fn simulation(&self) -> &RuntimeSimulation {
        &self.simulation
    }

    #[cfg(test)]
    pub(crate) fn input_system(&self) -> &InputSystem {
        &self.input_system
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread and ticks the core loop at a fixed rate until
    // the platform closes the window or drops its end of the channel.
    //
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        publisher: SnapshotPublisher,
        tps: f64,
    ) -> io::Result<thread::JoinHandle<CoreReport>> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::Builder::new()
            .name("core-logic".into())
            .spawn(move || {
                // The clock starts on the logic thread so the first delta
                // does not include engine startup.
                let driver = FrameDriver::new(SystemClock::new(), self.simulation);
                let mut core = CoreLoop::new(
                    EventCollector::new(receiver),
                    self.input_system,
                    driver,
                    publisher,
                    self.render_scale,
                );

                info!(target: "core", "Core thread running at {} TPS", tps);

                loop {
                    let frame_start = Instant::now();

                    if core.tick() == TickControl::Exit {
                        break;
                    }

                    let elapsed = frame_start.elapsed();
                    if elapsed < frame_duration {
                        thread::sleep(frame_duration - elapsed);
                    }
                }

                let report = core.report();
                info!(
                    target: "core",
                    "Core thread exiting after {} frames ({:.2}s simulated, {} spawned, {} retired, {} snapshots dropped)",
                    report.frames,
                    report.simulated_seconds,
                    report.spawned,
                    report.retired,
                    report.dropped_snapshots
                );
                report
            })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
