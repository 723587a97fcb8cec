//=========================================================================
// Platform Subsystem
//
// Bridges winit (OS-level events) with the logic thread via channels.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  winit Event Loop        │    │  CoreLoop        │
//  │   ↓                      │    │   ↓              │
//  │  InputProcessor          │    │  InputSystem     │
//  │   ↓                      │    │   ↓              │
//  │  InputBuffer             │    │  Simulation      │
//  │   ↓                      │    │   ↓              │
//  │  RedrawRequested ────────┼───►│  FrameSnapshot   │
//  │   (flush, PlatformEvent) │    │   │              │
//  │                          │◄───┼───┘              │
//  │  TitleDisplay            │    └──────────────────┘
//  └──────────────────────────┘
// ```
//
// Frame boundary is RedrawRequested: buffered keys are flushed as one
// batch and the newest snapshot (if any) updates the window title.
//
// Resizes are converted from physical pixels to simulation units before
// they are sent. Focus loss is forwarded so the core can drop held keys.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::{Receiver, Sender};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::simulation::{FrameSnapshot, RenderScale};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Window Settings =====================================================

pub(crate) const WINDOW_TITLE: &str = "Sprite Runner";

/// Window parameters chosen on the engine builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WindowSettings {
    /// Logical size in pixels.
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) render_scale: RenderScale,
}

impl WindowSettings {
    /// Viewport width in simulation units for a drawable of
    /// `physical_width` pixels at `scale_factor`.
    pub(crate) fn viewport_units(&self, physical_width: u32, scale_factor: f64) -> f64 {
        let logical = if scale_factor > 0.0 {
            physical_width as f64 / scale_factor
        } else {
            physical_width as f64
        };
        self.render_scale.to_units(logical)
    }
}

//=== TitleDisplay ========================================================

/// Diagnostic display of state label and visual frame in the title bar.
#[derive(Debug, Default)]
pub(crate) struct TitleDisplay {
    current: Option<String>,
}

impl TitleDisplay {
    /// Returns the new title if `snapshot` changes what is shown.
    pub(crate) fn observe(&mut self, snapshot: &FrameSnapshot) -> Option<&str> {
        let title = match &snapshot.visual_frame {
            Some(frame) => format!("{} | {} | {}", WINDOW_TITLE, snapshot.state_label(), frame),
            None => format!("{} | {}", WINDOW_TITLE, snapshot.state_label()),
        };

        if self.current.as_deref() == Some(title.as_str()) {
            return None;
        }
        self.current = Some(title);
        self.current.as_deref()
    }
}

//=== Platform ============================================================

/// Window manager and input event aggregator.
///
/// Runs on the main thread (winit requirement on macOS/iOS). Talks to the
/// logic thread only through the two channels.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    settings: WindowSettings,

    /// Buffers key events until the frame boundary.
    buffer: InputBuffer,

    event_sender: Sender<PlatformEvent>,
    snapshot_receiver: Receiver<FrameSnapshot>,

    input_processor: InputProcessor,
    title: TitleDisplay,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens in `resumed()`.
    pub(crate) fn new(
        event_sender: Sender<PlatformEvent>,
        snapshot_receiver: Receiver<FrameSnapshot>,
        settings: WindowSettings,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            settings,
            buffer: InputBuffer::new(),
            event_sender,
            snapshot_receiver,
            input_processor: InputProcessor::new(),
            title: TitleDisplay::default(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop on the calling thread until the window
    /// closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// exits with an error.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Flushes buffered key events to the core thread as one batch.
    ///
    /// A disconnected channel (core thread gone) drops the events with a
    /// warning so the window can still be closed.
    fn flush_input_buffer(&mut self) {
        let pending = self.buffer.len();
        if let Some(batch) = self.buffer.drain() {
            trace!(target: "platform::input", "Flushing {} key events", pending);

            if self.event_sender.send(PlatformEvent::Inputs(batch)).is_err() {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} events",
                    pending
                );
            }
        }
    }

    fn send(&self, event: PlatformEvent) {
        if self.event_sender.send(event).is_err() {
            debug!(target: "platform", "Core channel closed, event dropped");
        }
    }

    /// Applies the newest pending snapshot to the title bar.
    fn present_latest_snapshot(&mut self) {
        let Some(snapshot) = self.snapshot_receiver.try_iter().last() else {
            return;
        };

        if let Some(title) = self.title.observe(&snapshot) {
            trace!(target: "platform", "Title: {}", title);
            if let Some(window) = &self.window {
                window.set_title(title);
            }
        }
    }

    fn report_viewport(&self, physical_width: u32, scale_factor: f64) {
        let width = self.settings.viewport_units(physical_width, scale_factor);
        debug!(target: "platform", "Viewport width {} px -> {} units", physical_width, width);
        self.send(PlatformEvent::ViewportResized { width });
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first resume (mobile may resume repeatedly).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                let scale_factor = window.scale_factor();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    scale_factor
                );
                window.request_redraw();
                self.window = Some(window);
                self.report_viewport(size.width, scale_factor);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.flush_input_buffer();
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.input_processor.process_key_event(key_event) {
                    Some(event) => self.buffer.push(event),
                    None => trace!(
                        target: "platform::input",
                        "Unmapped key ignored ({} so far)",
                        self.input_processor.ignored_keys()
                    ),
                }
            }

            WindowEvent::Resized(size) => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.report_viewport(size.width, scale_factor);
            }

            WindowEvent::Focused(false) => {
                debug!(target: "platform::input", "Focus lost");
                self.flush_input_buffer();
                self.send(PlatformEvent::FocusLost);
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();
                self.present_latest_snapshot();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::simulation::{LocomotionMachine, LocomotionState, SimConfig, VisualFrame};
    use crossbeam_channel::unbounded;

    //--- Test Helpers -----------------------------------------------------

    fn settings() -> WindowSettings {
        WindowSettings {
            width: 1280,
            height: 400,
            render_scale: RenderScale::IDENTITY,
        }
    }

    fn platform() -> (Platform, Receiver<PlatformEvent>, Sender<FrameSnapshot>) {
        let (event_tx, event_rx) = unbounded();
        let (snapshot_tx, snapshot_rx) = unbounded();
        (Platform::new(event_tx, snapshot_rx, settings()), event_rx, snapshot_tx)
    }

    fn snapshot(state: LocomotionState, visual_frame: Option<VisualFrame>) -> FrameSnapshot {
        FrameSnapshot {
            frame: 1,
            character_offset: 22.0,
            state,
            background_offset: 0.0,
            visual_frame,
            obstacles: Vec::new(),
        }
    }

    //=====================================================================
    // Platform Tests
    //=====================================================================

    #[test]
    fn platform_creation() {
        let (platform, _rx, _tx) = platform();
        assert!(platform.window().is_none(), "Window should be created lazily");
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (mut platform, rx, _tx) = platform();

        platform.flush_input_buffer();

        assert!(rx.try_recv().is_err(), "No events should be sent for empty buffer");
    }

    #[test]
    fn flush_sends_buffered_events_in_order() {
        let (mut platform, rx, _tx) = platform();
        platform.buffer.push(InputEvent::KeyDown { key: KeyCode::KeyD });
        platform.buffer.push(InputEvent::KeyDown { key: KeyCode::Space });

        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs(batch)) => assert_eq!(
                batch,
                vec![
                    InputEvent::KeyDown { key: KeyCode::KeyD },
                    InputEvent::KeyDown { key: KeyCode::Space }
                ]
            ),
            other => panic!("Expected Inputs event, got {:?}", other),
        }
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (mut platform, rx, _tx) = platform();
        platform.buffer.push(InputEvent::KeyDown { key: KeyCode::Space });

        drop(rx);

        // Should not panic, just log
        platform.flush_input_buffer();
        assert!(platform.buffer.is_empty());
    }

    #[test]
    fn present_uses_newest_snapshot() {
        let (mut platform, _rx, tx) = platform();
        tx.send(snapshot(LocomotionState::Walking, None)).unwrap();
        tx.send(snapshot(LocomotionState::Running, None)).unwrap();

        platform.present_latest_snapshot();

        assert_eq!(platform.title.current.as_deref(), Some("Sprite Runner | q1"));
        assert!(platform.snapshot_receiver.is_empty());
    }

    //=====================================================================
    // Title & Viewport Tests
    //=====================================================================

    #[test]
    fn title_changes_only_when_display_changes() {
        let mut title = TitleDisplay::default();
        let walking = snapshot(LocomotionState::Walking, None);

        assert_eq!(title.observe(&walking), Some("Sprite Runner | q0"));
        assert_eq!(title.observe(&walking), None);
    }

    #[test]
    fn title_includes_visual_frame() {
        let mut title = TitleDisplay::default();
        let config = SimConfig::default();
        let mut machine = LocomotionMachine::new(&config);
        machine.enter(LocomotionState::Flying, &config);

        let flying = snapshot(LocomotionState::Flying, machine.visual_frame());
        assert_eq!(title.observe(&flying), Some("Sprite Runner | q2 | flying-1"));
    }

    #[test]
    fn viewport_units_account_for_dpi_and_scale() {
        let hidpi = settings().viewport_units(2560, 2.0);
        assert_eq!(hidpi, 1280.0);

        let scaled = WindowSettings { render_scale: RenderScale::new(2.0), ..settings() };
        assert_eq!(scaled.viewport_units(1280, 1.0), 640.0);
    }
}
