//=========================================================================
// Event Collector
//=========================================================================
//
// Platform event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → ordered FrameInputs → TickControl
//                                             → latest viewport width
//
// Focus loss stays in the input stream at the position it arrived, so keys
// pressed after it are not released with the ones held before it.
//
// Bounded polling prevents starvation. The caller paces the loop, so an
// empty queue returns immediately.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== FrameInput ==========================================================

/// Input-related platform events collected in one frame, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FrameInput {
    Keys(Vec<InputEvent>),
    FocusLost,
}

//=== EventCollector ======================================================

/// Collects platform events with bounded polling and batch extraction.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    inputs: Vec<FrameInput>,
    viewport_width: Option<f64>,
}

impl EventCollector {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            inputs: Vec::with_capacity(4),
            viewport_width: None,
        }
    }

    /// Collects pending platform events (bounded to prevent starvation).
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.inputs.clear();
        self.viewport_width = None;
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => {
                    debug!(target: "core", "Platform channel disconnected");
                    return TickControl::Exit;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!(target: "core", "Event queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Returns collected inputs for this frame.
    #[cfg(test)]
    pub(crate) fn inputs(&self) -> &[FrameInput] {
        &self.inputs
    }

    /// Takes ownership of collected inputs, leaving an empty vec.
    pub(crate) fn take_inputs(&mut self) -> Vec<FrameInput> {
        std::mem::take(&mut self.inputs)
    }

    /// Most recent viewport width reported this frame, if any.
    pub(crate) fn viewport_width(&self) -> Option<f64> {
        self.viewport_width
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Inputs(batch) => {
                if !batch.is_empty() {
                    self.inputs.push(FrameInput::Keys(batch));
                }
                TickControl::Continue
            }
            PlatformEvent::ViewportResized { width } => {
                // Later resizes in the same frame win.
                self.viewport_width = Some(width);
                TickControl::Continue
            }
            PlatformEvent::FocusLost => {
                self.inputs.push(FrameInput::FocusLost);
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
