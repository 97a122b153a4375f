//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side drain of the platform channel with shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → TouchInput → TickControl
//
// Polling is bounded per frame and never blocks: the host calls this
// from inside its own redraw callback on the same thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::TouchInput;

//=== TickControl =========================================================

/// Frame loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Drains platform events into the frame's input snapshot.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
}

impl EventCollector {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self { receiver }
    }

    /// Collects pending platform events (bounded to prevent starvation).
    ///
    /// Input batches are applied to `input` in arrival order. Events left
    /// over past the bound stay queued for the next frame.
    pub(crate) fn collect_frame(&mut self, input: &mut TouchInput) -> TickControl {
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Inputs(batch)) => {
                    trace!(target: "platform::input", "Applying {} input event(s)", batch.len());
                    input.apply(&batch);
                    drained += 1;
                }
                Ok(PlatformEvent::WindowClosed) => return TickControl::Exit,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!("Event queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
