//=========================================================================
// Input Buffer
//
// Holds the pointer events of one frame until the frame boundary.
//
// Responsibilities:
// - Store incoming events in arrival order
// - Hand the whole batch over at `RedrawRequested` via `drain()`
//
// Notes:
// Presses are never deduplicated: two taps in one frame are two
// touch points for the scene tree.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::InputEvent;

//=== InputBuffer Struct ==================================================
pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    pub(crate) fn new() -> Self {
        const EVENT_BASE: usize = 16;

        Self {
            events: Vec::with_capacity(EVENT_BASE),
        }
    }

    pub(crate) fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns the frame's events and empties the buffer, or `None` when
    // nothing arrived (so empty batches never cross the channel).
    //
    pub(crate) fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.events.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.events))
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
