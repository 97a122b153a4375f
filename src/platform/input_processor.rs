//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit pointer and touch events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → InputBuffer
//
// Stateful cursor tracking: Winit reports mouse buttons without a
// position, so the last `CursorMoved` position is cached and attached to
// every press. Only the start of an interaction is reported; releases,
// moves and touch updates are filtered (returns None).
//
// Positions handed in here are already in canvas pixels.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, MouseButton};

//=== InputProcessor ======================================================

/// Converts Winit events to engine InputEvents with cursor tracking.
pub(crate) struct InputProcessor {
    cursor: Option<(f32, f32)>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self { cursor: None }
    }

    //--- Cursor State Management ------------------------------------------

    /// Caches the latest cursor position in window coordinates.
    pub(crate) fn update_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Some((x, y));
    }

    /// Forgets the cursor when it leaves the window.
    pub(crate) fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Last known cursor position, `None` before the first move.
    pub(crate) fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a mouse button change at canvas `position` (presses only).
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
        position: (f32, f32),
    ) -> Option<InputEvent> {
        match state {
            ElementState::Pressed => Some(InputEvent::PointerDown {
                x: position.0,
                y: position.1,
                button: MouseButton::from(button),
            }),
            ElementState::Released => None,
        }
    }

    /// Converts a touch phase change at canvas `position` (starts only).
    pub(crate) fn process_touch(
        &self,
        phase: TouchPhase,
        id: u64,
        position: (f32, f32),
    ) -> Option<InputEvent> {
        match phase {
            TouchPhase::Started => Some(InputEvent::TouchStart {
                id,
                x: position.0,
                y: position.1,
            }),
            TouchPhase::Moved | TouchPhase::Ended | TouchPhase::Cancelled => None,
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit mouse buttons to engine mouse buttons.
///
/// Back, Forward and numbered buttons collapse into `Other`.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back | WinitMouseButton::Forward | WinitMouseButton::Other(_) => {
                MouseButton::Other
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
