//=========================================================================
// Input Event Types
//
// Defines the internal representation of low-level pointer input.
//
// This module abstracts away platform-specific input (e.g. Winit mouse
// and touch events) into a unified, engine-friendly format consumed by
// the touch input collaborator.
//
// Responsibilities:
// - Represent pointer presses and touch starts in canvas space
// - Keep events copy-cheap so they can cross the platform bridge freely
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    TouchInput (per-frame touch snapshot)
//         ↓
//    FrameContext → scene tree
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// Abstracts Winit's `MouseButton` into a stable, portable enum. The
/// `Other` variant covers side buttons, thumb buttons and macro keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button.
    Other,
}

//=== InputEvent ==========================================================

/// Discrete pointer event from the platform layer.
///
/// Coordinates are in canvas pixels (top-left origin). They may fall
/// outside the canvas when the press happened in the window margin;
/// consumers decide whether such points matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A mouse button went down at the given position.
    PointerDown {
        x: f32,
        y: f32,
        button: MouseButton,
    },

    /// A finger touched the surface at the given position.
    ///
    /// `id` is the platform's touch identifier; only the start of a touch
    /// is reported.
    TouchStart { id: u64, x: f32, y: f32 },

    /// Unrecognized or unsupported event.
    ///
    /// Silently ignored by the input collaborator.
    Unidentified,
}

impl InputEvent {
    /// Returns the canvas position carried by this event, if any.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            InputEvent::PointerDown { x, y, .. } => Some((x, y)),
            InputEvent::TouchStart { x, y, .. } => Some((x, y)),
            InputEvent::Unidentified => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
