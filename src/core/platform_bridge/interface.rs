//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events and errors).
//
// The host pushes `PlatformEvent`s into a bounded channel at every frame
// boundary; the core drains them before running the frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use pixels::{Error as PixelsError, TextureError};
use thiserror::Error;
use winit::error::{EventLoopError, OsError};

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from the host to the core.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Input gathered since the previous frame boundary, in arrival order.
    Inputs(Vec<InputEvent>),

    /// Window close requested.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Host initialization and runtime errors.
///
/// All of these are fatal; `Engine::run` returns them to the caller.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("failed to create event loop: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    /// Event loop terminated with an error.
    #[error("event loop failed: {0}")]
    EventLoopExecution(#[source] EventLoopError),

    /// The OS refused to open a window.
    #[error("failed to create window: {0}")]
    WindowCreation(#[source] OsError),

    /// The pixel surface could not be created or presented.
    #[error("pixel surface error: {0}")]
    Surface(#[source] PixelsError),

    /// The pixel surface could not follow a window resize.
    #[error("failed to resize pixel surface: {0}")]
    SurfaceResize(#[source] TextureError),
}

//=========================================================================
// Unit Tests
//=========================================================================
