//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagecraft::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::core::platform_bridge::PlatformError;

// Scene tree
pub use crate::core::frame::FrameContext;
pub use crate::core::node::{Behavior, Node, NodeRef};

// Scenes and transitions
pub use crate::core::fader::{FadeDirection, Fader};
pub use crate::core::scene::{ControllerHandle, Scene, SceneController, TransitionState};

// Rendering
pub use crate::core::canvas::{Canvas, Color, Rect};

// Input
pub use crate::core::input::{InputSource, Point};
