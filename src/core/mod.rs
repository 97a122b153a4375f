//=========================================================================
// Core Systems
//
// Platform-independent runtime: the scene tree, the fader, the scene
// controller and the frame loop driving them.
//
// Frame flow:
//   EventCollector → TouchInput → FrameContext
//     → SceneController::update (fader, transitions, top scene tree)
//     → SceneController::render (every scene, then the fade overlay)
//     → TouchInput::refresh
//
// Nothing in here talks to the window system. The platform layer feeds
// events through `platform_bridge` and hands a canvas to each frame.
//
//=========================================================================

pub(crate) mod application;
pub mod canvas;
pub mod fader;
pub mod frame;
pub mod input;
pub mod node;
pub(crate) mod platform_bridge;
pub mod scene;
