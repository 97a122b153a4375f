//=========================================================================
// Stagecraft Library Root
//
// A minimal frame-driven runtime for 2D canvas games: a scene tree with
// deferred mutation, a scene stack with fading transitions, and a
// window host that drives one frame per display refresh.
//
// Typical usage:
// ```no_run
// use stagecraft::prelude::*;
//
// struct Title;
// impl Behavior for Title {}
//
// fn main() -> Result<(), PlatformError> {
//     EngineBuilder::new()
//         .build()
//         .init(|controller| {
//             let scene = Scene::new(&controller.handle(), Title);
//             controller.push_scene(scene);
//         })
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the platform-independent runtime (nodes, fader, scenes,
// canvas and input abstractions). Most code only needs the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` is the Winit + pixels host and is not part of the public
// API surface. `engine` is the builder facade over it.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::platform_bridge::PlatformError;
pub use engine::{Engine, EngineBuilder};
