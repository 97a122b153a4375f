//=========================================================================
// Scene System
//=========================================================================
//
// Stack-based scene switching with fade transitions.
//
// Architecture:
//   SceneController
//     ├─ scenes: Vec<Scene>          (all rendered, top one updated)
//     └─ SceneTransitions<Scene>     (fader + state + pending set)
//
// Flow:
//   update() → fader.update() → advance() → top scene tree update()
//   render() → every scene bottom to top → fader overlay
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::node::{Behavior, Node, NodeRef};

//=== Module Declarations =================================================

mod controller;
mod transition;

//=== Public API ==========================================================

pub use controller::{ControllerHandle, SceneController};
pub use transition::{SceneTransitions, SceneUpdate, TransitionState};

//=== Scene ===============================================================

/// Root node of one screen, bound to the controller that manages it.
///
/// Cloning a `Scene` clones the handle to the same tree.
#[derive(Clone)]
pub struct Scene {
    node: NodeRef,
    controller: ControllerHandle,
}

impl Scene {
    /// Creates a scene whose root node runs `behavior`.
    pub fn new<B: Behavior>(controller: &ControllerHandle, behavior: B) -> Self {
        Self {
            node: Node::new(behavior),
            controller: controller.clone(),
        }
    }

    /// Root node. Add the scene's content as its children.
    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    /// Handle used to request transitions away from this scene.
    pub fn controller(&self) -> &ControllerHandle {
        &self.controller
    }

    /// `true` if both values refer to the same scene tree.
    pub fn same_scene(&self, other: &Scene) -> bool {
        self.node.is(&other.node)
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("children", &self.node.child_count())
            .field("controller", &self.controller)
            .finish()
    }
}

//=== Tests ===============================================================
