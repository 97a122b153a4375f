//=========================================================================
// Scene Controller
//=========================================================================
//
// Owns the active scene stack and mediates every scene lifecycle change.
//
// Architecture:
//   SceneController
//     ├─ scenes: Vec<Scene>                       (bottom → top)
//     └─ transitions: Rc<RefCell<SceneTransitions<Scene>>>
//                          ▲
//   ControllerHandle ──────┘ (Weak, held by every Scene)
//
// Scenes request transitions through their handle while the controller
// is walking the top scene's tree. The requests land in the shared
// transition machine and are evaluated at the start of the next update.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::transition::{SceneTransitions, SceneUpdate, TransitionState};
use super::Scene;
use crate::core::canvas::{Canvas, Color};
use crate::core::fader::Fader;
use crate::core::frame::FrameContext;

type SharedTransitions = Rc<RefCell<SceneTransitions<Scene>>>;

//=== SceneController =====================================================

/// Active scene stack plus the transition machine driving it.
pub struct SceneController {
    transitions: SharedTransitions,
    scenes: Vec<Scene>,
    canvas_width: u32,
    canvas_height: u32,
}

impl SceneController {
    /// Creates a controller for a canvas of the given size with an empty
    /// stack.
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            transitions: Rc::new(RefCell::new(SceneTransitions::new())),
            scenes: Vec::new(),
            canvas_width,
            canvas_height,
        }
    }

    /// Returns a handle scenes keep to request transitions.
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            transitions: Rc::downgrade(&self.transitions),
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
        }
    }

    //--- Requests ---------------------------------------------------------

    /// Fades out, replaces the whole stack with `scene`, then fades in.
    pub fn change_scene(&self, scene: Scene) {
        self.with_transitions("change_scene", |t| t.request_change(scene));
    }

    /// Adds `scene` on top of the stack at the next update. No fade.
    pub fn push_scene(&self, scene: Scene) {
        self.with_transitions("push_scene", |t| t.request_push(scene));
    }

    /// Removes the top scene at the next update. No fade.
    pub fn pop_scene(&self) {
        self.with_transitions("pop_scene", |t| t.request_pop());
    }

    //--- Configuration ----------------------------------------------------

    pub fn set_fade_color(&self, color: Color) {
        self.with_transitions("set_fade_color", |t| t.fader_mut().set_color(color));
    }

    pub fn set_fade_duration(&self, seconds: f32) {
        self.with_transitions("set_fade_duration", |t| t.fader_mut().set_duration(seconds));
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> TransitionState {
        self.transitions.borrow().state()
    }

    pub fn fader(&self) -> Ref<'_, Fader> {
        Ref::map(self.transitions.borrow(), |t| t.fader())
    }

    /// Number of scenes on the active stack.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// The scene currently receiving updates, if any.
    pub fn top_scene(&self) -> Option<&Scene> {
        self.scenes.last()
    }

    /// Active stack, bottom to top.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    //--- Frame Processing -------------------------------------------------

    /// Advances the fader and the transition machine, then updates the
    /// top scene unless a fade is in progress.
    pub fn update(&mut self, ctx: &FrameContext<'_>) {
        let (update, retired) = {
            let Ok(mut transitions) = self.transitions.try_borrow_mut() else {
                warn!(target: "scene", "Transition state busy, skipping frame");
                return;
            };
            transitions.fader_mut().update(ctx);
            let update = transitions.advance(&mut self.scenes);
            (update, transitions.take_retired())
        };

        if !retired.is_empty() {
            debug!(target: "scene", "Dropping {} retired scene(s)", retired.len());
        }
        drop(retired);

        if update == SceneUpdate::Skip {
            return;
        }

        if let Some(top) = self.scenes.last() {
            top.node().update(ctx);
        }
    }

    /// Renders every scene bottom to top, then the fade overlay.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        for scene in &self.scenes {
            scene.node().render(canvas);
        }

        match self.transitions.try_borrow() {
            Ok(transitions) => transitions.fader().render(canvas),
            Err(_) => warn!(target: "scene", "Transition state busy, fade overlay skipped"),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn with_transitions<F>(&self, operation: &str, f: F)
    where
        F: FnOnce(&mut SceneTransitions<Scene>),
    {
        apply(&self.transitions, operation, f);
    }
}

impl fmt::Debug for SceneController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneController")
            .field("scenes", &self.scenes.len())
            .field("state", &self.transitions.try_borrow().map(|t| t.state()).ok())
            .field("canvas", &(self.canvas_width, self.canvas_height))
            .finish()
    }
}

//=== ControllerHandle ====================================================

/// Non-owning handle to a [`SceneController`].
///
/// Requests made after the controller has been dropped are logged and
/// discarded.
#[derive(Clone)]
pub struct ControllerHandle {
    transitions: Weak<RefCell<SceneTransitions<Scene>>>,
    canvas_width: u32,
    canvas_height: u32,
}

impl ControllerHandle {
    pub fn change_scene(&self, scene: Scene) {
        self.with_transitions("change_scene", |t| t.request_change(scene));
    }

    pub fn push_scene(&self, scene: Scene) {
        self.with_transitions("push_scene", |t| t.request_push(scene));
    }

    pub fn pop_scene(&self) {
        self.with_transitions("pop_scene", |t| t.request_pop());
    }

    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    /// `true` while the controller this handle came from is alive.
    pub fn is_connected(&self) -> bool {
        self.transitions.strong_count() > 0
    }

    fn with_transitions<F>(&self, operation: &str, f: F)
    where
        F: FnOnce(&mut SceneTransitions<Scene>),
    {
        match self.transitions.upgrade() {
            Some(shared) => apply(&shared, operation, f),
            None => warn!(target: "scene", "{} ignored: controller dropped", operation),
        }
    }
}

impl fmt::Debug for ControllerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerHandle")
            .field("connected", &self.is_connected())
            .field("canvas", &(self.canvas_width, self.canvas_height))
            .finish()
    }
}

//=== Shared Helpers ======================================================

fn apply<F>(shared: &SharedTransitions, operation: &str, f: F)
where
    F: FnOnce(&mut SceneTransitions<Scene>),
{
    match shared.try_borrow_mut() {
        Ok(mut transitions) => {
            debug!(target: "scene", "{}", operation);
            f(&mut transitions);
        }
        Err(_) => warn!(target: "scene", "{} ignored: transition state busy", operation),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
