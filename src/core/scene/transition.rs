//=========================================================================
// Scene Transitions
//=========================================================================
//
// Tick-evaluated state machine deciding how the active scene stack
// changes and whether the top scene is updated this frame.
//
// States:
//   Idle ─change─> Changing ─fader done─> TransitioningIn ─fader done─> Idle
//   Idle ─push──> Pushing ─next tick─> Idle
//   Idle ─pop───> Popping ─next tick─> Idle
//
// Requests only record intent. The stack itself is touched in exactly
// one place, `advance`, once per frame. The last request issued before
// a tick decides the state that tick evaluates.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::fader::Fader;

//=== TransitionState =====================================================

/// Current phase of the scene transition machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    /// No transition pending; the top scene updates every frame.
    #[default]
    Idle,

    /// Fading out before replacing the whole stack.
    Changing,

    /// Stack replaced; fading the new scenes in.
    TransitioningIn,

    /// Pending scenes are appended on the next tick.
    Pushing,

    /// The top scene is dropped on the next tick.
    Popping,
}

//=== SceneUpdate =========================================================

/// Whether the top scene receives its update this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneUpdate {
    Run,
    Skip,
}

//=== SceneTransitions ====================================================

/// Fader, transition state and pending scene set.
///
/// Generic over the scene type so the evaluation order can be exercised
/// without building real scene trees.
#[derive(Debug)]
pub struct SceneTransitions<T> {
    fader: Fader,
    state: TransitionState,
    pending: Vec<T>,
    retired: Vec<T>,
}

impl<T> SceneTransitions<T> {
    pub fn new() -> Self {
        Self {
            fader: Fader::new(),
            state: TransitionState::Idle,
            pending: Vec::new(),
            retired: Vec::new(),
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Scenes waiting to enter the stack.
    pub fn pending(&self) -> &[T] {
        &self.pending
    }

    pub fn fader(&self) -> &Fader {
        &self.fader
    }

    pub fn fader_mut(&mut self) -> &mut Fader {
        &mut self.fader
    }

    //--- Requests ---------------------------------------------------------

    /// Replaces the pending set with `scene` and starts fading out.
    pub fn request_change(&mut self, scene: T) {
        self.retired.append(&mut self.pending);
        self.pending.push(scene);
        self.state = TransitionState::Changing;
        self.fader.fade_out();
    }

    /// Appends `scene` to the pending set. No fade.
    pub fn request_push(&mut self, scene: T) {
        self.pending.push(scene);
        self.state = TransitionState::Pushing;
    }

    /// Requests removal of whichever scene is on top at the next tick.
    /// The pending set is left untouched.
    pub fn request_pop(&mut self) {
        self.state = TransitionState::Popping;
    }

    //--- Frame Processing -------------------------------------------------

    /// Evaluates the current state against `stack`.
    ///
    /// The caller advances the fader first. Scenes leaving the stack are
    /// kept until [`SceneTransitions::take_retired`] so they can be
    /// dropped outside any borrow of this machine.
    pub fn advance(&mut self, stack: &mut Vec<T>) -> SceneUpdate {
        match self.state {
            TransitionState::Changing => {
                if self.fader.is_done() {
                    let incoming = std::mem::take(&mut self.pending);
                    debug!(
                        target: "scene",
                        "Fade-out complete: replacing {} scene(s) with {}",
                        stack.len(),
                        incoming.len()
                    );
                    let outgoing = std::mem::replace(stack, incoming);
                    self.retired.extend(outgoing);
                    self.fader.fade_in();
                    self.state = TransitionState::TransitioningIn;
                }
                return SceneUpdate::Skip;
            }

            TransitionState::TransitioningIn => {
                if !self.fader.is_done() {
                    return SceneUpdate::Skip;
                }
                debug!(target: "scene", "Fade-in complete");
            }

            TransitionState::Pushing => {
                debug!(target: "scene", "Pushing {} scene(s)", self.pending.len());
                stack.append(&mut self.pending);
            }

            TransitionState::Popping => match stack.pop() {
                Some(top) => {
                    debug!(target: "scene", "Popped top scene, {} left", stack.len());
                    self.retired.push(top);
                }
                None => debug!(target: "scene", "Pop on an empty stack ignored"),
            },

            TransitionState::Idle => {}
        }

        self.state = TransitionState::Idle;
        SceneUpdate::Run
    }

    /// Takes the scenes that left the stack (or the pending set) since
    /// the last call.
    pub fn take_retired(&mut self) -> Vec<T> {
        std::mem::take(&mut self.retired)
    }
}

impl<T> Default for SceneTransitions<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame::FrameContext;
    use crate::core::input::TouchInput;

    //--- Test Helpers -----------------------------------------------------

    fn machine(duration: f32) -> SceneTransitions<&'static str> {
        let mut transitions = SceneTransitions::new();
        transitions.fader_mut().set_duration(duration);
        transitions
    }

    /// One controller tick: fader first, then the state machine.
    fn tick(
        transitions: &mut SceneTransitions<&'static str>,
        stack: &mut Vec<&'static str>,
        delta: f32,
    ) -> SceneUpdate {
        let input = TouchInput::new();
        transitions.fader_mut().update(&FrameContext::new(delta, &input));
        transitions.advance(stack)
    }

    //--- Change -----------------------------------------------------------

    #[test]
    fn change_waits_for_fade_out_then_fades_in() {
        let mut t = machine(1.0);
        let mut stack = vec!["A"];

        t.request_change("B");
        assert_eq!(t.state(), TransitionState::Changing);

        assert_eq!(tick(&mut t, &mut stack, 0.5), SceneUpdate::Skip);
        assert_eq!(stack, vec!["A"]);

        assert_eq!(tick(&mut t, &mut stack, 0.5), SceneUpdate::Skip);
        assert_eq!(stack, vec!["B"]);
        assert_eq!(t.state(), TransitionState::TransitioningIn);
        assert_eq!(t.take_retired(), vec!["A"]);
        assert!(t.pending().is_empty());

        assert_eq!(tick(&mut t, &mut stack, 0.5), SceneUpdate::Skip);
        assert_eq!(tick(&mut t, &mut stack, 0.5), SceneUpdate::Run);
        assert_eq!(t.state(), TransitionState::Idle);
    }

    #[test]
    fn change_overwrites_previous_pending_set() {
        let mut t = machine(0.0);
        let mut stack = vec!["A"];

        t.request_push("X");
        t.request_change("B");
        assert_eq!(t.pending(), &["B"]);
        assert_eq!(t.take_retired(), vec!["X"]);

        tick(&mut t, &mut stack, 0.0);
        assert_eq!(stack, vec!["B"]);
    }

    #[test]
    fn zero_duration_change_still_skips_one_frame() {
        let mut t = machine(0.0);
        let mut stack = vec!["A"];
        t.request_change("B");

        assert_eq!(tick(&mut t, &mut stack, 0.0), SceneUpdate::Skip);
        assert_eq!(stack, vec!["B"]);
        assert_eq!(tick(&mut t, &mut stack, 0.0), SceneUpdate::Run);
    }

    //--- Push / Pop -------------------------------------------------------

    #[test]
    fn push_appends_and_runs_same_tick() {
        let mut t = machine(1.0);
        let mut stack = vec!["A", "B"];

        t.request_push("C");
        assert_eq!(tick(&mut t, &mut stack, 0.016), SceneUpdate::Run);
        assert_eq!(stack, vec!["A", "B", "C"]);
        assert_eq!(t.state(), TransitionState::Idle);
        assert_eq!(t.fader().direction(), crate::core::fader::FadeDirection::None);
    }

    #[test]
    fn consecutive_pushes_append_in_order() {
        let mut t = machine(1.0);
        let mut stack = vec!["A"];

        t.request_push("B");
        t.request_push("C");
        tick(&mut t, &mut stack, 0.0);
        assert_eq!(stack, vec!["A", "B", "C"]);
    }

    #[test]
    fn pop_drops_top_and_runs_same_tick() {
        let mut t = machine(1.0);
        let mut stack = vec!["A", "B", "C"];

        t.request_pop();
        assert_eq!(tick(&mut t, &mut stack, 0.016), SceneUpdate::Run);
        assert_eq!(stack, vec!["A", "B"]);
        assert_eq!(t.take_retired(), vec!["C"]);
    }

    #[test]
    fn pop_on_empty_stack_is_noop() {
        let mut t = machine(1.0);
        let mut stack: Vec<&'static str> = Vec::new();

        t.request_pop();
        assert_eq!(tick(&mut t, &mut stack, 0.0), SceneUpdate::Run);
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_keeps_pending_set() {
        let mut t = machine(1.0);
        let mut stack = vec!["A", "B"];

        t.request_push("C");
        t.request_pop();
        tick(&mut t, &mut stack, 0.0);

        assert_eq!(stack, vec!["A"]);
        assert_eq!(t.pending(), &["C"]);
    }

    //--- Ordering ---------------------------------------------------------

    #[test]
    fn last_request_before_tick_wins() {
        let mut t = machine(1.0);
        let mut stack = vec!["A"];

        t.request_change("B");
        t.request_push("C");
        assert_eq!(t.state(), TransitionState::Pushing);

        assert_eq!(tick(&mut t, &mut stack, 0.0), SceneUpdate::Run);
        assert_eq!(stack, vec!["A", "B", "C"]);
    }

    #[test]
    fn idle_runs_every_tick() {
        let mut t = machine(1.0);
        let mut stack = vec!["A"];
        for _ in 0..3 {
            assert_eq!(tick(&mut t, &mut stack, 0.1), SceneUpdate::Run);
        }
        assert_eq!(stack, vec!["A"]);
    }
}
