//=========================================================================
// Frame Context
//=========================================================================
//
// Immutable per-frame bundle passed down the scene tree.
//
// Built once per frame by the application loop and borrowed by every
// node update; nothing in the tree can mutate it.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputSource;

//=== FrameContext ========================================================

/// Data shared by every update call of a single frame.
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    delta_time: f32,
    input: &'a dyn InputSource,
}

impl<'a> FrameContext<'a> {
    /// Creates a context for one frame.
    ///
    /// Negative or non-finite delta times are clamped to zero.
    pub fn new(delta_time: f32, input: &'a dyn InputSource) -> Self {
        let delta_time = if delta_time.is_finite() {
            delta_time.max(0.0)
        } else {
            0.0
        };
        Self { delta_time, input }
    }

    /// Seconds elapsed since the previous frame.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Input snapshot for this frame.
    pub fn input(&self) -> &'a dyn InputSource {
        self.input
    }
}

impl std::fmt::Debug for FrameContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameContext")
            .field("delta_time", &self.delta_time)
            .field("touch_count", &self.input.touch_count())
            .finish()
    }
}

//=== Tests ===============================================================
