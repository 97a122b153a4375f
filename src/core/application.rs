//=========================================================================
// Application Loop
//=========================================================================
//
// One call to `frame` per display refresh:
//
//   1. Drain platform events into the input snapshot
//   2. Measure delta time against the previous frame (never negative)
//   3. Build the FrameContext and update the scene controller
//   4. Clear the canvas, render the scene stack and the fade overlay
//   5. Refresh the input snapshot for the next frame
//
// Scheduling belongs to the host. It calls `frame` from its redraw
// callback and requests the next redraw afterwards.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use crossbeam_channel::Receiver;
use log::{info, trace};

//=== Internal Dependencies ===============================================

use crate::core::canvas::{Canvas, Color};
use crate::core::frame::FrameContext;
use crate::core::input::TouchInput;
use crate::core::platform_bridge::{EventCollector, PlatformEvent, TickControl};
use crate::core::scene::SceneController;

//=== Application =========================================================

/// Frame driver owning the scene controller and the input snapshot.
pub(crate) struct Application {
    controller: SceneController,
    input: TouchInput,
    collector: EventCollector,
    last_frame: Instant,
    clear_color: Color,
}

impl Application {
    pub(crate) fn new(
        controller: SceneController,
        receiver: Receiver<PlatformEvent>,
        clear_color: Color,
    ) -> Self {
        Self {
            controller,
            input: TouchInput::new(),
            collector: EventCollector::new(receiver),
            last_frame: Instant::now(),
            clear_color,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub(crate) fn controller(&self) -> &SceneController {
        &self.controller
    }

    pub(crate) fn controller_mut(&mut self) -> &mut SceneController {
        &mut self.controller
    }

    //--- Frame Processing -------------------------------------------------

    /// Restarts delta-time measurement from `now`.
    ///
    /// Called once the surface exists so window creation time is not
    /// reported as the first frame's delta.
    pub(crate) fn reset_clock(&mut self, now: Instant) {
        self.last_frame = now;
    }

    /// Runs one frame stamped `now` against `canvas`.
    pub(crate) fn frame(&mut self, now: Instant, canvas: &mut dyn Canvas) -> TickControl {
        if self.collector.collect_frame(&mut self.input) == TickControl::Exit {
            info!("Frame loop exiting");
            return TickControl::Exit;
        }

        let delta = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let ctx = FrameContext::new(delta, &self.input);
        trace!("Frame: {:?}", ctx);
        self.controller.update(&ctx);

        canvas.clear(self.clear_color);
        self.controller.render(canvas);

        self.input.refresh();
        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
