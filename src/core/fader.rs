//=========================================================================
// Fader
//=========================================================================
//
// Timed full-canvas alpha overlay used to mask scene transitions.
//
// State machine:
//   None ──fade_out()──> Out ──update()*──> done (alpha 1)
//   None ──fade_in()───> In  ──update()*──> done (alpha 0)
//
// Starting a fade always resets the elapsed time; `update` only ever
// moves it forward, clamped to the configured duration.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::canvas::{Canvas, Color};
use crate::core::frame::FrameContext;

//=== FadeDirection =======================================================

/// Which way the overlay is currently animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeDirection {
    /// No overlay is drawn.
    #[default]
    None,

    /// Overlay goes from opaque to transparent (scene appears).
    In,

    /// Overlay goes from transparent to opaque (scene disappears).
    Out,
}

//=== Fader ===============================================================

/// Alpha interpolation between a scene and a solid color.
#[derive(Debug, Clone)]
pub struct Fader {
    color: Color,
    duration: f32,
    elapsed: f32,
    direction: FadeDirection,
}

impl Fader {
    /// Default overlay color.
    pub const DEFAULT_COLOR: Color = Color::WHITE;

    /// Default fade length in seconds.
    pub const DEFAULT_DURATION: f32 = 0.5;

    /// Creates an idle fader that already reports done.
    pub fn new() -> Self {
        Self {
            color: Self::DEFAULT_COLOR,
            duration: Self::DEFAULT_DURATION,
            elapsed: Self::DEFAULT_DURATION,
            direction: FadeDirection::None,
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Sets the overlay color. Applies from the next render.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the fade length in seconds.
    ///
    /// Negative or non-finite values become `0.0`, which makes every fade
    /// complete immediately. The elapsed time is clamped into the new range.
    pub fn set_duration(&mut self, seconds: f32) {
        self.duration = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self.elapsed = self.elapsed.min(self.duration);
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    //--- Fades ------------------------------------------------------------

    /// Starts revealing the scene. Restarts if already fading in.
    pub fn fade_in(&mut self) {
        self.direction = FadeDirection::In;
        self.elapsed = 0.0;
    }

    /// Starts covering the scene. Restarts if already fading out.
    pub fn fade_out(&mut self) {
        self.direction = FadeDirection::Out;
        self.elapsed = 0.0;
    }

    /// `true` once the elapsed time has reached the duration.
    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    //--- Frame Processing -------------------------------------------------

    /// Advances the fade by the frame's delta time.
    pub fn update(&mut self, ctx: &FrameContext<'_>) {
        self.elapsed = (self.elapsed + ctx.delta_time()).min(self.duration);
    }

    /// Opacity the overlay is drawn with right now.
    pub fn alpha(&self) -> f32 {
        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        };

        match self.direction {
            FadeDirection::None => 0.0,
            FadeDirection::In => 1.0 - progress,
            FadeDirection::Out => progress,
        }
    }

    /// Paints the overlay over the whole canvas when it is visible.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        let alpha = self.alpha();
        if alpha > 0.0 {
            let bounds = canvas.bounds();
            canvas.fill_rect(bounds, self.color, alpha);
        }
    }
}

impl Default for Fader {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::canvas::Rect;
    use crate::core::input::TouchInput;

    //--- Test Helpers -----------------------------------------------------

    #[derive(Default)]
    struct RecordingCanvas {
        fills: Vec<(Rect, Color, f32)>,
    }

    impl Canvas for RecordingCanvas {
        fn width(&self) -> u32 {
            320
        }
        fn height(&self) -> u32 {
            480
        }
        fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32) {
            self.fills.push((rect, color, alpha));
        }
    }

    fn advance(fader: &mut Fader, seconds: f32) {
        let input = TouchInput::new();
        fader.update(&FrameContext::new(seconds, &input));
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn fresh_fader_is_idle_and_done() {
        let fader = Fader::new();
        assert_eq!(fader.direction(), FadeDirection::None);
        assert!(fader.is_done());
        assert_eq!(fader.alpha(), 0.0);
        assert_eq!(fader.color(), Color::WHITE);
        assert_eq!(fader.duration(), 0.5);
    }

    #[test]
    fn fade_out_reaches_full_alpha_in_two_half_steps() {
        let mut fader = Fader::new();
        fader.set_duration(1.0);
        fader.set_color(Color::BLACK);
        fader.fade_out();
        assert!(!fader.is_done());

        advance(&mut fader, 0.5);
        let mut canvas = RecordingCanvas::default();
        fader.render(&mut canvas);
        assert_eq!(canvas.fills, vec![(Rect::new(0.0, 0.0, 320.0, 480.0), Color::BLACK, 0.5)]);
        assert!(!fader.is_done());

        advance(&mut fader, 0.5);
        assert_eq!(fader.alpha(), 1.0);
        assert!(fader.is_done());
    }

    #[test]
    fn fade_in_goes_from_opaque_to_clear() {
        let mut fader = Fader::new();
        fader.set_duration(1.0);
        fader.fade_in();
        assert_eq!(fader.alpha(), 1.0);

        advance(&mut fader, 0.25);
        assert_eq!(fader.alpha(), 0.75);

        advance(&mut fader, 1.0);
        assert_eq!(fader.alpha(), 0.0);
        assert!(fader.is_done());

        let mut canvas = RecordingCanvas::default();
        fader.render(&mut canvas);
        assert!(canvas.fills.is_empty(), "transparent overlay paints nothing");
    }

    #[test]
    fn elapsed_never_exceeds_duration() {
        let mut fader = Fader::new();
        fader.set_duration(0.3);
        fader.fade_out();
        for _ in 0..10 {
            advance(&mut fader, 0.1);
            assert!(fader.elapsed() <= fader.duration());
        }
        assert_eq!(fader.elapsed(), 0.3);
    }

    #[test]
    fn restarting_a_fade_resets_elapsed() {
        let mut fader = Fader::new();
        fader.set_duration(1.0);
        fader.fade_out();
        advance(&mut fader, 0.75);

        fader.fade_out();
        assert_eq!(fader.elapsed(), 0.0);
        assert_eq!(fader.direction(), FadeDirection::Out);
        assert!(!fader.is_done());
    }

    #[test]
    fn zero_duration_is_immediately_done() {
        let mut fader = Fader::new();
        fader.set_duration(0.0);

        fader.fade_out();
        assert!(fader.is_done());
        assert_eq!(fader.alpha(), 1.0);

        fader.fade_in();
        assert!(fader.is_done());
        assert_eq!(fader.alpha(), 0.0);
    }

    #[test]
    fn negative_duration_is_treated_as_zero() {
        let mut fader = Fader::new();
        fader.set_duration(-2.0);
        assert_eq!(fader.duration(), 0.0);
        fader.fade_out();
        assert!(fader.is_done());
        assert!(fader.alpha().is_finite());
    }

    #[test]
    fn shrinking_duration_clamps_elapsed() {
        let mut fader = Fader::new();
        fader.set_duration(2.0);
        fader.fade_out();
        advance(&mut fader, 1.5);

        fader.set_duration(1.0);
        assert_eq!(fader.elapsed(), 1.0);
        assert!(fader.is_done());
    }
}
