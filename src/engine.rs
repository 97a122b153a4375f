//=========================================================================
// Stagecraft Engine
//
// Main entry point: configures the canvas, wires the frame loop to the
// window host and runs it.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Event Loop]
//         │                          │                    │
//         ├─ with_title()            ├─ SceneController   └─ Platform (window, surface)
//         ├─ with_canvas_size()      ├─ Application            └─ Application::frame()
//         ├─ with_clear_color()      └─ channel                     per redraw
//         ├─ with_fade_color()
//         ├─ with_fade_duration()
//         └─ with_channel_capacity()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Sender};
use log::info;

//=== Internal Dependencies ===============================================

use crate::core::application::Application;
use crate::core::canvas::Color;
use crate::core::fader::Fader;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::scene::SceneController;
use crate::platform::{Platform, WindowConfig};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Stagecraft"
/// - **Canvas**: 600x960 pixels (10:16 portrait)
/// - **Clear color**: rgb(224, 224, 224)
/// - **Fade color**: white
/// - **Fade duration**: 0.5 seconds
/// - **Channel capacity**: 128 events
///
/// # Examples
///
/// ```no_run
/// use stagecraft::prelude::*;
///
/// struct Title;
/// impl Behavior for Title {}
///
/// fn main() -> Result<(), PlatformError> {
///     EngineBuilder::new()
///         .with_title("My Game")
///         .with_canvas_size(320, 480)
///         .with_fade_color(Color::BLACK)
///         .build()
///         .init(|controller| {
///             let title = Scene::new(&controller.handle(), Title);
///             controller.push_scene(title);
///         })
///         .run()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    title: String,
    canvas_width: u32,
    canvas_height: u32,
    clear_color: Color,
    fade_color: Color,
    fade_duration: f32,
    channel_capacity: usize,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Stagecraft".to_string(),
            canvas_width: 600,
            canvas_height: 960,
            clear_color: Color::rgb(224, 224, 224),
            fade_color: Fader::DEFAULT_COLOR,
            fade_duration: Fader::DEFAULT_DURATION,
            channel_capacity: 128,
        }
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the canvas size in pixels. The window opens at this logical
    /// size and the canvas is scaled to fit when it is resized.
    ///
    /// Default: 600x960
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_canvas_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Canvas size must be positive, got {}x{}",
            width,
            height
        );
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Sets the color the canvas is cleared to before each frame.
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Sets the overlay color used by scene changes.
    pub fn with_fade_color(mut self, color: Color) -> Self {
        self.fade_color = color;
        self
    }

    /// Sets the length of each fade in seconds. Zero disables fading.
    ///
    /// Default: 0.5
    ///
    /// # Panics
    ///
    /// Panics if `seconds` is negative or not finite.
    pub fn with_fade_duration(mut self, seconds: f32) -> Self {
        assert!(
            seconds.is_finite() && seconds >= 0.0,
            "Fade duration must be non-negative, got {}",
            seconds
        );
        self.fade_duration = seconds;
        self
    }

    /// Sets the channel capacity for window → frame loop input batches.
    ///
    /// Batches arriving while the channel is full are dropped.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Builds the engine instance.
    ///
    /// The scene controller starts with an empty stack; populate it with
    /// [`Engine::init`].
    pub fn build(self) -> Engine {
        info!(
            "Building engine (canvas: {}x{}, channel: {})",
            self.canvas_width, self.canvas_height, self.channel_capacity
        );

        let controller = SceneController::new(self.canvas_width, self.canvas_height);
        controller.set_fade_color(self.fade_color);
        controller.set_fade_duration(self.fade_duration);

        let (sender, receiver) = bounded(self.channel_capacity);

        Engine {
            window: WindowConfig {
                title: self.title,
                canvas_width: self.canvas_width,
                canvas_height: self.canvas_height,
            },
            sender,
            application: Application::new(controller, receiver, self.clear_color),
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Stagecraft runtime.
///
/// Create via [`EngineBuilder`] with `EngineBuilder::new().build()`.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   └─► Platform (Winit event loop)
///         ├─► Window, pixel surface, input
///         └─► Application (frame loop)
///               └─► SceneController → scene trees
///
/// Input: bounded channel (PlatformEvent), drained once per frame
/// ```
pub struct Engine {
    window: WindowConfig,
    sender: Sender<PlatformEvent>,
    application: Application,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Gives access to the [`SceneController`] before the loop starts,
    /// typically to push the first scene.
    ///
    /// Requests made here are applied on the first frame.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut SceneController),
    {
        info!("Initializing scenes");

        init_fn(self.application.controller_mut());

        info!(
            "Scene initialization complete ({:?})",
            self.application.controller().state()
        );
        self
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and runs frames until it is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop, window or pixel
    /// surface cannot be created, or if presenting a frame fails.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread on platforms where Winit
    /// requires it (macOS/iOS).
    pub fn run(self) -> Result<(), PlatformError> {
        info!(
            "Starting engine runtime ({}x{})",
            self.window.canvas_width, self.window.canvas_height
        );

        let platform = Platform::new(self.window, self.sender, self.application);
        platform.run()?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::Behavior;
    use crate::core::scene::{Scene, TransitionState};

    struct Empty;
    impl Behavior for Empty {}

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.title, "Stagecraft");
        assert_eq!((builder.canvas_width, builder.canvas_height), (600, 960));
        assert_eq!(builder.clear_color, Color::rgb(224, 224, 224));
        assert_eq!(builder.fade_color, Color::WHITE);
        assert_eq!(builder.fade_duration, 0.5);
        assert_eq!(builder.channel_capacity, 128);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let builder = EngineBuilder::new()
            .with_title("Lanes")
            .with_canvas_size(320, 480)
            .with_clear_color(Color::BLACK)
            .with_fade_color(Color::rgb(10, 20, 30))
            .with_fade_duration(0.0)
            .with_channel_capacity(256);

        assert_eq!(builder.title, "Lanes");
        assert_eq!((builder.canvas_width, builder.canvas_height), (320, 480));
        assert_eq!(builder.clear_color, Color::BLACK);
        assert_eq!(builder.fade_color, Color::rgb(10, 20, 30));
        assert_eq!(builder.fade_duration, 0.0);
        assert_eq!(builder.channel_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "Canvas size must be positive")]
    fn builder_with_canvas_size_panics_on_zero() {
        EngineBuilder::new().with_canvas_size(0, 480);
    }

    #[test]
    #[should_panic(expected = "Fade duration must be non-negative")]
    fn builder_with_fade_duration_panics_on_negative() {
        EngineBuilder::new().with_fade_duration(-1.0);
    }

    #[test]
    #[should_panic(expected = "Fade duration must be non-negative")]
    fn builder_with_fade_duration_panics_on_nan() {
        EngineBuilder::new().with_fade_duration(f32::NAN);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn build_configures_controller() {
        let engine = EngineBuilder::new()
            .with_canvas_size(320, 480)
            .with_fade_color(Color::BLACK)
            .with_fade_duration(1.5)
            .build();

        let controller = engine.application.controller();
        assert_eq!((controller.canvas_width(), controller.canvas_height()), (320, 480));
        assert_eq!(controller.fader().color(), Color::BLACK);
        assert_eq!(controller.fader().duration(), 1.5);
        assert_eq!(controller.scene_count(), 0);
        assert_eq!(engine.window.title, "Stagecraft");
    }

    #[test]
    fn init_queues_first_scene() {
        let engine = EngineBuilder::new().build().init(|controller| {
            let scene = Scene::new(&controller.handle(), Empty);
            controller.push_scene(scene);
        });

        assert_eq!(engine.application.controller().state(), TransitionState::Pushing);
    }
}
