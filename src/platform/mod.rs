//=========================================================================
// Platform Subsystem
//
// Hosts the frame loop inside Winit's event loop and presents frames
// through a `pixels` surface.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌──────────────────────────────────────────────────────────┐
//  │  Winit Event Loop                                         │
//  │   ↓                                                       │
//  │  InputProcessor (cursor tracking, window → canvas coords) │
//  │   ↓                                                       │
//  │  InputBuffer                                              │
//  │   ↓                                                       │
//  │  RedrawRequested ── flush ──> Channel ──> EventCollector  │
//  │   ↓                                           ↓           │
//  │  Application::frame(now, PixelCanvas) <─ TouchInput       │
//  │   ↓                                                       │
//  │  pixels.render() → request_redraw() (next frame)          │
//  └──────────────────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: input gathered since the last
//   frame is sent as one batch, then the frame runs
// - **request_redraw schedules the next frame**: the loop runs until
//   the window closes or a fatal error occurs
// - **Never block on the channel**: producer and consumer share this
//   thread, so a full channel drops the batch with a warning
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Sender, TrySendError};
use log::*;
use pixels::{Pixels, SurfaceTexture};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::application::Application;
use crate::core::canvas::PixelCanvas;
use crate::core::platform_bridge::{PlatformError, PlatformEvent, TickControl};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== WindowConfig ========================================================

/// Window title and logical canvas size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

//=== Platform ============================================================

/// Window, surface and input host for one [`Application`].
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(config, sender, application)`
/// 2. **Execution**: `platform.run()` starts the event loop
/// 3. **Resume**: window and surface are created lazily in `resumed()`
/// 4. **Frames**: every `RedrawRequested` runs one application frame
/// 5. **Shutdown**: close request or fatal error exits the loop and
///    `run()` returns
///
/// # Thread Safety
///
/// This type is NOT Send/Sync - it must remain on the main thread.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Arc<Window>>,

    /// Pixel surface bound to the window.
    pixels: Option<Pixels<'static>>,

    config: WindowConfig,

    /// Buffers input until the frame boundary.
    buffer: InputBuffer,

    /// Channel to the application's event collector.
    event_sender: Sender<PlatformEvent>,

    /// Converts Winit events to engine InputEvents.
    input_processor: InputProcessor,

    application: Application,

    /// First fatal error, returned from `run()`.
    fatal: Option<PlatformError>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates a new platform instance. The window is created later, in
    /// `resumed()`.
    pub fn new(
        config: WindowConfig,
        event_sender: Sender<PlatformEvent>,
        application: Application,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            pixels: None,
            config,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
            application,
            fatal: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails, or if window or surface setup failed while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)?;

        match self.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends buffered input to the application as one batch.
    ///
    /// A full or disconnected channel drops the batch with a warning.
    fn flush_input_buffer(&mut self) {
        let Some(events) = self.buffer.drain() else {
            return;
        };
        let count = events.len();

        trace!(target: "platform::input", "Flushing {} input events", count);

        match self.event_sender.try_send(PlatformEvent::Inputs(events)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(target: "platform::input", "Channel full, dropping {} events", count);
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(target: "platform::input", "Channel disconnected, dropping {} events", count);
            }
        }
    }

    /// Tells the core the window is going away.
    fn signal_close(&self) {
        match self.event_sender.try_send(PlatformEvent::WindowClosed) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(target: "platform", "Channel full, close signal dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                trace!(target: "platform", "Core already gone, close signal dropped");
            }
        }
    }

    /// Maps a window position to canvas pixels.
    ///
    /// Positions in the letterbox margin are passed through unclamped.
    fn to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        match &self.pixels {
            Some(pixels) => match pixels.window_pos_to_pixel((x, y)) {
                Ok((px, py)) => (px as f32, py as f32),
                Err((px, py)) => (px as f32, py as f32),
            },
            None => (x, y),
        }
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PlatformError> {
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.canvas_width,
                self.config.canvas_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(PlatformError::WindowCreation)?,
        );

        let size = window.inner_size();
        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            size.width,
            size.height,
            window.scale_factor()
        );

        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(self.config.canvas_width, self.config.canvas_height, surface)
            .map_err(PlatformError::Surface)?;

        self.pixels = Some(pixels);
        self.application.reset_clock(Instant::now());
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    /// Runs one frame and presents it.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.flush_input_buffer();

        let Some(pixels) = self.pixels.as_mut() else {
            return;
        };

        let control = {
            let mut canvas = PixelCanvas::new(
                pixels.frame_mut(),
                self.config.canvas_width,
                self.config.canvas_height,
            );
            self.application.frame(Instant::now(), &mut canvas)
        };

        if control == TickControl::Exit {
            info!(target: "platform", "Application requested exit");
            event_loop.exit();
            return;
        }

        if let Err(e) = pixels.render() {
            self.fail(event_loop, PlatformError::Surface(e));
            return;
        }

        // Request next frame
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Records a fatal error and stops the event loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: PlatformError) {
        error!(target: "platform", "{}", error);
        self.signal_close();
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
        event_loop.exit();
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        if let Err(e) = self.create_surface(event_loop) {
            self.fail(event_loop, e);
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.signal_close();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    trace!(target: "platform", "Ignoring zero-sized resize");
                    return;
                }
                if let Some(pixels) = self.pixels.as_mut() {
                    if let Err(e) = pixels.resize_surface(size.width, size.height) {
                        self.fail(event_loop, PlatformError::SurfaceResize(e));
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input_processor
                    .update_cursor(position.x as f32, position.y as f32);
            }

            WindowEvent::CursorLeft { .. } => self.input_processor.clear_cursor(),

            WindowEvent::MouseInput { state, button, .. } => {
                let Some((x, y)) = self.input_processor.cursor() else {
                    trace!(target: "platform::input", "Button {:?} before any cursor position", button);
                    return;
                };
                let position = self.to_canvas(x, y);
                if let Some(event) = self.input_processor.process_mouse_button(button, state, position) {
                    self.buffer.push(event);
                }
            }

            WindowEvent::Touch(touch) => {
                let position = self.to_canvas(touch.location.x as f32, touch.location.y as f32);
                if let Some(event) = self.input_processor.process_touch(touch.phase, touch.id, position) {
                    self.buffer.push(event);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {
                // Ignore: Focused, keyboard, etc.
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
