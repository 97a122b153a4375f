//=========================================================================
// Canvas
//=========================================================================
//
// Render target collaborator used by nodes, the fader and the scene
// controller.
//
// The core only needs two capabilities from a drawing surface:
// - fill a rectangle with a color at a given opacity
// - report the surface size in pixels
//
// `PixelCanvas` provides both over a borrowed RGBA8 frame buffer.
//
//=========================================================================

//=== Module Declarations =================================================

mod pixel_canvas;

//=== Public API ==========================================================

pub use pixel_canvas::PixelCanvas;

//=== Color ===============================================================

/// Opaque RGB color. Opacity is supplied per draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle in canvas pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle centered on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    /// Returns `true` if the point lies inside the rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

//=== Canvas Trait ========================================================

/// 2D drawing surface.
pub trait Canvas {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Fills `rect` with `color` blended at `alpha` (clamped to `[0, 1]`).
    ///
    /// Parts of the rectangle outside the surface are clipped.
    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32);

    /// Fills the whole surface with an opaque color.
    fn clear(&mut self, color: Color) {
        let bounds = self.bounds();
        self.fill_rect(bounds, color, 1.0);
    }

    /// The full-surface rectangle.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width() as f32, self.height() as f32)
    }
}

//=== Tests ===============================================================
