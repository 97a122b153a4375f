//=========================================================================
// Pixel Canvas
//=========================================================================
//
// Software canvas over a borrowed RGBA8 frame buffer.
//
// The platform layer hands in the surface's frame each redraw; tests
// hand in a plain `Vec<u8>`. Fills use source-over blending with the
// destination treated as opaque.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::{Canvas, Color, Rect};

//=== PixelCanvas =========================================================

/// RGBA8 canvas writing straight into a frame buffer.
pub struct PixelCanvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> PixelCanvas<'a> {
    const BYTES_PER_PIXEL: usize = 4;

    /// Wraps `frame` as a `width` x `height` canvas.
    ///
    /// If the buffer is shorter than `width * height * 4`, the height is
    /// reduced to the number of complete rows it holds.
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        let row_bytes = width as usize * Self::BYTES_PER_PIXEL;
        let rows = if row_bytes == 0 {
            0
        } else {
            (frame.len() / row_bytes).min(height as usize) as u32
        };

        if rows != height {
            warn!(
                target: "canvas",
                "Frame buffer holds {} bytes, expected {}x{} RGBA; clipping to {} rows",
                frame.len(),
                width,
                height,
                rows
            );
        }

        Self {
            frame,
            width,
            height: rows,
        }
    }

    /// Returns the RGBA value at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x as usize, y as usize);
        let px = &self.frame[offset..offset + Self::BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    //--- Internal Helpers -------------------------------------------------

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * Self::BYTES_PER_PIXEL
    }

    /// Converts a float span into a clipped pixel range.
    fn span(start: f32, length: f32, limit: u32) -> Option<(usize, usize)> {
        if !start.is_finite() || !length.is_finite() || length <= 0.0 {
            return None;
        }
        let limit = limit as f32;
        let from = start.round().clamp(0.0, limit) as usize;
        let to = (start + length).round().clamp(0.0, limit) as usize;
        (from < to).then_some((from, to))
    }
}

fn blend(dst: u8, src: u8, alpha: f32) -> u8 {
    let value = src as f32 * alpha + dst as f32 * (1.0 - alpha);
    value.round().clamp(0.0, 255.0) as u8
}

//=== Canvas Implementation ===============================================

impl Canvas for PixelCanvas<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32) {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        if alpha <= 0.0 {
            return;
        }

        let Some((x0, x1)) = Self::span(rect.x, rect.width, self.width) else {
            return;
        };
        let Some((y0, y1)) = Self::span(rect.y, rect.height, self.height) else {
            return;
        };

        for y in y0..y1 {
            let start = self.offset(x0, y);
            let end = self.offset(x1, y);
            for px in self.frame[start..end].chunks_exact_mut(Self::BYTES_PER_PIXEL) {
                if alpha >= 1.0 {
                    px[0] = color.r;
                    px[1] = color.g;
                    px[2] = color.b;
                } else {
                    px[0] = blend(px[0], color.r, alpha);
                    px[1] = blend(px[1], color.g, alpha);
                    px[2] = blend(px[2], color.b, alpha);
                }
                px[3] = 0xff;
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
