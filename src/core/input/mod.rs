//=========================================================================
// Input System
//
// Per-frame pointer snapshot exposed to the scene tree.
//
// Responsibilities:
// - Record every pointer press / touch start delivered during a frame
// - Expose read-only queries (`touch_count`, `touch_point`) to scenes
// - Reset the snapshot once the frame has been updated and rendered
//
// Notes:
// The scene tree never owns this state; it only sees it through the
// `InputSource` capability carried by the `FrameContext`. A press is
// visible to exactly one frame.
//
//=========================================================================

//=== Submodules ==========================================================
pub mod event;

//=== External Crates =====================================================
use log::trace;

//=== Internal Imports ====================================================
pub use event::{InputEvent, MouseButton};

//=== Point ===============================================================

/// Simple 2D point in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

//=== InputSource =========================================================

/// Read-only input capability handed to the scene tree each frame.
pub trait InputSource {
    /// Number of pointer presses / touch starts recorded this frame.
    fn touch_count(&self) -> usize;

    /// Position of the `index`-th recorded point.
    ///
    /// Out-of-range indices return `Point::default()` instead of failing.
    fn touch_point(&self, index: usize) -> Point;
}

//=== TouchInput ==========================================================

/// Collects the pointer presses of the current frame.
#[derive(Debug, Default)]
pub struct TouchInput {
    touches: Vec<Point>,
}

impl TouchInput {
    //--- Construction -----------------------------------------------------
    pub fn new() -> Self {
        const TOUCH_BASE: usize = 8;
        Self {
            touches: Vec::with_capacity(TOUCH_BASE),
        }
    }

    //--- Recording --------------------------------------------------------

    /// Records a single press at `point`.
    pub fn press(&mut self, point: Point) {
        self.touches.push(point);
    }

    /// Records every positional event of a batch, in order.
    pub fn apply(&mut self, events: &[InputEvent]) {
        for event in events {
            match event.position() {
                Some((x, y)) => self.press(Point::new(x, y)),
                None => trace!(target: "input", "Ignoring event without position: {:?}", event),
            }
        }
    }

    //--- refresh() --------------------------------------------------------
    //
    // Clears the snapshot for the next frame. Capacity is retained.
    //
    pub fn refresh(&mut self) {
        self.touches.clear();
    }
}

impl InputSource for TouchInput {
    fn touch_count(&self) -> usize {
        self.touches.len()
    }

    fn touch_point(&self, index: usize) -> Point {
        self.touches.get(index).copied().unwrap_or_default()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
