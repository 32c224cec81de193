//! Crop rectangle and per-corner drag rules.
//!
//! The rectangle lives in screen coordinates below the capture-screen header:
//! `(0, 0)` is the top-left of the photo area, not of the device screen. Each
//! corner handle resizes the rectangle while the opposite corner stays put.
//!
//! # Drag Rules
//!
//! | Corner      | width  | height | x      | y      |
//! |-------------|--------|--------|--------|--------|
//! | TopLeft     | w - dx | h - dy | x + dx | y + dy |
//! | TopRight    | w + dx | h - dy | x      | y + dy |
//! | BottomLeft  | w - dx | h + dy | x + dx | y      |
//! | BottomRight | w + dx | h + dy | x      | y      |
//!
//! After the raw update each dimension is clamped up to the minimum size. When
//! the clamp fires on an edge owned by the dragged corner, that edge is placed
//! `min_size` away from the fixed opposite edge.

use serde::{Deserialize, Serialize};

use super::ScreenSize;
use crate::config::LayoutConfig;

/// One of the four crop box handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CornerHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CornerHandle {
    /// All handles, in the order they are laid out on screen.
    pub const ALL: [CornerHandle; 4] = [
        CornerHandle::TopLeft,
        CornerHandle::TopRight,
        CornerHandle::BottomLeft,
        CornerHandle::BottomRight,
    ];

    /// True for handles that move the left edge.
    #[inline]
    pub fn is_left(self) -> bool {
        matches!(self, CornerHandle::TopLeft | CornerHandle::BottomLeft)
    }

    /// True for handles that move the top edge.
    #[inline]
    pub fn is_top(self) -> bool {
        matches!(self, CornerHandle::TopLeft | CornerHandle::TopRight)
    }

    /// Stable index used by the session's gesture table.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            CornerHandle::TopLeft => 0,
            CornerHandle::TopRight => 1,
            CornerHandle::BottomLeft => 2,
            CornerHandle::BottomRight => 3,
        }
    }
}

/// Net displacement of a drag gesture since it started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragDelta {
    pub dx: f64,
    pub dy: f64,
}

impl DragDelta {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// User-adjustable crop region in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Initial crop box for a freshly entered capture screen.
    ///
    /// Sized by the layout ratios (never below `min_crop_size`) and centred
    /// so that, once drawn below the header, it sits in the middle of the
    /// device screen. The top is clamped to the photo area.
    pub fn centered(screen: ScreenSize, layout: &LayoutConfig) -> Self {
        let width = (screen.width * layout.initial_width_ratio).max(layout.min_crop_size);
        let height = (screen.height * layout.initial_height_ratio).max(layout.min_crop_size);
        let x = (screen.width - width) / 2.0;
        let y = ((screen.height - height) / 2.0 - layout.vertical_offset).max(0.0);
        Self::new(x, y, width, height)
    }

    /// Right edge x coordinate.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y coordinate.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Top edge in device-screen coordinates, for drawing the box.
    #[inline]
    pub fn screen_top(&self, vertical_offset: f64) -> f64 {
        self.y + vertical_offset
    }

    /// True when both dimensions satisfy the minimum size.
    pub fn meets_minimum(&self, min_size: f64) -> bool {
        self.width >= min_size && self.height >= min_size
    }
}

/// Apply a drag of `corner` by `delta` to the rectangle the gesture started from.
///
/// `delta` is the cumulative displacement since the gesture began, so callers
/// must pass the rectangle as it was at gesture start, not the result of the
/// previous move event.
pub fn drag_corner(
    rect: &CropRectangle,
    corner: CornerHandle,
    delta: DragDelta,
    min_size: f64,
) -> CropRectangle {
    let DragDelta { dx, dy } = delta;

    let (mut x, mut width) = if corner.is_left() {
        (rect.x + dx, rect.width - dx)
    } else {
        (rect.x, rect.width + dx)
    };
    let (mut y, mut height) = if corner.is_top() {
        (rect.y + dy, rect.height - dy)
    } else {
        (rect.y, rect.height + dy)
    };

    // `!(a >= b)` also catches NaN from a bogus delta.
    if !(width >= min_size) {
        width = min_size;
        x = if corner.is_left() {
            rect.x + rect.width - min_size
        } else {
            rect.x
        };
    }
    if !(height >= min_size) {
        height = min_size;
        y = if corner.is_top() {
            rect.y + rect.height - min_size
        } else {
            rect.y
        };
    }

    CropRectangle::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_CROP_SIZE;

    fn rect() -> CropRectangle {
        CropRectangle::new(50.0, 50.0, 200.0, 200.0)
    }

    #[test]
    fn test_bottom_right_clamps_width_without_moving_x() {
        let result = drag_corner(
            &rect(),
            CornerHandle::BottomRight,
            DragDelta::new(-150.0, 0.0),
            MIN_CROP_SIZE,
        );
        assert_eq!(result, CropRectangle::new(50.0, 50.0, 100.0, 200.0));
    }

    #[test]
    fn test_top_left_moves_origin() {
        let result = drag_corner(
            &rect(),
            CornerHandle::TopLeft,
            DragDelta::new(20.0, 30.0),
            MIN_CROP_SIZE,
        );
        assert_eq!(result, CropRectangle::new(70.0, 80.0, 180.0, 170.0));
        assert_eq!(result.right(), rect().right());
        assert_eq!(result.bottom(), rect().bottom());
    }

    #[test]
    fn test_top_right_moves_top_edge_only() {
        let result = drag_corner(
            &rect(),
            CornerHandle::TopRight,
            DragDelta::new(10.0, -40.0),
            MIN_CROP_SIZE,
        );
        assert_eq!(result, CropRectangle::new(50.0, 10.0, 210.0, 240.0));
    }

    #[test]
    fn test_bottom_left_moves_left_edge_only() {
        let result = drag_corner(
            &rect(),
            CornerHandle::BottomLeft,
            DragDelta::new(-25.0, 15.0),
            MIN_CROP_SIZE,
        );
        assert_eq!(result, CropRectangle::new(25.0, 50.0, 225.0, 215.0));
    }

    #[test]
    fn test_top_left_clamp_pins_right_and_bottom_edges() {
        let result = drag_corner(
            &rect(),
            CornerHandle::TopLeft,
            DragDelta::new(500.0, 500.0),
            MIN_CROP_SIZE,
        );
        // x = 50 + 200 - 100
        assert_eq!(result, CropRectangle::new(150.0, 150.0, 100.0, 100.0));
    }

    #[test]
    fn test_bottom_left_clamp_height_keeps_y() {
        let result = drag_corner(
            &rect(),
            CornerHandle::BottomLeft,
            DragDelta::new(0.0, -180.0),
            MIN_CROP_SIZE,
        );
        assert_eq!(result.y, 50.0);
        assert_eq!(result.height, 100.0);
    }

    #[test]
    fn test_zero_delta_is_identity() {
        for corner in CornerHandle::ALL {
            let result = drag_corner(&rect(), corner, DragDelta::default(), MIN_CROP_SIZE);
            assert_eq!(result, rect());
        }
    }

    #[test]
    fn test_nan_delta_clamps() {
        let result = drag_corner(
            &rect(),
            CornerHandle::TopLeft,
            DragDelta::new(f64::NAN, 0.0),
            MIN_CROP_SIZE,
        );
        assert_eq!(result.width, MIN_CROP_SIZE);
        assert_eq!(result.x, 150.0);
    }

    #[test]
    fn test_centered_default_layout() {
        let screen = ScreenSize::new(400.0, 800.0);
        let rect = CropRectangle::centered(screen, &LayoutConfig::default());
        assert_eq!(rect.width, 320.0);
        assert_eq!(rect.height, 280.0);
        assert_eq!(rect.x, 40.0);
        // (800 - 280) / 2 - 100
        assert_eq!(rect.y, 160.0);
        assert_eq!(rect.screen_top(100.0), 260.0);
    }

    #[test]
    fn test_centered_small_screen_respects_minimum() {
        let screen = ScreenSize::new(100.0, 150.0);
        let rect = CropRectangle::centered(screen, &LayoutConfig::default());
        assert!(rect.meets_minimum(MIN_CROP_SIZE));
        assert_eq!(rect.y, 0.0);
    }

    #[test]
    fn test_corner_edges() {
        assert!(CornerHandle::TopLeft.is_left() && CornerHandle::TopLeft.is_top());
        assert!(!CornerHandle::TopRight.is_left() && CornerHandle::TopRight.is_top());
        assert!(CornerHandle::BottomLeft.is_left() && !CornerHandle::BottomLeft.is_top());
        assert!(!CornerHandle::BottomRight.is_left() && !CornerHandle::BottomRight.is_top());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
