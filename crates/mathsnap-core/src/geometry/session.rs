//! Shared crop box state driven by four independent corner gestures.
//!
//! Each corner handle produces its own gesture stream: a begin event, a series
//! of move events carrying the net displacement since begin, and an end event.
//! All four streams mutate the same rectangle, so the session keeps it behind
//! a single mutex and applies every move as one atomic read-modify-write.
//! Concurrent moves are serialized; the last one to take the lock wins.

use std::sync::{Mutex, MutexGuard};

use super::{drag_corner, CornerHandle, CropRectangle, DragDelta, ScreenSize};
use crate::config::LayoutConfig;

#[derive(Debug)]
struct SessionState {
    rect: CropRectangle,
    /// Rectangle at gesture start, per corner.
    origins: [Option<CropRectangle>; 4],
}

/// Single-writer cell for the crop rectangle of one capture screen.
#[derive(Debug)]
pub struct CropSession {
    screen: ScreenSize,
    layout: LayoutConfig,
    state: Mutex<SessionState>,
}

impl CropSession {
    /// Create a session with the crop box centred on `screen`.
    pub fn new(screen: ScreenSize, layout: LayoutConfig) -> Self {
        let rect = CropRectangle::centered(screen, &layout);
        log::debug!("crop session started with {:?}", rect);
        Self {
            screen,
            layout,
            state: Mutex::new(SessionState {
                rect,
                origins: [None; 4],
            }),
        }
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Current crop rectangle.
    pub fn rect(&self) -> CropRectangle {
        self.lock().rect
    }

    /// Start a gesture on `corner`, snapshotting the current rectangle.
    pub fn begin_drag(&self, corner: CornerHandle) {
        let mut state = self.lock();
        let rect = state.rect;
        state.origins[corner.index()] = Some(rect);
    }

    /// Apply a move event with the net displacement since the gesture began.
    ///
    /// A move without a preceding `begin_drag` starts the gesture implicitly
    /// from the current rectangle.
    pub fn drag(&self, corner: CornerHandle, delta: DragDelta) -> CropRectangle {
        let mut state = self.lock();
        let current = state.rect;
        let origin = *state.origins[corner.index()].get_or_insert(current);
        let updated = drag_corner(&origin, corner, delta, self.layout.min_crop_size);
        state.rect = updated;
        updated
    }

    /// Finish the gesture on `corner`.
    pub fn end_drag(&self, corner: CornerHandle) {
        self.lock().origins[corner.index()] = None;
    }

    /// Recentre the crop box and drop any gestures in progress.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.rect = CropRectangle::centered(self.screen, &self.layout);
        state.origins = [None; 4];
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // The state is plain data and every update is a single assignment,
        // so a poisoned lock still holds a valid rectangle.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn session() -> CropSession {
        CropSession::new(ScreenSize::new(400.0, 800.0), LayoutConfig::default())
    }

    #[test]
    fn test_initial_rect_is_centered() {
        let s = session();
        assert_eq!(s.rect(), CropRectangle::new(40.0, 160.0, 320.0, 280.0));
    }

    #[test]
    fn test_move_events_are_cumulative_from_gesture_start() {
        let s = session();
        s.begin_drag(CornerHandle::BottomRight);
        s.drag(CornerHandle::BottomRight, DragDelta::new(10.0, 10.0));
        s.drag(CornerHandle::BottomRight, DragDelta::new(20.0, 20.0));
        let rect = s.drag(CornerHandle::BottomRight, DragDelta::new(30.0, 5.0));
        s.end_drag(CornerHandle::BottomRight);

        // Only the last displacement counts.
        assert_eq!(rect, CropRectangle::new(40.0, 160.0, 350.0, 285.0));
        assert_eq!(s.rect(), rect);
    }

    #[test]
    fn test_new_gesture_starts_from_latest_rect() {
        let s = session();
        s.begin_drag(CornerHandle::TopLeft);
        s.drag(CornerHandle::TopLeft, DragDelta::new(20.0, 20.0));
        s.end_drag(CornerHandle::TopLeft);

        s.begin_drag(CornerHandle::TopLeft);
        let rect = s.drag(CornerHandle::TopLeft, DragDelta::new(20.0, 0.0));
        assert_eq!(rect, CropRectangle::new(80.0, 180.0, 280.0, 260.0));
    }

    #[test]
    fn test_drag_without_begin_uses_current_rect() {
        let s = session();
        let rect = s.drag(CornerHandle::TopRight, DragDelta::new(-20.0, 0.0));
        assert_eq!(rect.width, 300.0);
        assert_eq!(rect.x, 40.0);
    }

    #[test]
    fn test_minimum_enforced_through_session() {
        let s = session();
        s.begin_drag(CornerHandle::BottomLeft);
        let rect = s.drag(CornerHandle::BottomLeft, DragDelta::new(1000.0, -1000.0));
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.height, 100.0);
        // Right edge and top edge stay where they were.
        assert_eq!(rect.right(), 360.0);
        assert_eq!(rect.y, 160.0);
    }

    #[test]
    fn test_reset_recenters() {
        let s = session();
        s.begin_drag(CornerHandle::TopLeft);
        s.drag(CornerHandle::TopLeft, DragDelta::new(50.0, 50.0));
        s.reset();
        assert_eq!(s.rect(), CropRectangle::new(40.0, 160.0, 320.0, 280.0));

        // Stale gesture origin was dropped with the reset.
        let rect = s.drag(CornerHandle::TopLeft, DragDelta::new(0.0, 0.0));
        assert_eq!(rect, s.rect());
    }

    #[test]
    fn test_concurrent_corners_never_break_minimum() {
        let s = Arc::new(session());
        let handles: Vec<_> = CornerHandle::ALL
            .into_iter()
            .map(|corner| {
                let s = Arc::clone(&s);
                thread::spawn(move || {
                    s.begin_drag(corner);
                    for i in 0..200 {
                        let d = (i as f64) * 3.0 - 300.0;
                        let rect = s.drag(corner, DragDelta::new(d, -d));
                        assert!(rect.meets_minimum(100.0));
                    }
                    s.end_drag(corner);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(s.rect().meets_minimum(100.0));
    }
}
