//! Click/drag gesture classification.
//!
//! The globe is rotated by dragging, so a pointer release is only a selection
//! attempt if the pointer stayed near its press position for the whole
//! gesture. The threshold is checked per axis, matching orbit-control
//! conventions.

use glam::Vec2;

/// Pointer displacement in logical pixels (per axis) beyond which a gesture
/// counts as a drag. Small enough to feel responsive, large enough to ignore
/// the jitter of a stationary finger or mouse.
pub const DRAG_THRESHOLD_PX: f32 = 5.0;

/// Outcome of one completed press→move*→release cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// The pointer stayed within the threshold; selection proceeds from the
    /// release position.
    Click(Vec2),
    /// The pointer travelled beyond the threshold at some point; this was a
    /// rotation gesture and must not select.
    Drag,
}

/// Tracks a single pointer gesture from press to release.
///
/// The drag flag is sticky: once displacement exceeds the threshold on either
/// axis the gesture stays a drag, even if the pointer returns to the press
/// position before release. A fresh tracker is created on every
/// pointer-down, so the flag never leaks across gestures.
#[derive(Debug, Clone, Copy)]
pub struct GestureTracker {
    down: Vec2,
    last: Vec2,
    dragging: bool,
}

impl GestureTracker {
    /// Start tracking at the pointer-down position.
    pub fn begin(pos: Vec2) -> Self {
        Self {
            down: pos,
            last: pos,
            dragging: false,
        }
    }

    /// Feed a pointer-move position.
    pub fn update(&mut self, pos: Vec2) {
        self.last = pos;
        if (pos.x - self.down.x).abs() > DRAG_THRESHOLD_PX
            || (pos.y - self.down.y).abs() > DRAG_THRESHOLD_PX
        {
            self.dragging = true;
        }
    }

    /// Whether the threshold has been crossed at any point so far.
    pub fn is_drag(&self) -> bool {
        self.dragging
    }

    /// The most recent position fed to the tracker.
    pub fn last_position(&self) -> Vec2 {
        self.last
    }

    /// Consume the tracker at pointer-up and classify the gesture.
    ///
    /// The release position counts toward the threshold too, so a release far
    /// from the press point classifies as a drag even if no intermediate move
    /// was observed.
    pub fn finish(mut self, pos: Vec2) -> Gesture {
        self.update(pos);
        if self.dragging {
            Gesture::Drag
        } else {
            Gesture::Click(pos)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stationary_release_is_click() {
        let tracker = GestureTracker::begin(Vec2::new(100.0, 100.0));
        assert_eq!(
            tracker.finish(Vec2::new(100.0, 100.0)),
            Gesture::Click(Vec2::new(100.0, 100.0))
        );
    }

    #[test]
    fn test_small_wobble_is_click() {
        let mut tracker = GestureTracker::begin(Vec2::new(100.0, 100.0));
        tracker.update(Vec2::new(103.0, 98.0));
        tracker.update(Vec2::new(101.0, 102.0));
        assert!(!tracker.is_drag());
        assert_eq!(
            tracker.finish(Vec2::new(101.0, 102.0)),
            Gesture::Click(Vec2::new(101.0, 102.0))
        );
    }

    #[test]
    fn test_exact_threshold_is_still_click() {
        // The threshold is exceeded strictly, not met.
        let mut tracker = GestureTracker::begin(Vec2::new(100.0, 100.0));
        tracker.update(Vec2::new(105.0, 100.0));
        assert!(!tracker.is_drag());
    }

    #[test]
    fn test_horizontal_drag_suppresses_click() {
        let mut tracker = GestureTracker::begin(Vec2::new(100.0, 100.0));
        tracker.update(Vec2::new(110.0, 100.0));
        assert!(tracker.is_drag());
        assert_eq!(tracker.finish(Vec2::new(110.0, 100.0)), Gesture::Drag);
    }

    #[test]
    fn test_vertical_drag_suppresses_click() {
        let mut tracker = GestureTracker::begin(Vec2::new(100.0, 100.0));
        tracker.update(Vec2::new(100.0, 89.0));
        assert_eq!(tracker.finish(Vec2::new(100.0, 89.0)), Gesture::Drag);
    }

    #[test]
    fn test_drag_flag_is_sticky() {
        // Wander out past the threshold, then come back to the press point:
        // still a drag.
        let mut tracker = GestureTracker::begin(Vec2::new(100.0, 100.0));
        tracker.update(Vec2::new(120.0, 100.0));
        tracker.update(Vec2::new(100.0, 100.0));
        assert_eq!(tracker.finish(Vec2::new(100.0, 100.0)), Gesture::Drag);
    }

    #[test]
    fn test_fresh_tracker_resets_flag() {
        let mut tracker = GestureTracker::begin(Vec2::new(100.0, 100.0));
        tracker.update(Vec2::new(150.0, 100.0));
        assert!(tracker.is_drag());

        let tracker = GestureTracker::begin(Vec2::new(150.0, 100.0));
        assert!(!tracker.is_drag());
    }

    #[test]
    fn test_far_release_without_moves_is_drag() {
        let tracker = GestureTracker::begin(Vec2::new(100.0, 100.0));
        assert_eq!(tracker.finish(Vec2::new(200.0, 100.0)), Gesture::Drag);
    }
}
