//! Touch and keyboard input translated into page navigation.

use std::fmt;

/// Direction of a navigation request, whatever its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Forward one page.
    Next,
    /// Back one page.
    Previous,
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => write!(f, "next"),
            Self::Previous => write!(f, "previous"),
        }
    }
}

/// A touch position in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Point at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Classify a finished gesture by its displacement.
///
/// Only horizontal-dominant moves longer than `threshold` count. Moving the
/// finger right pages back, moving it left pages forward.
pub fn classify_swipe(dx: f64, dy: f64, threshold: f64) -> Option<NavAction> {
    if dx.abs() > dy.abs() && dx.abs() > threshold {
        if dx > 0.0 {
            Some(NavAction::Previous)
        } else {
            Some(NavAction::Next)
        }
    } else {
        None
    }
}

/// Start/end buffer for one swipe at a time.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    start: Option<Point>,
}

impl SwipeTracker {
    /// Swipes must travel more than `threshold` pixels.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start: None,
        }
    }

    /// Record where the finger went down. A new start replaces an old one.
    pub fn begin(&mut self, at: Point) {
        self.start = Some(at);
    }

    /// Finish the gesture and clear the buffer.
    ///
    /// Returns `None` for taps, vertical scrolls, short drags, and a
    /// touch-end with no matching start.
    pub fn finish(&mut self, at: Point) -> Option<NavAction> {
        let start = self.start.take()?;
        classify_swipe(at.x - start.x, at.y - start.y, self.threshold)
    }

    /// A touch started and has not ended yet.
    pub fn in_progress(&self) -> bool {
        self.start.is_some()
    }
}

/// Detects touch-ends close enough together to trigger double-tap zoom.
#[derive(Debug, Clone)]
pub struct DoubleTapGuard {
    window_ms: f64,
    last_end_ms: Option<f64>,
}

impl DoubleTapGuard {
    /// Touch-ends within `window_ms` of the previous one are suppressed.
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            last_end_ms: None,
        }
    }

    /// Register a touch-end at `now_ms`. Returns true when the default
    /// action of this touch-end should be suppressed.
    pub fn touch_end(&mut self, now_ms: f64) -> bool {
        let suppress = self
            .last_end_ms
            .is_some_and(|last| now_ms - last <= self.window_ms);
        self.last_end_ms = Some(now_ms);
        suppress
    }
}

/// Keys the flipbook reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Previous page.
    ArrowLeft,
    /// Next page.
    ArrowRight,
    /// Next page.
    Space,
    /// Ignored.
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            " " | "Spacebar" => Self::Space,
            _ => Self::Other,
        }
    }

    /// Navigation bound to this key, if any.
    pub fn nav_action(self) -> Option<NavAction> {
        match self {
            Self::ArrowLeft => Some(NavAction::Previous),
            Self::ArrowRight | Self::Space => Some(NavAction::Next),
            Self::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn swipe_left_goes_forward() {
        assert_eq!(classify_swipe(-60.0, 5.0, 50.0), Some(NavAction::Next));
    }

    #[test]
    fn swipe_right_goes_back() {
        assert_eq!(classify_swipe(60.0, 5.0, 50.0), Some(NavAction::Previous));
    }

    #[test]
    fn short_swipe_is_ignored() {
        assert_eq!(classify_swipe(20.0, 5.0, 50.0), None);
        assert_eq!(classify_swipe(50.0, 0.0, 50.0), None);
    }

    #[test]
    fn vertical_swipe_is_ignored() {
        assert_eq!(classify_swipe(80.0, 120.0, 50.0), None);
        assert_eq!(classify_swipe(-70.0, -70.0, 50.0), None);
    }

    #[test]
    fn tracker_needs_a_start() {
        let mut tracker = SwipeTracker::new(50.0);
        assert_eq!(tracker.finish(Point::new(0.0, 0.0)), None);

        tracker.begin(Point::new(200.0, 300.0));
        assert!(tracker.in_progress());
        assert_eq!(
            tracker.finish(Point::new(140.0, 305.0)),
            Some(NavAction::Next)
        );
        assert!(!tracker.in_progress());
        // Buffer was reset: a second end without a start does nothing.
        assert_eq!(tracker.finish(Point::new(0.0, 305.0)), None);
    }

    #[test]
    fn double_tap_within_window_is_suppressed() {
        let mut guard = DoubleTapGuard::new(300.0);
        assert!(!guard.touch_end(1_000.0));
        assert!(guard.touch_end(1_200.0));
    }

    #[test]
    fn taps_outside_window_pass_through() {
        let mut guard = DoubleTapGuard::new(300.0);
        assert!(!guard.touch_end(1_000.0));
        assert!(!guard.touch_end(1_400.0));
    }

    #[test]
    fn window_edge_is_inclusive() {
        let mut guard = DoubleTapGuard::new(300.0);
        guard.touch_end(0.0);
        assert!(guard.touch_end(300.0));
    }

    #[test]
    fn first_touch_is_never_suppressed() {
        let mut guard = DoubleTapGuard::new(300.0);
        assert!(!guard.touch_end(10.0));
    }

    #[test]
    fn key_mapping() {
        assert_eq!(Key::from_dom("ArrowLeft").nav_action(), Some(NavAction::Previous));
        assert_eq!(Key::from_dom("ArrowRight").nav_action(), Some(NavAction::Next));
        assert_eq!(Key::from_dom(" ").nav_action(), Some(NavAction::Next));
        assert_eq!(Key::from_dom("Enter").nav_action(), None);
    }

    proptest! {
        #[test]
        fn vertical_dominant_never_navigates(dx in -500.0f64..500.0, extra in 0.0f64..500.0) {
            let dy = dx.abs() + extra;
            prop_assert_eq!(classify_swipe(dx, dy, 50.0), None);
        }

        #[test]
        fn long_horizontal_always_navigates(dx in 51.0f64..1000.0, dy in -50.0f64..50.0) {
            prop_assert_eq!(classify_swipe(dx, dy, 50.0), Some(NavAction::Previous));
            prop_assert_eq!(classify_swipe(-dx, dy, 50.0), Some(NavAction::Next));
        }
    }
}
