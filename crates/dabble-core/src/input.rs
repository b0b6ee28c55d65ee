//! Pointer event model and poll-to-event conversion.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in client-space coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
}

/// Converts per-frame polled mouse state into discrete pointer events.
///
/// Pixel-buffer windows report mouse state once per frame instead of
/// delivering events; the tracker diffs consecutive samples so downstream
/// code sees an ordinary down/move/up stream.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    position: Point,
    left_down: bool,
    right_down: bool,
}

impl PointerTracker {
    /// Tracker with no buttons held at the origin.
    pub fn new() -> Self {
        Self {
            position: Point::ZERO,
            left_down: false,
            right_down: false,
        }
    }

    /// Diff one frame's mouse sample against the previous one.
    ///
    /// A position change emits `Move` before any button edge, so presses
    /// and releases carry the position they happened at. Unchanged samples
    /// emit nothing.
    pub fn sample(&mut self, position: Point, left: bool, right: bool) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        if position != self.position {
            self.position = position;
            events.push(PointerEvent::Move { position });
        }
        if left != self.left_down {
            self.left_down = left;
            events.push(Self::edge(position, MouseButton::Left, left));
        }
        if right != self.right_down {
            self.right_down = right;
            events.push(Self::edge(position, MouseButton::Right, right));
        }
        events
    }

    fn edge(position: Point, button: MouseButton, pressed: bool) -> PointerEvent {
        if pressed {
            PointerEvent::Down { position, button }
        } else {
            PointerEvent::Up { position, button }
        }
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_samples_emit_nothing() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.sample(Point::ZERO, false, false).is_empty());
        assert!(tracker.sample(Point::ZERO, false, false).is_empty());
    }

    #[test]
    fn test_press_emits_one_down_edge() {
        let mut tracker = PointerTracker::new();
        let events = tracker.sample(Point::ZERO, true, false);
        assert_eq!(
            events,
            vec![PointerEvent::Down {
                position: Point::ZERO,
                button: MouseButton::Left,
            }]
        );
        // Held button does not repeat the edge.
        assert!(tracker.sample(Point::ZERO, true, false).is_empty());
    }

    #[test]
    fn test_release_emits_up() {
        let mut tracker = PointerTracker::new();
        tracker.sample(Point::ZERO, true, false);
        let events = tracker.sample(Point::ZERO, false, false);
        assert_eq!(
            events,
            vec![PointerEvent::Up {
                position: Point::ZERO,
                button: MouseButton::Left,
            }]
        );
    }

    #[test]
    fn test_move_only_on_position_change() {
        let mut tracker = PointerTracker::new();
        tracker.sample(Point::new(5.0, 5.0), false, false);
        assert!(tracker.sample(Point::new(5.0, 5.0), false, false).is_empty());
        let events = tracker.sample(Point::new(6.0, 5.0), false, false);
        assert_eq!(
            events,
            vec![PointerEvent::Move {
                position: Point::new(6.0, 5.0),
            }]
        );
    }

    #[test]
    fn test_move_precedes_button_edge() {
        let mut tracker = PointerTracker::new();
        let events = tracker.sample(Point::new(3.0, 4.0), true, false);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], PointerEvent::Move { .. }));
        assert!(matches!(
            events[1],
            PointerEvent::Down {
                button: MouseButton::Left,
                ..
            }
        ));
    }

    #[test]
    fn test_right_button_tracked_separately() {
        let mut tracker = PointerTracker::new();
        let events = tracker.sample(Point::ZERO, false, true);
        assert_eq!(
            events,
            vec![PointerEvent::Down {
                position: Point::ZERO,
                button: MouseButton::Right,
            }]
        );
    }
}
