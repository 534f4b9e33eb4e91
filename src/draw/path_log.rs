//! Ordered in-memory log of stroke segments.

use super::segment::{Point, Segment};
use serde::{Deserialize, Serialize};

/// Append-ordered sequence of segments.
///
/// Insertion order is paint order: later segments are drawn over earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathLog {
    segments: Vec<Segment>,
}

impl PathLog {
    /// Creates a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Removes every segment.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Attempts to append a segment, enforcing a maximum count when `max` > 0.
    ///
    /// Returns `true` if the segment was added, `false` if the limit would be exceeded.
    pub fn try_push(&mut self, segment: Segment, max: usize) -> bool {
        if max == 0 || self.segments.len() < max {
            self.segments.push(segment);
            true
        } else {
            false
        }
    }

    /// Swaps in a new sequence, returning the old one.
    pub fn replace(&mut self, segments: Vec<Segment>) -> Vec<Segment> {
        std::mem::replace(&mut self.segments, segments)
    }

    /// Drops non-eraser segments with an endpoint within `radius` of `point`.
    ///
    /// Eraser segments are kept. Returns how many segments were removed.
    pub fn erase_near(&mut self, point: Point, radius: f64) -> usize {
        let before = self.segments.len();
        self.segments
            .retain(|segment| segment.is_eraser || !segment.endpoint_within(point, radius));
        before - self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::ColorValue;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64, is_eraser: bool) -> Segment {
        Segment::new(
            Point::new(x1, y1),
            Point::new(x2, y2),
            ColorValue::default(),
            is_eraser,
        )
    }

    #[test]
    fn try_push_respects_limit() {
        let mut log = PathLog::new();
        assert!(log.try_push(line(0.0, 0.0, 1.0, 1.0, false), 1));
        assert!(!log.try_push(line(1.0, 1.0, 2.0, 2.0, false), 1));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn erase_near_keeps_eraser_marks_and_order() {
        let mut log = PathLog::from_segments(vec![
            line(0.0, 0.0, 1.0, 0.0, false),
            line(50.0, 50.0, 60.0, 60.0, false),
            line(1.0, 1.0, 2.0, 2.0, true),
            line(70.0, 70.0, 2.0, 0.0, false),
            line(80.0, 80.0, 90.0, 90.0, false),
        ]);

        let removed = log.erase_near(Point::new(1.0, 0.0), 3.0);

        assert_eq!(removed, 2);
        assert_eq!(
            log.segments(),
            &[
                line(50.0, 50.0, 60.0, 60.0, false),
                line(1.0, 1.0, 2.0, 2.0, true),
                line(80.0, 80.0, 90.0, 90.0, false),
            ]
        );
    }
}
