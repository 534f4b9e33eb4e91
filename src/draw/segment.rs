//! Logical points and the stroke segments persisted in the path log.

use super::color::ColorValue;
use serde::{Deserialize, Serialize};

/// A point in logical drawing space (zoom- and device-independent).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One straight sub-stroke between two logical points.
///
/// The tool and color active when the segment was created are baked in; a
/// segment is never mutated after it has been appended to the log.
///
/// Serialises as `{"start":{"x":..,"y":..},"end":{..},"color":"#000000","isEraser":false}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub color: ColorValue,
    pub is_eraser: bool,
}

impl Segment {
    pub fn new(start: Point, end: Point, color: ColorValue, is_eraser: bool) -> Self {
        Self {
            start,
            end,
            color,
            is_eraser,
        }
    }

    /// Zero-length segment, painted as a round dot.
    pub fn dot(at: Point, color: ColorValue, is_eraser: bool) -> Self {
        Self::new(at, at, color, is_eraser)
    }

    pub fn is_dot(&self) -> bool {
        self.start == self.end
    }

    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    /// Whether either endpoint lies within `radius` of `point`.
    ///
    /// Only endpoints are tested, not the distance to the line between them:
    /// a long segment passing straight through `point` does not match.
    pub fn endpoint_within(&self, point: Point, radius: f64) -> bool {
        self.start.distance_to(point) <= radius || self.end.distance_to(point) <= radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_with_camel_case_eraser_flag() {
        let segment = Segment::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            ColorValue::from("#000000"),
            false,
        );
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "start": {"x": 0.0, "y": 0.0},
                "end": {"x": 10.0, "y": 10.0},
                "color": "#000000",
                "isEraser": false
            })
        );
    }

    #[test]
    fn endpoint_test_ignores_the_middle_of_long_segments() {
        let segment = Segment::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            ColorValue::default(),
            false,
        );
        assert!(segment.endpoint_within(Point::new(3.0, 4.0), 5.0));
        assert!(segment.endpoint_within(Point::new(100.0, 5.0), 5.0));
        assert!(!segment.endpoint_within(Point::new(50.0, 0.0), 5.0));
    }
}
