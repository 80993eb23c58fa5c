use serde::{Serialize, Serializer};

/// Axis-aligned box in absolute pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn area(&self) -> f64 {
        (self.x2 - self.x1) * (self.y2 - self.y1)
    }

    /// Integer center, truncated toward zero.
    pub fn center(&self) -> Point {
        Point {
            x: ((self.x1 + self.x2) / 2.0) as i32,
            y: ((self.y1 + self.y2) / 2.0) as i32,
        }
    }
}

// Serialised as `[x1, y1, x2, y2]`.
impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x1, self.y1, self.x2, self.y2].serialize(serializer)
    }
}

/// Screen or image position in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

// Serialised as `[x, y]`.
impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y].serialize(serializer)
    }
}

/// One grounded phrase region as returned by the model.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledBox {
    pub bbox: BoundingBox,
    pub label: String,
}

/// Outcome of a single inference call.
///
/// `Failed` keeps "the model call errored" distinguishable from "the model
/// found nothing" (`Boxes` with an empty list).
#[derive(Clone, Debug, PartialEq)]
pub enum Grounding {
    Boxes(Vec<LabeledBox>),
    Failed(String),
}

impl Grounding {
    pub fn boxes(&self) -> &[LabeledBox] {
        match self {
            Grounding::Boxes(boxes) => boxes,
            Grounding::Failed(_) => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Grounding::Failed(_))
    }
}

/// Accepted skip-button detection.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonHit {
    pub center: Point,
    pub bbox: BoundingBox,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_and_center() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 25.0);
        assert_eq!(bbox.area(), 100.0);
        assert_eq!(bbox.center(), Point { x: 20, y: 22 });
    }

    #[test]
    fn serializes_as_arrays() {
        let bbox = BoundingBox::new(1.5, 2.0, 3.0, 4.0);
        assert_eq!(serde_json::to_string(&bbox).unwrap(), "[1.5,2.0,3.0,4.0]");
        let point = Point { x: 7, y: -1 };
        assert_eq!(serde_json::to_string(&point).unwrap(), "[7,-1]");
    }
}
