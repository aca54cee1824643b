use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

pub mod capture;
pub mod history;
pub mod lookup;
pub mod normalize;
pub mod svg;

pub use capture::{StrokeBuilder, MAX_POINTS_PER_STROKE, MIN_STROKE_POINTS};
pub use history::History;
pub use lookup::{LockRequest, LookupRequest, LookupResponse, RegisterRequest, ShapeSummary};

/// A canvas-local coordinate in CSS pixels.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A committed freehand stroke. Strokes built through [`StrokeBuilder`]
/// always carry at least [`MIN_STROKE_POINTS`] points.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq, Default)]
pub struct Stroke {
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Drops strokes that are too short to have been committed and any
/// non-finite samples. Used on payloads that arrive from outside.
pub fn sanitize_strokes(strokes: Vec<Stroke>) -> Vec<Stroke> {
    strokes
        .into_iter()
        .filter_map(|stroke| {
            let points = stroke
                .points
                .into_iter()
                .filter(|point| point.is_finite())
                .take(MAX_POINTS_PER_STROKE)
                .collect::<Vec<_>>();
            if points.len() < MIN_STROKE_POINTS {
                None
            } else {
                Some(Stroke { points })
            }
        })
        .collect()
}
