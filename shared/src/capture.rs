use crate::{Point, Stroke};

/// Strokes with fewer samples than this are discarded on release.
pub const MIN_STROKE_POINTS: usize = 2;
pub const MAX_POINTS_PER_STROKE: usize = 5000;

/// The in-progress stroke between pointer-down and pointer-up.
///
/// Nothing here touches the history: a stroke either becomes a whole
/// [`Stroke`] through [`StrokeBuilder::finish`] or is dropped.
#[derive(Clone, Debug)]
pub struct StrokeBuilder {
    points: Vec<Point>,
}

impl StrokeBuilder {
    pub fn begin(point: Point) -> Option<Self> {
        if !point.is_finite() {
            return None;
        }
        Some(Self {
            points: vec![point],
        })
    }

    /// Records a move sample and returns the segment it adds.
    pub fn push(&mut self, point: Point) -> Option<(Point, Point)> {
        if !point.is_finite() || self.points.len() >= MAX_POINTS_PER_STROKE {
            return None;
        }
        let last = self.points.last().copied().unwrap_or(point);
        self.points.push(point);
        Some((last, point))
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn finish(self) -> Option<Stroke> {
        if self.points.len() < MIN_STROKE_POINTS {
            return None;
        }
        Some(Stroke {
            points: self.points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_is_discarded() {
        let builder = StrokeBuilder::begin(Point::new(3.0, 4.0)).unwrap();
        assert!(builder.finish().is_none());
    }

    #[test]
    fn two_points_commit() {
        let mut builder = StrokeBuilder::begin(Point::new(0.0, 0.0)).unwrap();
        let segment = builder.push(Point::new(5.0, 5.0));
        assert_eq!(segment, Some((Point::new(0.0, 0.0), Point::new(5.0, 5.0))));
        let stroke = builder.finish().unwrap();
        assert_eq!(stroke.len(), 2);
    }

    #[test]
    fn rejects_non_finite_samples() {
        assert!(StrokeBuilder::begin(Point::new(f32::NAN, 0.0)).is_none());
        let mut builder = StrokeBuilder::begin(Point::new(0.0, 0.0)).unwrap();
        assert!(builder.push(Point::new(1.0, f32::INFINITY)).is_none());
        assert_eq!(builder.points().len(), 1);
    }

    #[test]
    fn caps_sample_count() {
        let mut builder = StrokeBuilder::begin(Point::new(0.0, 0.0)).unwrap();
        for i in 0..MAX_POINTS_PER_STROKE + 10 {
            builder.push(Point::new(i as f32, 0.0));
        }
        assert_eq!(builder.points().len(), MAX_POINTS_PER_STROKE);
    }
}
