//! Shape normalization applied before a drawing is compared against
//! registered shapes: translate to the origin, scale to a fixed box and
//! thin out redundant samples.

use crate::{Point, Stroke};

pub const NORMALIZED_SIZE: f32 = 256.0;
pub const SIMPLIFY_EPSILON: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

pub fn bounds(strokes: &[Stroke]) -> Option<Bounds> {
    let mut points = strokes.iter().flat_map(|stroke| stroke.points.iter());
    let first = points.next()?;
    let mut result = Bounds {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };
    for point in points {
        result.min_x = result.min_x.min(point.x);
        result.min_y = result.min_y.min(point.y);
        result.max_x = result.max_x.max(point.x);
        result.max_y = result.max_y.max(point.y);
    }
    Some(result)
}

/// Moves the drawing so its bounding box starts at the origin and scales it
/// uniformly so the longer side equals `size`.
pub fn normalize(strokes: &[Stroke], size: f32) -> Vec<Stroke> {
    let Some(bounds) = bounds(strokes) else {
        return Vec::new();
    };
    let extent = bounds.width().max(bounds.height());
    let scale = if extent > f32::EPSILON {
        size / extent
    } else {
        1.0
    };
    strokes
        .iter()
        .map(|stroke| Stroke {
            points: stroke
                .points
                .iter()
                .map(|point| Point {
                    x: (point.x - bounds.min_x) * scale,
                    y: (point.y - bounds.min_y) * scale,
                })
                .collect(),
        })
        .collect()
}

/// Ramer-Douglas-Peucker simplification. The first and last points are
/// always kept.
pub fn simplify(points: &[Point], epsilon: f32) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut ranges = vec![(0, points.len() - 1)];
    while let Some((start, end)) = ranges.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut farthest = start;
        let mut max_distance = 0.0f32;
        for index in start + 1..end {
            let distance = distance_to_segment(points[index], points[start], points[end]);
            if distance > max_distance {
                max_distance = distance;
                farthest = index;
            }
        }
        if max_distance > epsilon {
            keep[farthest] = true;
            ranges.push((start, farthest));
            ranges.push((farthest, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(*point))
        .collect()
}

/// Normalized and simplified copy of the drawing, ready for lookup.
pub fn prepare_for_lookup(strokes: &[Stroke]) -> Vec<Stroke> {
    normalize(strokes, NORMALIZED_SIZE)
        .into_iter()
        .map(|stroke| Stroke {
            points: simplify(&stroke.points, SIMPLIFY_EPSILON),
        })
        .collect()
}

fn distance_to_segment(point: Point, start: Point, end: Point) -> f32 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() < f32::EPSILON && dy.abs() < f32::EPSILON {
        return ((point.x - start.x).powi(2) + (point.y - start.y).powi(2)).sqrt();
    }
    let t = ((point.x - start.x) * dx + (point.y - start.y) * dy) / (dx * dx + dy * dy);
    let t = t.clamp(0.0, 1.0);
    let proj_x = start.x + t * dx;
    let proj_y = start.y + t * dy;
    ((point.x - proj_x).powi(2) + (point.y - proj_y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f32, f32)]) -> Stroke {
        Stroke::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[test]
    fn bounds_cover_all_strokes() {
        let strokes = vec![line(&[(10.0, 20.0), (30.0, 5.0)]), line(&[(-4.0, 8.0), (0.0, 0.0)])];
        let bounds = bounds(&strokes).unwrap();
        assert_eq!(
            bounds,
            Bounds {
                min_x: -4.0,
                min_y: 0.0,
                max_x: 30.0,
                max_y: 20.0
            }
        );
        assert!(super::bounds(&[]).is_none());
    }

    #[test]
    fn normalize_fits_box_at_origin() {
        let strokes = vec![line(&[(100.0, 100.0), (164.0, 132.0)])];
        let normalized = normalize(&strokes, NORMALIZED_SIZE);
        let bounds = bounds(&normalized).unwrap();
        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.min_y, 0.0);
        assert_eq!(bounds.max_x, 256.0);
        assert_eq!(bounds.max_y, 128.0);
    }

    #[test]
    fn normalize_degenerate_only_translates() {
        let strokes = vec![line(&[(7.0, 9.0), (7.0, 9.0)])];
        let normalized = normalize(&strokes, NORMALIZED_SIZE);
        assert_eq!(normalized[0].points, vec![Point::new(0.0, 0.0); 2]);
    }

    #[test]
    fn simplify_drops_collinear_points() {
        let points: Vec<Point> = (0..10).map(|i| Point::new(i as f32, i as f32)).collect();
        let simplified = simplify(&points, SIMPLIFY_EPSILON);
        assert_eq!(simplified, vec![Point::new(0.0, 0.0), Point::new(9.0, 9.0)]);
    }

    #[test]
    fn simplify_keeps_corners() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(10.0, 10.0),
        ];
        let simplified = simplify(&points, SIMPLIFY_EPSILON);
        assert_eq!(
            simplified,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0)
            ]
        );
    }
}
