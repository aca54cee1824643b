//! Placeholder shape matching.
//!
//! Drawings are normalized, rasterized onto a coarse occupancy grid and
//! compared by Jaccard similarity. Good enough to exercise the lookup
//! contract; not a recognition engine.

use std::collections::HashMap;

use shapepad_shared::normalize::{normalize, NORMALIZED_SIZE};
use shapepad_shared::svg::{to_svg, StrokeStyle};
use shapepad_shared::{Point, ShapeSummary, Stroke};
use uuid::Uuid;

use crate::state::RegisteredShape;

pub const GRID_SIZE: usize = 16;
pub const MATCH_THRESHOLD: f32 = 0.8;

const CELL_SIZE: f32 = NORMALIZED_SIZE / GRID_SIZE as f32;

/// Cells of a `GRID_SIZE` x `GRID_SIZE` grid touched by the drawing.
pub fn occupancy(strokes: &[Stroke]) -> Vec<bool> {
    let mut grid = vec![false; GRID_SIZE * GRID_SIZE];
    for stroke in normalize(strokes, NORMALIZED_SIZE) {
        for window in stroke.points.windows(2) {
            mark_segment(&mut grid, window[0], window[1]);
        }
        if let [point] = stroke.points.as_slice() {
            mark_point(&mut grid, *point);
        }
    }
    grid
}

fn mark_segment(grid: &mut [bool], from: Point, to: Point) {
    let length = ((to.x - from.x).powi(2) + (to.y - from.y).powi(2)).sqrt();
    let steps = (length / (CELL_SIZE / 2.0)).ceil().max(1.0) as usize;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        mark_point(
            grid,
            Point {
                x: from.x + (to.x - from.x) * t,
                y: from.y + (to.y - from.y) * t,
            },
        );
    }
}

fn mark_point(grid: &mut [bool], point: Point) {
    let column = ((point.x / CELL_SIZE) as usize).min(GRID_SIZE - 1);
    let row = ((point.y / CELL_SIZE) as usize).min(GRID_SIZE - 1);
    grid[row * GRID_SIZE + column] = true;
}

pub fn similarity(a: &[bool], b: &[bool]) -> f32 {
    let mut intersection = 0usize;
    let mut union = 0usize;
    for (&left, &right) in a.iter().zip(b) {
        if left && right {
            intersection += 1;
        }
        if left || right {
            union += 1;
        }
    }
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Best scoring registered shape at or above [`MATCH_THRESHOLD`]. Equal
/// scores go to the lowest id.
pub fn best_match<'a>(
    shapes: &'a HashMap<Uuid, RegisteredShape>,
    strokes: &[Stroke],
) -> Option<(&'a RegisteredShape, f32)> {
    let probe = occupancy(strokes);
    shapes
        .values()
        .map(|shape| (shape, similarity(&probe, &occupancy(&shape.strokes))))
        .filter(|(_, score)| *score >= MATCH_THRESHOLD)
        .max_by(|(left, a), (right, b)| a.total_cmp(b).then_with(|| right.id.cmp(&left.id)))
}

pub fn summarize(shape: &RegisteredShape) -> ShapeSummary {
    ShapeSummary {
        id: shape.id.to_string(),
        thumbnail_svg: to_svg(&shape.strokes, &StrokeStyle::default(), false).unwrap_or_default(),
        is_locked: shape.is_locked,
        is_password_protected: shape.password.is_some(),
    }
}

pub fn sanitize_password(password: Option<String>) -> Option<String> {
    let password = password?;
    let trimmed = password.trim();
    if trimmed.is_empty() || trimmed.len() > 128 {
        None
    } else {
        Some(trimmed.to_string())
    }
}
