use web_sys::CanvasRenderingContext2d;

use shapepad_shared::svg::StrokeStyle;
use shapepad_shared::{Point, Stroke};

/// The drawing calls the renderer needs.
pub trait Surface {
    fn clear(&self, width: f64, height: f64);
    fn polyline(&self, points: &[Point], style: &StrokeStyle);
}

impl Surface for CanvasRenderingContext2d {
    fn clear(&self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn polyline(&self, points: &[Point], style: &StrokeStyle) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.set_stroke_style_str(&style.color);
        self.set_line_width(style.width as f64);
        self.set_line_cap("round");
        self.set_line_join("round");
        self.begin_path();
        self.move_to(first.x as f64, first.y as f64);
        for point in rest {
            self.line_to(point.x as f64, point.y as f64);
        }
        self.stroke();
    }
}

pub fn draw_segment<S: Surface + ?Sized>(surface: &S, from: Point, to: Point, style: &StrokeStyle) {
    surface.polyline(&[from, to], style);
}

/// Clears the surface and replays `strokes`, then the stroke still being
/// drawn if there is one.
pub fn redraw<S: Surface + ?Sized>(
    surface: &S,
    width: f64,
    height: f64,
    strokes: &[Stroke],
    in_progress: Option<&[Point]>,
    style: &StrokeStyle,
) {
    surface.clear(width, height);
    for stroke in strokes {
        if stroke.points.len() < 2 {
            continue;
        }
        surface.polyline(&stroke.points, style);
    }
    if let Some(points) = in_progress {
        if points.len() >= 2 {
            surface.polyline(points, style);
        }
    }
}
