use std::fmt::Write as _;

use crate::normalize::bounds;
use crate::{Point, Stroke};

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "#212121".to_string(),
            width: 3.0,
        }
    }
}

/// Path data for one stroke, `M x y L x y ...`.
pub fn path_data(stroke: &Stroke) -> String {
    let mut data = String::new();
    for (index, point) in stroke.points.iter().enumerate() {
        let command = if index == 0 { "M" } else { " L" };
        let _ = write!(data, "{command} {} {}", point.x, point.y);
    }
    data
}

/// Standalone SVG document for the drawing, `None` when there is nothing
/// to draw.
pub fn to_svg(strokes: &[Stroke], style: &StrokeStyle, include_background: bool) -> Option<String> {
    let bounds = bounds(strokes)?;
    let pad = (style.width / 2.0).max(1.0);
    let min_x = bounds.min_x - pad;
    let min_y = bounds.min_y - pad;
    let width = (bounds.width() + pad * 2.0).max(1.0);
    let height = (bounds.height() + pad * 2.0).max(1.0);

    let mut paths = String::new();
    for stroke in strokes {
        if stroke.points.is_empty() {
            continue;
        }
        let _ = write!(
            paths,
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\" stroke-linecap=\"round\" stroke-linejoin=\"round\" />",
            path_data(stroke),
            style.color,
            style.width
        );
    }

    let background = if include_background {
        format!("<rect x=\"{min_x}\" y=\"{min_y}\" width=\"{width}\" height=\"{height}\" fill=\"#ffffff\" />")
    } else {
        String::new()
    };

    Some(format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{min_x} {min_y} {width} {height}\">{background}{paths}</svg>"
    ))
}

/// Strokes recovered from the `d` attributes of an SVG document. Only
/// absolute `M` and `L` commands are understood; any other command ends the
/// current stroke and its coordinates are skipped.
pub fn strokes_from_svg(svg: &str) -> Vec<Stroke> {
    let mut strokes = Vec::new();
    let mut rest = svg;
    while let Some(start) = rest.find(" d=\"") {
        let data = &rest[start + 4..];
        let Some(end) = data.find('"') else {
            break;
        };
        parse_path_data(&data[..end], &mut strokes);
        rest = &data[end + 1..];
    }
    strokes
}

fn parse_path_data(data: &str, strokes: &mut Vec<Stroke>) {
    let mut points = Vec::new();
    let mut drawing = false;
    let mut pending_x = None;
    for token in path_tokens(data) {
        match token {
            "M" => {
                flush(&mut points, strokes);
                drawing = true;
                pending_x = None;
            }
            "L" => {
                drawing = true;
                pending_x = None;
            }
            _ if token.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                flush(&mut points, strokes);
                drawing = false;
                pending_x = None;
            }
            _ => {
                let Ok(value) = token.parse::<f32>() else {
                    continue;
                };
                if !drawing {
                    continue;
                }
                match pending_x.take() {
                    Some(x) => points.push(Point::new(x, value)),
                    None => pending_x = Some(value),
                }
            }
        }
    }
    flush(&mut points, strokes);
}

fn flush(points: &mut Vec<Point>, strokes: &mut Vec<Stroke>) {
    if !points.is_empty() {
        strokes.push(Stroke::new(std::mem::take(points)));
    }
}

fn path_tokens(data: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (index, ch) in data.char_indices() {
        let command = ch.is_ascii_alphabetic() && ch != 'e' && ch != 'E';
        if command || ch.is_whitespace() || ch == ',' {
            if let Some(from) = start.take() {
                tokens.push(&data[from..index]);
            }
            if command {
                tokens.push(&data[index..index + 1]);
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(from) = start {
        tokens.push(&data[from..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_drawing_has_no_svg() {
        assert!(to_svg(&[], &StrokeStyle::default(), true).is_none());
    }

    #[test]
    fn path_follows_point_order() {
        let stroke = Stroke::new(vec![
            Point::new(1.0, 2.0),
            Point::new(3.0, 4.0),
            Point::new(5.5, 6.0),
        ]);
        assert_eq!(path_data(&stroke), "M 1 2 L 3 4 L 5.5 6");
    }

    #[test]
    fn svg_contains_one_path_per_stroke() {
        let strokes = vec![
            Stroke::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]),
            Stroke::new(vec![Point::new(10.0, 0.0), Point::new(0.0, 10.0)]),
        ];
        let svg = to_svg(&strokes, &StrokeStyle::default(), false).unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"-1.5 -1.5 13 13\">"));
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(!svg.contains("<rect"));
        assert!(svg.contains("stroke=\"#212121\""));
    }

    #[test]
    fn path_data_reads_back_into_strokes() {
        let strokes = vec![
            Stroke::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]),
            Stroke::new(vec![
                Point::new(10.0, 0.0),
                Point::new(0.5, 10.0),
                Point::new(-2.0, 3.0),
            ]),
        ];
        let svg = to_svg(&strokes, &StrokeStyle::default(), true).unwrap();
        assert_eq!(strokes_from_svg(&svg), strokes);
    }

    #[test]
    fn compact_path_syntax_is_accepted() {
        let svg = r#"<svg><path d="M0,0L10,10 20,0"/><path d="M5 5 Q 1 1 2 2"/></svg>"#;
        let strokes = strokes_from_svg(svg);
        assert_eq!(strokes.len(), 2);
        assert_eq!(
            strokes[0].points,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0), Point::new(20.0, 0.0)]
        );
        assert_eq!(strokes[1].points, vec![Point::new(5.0, 5.0)]);
    }

    #[test]
    fn svg_without_paths_has_no_strokes() {
        assert!(strokes_from_svg("<svg><rect width=\"10\" /></svg>").is_empty());
    }
}
