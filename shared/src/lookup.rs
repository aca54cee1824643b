//! Request and response bodies exchanged with the shape lookup service.

use serde::{Deserialize, Serialize};

use crate::Stroke;

pub const LOOKUP_PATH: &str = "/api/shapes/lookup";
pub const REGISTER_PATH: &str = "/api/shapes";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LookupRequest {
    /// SVG markup of the drawing as shown on the canvas.
    #[serde(default)]
    pub svg: String,
    /// Normalized point lists of the drawing.
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShapeSummary {
    pub id: String,
    pub thumbnail_svg: String,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_password_protected: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LookupResponse {
    pub match_found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f32>,
}

impl LookupResponse {
    pub fn no_match() -> Self {
        Self {
            match_found: false,
            shape: None,
            similarity_score: None,
        }
    }

    pub fn matched(shape: ShapeSummary, similarity_score: f32) -> Self {
        Self {
            match_found: true,
            shape: Some(shape),
            similarity_score: Some(similarity_score),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RegisterRequest {
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `PUT /api/shapes/:id/lock`. Password-protected shapes require
/// the matching password.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LockRequest {
    pub locked: bool,
    #[serde(default)]
    pub password: Option<String>,
}
