use shapepad_shared::normalize::prepare_for_lookup;
use shapepad_shared::{sanitize_strokes, Stroke};
use uuid::Uuid;

use crate::error::ApiError;
use crate::logic::sanitize_password;
use crate::state::{AppState, RegisteredShape, MAX_SHAPES};

pub fn new_shape_id() -> Uuid {
    Uuid::new_v4()
}

pub fn parse_shape_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}

/// Fills the in-memory registry from storage. A missing or unreadable
/// directory leaves the registry empty.
pub async fn load_registry(state: &AppState) -> usize {
    let stored = match state.storage.load_shapes().await {
        Ok(stored) => stored,
        Err(error) => {
            tracing::warn!(%error, "starting with an empty shape registry");
            return 0;
        }
    };
    let mut shapes = state.shapes.write().await;
    for shape in stored.into_iter().filter_map(RegisteredShape::from_stored) {
        shapes.insert(shape.id, shape);
    }
    shapes.len()
}

/// Normalizes and stores a new shape, returning it once it is visible to
/// lookups. Persistence failures are logged and do not fail the request.
pub async fn register_shape(
    state: &AppState,
    strokes: Vec<Stroke>,
    password: Option<String>,
) -> Result<RegisteredShape, ApiError> {
    let strokes = sanitize_strokes(strokes);
    if strokes.is_empty() {
        return Err(ApiError::BadRequest("drawing has no strokes"));
    }
    let shape = RegisteredShape {
        id: new_shape_id(),
        strokes: prepare_for_lookup(&strokes),
        password: sanitize_password(password),
        is_locked: false,
    };
    let _writes = state.writes.lock().await;
    {
        let mut shapes = state.shapes.write().await;
        if shapes.len() >= MAX_SHAPES {
            return Err(ApiError::RegistryFull);
        }
        shapes.insert(shape.id, shape.clone());
    }
    if let Err(error) = state.storage.save_shape(&shape.to_stored()).await {
        tracing::error!(shape_id = %shape.id, %error, "failed to persist shape");
    }
    tracing::info!(shape_id = %shape.id, strokes = shape.strokes.len(), "registered shape");
    Ok(shape)
}
