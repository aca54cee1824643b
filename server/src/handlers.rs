use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use shapepad_shared::normalize::prepare_for_lookup;
use shapepad_shared::svg::strokes_from_svg;
use shapepad_shared::{
    sanitize_strokes, LockRequest, LookupRequest, LookupResponse, RegisterRequest, ShapeSummary,
};

use crate::error::ApiError;
use crate::logic::{best_match, summarize};
use crate::shapes::{parse_shape_id, register_shape};
use crate::state::AppState;

pub async fn ping_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

pub async fn lookup_handler(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, ApiError> {
    let svg_only = request.strokes.is_empty();
    if svg_only && request.svg.trim().is_empty() {
        return Err(ApiError::BadRequest("drawing is empty"));
    }
    let strokes = if svg_only {
        strokes_from_svg(&request.svg)
    } else {
        request.strokes
    };
    let strokes = sanitize_strokes(strokes);
    if strokes.is_empty() {
        if svg_only {
            tracing::info!(svg_bytes = request.svg.len(), "svg lookup has no usable path data");
            return Ok(Json(LookupResponse::no_match()));
        }
        return Err(ApiError::BadRequest("drawing has no strokes"));
    }
    let strokes = prepare_for_lookup(&strokes);
    let shapes = state.shapes.read().await;
    let response = match best_match(&shapes, &strokes) {
        Some((shape, score)) => {
            tracing::info!(shape_id = %shape.id, score, "lookup matched");
            LookupResponse::matched(summarize(shape), score)
        }
        None => {
            tracing::info!(strokes = strokes.len(), registered = shapes.len(), "lookup found no match");
            LookupResponse::no_match()
        }
    };
    Ok(Json(response))
}

pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ShapeSummary>), ApiError> {
    let shape = register_shape(&state, request.strokes, request.password).await?;
    Ok((StatusCode::CREATED, Json(summarize(&shape))))
}

pub async fn shape_handler(
    Path(shape_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ShapeSummary>, ApiError> {
    let shape_id = parse_shape_id(&shape_id).ok_or(ApiError::NotFound)?;
    let shapes = state.shapes.read().await;
    let shape = shapes.get(&shape_id).ok_or(ApiError::NotFound)?;
    Ok(Json(summarize(shape)))
}

pub async fn lock_handler(
    Path(shape_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<LockRequest>,
) -> Result<Json<ShapeSummary>, ApiError> {
    let shape_id = parse_shape_id(&shape_id).ok_or(ApiError::NotFound)?;
    let _writes = state.writes.lock().await;
    let updated = {
        let mut shapes = state.shapes.write().await;
        let shape = shapes.get_mut(&shape_id).ok_or(ApiError::NotFound)?;
        if let Some(expected) = &shape.password {
            if request.password.as_deref().map(str::trim) != Some(expected.as_str()) {
                return Err(ApiError::Forbidden);
            }
        }
        shape.is_locked = request.locked;
        shape.clone()
    };
    if let Err(error) = state.storage.save_shape(&updated.to_stored()).await {
        tracing::error!(shape_id = %updated.id, %error, "failed to persist lock change");
    }
    tracing::info!(shape_id = %updated.id, locked = updated.is_locked, "shape lock changed");
    Ok(Json(summarize(&updated)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shapepad_shared::svg::{to_svg, StrokeStyle};
    use shapepad_shared::{Point, Stroke};

    use super::*;
    use crate::state::{RegisteredShape, MAX_SHAPES};
    use crate::storage::{FileStorage, Storage};

    fn state_in(dir: &tempfile::TempDir) -> AppState {
        AppState::new(Arc::new(FileStorage::new(dir.path().to_path_buf())))
    }

    fn zigzag(scale: f32, offset: f32) -> Vec<Stroke> {
        let points = [(0.0, 0.0), (10.0, 20.0), (20.0, 0.0), (30.0, 20.0)]
            .iter()
            .map(|&(x, y)| Point::new(x * scale + offset, y * scale + offset))
            .collect();
        vec![Stroke::new(points)]
    }

    fn vertical_bar() -> Vec<Stroke> {
        vec![Stroke::new(vec![Point::new(5.0, 0.0), Point::new(5.0, 90.0)])]
    }

    async fn lookup(state: &AppState, strokes: Vec<Stroke>) -> Result<LookupResponse, ApiError> {
        lookup_svg(state, String::new(), strokes).await
    }

    async fn lookup_svg(
        state: &AppState,
        svg: String,
        strokes: Vec<Stroke>,
    ) -> Result<LookupResponse, ApiError> {
        lookup_handler(State(state.clone()), Json(LookupRequest { svg, strokes }))
            .await
            .map(|Json(response)| response)
    }

    async fn set_lock(
        state: &AppState,
        shape_id: &str,
        locked: bool,
        password: Option<&str>,
    ) -> Result<ShapeSummary, ApiError> {
        lock_handler(
            Path(shape_id.to_string()),
            State(state.clone()),
            Json(LockRequest {
                locked,
                password: password.map(str::to_string),
            }),
        )
        .await
        .map(|Json(summary)| summary)
    }

    async fn register(state: &AppState, strokes: Vec<Stroke>, password: Option<&str>) -> ShapeSummary {
        let (status, Json(summary)) = register_handler(
            State(state.clone()),
            Json(RegisterRequest {
                strokes,
                password: password.map(str::to_string),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        summary
    }

    #[tokio::test]
    async fn empty_lookup_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let error = lookup(&state, Vec::new()).await.unwrap_err();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);

        let single_point = vec![Stroke::new(vec![Point::new(1.0, 1.0)])];
        assert!(lookup(&state, single_point).await.is_err());
    }

    #[tokio::test]
    async fn svg_only_lookup_reads_path_data() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let summary = register(&state, zigzag(1.0, 0.0), None).await;

        let svg = to_svg(&zigzag(2.0, 15.0), &StrokeStyle::default(), true).unwrap();
        let response = lookup_svg(&state, svg, Vec::new()).await.unwrap();
        assert!(response.match_found);
        assert_eq!(response.shape.unwrap().id, summary.id);

        let blank = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="5" height="5" /></svg>"#;
        let response = lookup_svg(&state, blank.to_string(), Vec::new()).await.unwrap();
        assert_eq!(response, LookupResponse::no_match());

        let error = lookup_svg(&state, "  ".to_string(), Vec::new()).await.unwrap_err();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn full_registry_rejects_new_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        {
            let mut shapes = state.shapes.write().await;
            for _ in 0..MAX_SHAPES {
                let shape = RegisteredShape {
                    id: uuid::Uuid::new_v4(),
                    strokes: Vec::new(),
                    password: None,
                    is_locked: false,
                };
                shapes.insert(shape.id, shape);
            }
        }

        let result = register_handler(
            State(state.clone()),
            Json(RegisterRequest {
                strokes: vertical_bar(),
                password: None,
            }),
        )
        .await;
        let error = result.err().unwrap();
        assert!(matches!(error, ApiError::RegistryFull));
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(state.shapes.read().await.len(), MAX_SHAPES);
        assert!(FileStorage::new(dir.path().to_path_buf())
            .load_shapes()
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unknown_drawing_has_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        register(&state, vertical_bar(), None).await;

        let response = lookup(&state, zigzag(1.0, 0.0)).await.unwrap();
        assert!(!response.match_found);
        assert!(response.shape.is_none());
    }

    #[tokio::test]
    async fn registered_drawing_matches_scaled_copy() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let summary = register(&state, zigzag(1.0, 0.0), Some("secret")).await;
        assert!(summary.is_password_protected);
        assert!(summary.thumbnail_svg.starts_with("<svg"));

        let response = lookup(&state, zigzag(3.0, 40.0)).await.unwrap();
        assert!(response.match_found);
        let shape = response.shape.unwrap();
        assert_eq!(shape.id, summary.id);
        assert!(shape.is_password_protected);
        assert!(response.similarity_score.unwrap() >= crate::logic::MATCH_THRESHOLD);
    }

    #[tokio::test]
    async fn registration_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let summary = register(&state, zigzag(1.0, 0.0), None).await;

        let stored = FileStorage::new(dir.path().to_path_buf())
            .load_shapes()
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, summary.id);

        let reloaded = state_in(&dir);
        assert_eq!(crate::shapes::load_registry(&reloaded).await, 1);
    }

    #[tokio::test]
    async fn shape_lookup_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let summary = register(&state, vertical_bar(), None).await;

        let Json(found) = shape_handler(Path(summary.id.clone()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(found, summary);

        let missing = shape_handler(Path("not-a-uuid".to_string()), State(state.clone())).await;
        assert!(matches!(missing, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn lock_requires_password() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let summary = register(&state, vertical_bar(), Some("pw")).await;

        let denied = set_lock(&state, &summary.id, true, Some("nope")).await;
        assert!(matches!(denied, Err(ApiError::Forbidden)));

        let locked = set_lock(&state, &summary.id, true, Some("pw")).await.unwrap();
        assert!(locked.is_locked);

        let response = lookup(&state, vertical_bar()).await.unwrap();
        assert!(response.shape.unwrap().is_locked);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_lock_changes_reach_disk_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let summary = register(&state, vertical_bar(), None).await;

        let mut tasks = Vec::new();
        for round in 0..16 {
            let state = state.clone();
            let id = summary.id.clone();
            tasks.push(tokio::spawn(async move {
                set_lock(&state, &id, round % 2 == 0, None).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let in_memory = {
            let shapes = state.shapes.read().await;
            shapes.values().next().unwrap().is_locked
        };
        let stored = FileStorage::new(dir.path().to_path_buf())
            .load_shapes()
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].is_locked, in_memory);
    }
}
