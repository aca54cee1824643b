use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use clap::Parser;
use shapepad_shared::lookup::{LOOKUP_PATH, REGISTER_PATH};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod error;
mod handlers;
mod logic;
mod shapes;
mod state;
mod storage;

use crate::handlers::{lock_handler, lookup_handler, ping_handler, register_handler, shape_handler};
use crate::shapes::load_registry;
use crate::state::AppState;
use crate::storage::FileStorage;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding registered shapes.
    #[arg(long)]
    shape_dir: Option<PathBuf>,
    /// Directory served as the drawing pad front-end.
    #[arg(long)]
    public_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let shape_dir = args
        .shape_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../shapes"));
    if let Err(error) = tokio::fs::create_dir_all(&shape_dir).await {
        tracing::error!(dir = %shape_dir.display(), %error, "failed to create shape dir");
    }
    let state = AppState::new(Arc::new(FileStorage::new(shape_dir)));
    let loaded = load_registry(&state).await;
    tracing::info!(shapes = loaded, "shape registry loaded");

    let public_dir = args
        .public_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));

    let app = Router::new()
        .route("/ping", get(ping_handler))
        .route(LOOKUP_PATH, post(lookup_handler))
        .route(REGISTER_PATH, post(register_handler))
        .route("/api/shapes/:shape_id", get(shape_handler))
        .route("/api/shapes/:shape_id/lock", put(lock_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("ShapePad running at http://localhost:{port}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server");
    axum::serve(listener, app).await.expect("Server crashed");
}
