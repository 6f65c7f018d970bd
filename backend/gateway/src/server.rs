//! Main HTTP Gateway Server.

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

use cardforge_extraction::CardExtractor;
use cardforge_illustration::IllustrationProvider;
use cardforge_store::CardStore;
use media::{ImageStore, media_router};

use crate::cards_api;

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub cards: Arc<CardStore>,
    pub images: ImageStore,
    pub extractor: Arc<dyn CardExtractor>,
    pub illustrator: Arc<dyn IllustrationProvider>,
    pub frontend_dir: Option<PathBuf>,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let image_dir = state.images.dir().to_path_buf();
    let frontend_dir = state.frontend_dir.clone();

    let mut app = Router::new()
        .route("/api/health", get(cards_api::health))
        .route("/api/cards", post(cards_api::upload_card).get(cards_api::list_cards))
        .route("/api/cards/{id}", get(cards_api::get_card))
        .route("/api/cards/{id}/context", post(cards_api::save_context))
        .route("/", get(cards_api::serve_index))
        .with_state(state)
        .nest("/media", media_router(image_dir));

    if let Some(dir) = frontend_dir {
        app = app.nest_service("/app", ServeDir::new(dir));
    }

    app.layer(CorsLayer::permissive())
}

/// Starts the main Axum HTTP server for the gateway.
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = build_router(state);

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
