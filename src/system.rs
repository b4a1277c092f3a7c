use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::state::AppState;

const MAX_LISTED_COLLECTIONS: usize = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/test", get(store_status))
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StoreStatusResponse {
    pub backend: &'static str,
    pub database: String,
    pub database_name: String,
    pub connection_status: &'static str,
    pub collections: Vec<String>,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "SmartScan backend running",
    })
}

/// Store connectivity report. Always 200; failures are reported in-band.
#[instrument(skip(state))]
pub async fn store_status(State(state): State<AppState>) -> Json<StoreStatusResponse> {
    let database_name = state.config.mongodb_db.clone();
    match connectivity(&state).await {
        Ok(collections) => Json(StoreStatusResponse {
            backend: "running",
            database: "connected".to_string(),
            database_name,
            connection_status: "Connected",
            collections,
        }),
        Err(e) => {
            warn!(error = %e, "store connectivity check failed");
            Json(StoreStatusResponse {
                backend: "running",
                database: format!("error: {}", truncate(&e.to_string(), 80)),
                database_name,
                connection_status: "Not Connected",
                collections: Vec::new(),
            })
        }
    }
}

async fn connectivity(state: &AppState) -> anyhow::Result<Vec<String>> {
    state.store.ping().await?;
    let mut collections = state.store.list_collections().await?;
    collections.truncate(MAX_LISTED_COLLECTIONS);
    Ok(collections)
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
