use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::models::ScanItem;
use crate::state::AppState;

use super::services::{lookup_barcode, LookupError};

pub fn routes() -> Router<AppState> {
    Router::new().route("/barcode/:code", get(barcode_lookup))
}

#[instrument(skip(state))]
pub async fn barcode_lookup(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ScanItem>, (StatusCode, String)> {
    match lookup_barcode(&state.http, &state.config.product_api_base, &code).await {
        Ok(item) => Ok(Json(item)),
        Err(LookupError::NotFound) => {
            warn!(%code, "product not found");
            Err((StatusCode::NOT_FOUND, "Product not found".into()))
        }
        Err(LookupError::Internal(e)) => {
            error!(error = %e, %code, "barcode lookup failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
