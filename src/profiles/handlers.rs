use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, info, instrument};

use crate::models::UserProfile;
use crate::state::AppState;

use super::dto::{ProfileRequest, ProfileResponse};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", post(get_or_create_profile))
}

/// Read-or-create by user_id. There is no update path: a stored profile is
/// returned as-is on every later call.
#[instrument(skip(state))]
pub async fn get_or_create_profile(
    State(state): State<AppState>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    match repo::find_by_user_id(state.store.as_ref(), &payload.user_id).await {
        Ok(Some((id, profile))) => Ok(Json(ProfileResponse { id, profile })),
        Ok(None) => {
            let profile = UserProfile::new(payload.user_id.clone());
            let id = repo::create(state.store.as_ref(), &profile)
                .await
                .map_err(internal)?;
            info!(user_id = %payload.user_id, %id, "profile created");
            Ok(Json(ProfileResponse { id, profile }))
        }
        Err(e) => Err(internal(e)),
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "profile request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
