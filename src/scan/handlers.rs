use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::models::{Goal, Nutrients, ScanItem};
use crate::state::AppState;

use super::dto::{ImageScanResponse, VerdictRequest, VerdictResponse};
use super::services::run_scan;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/verdict", post(generate_verdict))
        .route("/scan/image", post(scan_image))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[instrument(skip(state, payload))]
pub async fn generate_verdict(
    State(state): State<AppState>,
    Json(payload): Json<VerdictRequest>,
) -> Result<Json<VerdictResponse>, (StatusCode, String)> {
    let outcome = run_scan(&state, &payload.user_id, payload.goal, &payload.item)
        .await
        .map_err(internal)?;

    info!(
        scan_id = %outcome.scan_id,
        user_id = %payload.user_id,
        score = outcome.verdict.score,
        "verdict generated"
    );
    Ok(Json(VerdictResponse {
        scan_id: outcome.scan_id,
        verdict: outcome.verdict,
        allergens: outcome.allergens,
        alternatives: outcome.alternatives,
    }))
}

/// POST /scan/image (multipart)
/// Fields: user_id, goal, file. The upload is accepted but not analyzed;
/// a fixed item stands in until vision recognition is wired in.
#[instrument(skip(state, multipart))]
pub async fn scan_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageScanResponse>, (StatusCode, String)> {
    let mut user_id: Option<String> = None;
    let mut goal: Option<Goal> = None;
    let mut image: Option<bytes::Bytes> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("user_id") => user_id = Some(field.text().await.map_err(bad_request)?),
            Some("goal") => {
                let raw = field.text().await.map_err(bad_request)?;
                goal = Some(Goal::parse(&raw).ok_or((
                    StatusCode::BAD_REQUEST,
                    format!("unknown goal {}", raw),
                ))?);
            }
            Some("file") => image = Some(field.bytes().await.map_err(bad_request)?),
            _ => {}
        }
    }

    let user_id = user_id.ok_or((StatusCode::BAD_REQUEST, "user_id is required".to_string()))?;
    let goal = goal.ok_or((StatusCode::BAD_REQUEST, "goal is required".to_string()))?;
    let image = image.ok_or((StatusCode::BAD_REQUEST, "file is required".to_string()))?;

    info!(user_id = %user_id, image_bytes = image.len(), "image scan received");
    let item = detected_meal_stub();

    let outcome = run_scan(&state, &user_id, goal, &item)
        .await
        .map_err(internal)?;
    Ok(Json(ImageScanResponse {
        scan_id: outcome.scan_id,
        item,
        verdict: outcome.verdict,
        allergens: outcome.allergens,
        alternatives: outcome.alternatives,
    }))
}

fn detected_meal_stub() -> ScanItem {
    ScanItem {
        name: Some("Detected Meal".to_string()),
        ingredients_text: Some("rice, chicken, spices".to_string()),
        nutrients: Some(Nutrients {
            calories: Some(250.0),
            protein: Some(18.0),
            carbs: Some(30.0),
            sugar: Some(2.0),
            ..Nutrients::default()
        }),
        ..ScanItem::default()
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "scan request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn bad_request<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

#[cfg(test)]
mod handler_tests {
    use super::*;
    use crate::models::VerdictColor;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn generate_verdict_scores_and_persists() {
        let state = AppState::fake();
        let payload = VerdictRequest {
            user_id: "u1".into(),
            goal: Goal::MuscleGain,
            item: ScanItem {
                nutrients: Some(Nutrients {
                    protein: Some(25.0),
                    ..Nutrients::default()
                }),
                ..ScanItem::default()
            },
        };

        let Json(response) = generate_verdict(State(state.clone()), Json(payload))
            .await
            .expect("verdict ok");
        assert_eq!(response.verdict.score, 85);
        assert_eq!(response.verdict.color, VerdictColor::Green);
        assert!(!response.scan_id.is_empty());

        let stored = state
            .store
            .get_documents("scanrecord", doc! { "user_id": "u1" }, 10)
            .await
            .expect("read back");
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn stub_item_matches_the_placeholder_meal() {
        let item = detected_meal_stub();
        assert_eq!(item.name.as_deref(), Some("Detected Meal"));
        assert_eq!(item.ingredients_text.as_deref(), Some("rice, chicken, spices"));
        let nutrients = item.nutrients.expect("stub nutrients");
        assert_eq!(nutrients.calories, Some(250.0));
        assert_eq!(nutrients.protein, Some(18.0));
        assert_eq!(nutrients.carbs, Some(30.0));
        assert_eq!(nutrients.sugar, Some(2.0));
        assert_eq!(nutrients.fat, None);
    }
}
