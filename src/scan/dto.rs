use serde::{Deserialize, Serialize};

use crate::models::{Alternative, Goal, ScanItem, Verdict};

/// Request body for scoring an already-resolved item.
#[derive(Debug, Deserialize)]
pub struct VerdictRequest {
    pub user_id: String,
    pub goal: Goal,
    pub item: ScanItem,
}

/// Response returned after a verdict request.
#[derive(Debug, Serialize)]
pub struct VerdictResponse {
    pub scan_id: String,
    pub verdict: Verdict,
    pub allergens: Vec<String>,
    pub alternatives: Vec<Alternative>,
}

/// Image scan response additionally echoes the detected item.
#[derive(Debug, Serialize)]
pub struct ImageScanResponse {
    pub scan_id: String,
    pub item: ScanItem,
    pub verdict: Verdict,
    pub allergens: Vec<String>,
    pub alternatives: Vec<Alternative>,
}
