use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

/// Request body for fetching (or lazily creating) a profile.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub user_id: String,
}

/// Stored profile returned to the client, `_id` included.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}
