use anyhow::Context;
use mongodb::bson::{self, doc};

use crate::models::UserProfile;
use crate::store::{id_to_string, DocumentStore};

const PROFILE_COLLECTION: &str = "userprofile";

pub async fn find_by_user_id(
    store: &dyn DocumentStore,
    user_id: &str,
) -> anyhow::Result<Option<(String, UserProfile)>> {
    let docs = store
        .get_documents(PROFILE_COLLECTION, doc! { "user_id": user_id }, 1)
        .await?;
    let Some(document) = docs.into_iter().next() else {
        return Ok(None);
    };

    let id = document.get("_id").map(id_to_string).unwrap_or_default();
    let profile: UserProfile = bson::from_document(document).context("decode stored profile")?;
    Ok(Some((id, profile)))
}

pub async fn create(store: &dyn DocumentStore, profile: &UserProfile) -> anyhow::Result<String> {
    let document = bson::to_document(profile).context("encode profile")?;
    store.create_document(PROFILE_COLLECTION, document).await
}

#[cfg(test)]
mod profile_repo_tests {
    use super::*;
    use crate::models::{Goal, Language};
    use crate::state::AppState;

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let state = AppState::fake();

        let missing = find_by_user_id(state.store.as_ref(), "u-1")
            .await
            .expect("lookup");
        assert!(missing.is_none());

        let profile = UserProfile::new("u-1".to_string());
        let id = create(state.store.as_ref(), &profile)
            .await
            .expect("create");
        assert!(!id.is_empty());

        let (found_id, found) = find_by_user_id(state.store.as_ref(), "u-1")
            .await
            .expect("lookup")
            .expect("profile exists");
        assert_eq!(found_id, id);
        assert_eq!(found.user_id, "u-1");
        assert_eq!(found.goal, Goal::Balanced);
        assert_eq!(found.language, Language::En);
        assert!(found.allergies.is_empty());
        assert!(found.sensitivities.is_empty());
    }
}
