use anyhow::Context;
use axum::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::Client;

/// Document-store seam consumed by the handlers. Collections are addressed by
/// name; filters are plain equality documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(&self, collection: &str, document: Document)
        -> anyhow::Result<String>;
    async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> anyhow::Result<Vec<Document>>;
    async fn list_collections(&self) -> anyhow::Result<Vec<String>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

/// Renders a stored `_id` as the string form clients see.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone)]
pub struct MongoStore {
    db: mongodb::Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("connect to document store")?;
        Ok(Self {
            db: client.database(db_name),
        })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn create_document(
        &self,
        collection: &str,
        document: Document,
    ) -> anyhow::Result<String> {
        let inserted = self
            .db
            .collection::<Document>(collection)
            .insert_one(document)
            .await
            .with_context(|| format!("insert into {}", collection))?;
        Ok(id_to_string(&inserted.inserted_id))
    }

    async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> anyhow::Result<Vec<Document>> {
        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter)
            .limit(limit)
            .await
            .with_context(|| format!("query {}", collection))?;
        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .with_context(|| format!("read {} cursor", collection))?;
        Ok(docs)
    }

    async fn list_collections(&self) -> anyhow::Result<Vec<String>> {
        self.db
            .list_collection_names()
            .await
            .context("list collections")
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .context("ping document store")?;
        Ok(())
    }
}

#[cfg(test)]
mod id_tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn object_ids_render_as_hex() {
        let oid = ObjectId::new();
        assert_eq!(id_to_string(&Bson::ObjectId(oid)), oid.to_hex());
    }

    #[test]
    fn string_ids_pass_through() {
        assert_eq!(id_to_string(&Bson::String("abc".into())), "abc");
    }
}
