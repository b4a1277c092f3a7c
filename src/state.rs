use crate::config::AppConfig;
use crate::store::{DocumentStore, MongoStore};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = Arc::new(MongoStore::connect(&config.mongodb_uri, &config.mongodb_db).await?)
            as Arc<dyn DocumentStore>;
        let http = http_client(config.http_timeout_secs)?;

        Ok(Self {
            store,
            config,
            http,
        })
    }

    /// In-memory state for tests: documents live in a HashMap and the
    /// external API bases point at an unroutable address, so enrichment
    /// calls fail fast and the fail-open paths get exercised.
    pub fn fake() -> Self {
        use axum::async_trait;
        use mongodb::bson::{Bson, Document};
        use std::collections::HashMap;
        use std::sync::Mutex;

        #[derive(Default)]
        struct MemoryStore {
            collections: Mutex<HashMap<String, Vec<Document>>>,
        }

        #[async_trait]
        impl DocumentStore for MemoryStore {
            async fn create_document(
                &self,
                collection: &str,
                mut document: Document,
            ) -> anyhow::Result<String> {
                let id = uuid::Uuid::new_v4().simple().to_string();
                document.insert("_id", Bson::String(id.clone()));
                self.collections
                    .lock()
                    .unwrap()
                    .entry(collection.to_string())
                    .or_default()
                    .push(document);
                Ok(id)
            }

            async fn get_documents(
                &self,
                collection: &str,
                filter: Document,
                limit: i64,
            ) -> anyhow::Result<Vec<Document>> {
                let collections = self.collections.lock().unwrap();
                let docs = collections
                    .get(collection)
                    .map(|v| v.as_slice())
                    .unwrap_or(&[]);
                Ok(docs
                    .iter()
                    .filter(|d| filter.iter().all(|(k, v)| d.get(k) == Some(v)))
                    .take(limit.max(0) as usize)
                    .cloned()
                    .collect())
            }

            async fn list_collections(&self) -> anyhow::Result<Vec<String>> {
                Ok(self.collections.lock().unwrap().keys().cloned().collect())
            }

            async fn ping(&self) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let config = Arc::new(AppConfig {
            mongodb_uri: "mongodb://localhost:27017".into(),
            mongodb_db: "smartscan-test".into(),
            product_api_base: "http://127.0.0.1:9".into(),
            search_api_base: "http://127.0.0.1:9".into(),
            http_timeout_secs: 1,
        });
        let http = http_client(1).expect("http client");

        Self {
            store: Arc::new(MemoryStore::default()),
            config,
            http,
        }
    }
}

fn http_client(timeout_secs: u64) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(3)))
        .build()?;
    Ok(client)
}
