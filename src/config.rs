use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub product_api_base: String,
    pub search_api_base: String,
    pub http_timeout_secs: u64,
}

const DEFAULT_API_BASE: &str = "https://world.openfoodfacts.org";

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mongodb_uri = std::env::var("MONGODB_URI")?;
        Ok(Self {
            mongodb_uri,
            mongodb_db: std::env::var("MONGODB_DB").unwrap_or_else(|_| "smartscan".into()),
            product_api_base: std::env::var("PRODUCT_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.into()),
            search_api_base: std::env::var("SEARCH_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.into()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(6),
        })
    }
}
