use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{Alternative, Goal, ScanItem};

const MAX_RESULTS: usize = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<SearchProduct>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchProduct {
    product_name: Option<String>,
    brands: Option<String>,
    image_front_small_url: Option<String>,
    image_url: Option<String>,
    code: Option<String>,
}

/// Suggests up to five organic-labelled products related to the item.
///
/// Fail-open: suggestions are non-critical enrichment, so any network or
/// decode failure degrades to an empty list instead of surfacing an error.
pub async fn find_alternatives(
    http: &Client,
    base: &str,
    item: &ScanItem,
    goal: Goal,
) -> Vec<Alternative> {
    let query = item
        .brand
        .as_deref()
        .or(item.name.as_deref())
        .unwrap_or("healthy");
    debug!(%query, ?goal, "searching alternatives");

    match search(http, base, query).await {
        Ok(found) => found,
        Err(e) => {
            warn!(error = %e, %query, "alternative search failed; returning none");
            Vec::new()
        }
    }
}

async fn search(http: &Client, base: &str, query: &str) -> anyhow::Result<Vec<Alternative>> {
    let url = format!("{}/cgi/search.pl", base);
    let response: SearchResponse = http
        .get(url)
        .query(&[
            ("action", "process"),
            ("search_terms", query),
            ("json", "1"),
            ("page_size", "5"),
            ("tagtype_0", "labels"),
            ("tag_contains_0", "contains"),
            ("tag_0", "organic"),
        ])
        .send()
        .await?
        .json()
        .await?;
    Ok(map_products(response.products))
}

fn map_products(products: Vec<SearchProduct>) -> Vec<Alternative> {
    products
        .into_iter()
        .take(MAX_RESULTS)
        .map(|p| Alternative {
            name: p
                .product_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Alternative".to_string()),
            brand: p.brands,
            image_url: p.image_front_small_url.or(p.image_url),
            barcode: p.code,
        })
        .collect()
}
