use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Nutrients, ScanItem};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Product not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Envelope returned by the product API: `status == 1` means found.
#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    #[serde(default)]
    status: i64,
    product: Option<ExternalProduct>,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalProduct {
    product_name: Option<String>,
    brands: Option<String>,
    code: Option<String>,
    image_front_small_url: Option<String>,
    image_url: Option<String>,
    ingredients_text: Option<String>,
    #[serde(default)]
    nutriments: ExternalNutriments,
    // number or string in the wild
    nova_group: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalNutriments {
    #[serde(rename = "energy-kcal_100g")]
    energy_kcal_100g: Option<f64>,
    proteins_100g: Option<f64>,
    carbohydrates_100g: Option<f64>,
    sugars_100g: Option<f64>,
    fat_100g: Option<f64>,
    #[serde(rename = "saturated-fat_100g")]
    saturated_fat_100g: Option<f64>,
    fiber_100g: Option<f64>,
    sodium_100g: Option<f64>,
}

pub async fn lookup_barcode(
    http: &Client,
    base: &str,
    code: &str,
) -> Result<ScanItem, LookupError> {
    let url = format!("{}/api/v2/product/{}.json", base, code);
    let envelope: ProductEnvelope = http
        .get(&url)
        .send()
        .await
        .context("product lookup request")?
        .json()
        .await
        .context("decode product lookup response")?;

    item_from_envelope(envelope)
}

fn item_from_envelope(envelope: ProductEnvelope) -> Result<ScanItem, LookupError> {
    if envelope.status != 1 {
        return Err(LookupError::NotFound);
    }
    Ok(map_product(envelope.product.unwrap_or_default()))
}

fn map_product(p: ExternalProduct) -> ScanItem {
    let n = p.nutriments;
    ScanItem {
        name: p.product_name,
        brand: p.brands,
        barcode: p.code,
        image_url: p.image_front_small_url.or(p.image_url),
        ingredients_text: p.ingredients_text,
        nutrients: Some(Nutrients {
            calories: n.energy_kcal_100g,
            protein: n.proteins_100g,
            carbs: n.carbohydrates_100g,
            sugar: n.sugars_100g,
            fat: n.fat_100g,
            saturated_fat: n.saturated_fat_100g,
            fiber: n.fiber_100g,
            sodium: n.sodium_100g,
        }),
        processing_level: processing_level(p.nova_group),
    }
}

fn processing_level(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
