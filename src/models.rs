use serde::{Deserialize, Serialize};

/// Health goal a verdict is scored against.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    Balanced,
    WeightLoss,
    MuscleGain,
    HeartHealth,
    LowSugar,
}

impl Goal {
    /// Parses the wire form, e.g. from a multipart text field.
    pub fn parse(s: &str) -> Option<Goal> {
        match s {
            "balanced" => Some(Goal::Balanced),
            "weight_loss" => Some(Goal::WeightLoss),
            "muscle_gain" => Some(Goal::MuscleGain),
            "heart_health" => Some(Goal::HeartHealth),
            "low_sugar" => Some(Goal::LowSugar),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Mr,
    Hinglish,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerdictColor {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsulinRisk {
    Low,
    Medium,
    High,
}

/// Per-100g nutritional facts. Absent means unknown, not zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nutrients {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub sugar: Option<f64>,
    pub fat: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sodium: Option<f64>,
}

/// A product as looked up by barcode or captured from an image scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanItem {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
    pub ingredients_text: Option<String>,
    pub nutrients: Option<Nutrients>,
    pub processing_level: Option<String>,
}

/// Scored recommendation for a single item against a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub color: VerdictColor,
    pub score: i32,
    pub explanation: String,
    pub insulin_risk: InsulinRisk,
}

/// A normalized product suggestion from the alternative search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alternative {
    pub name: String,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub barcode: Option<String>,
}

/// Write-once record of a scan/verdict request. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub user_id: String,
    pub goal: Goal,
    pub item: ScanItem,
    pub verdict: Verdict,
    pub allergens_found: Vec<String>,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub sensitivities: Vec<String>,
    #[serde(default)]
    pub language: Language,
}

impl UserProfile {
    /// Default profile created lazily on a user's first request.
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            name: None,
            goal: Goal::Balanced,
            allergies: Vec::new(),
            sensitivities: Vec::new(),
            language: Language::En,
        }
    }
}
