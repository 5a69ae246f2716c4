//! Request and result payloads for the recommendation engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{FertilizerProduct, NpkTriple};

/// Structured inputs for one recommendation. The engine receives these
/// already typed; free-text extraction is someone else's job.
#[derive(Clone, Debug, PartialEq)]
pub struct RecommendationRequest {
    pub crop_name: String,
    pub soil_type: String,
    pub farm_size_acres: Decimal,
    pub budget_total: Option<Decimal>,
}

impl RecommendationRequest {
    pub fn new(
        crop_name: impl Into<String>,
        soil_type: impl Into<String>,
        farm_size_acres: Decimal,
    ) -> Self {
        Self {
            crop_name: crop_name.into(),
            soil_type: soil_type.into(),
            farm_size_acres,
            budget_total: None,
        }
    }

    pub fn with_budget(mut self, budget_total: Decimal) -> Self {
        self.budget_total = Some(budget_total);
        self
    }
}

/// One catalog product scored and costed for a single request. Ephemeral:
/// built per call, discarded once the result is assembled.
#[derive(Clone, Debug)]
pub struct ScoredCandidate {
    pub product: FertilizerProduct,
    pub score: f64,
    pub quantity_kg: Decimal,
    pub total_cost: Decimal,
    pub cost_per_acre: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimaryRecommendation {
    pub fertilizer_name: String,
    pub npk: NpkTriple,
    pub quantity_kg: Decimal,
    /// Quantity in 50-kg bags, rounded to one decimal place.
    pub quantity_bags: Decimal,
    pub total_cost: Decimal,
    pub cost_per_acre: Decimal,
    pub price_per_kg: Decimal,
    /// Match score rounded to one decimal place.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlternativeRecommendation {
    pub fertilizer_name: String,
    pub npk: NpkTriple,
    pub quantity_kg: Decimal,
    pub total_cost: Decimal,
    pub cost_per_acre: Decimal,
}

/// The engine's output: echoed inputs, one primary pick, up to three
/// alternatives, and the budget verdict. Immutable once returned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub crop: String,
    pub soil: String,
    pub farm_size_acres: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_total: Option<Decimal>,
    pub primary_recommendation: PrimaryRecommendation,
    pub alternatives: Vec<AlternativeRecommendation>,
    pub within_budget: bool,
}
