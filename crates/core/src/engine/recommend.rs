//! Recommendation assembler: a single-pass pipeline from catalog records to
//! a ranked, budget-aware result.

use std::cmp::Ordering;
use std::sync::Arc;

use rust_decimal::Decimal;

use super::rates::application_quantity;
use super::scoring::score_fertilizer;
use super::types::{
    AlternativeRecommendation, PrimaryRecommendation, RecommendationRequest, RecommendationResult,
    ScoredCandidate,
};
use super::{BAG_SIZE_KG, MAX_ALTERNATIVES, NOMINAL_RATE_PER_ACRE};
use crate::catalog::CatalogReader;
use crate::domain::{CropProfile, FertilizerProduct, SoilProfile};
use crate::errors::{ApplicationError, DomainError};

/// Stateless orchestrator over an injected catalog. Holds no mutable state,
/// so one engine can serve concurrent requests without coordination.
pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogReader>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    /// Resolve crop and soil, load the product listing, and assemble the
    /// recommendation. An unknown crop or soil halts the pipeline with a
    /// NotFound error before any scoring happens; no partial result exists.
    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResult, ApplicationError> {
        let crop = self
            .catalog
            .find_crop_by_name(&request.crop_name)
            .await?
            .ok_or_else(|| DomainError::CropNotFound { name: request.crop_name.clone() })?;
        let soil = self
            .catalog
            .find_soil_by_type(&request.soil_type)
            .await?
            .ok_or_else(|| DomainError::SoilNotFound { soil_type: request.soil_type.clone() })?;
        let fertilizers = self.catalog.list_all_fertilizers().await?;

        assemble_recommendation(
            &crop,
            &soil,
            &fertilizers,
            request.farm_size_acres,
            request.budget_total,
        )
        .map_err(ApplicationError::from)
    }
}

/// Pure assembly over already-fetched records: score, rank, budget-filter,
/// and shape the result payload.
///
/// A zero budget behaves exactly like no budget at all; negative budgets and
/// non-positive farm sizes pass through as degenerate numbers rather than
/// faulting. An empty product listing is the one condition reported as an
/// error here.
pub fn assemble_recommendation(
    crop: &CropProfile,
    soil: &SoilProfile,
    fertilizers: &[FertilizerProduct],
    farm_size_acres: Decimal,
    budget_total: Option<Decimal>,
) -> Result<RecommendationResult, DomainError> {
    if fertilizers.is_empty() {
        return Err(DomainError::EmptyCatalog);
    }

    let effective_budget = budget_total.filter(|budget| !budget.is_zero());
    let ceiling = budget_per_kg(effective_budget, farm_size_acres);

    let mut ranked: Vec<ScoredCandidate> = fertilizers
        .iter()
        .map(|product| score_and_cost(crop, product, farm_size_acres, ceiling))
        .collect();
    // Stable sort: equal scores keep the accessor's cheapest-first order.
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let working: Vec<&ScoredCandidate> = match effective_budget {
        Some(budget) => {
            let affordable: Vec<&ScoredCandidate> =
                ranked.iter().filter(|candidate| candidate.total_cost <= budget).collect();
            if affordable.is_empty() {
                // Nothing fits: offer the three cheapest products overall,
                // nutrient fit notwithstanding.
                let mut by_cost: Vec<&ScoredCandidate> = ranked.iter().collect();
                by_cost.sort_by(|a, b| a.total_cost.cmp(&b.total_cost));
                by_cost.truncate(MAX_ALTERNATIVES);
                by_cost
            } else {
                affordable
            }
        }
        None => ranked.iter().collect(),
    };

    let primary = working.first().copied().ok_or(DomainError::EmptyCatalog)?;

    let alternative_pool: Vec<&ScoredCandidate> = if working.len() > 1 {
        working[1..].to_vec()
    } else {
        ranked.iter().skip(1).collect()
    };
    let alternatives: Vec<AlternativeRecommendation> =
        alternative_pool.into_iter().take(MAX_ALTERNATIVES).map(alternative).collect();

    let within_budget = match effective_budget {
        Some(budget) => primary.total_cost <= budget,
        None => true,
    };

    let primary_recommendation = PrimaryRecommendation {
        fertilizer_name: primary.product.product_name.clone(),
        npk: primary.product.npk(),
        quantity_kg: primary.quantity_kg,
        quantity_bags: (primary.quantity_kg / Decimal::from(BAG_SIZE_KG)).round_dp(1),
        total_cost: primary.total_cost,
        cost_per_acre: primary.cost_per_acre,
        price_per_kg: primary.product.price_per_kg,
        score: round_one_decimal(primary.score),
        application_notes: primary.product.application_notes.clone(),
    };

    Ok(RecommendationResult {
        crop: crop.name.clone(),
        soil: soil.soil_type.clone(),
        farm_size_acres,
        budget_total,
        primary_recommendation,
        alternatives,
        within_budget,
    })
}

/// Heuristic per-kg price ceiling: the total budget spread over a nominal
/// 50 kg/acre dressing. Deliberately independent of the per-product rate
/// model; it only feeds the scoring penalty.
fn budget_per_kg(budget_total: Option<Decimal>, farm_size_acres: Decimal) -> Option<Decimal> {
    let budget = budget_total?;
    budget.checked_div(Decimal::from(NOMINAL_RATE_PER_ACRE) * farm_size_acres)
}

fn score_and_cost(
    crop: &CropProfile,
    product: &FertilizerProduct,
    farm_size_acres: Decimal,
    ceiling: Option<Decimal>,
) -> ScoredCandidate {
    let quantity_kg = application_quantity(&product.product_name, farm_size_acres);
    let total_cost = (quantity_kg * product.price_per_kg).round_dp(2);
    // Zero acreage yields a zero figure here rather than a division fault.
    let cost_per_acre = total_cost.checked_div(farm_size_acres).unwrap_or_default().round_dp(2);
    let score = score_fertilizer(crop, product, ceiling);

    ScoredCandidate { product: product.clone(), score, quantity_kg, total_cost, cost_per_acre }
}

fn alternative(candidate: &ScoredCandidate) -> AlternativeRecommendation {
    AlternativeRecommendation {
        fertilizer_name: candidate.product.product_name.clone(),
        npk: candidate.product.npk(),
        quantity_kg: candidate.quantity_kg,
        total_cost: candidate.total_cost,
        cost_per_acre: candidate.cost_per_acre,
    }
}

fn round_one_decimal(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}
