//! Nutrient-match scorer.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{BASE_SCORE, MAX_BUDGET_PENALTY, MAX_RATIO_PENALTY, RATIO_PENALTY_PER_UNIT};
use crate::domain::{CropProfile, FertilizerProduct};

/// Fitness of one product for one crop, optionally penalized against a
/// per-kg price ceiling.
///
/// Starts from [`BASE_SCORE`] and subtracts two capped penalties: the L1
/// distance between the normalized crop and product NPK ratios (up to
/// [`MAX_RATIO_PENALTY`]), and the relative overshoot of the product price
/// above the ceiling (up to [`MAX_BUDGET_PENALTY`], one-sided; prices below
/// the ceiling earn nothing). Either ratio term is skipped when the
/// corresponding totals are zero, so degenerate records never fault. The
/// result is floored at 0 and is pure: identical inputs, identical score.
pub fn score_fertilizer(
    crop: &CropProfile,
    fertilizer: &FertilizerProduct,
    budget_per_kg: Option<Decimal>,
) -> f64 {
    let mut score = BASE_SCORE;

    if let (Some(crop_ratios), Some(product_ratios)) = (crop.npk_ratios(), fertilizer.npk_ratios())
    {
        let ratio_diff: f64 = crop_ratios
            .iter()
            .zip(product_ratios.iter())
            .map(|(crop_share, product_share)| (crop_share - product_share).abs())
            .sum();
        score -= (ratio_diff * RATIO_PENALTY_PER_UNIT).min(MAX_RATIO_PENALTY);
    }

    if let Some(ceiling) = budget_per_kg.filter(|ceiling| !ceiling.is_zero()) {
        let price = fertilizer.price_per_kg.to_f64().unwrap_or_default();
        let ceiling = ceiling.to_f64().unwrap_or_default();
        if ceiling != 0.0 && price > ceiling {
            let penalty = ((price - ceiling) / ceiling) * MAX_BUDGET_PENALTY;
            score -= penalty.min(MAX_BUDGET_PENALTY);
        }
    }

    score.max(0.0)
}
