//! Fertilizer recommendation engine.
//!
//! Ranks the catalog's products against one crop's nutrient demand, converts
//! product identity into a per-acre dosage, and filters the ranking by an
//! optional total budget. Everything here is deterministic computation; the
//! only I/O is the three read-only catalog calls made by
//! [`RecommendationEngine::recommend`].

mod rates;
mod recommend;
mod scoring;
mod types;

pub use rates::{application_quantity, rate_per_acre};
pub use recommend::{assemble_recommendation, RecommendationEngine};
pub use scoring::score_fertilizer;
pub use types::{
    AlternativeRecommendation, PrimaryRecommendation, RecommendationRequest, RecommendationResult,
    ScoredCandidate,
};

/// Score every candidate starts from, before penalties.
pub const BASE_SCORE: f64 = 100.0;

/// Penalty per unit of L1 distance between crop and product NPK ratios.
pub const RATIO_PENALTY_PER_UNIT: f64 = 30.0;

/// Ceiling on the nutrient-ratio penalty; one badly mismatched nutrient must
/// not collapse the whole score.
pub const MAX_RATIO_PENALTY: f64 = 60.0;

/// Ceiling on the over-budget price penalty.
pub const MAX_BUDGET_PENALTY: f64 = 40.0;

/// Application rate assumed when no keyword in the rate table matches
/// (kg per acre).
pub const DEFAULT_RATE_PER_ACRE: u32 = 50;

/// Nominal rate used to derive a per-kg price ceiling from a total budget,
/// independent of the per-product rates in the rate table.
pub const NOMINAL_RATE_PER_ACRE: u32 = 50;

/// Bag size behind the bag-count display figure.
pub const BAG_SIZE_KG: u32 = 50;

/// Alternatives returned beside the primary recommendation.
pub const MAX_ALTERNATIVES: usize = 3;
