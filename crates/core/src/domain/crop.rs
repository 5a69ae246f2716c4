use serde::{Deserialize, Serialize};

/// A crop's nutrient demand profile as stored in the reference catalog.
///
/// Requirements are relative "parts", not absolute mass; only their
/// proportions matter to scoring. Records are read-only to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    pub name: String,
    pub nitrogen_requirement: f64,
    pub phosphorus_requirement: f64,
    pub potassium_requirement: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_stages: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CropProfile {
    pub fn total_requirement(&self) -> f64 {
        self.nitrogen_requirement + self.phosphorus_requirement + self.potassium_requirement
    }

    /// N/P/K demand normalized to sum 1. `None` when total demand is not
    /// positive, so callers never divide by zero.
    pub fn npk_ratios(&self) -> Option<[f64; 3]> {
        let total = self.total_requirement();
        if total <= 0.0 {
            return None;
        }
        Some([
            self.nitrogen_requirement / total,
            self.phosphorus_requirement / total,
            self.potassium_requirement / total,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::CropProfile;

    fn crop(n: f64, p: f64, k: f64) -> CropProfile {
        CropProfile {
            name: "Maize".to_owned(),
            nitrogen_requirement: n,
            phosphorus_requirement: p,
            potassium_requirement: k,
            growth_stages: None,
            description: None,
        }
    }

    #[test]
    fn ratios_sum_to_one() {
        let ratios = crop(120.0, 60.0, 60.0).npk_ratios().expect("positive demand");
        assert_eq!(ratios, [0.5, 0.25, 0.25]);
        assert!((ratios.iter().sum::<f64>() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_demand_has_no_ratios() {
        assert_eq!(crop(0.0, 0.0, 0.0).npk_ratios(), None);
    }
}
