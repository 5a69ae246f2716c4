use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A fertilizer product from the reference catalog.
///
/// Nutrient contents are percentages by weight; they need not sum to 100
/// (the remainder is inert filler). Product names are not unique.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FertilizerProduct {
    pub product_name: String,
    pub nitrogen_content: f64,
    pub phosphorus_content: f64,
    pub potassium_content: f64,
    pub price_per_kg: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_notes: Option<String>,
}

impl FertilizerProduct {
    pub fn total_npk_content(&self) -> f64 {
        self.nitrogen_content + self.phosphorus_content + self.potassium_content
    }

    /// N/P/K content normalized to sum 1. `None` when the product declares no
    /// NPK content at all (tolerated, though a well-formed catalog has none).
    pub fn npk_ratios(&self) -> Option<[f64; 3]> {
        let total = self.total_npk_content();
        if total <= 0.0 {
            return None;
        }
        Some([
            self.nitrogen_content / total,
            self.phosphorus_content / total,
            self.potassium_content / total,
        ])
    }

    pub fn npk(&self) -> NpkTriple {
        NpkTriple {
            nitrogen: self.nitrogen_content,
            phosphorus: self.phosphorus_content,
            potassium: self.potassium_content,
        }
    }
}

/// The declared N-P-K composition of a product, echoed in recommendation
/// payloads as three numbers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NpkTriple {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl fmt::Display for NpkTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.nitrogen, self.phosphorus, self.potassium)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::FertilizerProduct;

    fn product(n: f64, p: f64, k: f64) -> FertilizerProduct {
        FertilizerProduct {
            product_name: "DAP 18:46:0".to_owned(),
            nitrogen_content: n,
            phosphorus_content: p,
            potassium_content: k,
            price_per_kg: Decimal::from(120),
            availability: None,
            application_notes: None,
        }
    }

    #[test]
    fn ratios_normalize_content() {
        let ratios = product(18.0, 46.0, 0.0).npk_ratios().expect("has content");
        assert!((ratios[0] - 18.0 / 64.0).abs() < 1e-12);
        assert!((ratios[1] - 46.0 / 64.0).abs() < 1e-12);
        assert_eq!(ratios[2], 0.0);
    }

    #[test]
    fn zero_content_has_no_ratios() {
        assert_eq!(product(0.0, 0.0, 0.0).npk_ratios(), None);
    }

    #[test]
    fn npk_label_renders_whole_numbers_bare() {
        assert_eq!(product(18.0, 46.0, 0.0).npk().to_string(), "18-46-0");
        assert_eq!(product(1.5, 1.0, 1.5).npk().to_string(), "1.5-1-1.5");
    }
}
