//! Application-rate model: product identity to kg-per-acre dosage.

use rust_decimal::Decimal;

use super::DEFAULT_RATE_PER_ACRE;

/// Standard application rates in kg per acre, scanned in this order; the
/// first keyword found in the product name wins. Organic amendments go on at
/// bulk rates because their nutrient share per kg is low.
const STANDARD_RATES: &[(&str, u32)] = &[
    ("DAP", 50),
    ("CAN", 50),
    ("NPK", 50),
    ("Urea", 50),
    ("TSP", 50),
    ("Manure", 2000),
    ("Compost", 2000),
];

/// Resolve the per-acre rate for a product by case-insensitive keyword
/// substring match, falling back to [`DEFAULT_RATE_PER_ACRE`].
///
/// The scan order and substring semantics are observable contract: two
/// products sharing a keyword get the same rate regardless of NPK content.
pub fn rate_per_acre(product_name: &str) -> Decimal {
    let haystack = product_name.to_ascii_uppercase();
    let rate = STANDARD_RATES
        .iter()
        .find(|(keyword, _)| haystack.contains(&keyword.to_ascii_uppercase()))
        .map_or(DEFAULT_RATE_PER_ACRE, |(_, rate)| *rate);
    Decimal::from(rate)
}

/// Total quantity for a farm. Farm size is not validated here; a zero or
/// negative size propagates as a zero or negative quantity.
pub fn application_quantity(product_name: &str, farm_size_acres: Decimal) -> Decimal {
    rate_per_acre(product_name) * farm_size_acres
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{application_quantity, rate_per_acre};

    #[test]
    fn mineral_products_resolve_to_fifty() {
        for name in ["DAP 18:46:0", "CAN 26:0:0", "NPK 17:17:17", "Urea 46:0:0", "TSP 0:46:0"] {
            assert_eq!(rate_per_acre(name), Decimal::from(50), "{name}");
        }
    }

    #[test]
    fn organic_amendments_resolve_to_bulk_rate() {
        assert_eq!(rate_per_acre("Well-rotted manure"), Decimal::from(2000));
        assert_eq!(rate_per_acre("COMPOST"), Decimal::from(2000));
    }

    #[test]
    fn unknown_products_use_the_default_rate() {
        assert_eq!(rate_per_acre("Rock Phosphate"), Decimal::from(50));
    }

    #[test]
    fn first_keyword_in_scan_order_wins() {
        // "NPK" sits before "Compost" in the table, so a blended name takes
        // the mineral rate.
        assert_eq!(rate_per_acre("NPK compost blend"), Decimal::from(50));
    }

    #[test]
    fn substring_match_can_misfire_on_unrelated_names() {
        // "sugarCANe" contains "CAN"; the heuristic classifies it as a
        // mineral fertilizer. Documented fragility, not a bug to fix here.
        assert_eq!(rate_per_acre("Sugarcane booster"), Decimal::from(50));
    }

    #[test]
    fn quantity_scales_by_farm_size() {
        assert_eq!(application_quantity("Urea 46:0:0", Decimal::from(2)), Decimal::from(100));
        assert_eq!(application_quantity("Manure", Decimal::from(2)), Decimal::from(4000));
    }

    #[test]
    fn degenerate_farm_sizes_propagate() {
        assert_eq!(application_quantity("Urea 46:0:0", Decimal::ZERO), Decimal::ZERO);
        assert_eq!(application_quantity("Urea 46:0:0", Decimal::from(-1)), Decimal::from(-50));
    }
}
