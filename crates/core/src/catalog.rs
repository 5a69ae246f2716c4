//! Read-only port onto the reference catalog.
//!
//! The engine never talks to storage directly; it receives a
//! [`CatalogReader`] at construction time so a SQL-backed store and the
//! in-memory test double are interchangeable.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CropProfile, FertilizerProduct, SoilProfile};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog backend failure: {0}")]
    Backend(String),
    #[error("catalog record could not be decoded: {0}")]
    Decode(String),
}

/// Lookup operations the engine requires from the catalog store.
///
/// Name and type lookups are case-insensitive. The product listing returns
/// the whole catalog ordered by unit price, cheapest first; the engine
/// re-sorts, but tie-breaks in ranking inherit this order.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn find_crop_by_name(&self, name: &str) -> Result<Option<CropProfile>, CatalogError>;

    async fn find_soil_by_type(&self, soil_type: &str)
        -> Result<Option<SoilProfile>, CatalogError>;

    async fn list_all_fertilizers(&self) -> Result<Vec<FertilizerProduct>, CatalogError>;
}

/// Deterministic in-memory catalog, primarily a test double.
///
/// Holds immutable record sets; no interior mutability is needed because the
/// catalog contract is read-only.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    crops: Vec<CropProfile>,
    soils: Vec<SoilProfile>,
    fertilizers: Vec<FertilizerProduct>,
}

impl InMemoryCatalog {
    pub fn new(
        crops: Vec<CropProfile>,
        soils: Vec<SoilProfile>,
        fertilizers: Vec<FertilizerProduct>,
    ) -> Self {
        Self { crops, soils, fertilizers }
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn find_crop_by_name(&self, name: &str) -> Result<Option<CropProfile>, CatalogError> {
        Ok(self.crops.iter().find(|crop| crop.name.eq_ignore_ascii_case(name)).cloned())
    }

    async fn find_soil_by_type(
        &self,
        soil_type: &str,
    ) -> Result<Option<SoilProfile>, CatalogError> {
        Ok(self
            .soils
            .iter()
            .find(|soil| soil.soil_type.eq_ignore_ascii_case(soil_type))
            .cloned())
    }

    async fn list_all_fertilizers(&self) -> Result<Vec<FertilizerProduct>, CatalogError> {
        let mut listing = self.fertilizers.clone();
        listing.sort_by(|a, b| a.price_per_kg.cmp(&b.price_per_kg));
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{CatalogReader, InMemoryCatalog};
    use crate::domain::{CropProfile, FertilizerProduct};

    fn crop(name: &str) -> CropProfile {
        CropProfile {
            name: name.to_owned(),
            nitrogen_requirement: 120.0,
            phosphorus_requirement: 60.0,
            potassium_requirement: 60.0,
            growth_stages: None,
            description: None,
        }
    }

    fn product(name: &str, price: i64) -> FertilizerProduct {
        FertilizerProduct {
            product_name: name.to_owned(),
            nitrogen_content: 10.0,
            phosphorus_content: 10.0,
            potassium_content: 10.0,
            price_per_kg: Decimal::from(price),
            availability: None,
            application_notes: None,
        }
    }

    #[tokio::test]
    async fn crop_lookup_is_case_insensitive() {
        let catalog = InMemoryCatalog::new(vec![crop("Maize")], Vec::new(), Vec::new());

        let found = catalog.find_crop_by_name("mAiZe").await.expect("lookup");
        assert_eq!(found.expect("present").name, "Maize");

        let missing = catalog.find_crop_by_name("Rice").await.expect("lookup");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn listing_orders_by_unit_price() {
        let catalog = InMemoryCatalog::new(
            Vec::new(),
            Vec::new(),
            vec![product("DAP 18:46:0", 120), product("Compost", 15), product("Urea 46:0:0", 85)],
        );

        let listing = catalog.list_all_fertilizers().await.expect("listing");
        let names: Vec<&str> = listing.iter().map(|f| f.product_name.as_str()).collect();
        assert_eq!(names, ["Compost", "Urea 46:0:0", "DAP 18:46:0"]);
    }
}
