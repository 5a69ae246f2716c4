//! SQLite-backed implementation of the core catalog port.

use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row};

use shamba_core::catalog::{CatalogError, CatalogReader};
use shamba_core::domain::{CropProfile, FertilizerProduct, SoilProfile};

use crate::DbPool;

/// Read-only catalog accessor over the `crops`/`soils`/`fertilizers` tables.
///
/// Prices are stored as REAL and decoded through a TEXT cast into `Decimal`
/// to keep monetary arithmetic exact downstream.
pub struct SqlCatalog {
    pool: DbPool,
}

impl SqlCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// All crops, alphabetical. Listing support for the CLI; the engine only
    /// ever looks crops up by name.
    pub async fn list_all_crops(&self) -> Result<Vec<CropProfile>, CatalogError> {
        let rows = sqlx::query(
            r#"
            SELECT crop_name, nitrogen_requirement, phosphorus_requirement,
                   potassium_requirement, growth_stages, description
            FROM crops
            ORDER BY crop_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend_error)?;

        rows.iter().map(decode_crop).collect()
    }

    pub async fn list_all_soils(&self) -> Result<Vec<SoilProfile>, CatalogError> {
        let rows = sqlx::query(
            r#"
            SELECT soil_type, ph_range, water_retention, characteristics, description
            FROM soils
            ORDER BY soil_type
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend_error)?;

        rows.iter().map(decode_soil).collect()
    }

    /// Row counts per table, for readiness checks and the CLI summary.
    pub async fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let crops = self.count("crops").await?;
        let soils = self.count("soils").await?;
        let fertilizers = self.count("fertilizers").await?;
        Ok(CatalogStats { crops, soils, fertilizers })
    }

    async fn count(&self, table: &'static str) -> Result<i64, CatalogError> {
        // `table` is one of our own fixed table names, never user input.
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .map_err(backend_error)
    }
}

#[async_trait]
impl CatalogReader for SqlCatalog {
    async fn find_crop_by_name(&self, name: &str) -> Result<Option<CropProfile>, CatalogError> {
        let row = sqlx::query(
            r#"
            SELECT crop_name, nitrogen_requirement, phosphorus_requirement,
                   potassium_requirement, growth_stages, description
            FROM crops
            WHERE LOWER(crop_name) = LOWER(?)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        row.as_ref().map(decode_crop).transpose()
    }

    async fn find_soil_by_type(
        &self,
        soil_type: &str,
    ) -> Result<Option<SoilProfile>, CatalogError> {
        let row = sqlx::query(
            r#"
            SELECT soil_type, ph_range, water_retention, characteristics, description
            FROM soils
            WHERE LOWER(soil_type) = LOWER(?)
            "#,
        )
        .bind(soil_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        row.as_ref().map(decode_soil).transpose()
    }

    async fn list_all_fertilizers(&self) -> Result<Vec<FertilizerProduct>, CatalogError> {
        let rows = sqlx::query(
            r#"
            SELECT product_name, nitrogen_content, phosphorus_content, potassium_content,
                   CAST(price_per_kg AS TEXT) AS price_per_kg_text,
                   availability, application_notes
            FROM fertilizers
            ORDER BY price_per_kg
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend_error)?;

        rows.iter().map(decode_fertilizer).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub crops: i64,
    pub soils: i64,
    pub fertilizers: i64,
}

fn decode_crop(row: &SqliteRow) -> Result<CropProfile, CatalogError> {
    Ok(CropProfile {
        name: row.try_get("crop_name").map_err(decode_error)?,
        nitrogen_requirement: row.try_get("nitrogen_requirement").map_err(decode_error)?,
        phosphorus_requirement: row.try_get("phosphorus_requirement").map_err(decode_error)?,
        potassium_requirement: row.try_get("potassium_requirement").map_err(decode_error)?,
        growth_stages: parse_json_column(
            row.try_get("growth_stages").map_err(decode_error)?,
            "growth_stages",
        )?,
        description: row.try_get("description").map_err(decode_error)?,
    })
}

fn decode_soil(row: &SqliteRow) -> Result<SoilProfile, CatalogError> {
    Ok(SoilProfile {
        soil_type: row.try_get("soil_type").map_err(decode_error)?,
        ph_range: row.try_get("ph_range").map_err(decode_error)?,
        water_retention: row.try_get("water_retention").map_err(decode_error)?,
        characteristics: parse_json_column(
            row.try_get("characteristics").map_err(decode_error)?,
            "characteristics",
        )?,
        description: row.try_get("description").map_err(decode_error)?,
    })
}

fn decode_fertilizer(row: &SqliteRow) -> Result<FertilizerProduct, CatalogError> {
    let price_text: String = row.try_get("price_per_kg_text").map_err(decode_error)?;
    let price_per_kg = Decimal::from_str(&price_text).map_err(|error| {
        CatalogError::Decode(format!("price_per_kg `{price_text}` is not a decimal: {error}"))
    })?;

    Ok(FertilizerProduct {
        product_name: row.try_get("product_name").map_err(decode_error)?,
        nitrogen_content: row.try_get("nitrogen_content").map_err(decode_error)?,
        phosphorus_content: row.try_get("phosphorus_content").map_err(decode_error)?,
        potassium_content: row.try_get("potassium_content").map_err(decode_error)?,
        price_per_kg,
        availability: row.try_get("availability").map_err(decode_error)?,
        application_notes: row.try_get("application_notes").map_err(decode_error)?,
    })
}

fn parse_json_column(
    raw: Option<String>,
    column: &'static str,
) -> Result<Option<serde_json::Value>, CatalogError> {
    raw.map(|text| {
        serde_json::from_str(&text)
            .map_err(|error| CatalogError::Decode(format!("invalid JSON in `{column}`: {error}")))
    })
    .transpose()
}

fn backend_error(error: sqlx::Error) -> CatalogError {
    CatalogError::Backend(error.to_string())
}

fn decode_error(error: sqlx::Error) -> CatalogError {
    CatalogError::Decode(error.to_string())
}
