//! Deterministic reference catalog seeds and their verification contract.

use sqlx::Executor;

use shamba_core::catalog::CatalogError;

use crate::DbPool;

const SEED_CROP_NAMES: &[&str] = &["Maize", "Beans", "Potatoes", "Tomatoes", "Wheat"];

const SEED_SOIL_TYPES: &[&str] = &["Clay", "Loam", "Sandy"];

const SEED_FERTILIZER_NAMES: &[&str] = &[
    "DAP 18:46:0",
    "CAN 26:0:0",
    "NPK 17:17:17",
    "NPK 23:23:0",
    "Urea 46:0:0",
    "TSP 0:46:0",
    "Manure",
    "Compost",
];

/// Outcome of a seed load: how many records each table received.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub crops: usize,
    pub soils: usize,
    pub fertilizers: usize,
}

/// Per-check verification outcome for the seed contract.
#[derive(Clone, Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

/// The default catalog the system ships with: 5 crops, 3 soils, 8 fertilizer
/// products.
pub struct ReferenceCatalog;

impl ReferenceCatalog {
    /// SQL fixture content for the reference dataset.
    pub const SQL: &str = include_str!("../../../config/fixtures/reference_catalog.sql");

    /// Load the reference dataset. Product names carry no unique constraint,
    /// so reseeding first deletes the seed rows by name inside the same
    /// transaction; user-added records are untouched.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, CatalogError> {
        let mut tx = pool.begin().await.map_err(backend_error)?;

        for statement in delete_statements() {
            tx.execute(sqlx::query(&statement)).await.map_err(backend_error)?;
        }
        tx.execute(sqlx::query(Self::SQL)).await.map_err(backend_error)?;

        tx.commit().await.map_err(backend_error)?;

        Ok(SeedResult {
            crops: SEED_CROP_NAMES.len(),
            soils: SEED_SOIL_TYPES.len(),
            fertilizers: SEED_FERTILIZER_NAMES.len(),
        })
    }

    /// Verify the seed contract: every seeded record is present exactly once.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, CatalogError> {
        let mut checks = Vec::new();

        checks.push((
            "crops_seeded",
            count_named(pool, "crops", "crop_name", SEED_CROP_NAMES).await?
                == SEED_CROP_NAMES.len() as i64,
        ));
        checks.push((
            "soils_seeded",
            count_named(pool, "soils", "soil_type", SEED_SOIL_TYPES).await?
                == SEED_SOIL_TYPES.len() as i64,
        ));
        checks.push((
            "fertilizers_seeded",
            count_named(pool, "fertilizers", "product_name", SEED_FERTILIZER_NAMES).await?
                == SEED_FERTILIZER_NAMES.len() as i64,
        ));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }

    /// Remove the seed rows, leaving any user-added records in place.
    pub async fn clean(pool: &DbPool) -> Result<(), CatalogError> {
        let mut tx = pool.begin().await.map_err(backend_error)?;
        for statement in delete_statements() {
            tx.execute(sqlx::query(&statement)).await.map_err(backend_error)?;
        }
        tx.commit().await.map_err(backend_error)
    }
}

fn delete_statements() -> [String; 3] {
    [
        format!("DELETE FROM crops WHERE crop_name IN ({})", sql_name_list(SEED_CROP_NAMES)),
        format!("DELETE FROM soils WHERE soil_type IN ({})", sql_name_list(SEED_SOIL_TYPES)),
        format!(
            "DELETE FROM fertilizers WHERE product_name IN ({})",
            sql_name_list(SEED_FERTILIZER_NAMES)
        ),
    ]
}

// The name lists are compile-time constants without quotes; no escaping is
// needed beyond wrapping.
fn sql_name_list(names: &[&str]) -> String {
    names.iter().map(|name| format!("'{name}'")).collect::<Vec<_>>().join(", ")
}

async fn count_named(
    pool: &DbPool,
    table: &'static str,
    column: &'static str,
    names: &[&str],
) -> Result<i64, CatalogError> {
    let statement =
        format!("SELECT COUNT(*) FROM {table} WHERE {column} IN ({})", sql_name_list(names));
    sqlx::query_scalar(&statement).fetch_one(pool).await.map_err(backend_error)
}

fn backend_error(error: sqlx::Error) -> CatalogError {
    CatalogError::Backend(error.to_string())
}
