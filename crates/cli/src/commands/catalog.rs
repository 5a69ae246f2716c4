use serde::Serialize;

use shamba_core::catalog::{CatalogError, CatalogReader};
use shamba_core::config::{AppConfig, LoadOptions};
use shamba_core::domain::{CropProfile, FertilizerProduct, SoilProfile};
use shamba_db::{connect_with_settings, CatalogStats, SqlCatalog};

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct CatalogListing {
    stats: CatalogStats,
    crops: Vec<CropProfile>,
    soils: Vec<SoilProfile>,
    fertilizers: Vec<FertilizerProduct>,
}

pub fn run(json_output: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    crate::init_logging(&config.logging);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let catalog = SqlCatalog::new(pool.clone());
        let listing = load_listing(&catalog)
            .await
            .map_err(|error| ("catalog_unavailable", error.to_string(), 5u8));

        pool.close().await;
        listing
    });

    match result {
        Ok(listing) => {
            let output = if json_output {
                serde_json::to_string_pretty(&listing).unwrap_or_else(|error| {
                    format!("{{\"error\":\"serialization failed: {error}\"}}")
                })
            } else {
                render_human(&listing)
            };
            CommandResult { exit_code: 0, output }
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("catalog", error_class, message, exit_code)
        }
    }
}

async fn load_listing(catalog: &SqlCatalog) -> Result<CatalogListing, CatalogError> {
    Ok(CatalogListing {
        stats: catalog.stats().await?,
        crops: catalog.list_all_crops().await?,
        soils: catalog.list_all_soils().await?,
        fertilizers: catalog.list_all_fertilizers().await?,
    })
}

fn render_human(listing: &CatalogListing) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Catalog: {} crops, {} soil types, {} fertilizers",
        listing.stats.crops, listing.stats.soils, listing.stats.fertilizers
    ));

    lines.push(String::new());
    lines.push("CROPS".to_string());
    for crop in &listing.crops {
        lines.push(format!(
            "  - {} (N{} P{} K{})",
            crop.name,
            crop.nitrogen_requirement,
            crop.phosphorus_requirement,
            crop.potassium_requirement
        ));
    }

    lines.push(String::new());
    lines.push("SOIL TYPES".to_string());
    for soil in &listing.soils {
        let ph = soil.ph_range.as_deref().unwrap_or("unknown pH");
        lines.push(format!("  - {} (pH {ph})", soil.soil_type));
    }

    lines.push(String::new());
    lines.push("FERTILIZERS".to_string());
    for product in &listing.fertilizers {
        lines.push(format!(
            "  - {} (NPK {}) @ KES {}/kg",
            product.product_name,
            product.npk(),
            product.price_per_kg
        ));
    }

    lines.join("\n")
}
