use shamba_core::config::{AppConfig, LoadOptions};
use shamba_db::{connect_with_settings, migrations, ReferenceCatalog, SeedResult};

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
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
                "seed",
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

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let seeded = ReferenceCatalog::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verification = ReferenceCatalog::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        let run_result: Result<SeedResult, (&'static str, String, u8)> =
            if verification.all_present {
                Ok(seeded)
            } else {
                let failed_checks = verification
                    .checks
                    .iter()
                    .filter_map(|(check, passed)| (!passed).then_some(*check))
                    .collect::<Vec<_>>();
                Err((
                    "seed_verification",
                    format!("seed verification failed for checks: {}", failed_checks.join(", ")),
                    6u8,
                ))
            };

        pool.close().await;
        run_result
    });

    match result {
        Ok(seeded) => {
            tracing::info!(
                event_name = "catalog.seeded",
                crops = seeded.crops,
                soils = seeded.soils,
                fertilizers = seeded.fertilizers,
                "reference catalog seeded"
            );
            CommandResult::success(
                "seed",
                format!(
                    "reference catalog seeded: {} crops, {} soils, {} fertilizers",
                    seeded.crops, seeded.soils, seeded.fertilizers
                ),
            )
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}
