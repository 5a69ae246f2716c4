use std::sync::Arc;

use rust_decimal::Decimal;

use shamba_core::config::{AppConfig, LoadOptions};
use shamba_core::engine::{RecommendationEngine, RecommendationRequest, RecommendationResult};
use shamba_db::{connect_with_settings, SqlCatalog};

use crate::commands::CommandResult;

pub fn run(
    crop: &str,
    soil: &str,
    acres: Decimal,
    budget: Option<Decimal>,
    json_output: bool,
) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
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
                "recommend",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let mut request = RecommendationRequest::new(crop, soil, acres);
    if let Some(budget) = budget {
        request = request.with_budget(budget);
    }

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let engine = RecommendationEngine::new(Arc::new(SqlCatalog::new(pool.clone())));
        let outcome = engine.recommend(&request).await.map_err(|error| {
            // Missing catalog records are caller input problems; everything
            // else is an operational fault.
            let exit_code = if error.is_not_found() { 6u8 } else { 5u8 };
            (error.error_class(), error.to_string(), exit_code)
        });

        pool.close().await;
        outcome
    });

    match result {
        Ok(recommendation) => {
            tracing::info!(
                event_name = "recommendation.generated",
                crop = %recommendation.crop,
                soil = %recommendation.soil,
                primary = %recommendation.primary_recommendation.fertilizer_name,
                within_budget = recommendation.within_budget,
                "recommendation generated"
            );
            let output = if json_output {
                serde_json::to_string_pretty(&recommendation).unwrap_or_else(|error| {
                    format!("{{\"error\":\"serialization failed: {error}\"}}")
                })
            } else {
                render_human(&recommendation)
            };
            CommandResult { exit_code: 0, output }
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("recommend", error_class, message, exit_code)
        }
    }
}

fn render_human(result: &RecommendationResult) -> String {
    let primary = &result.primary_recommendation;
    let mut lines = Vec::new();

    lines.push(format!(
        "Crop: {} | Soil: {} | Farm: {} acres",
        result.crop, result.soil, result.farm_size_acres
    ));
    if let Some(budget) = result.budget_total {
        lines.push(format!("Budget: KES {}", format_thousands(budget)));
    }
    lines.push(String::new());

    lines.push("TOP RECOMMENDATION".to_string());
    lines.push(format!("  {} (NPK {})", primary.fertilizer_name, primary.npk));
    lines.push(format!(
        "  Quantity: {} kg ({} bags of 50 kg)",
        format_thousands(primary.quantity_kg),
        primary.quantity_bags
    ));
    lines.push(format!(
        "  Total cost: KES {} (KES {} per acre)",
        format_thousands(primary.total_cost),
        format_thousands(primary.cost_per_acre)
    ));
    lines.push(format!("  Unit price: KES {}/kg", format_thousands(primary.price_per_kg)));
    lines.push(format!("  Match score: {}", primary.score));
    lines.push(format!("  Within budget: {}", if result.within_budget { "yes" } else { "no" }));
    if let Some(notes) = &primary.application_notes {
        lines.push(format!("  Notes: {notes}"));
    }

    if !result.alternatives.is_empty() {
        lines.push(String::new());
        lines.push("ALTERNATIVES".to_string());
        for (index, alt) in result.alternatives.iter().enumerate() {
            lines.push(format!(
                "  {}. {} (NPK {}): {} kg, KES {}",
                index + 1,
                alt.fertilizer_name,
                alt.npk,
                format_thousands(alt.quantity_kg),
                format_thousands(alt.total_cost)
            ));
        }
    }

    lines.join("\n")
}

/// Thousands separators for display only; the engine emits plain decimals.
fn format_thousands(value: Decimal) -> String {
    let rendered = value.to_string();
    let (sign, digits) =
        rendered.strip_prefix('-').map_or(("", rendered.as_str()), |rest| ("-", rest));
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, ch) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
