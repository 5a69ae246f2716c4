use std::env;
use std::sync::{Mutex, OnceLock};

use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;

use shamba_cli::commands::{config, doctor, migrate, recommend, seed};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const MANAGED_VARS: &[&str] = &[
    "SHAMBA_CONFIG",
    "SHAMBA_DATABASE_URL",
    "SHAMBA_DATABASE_MAX_CONNECTIONS",
    "SHAMBA_DATABASE_TIMEOUT_SECS",
    "SHAMBA_LOG_LEVEL",
    "SHAMBA_LOG_FORMAT",
];

fn with_env(vars: &[(&str, &str)], test: impl FnOnce()) {
    let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env lock");

    for var in MANAGED_VARS {
        env::remove_var(var);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test();

    for var in MANAGED_VARS {
        env::remove_var(var);
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output must be JSON")
}

fn file_database() -> (TempDir, String) {
    let dir = TempDir::new().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("catalog.db").display());
    (dir, url)
}

#[test]
fn migrate_succeeds_against_in_memory_database() {
    with_env(&[("SHAMBA_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "output: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_fails_fast_on_invalid_configuration() {
    with_env(&[("SHAMBA_DATABASE_URL", "postgres://nope")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_then_recommend_round_trips_through_a_file_database() {
    let (_dir, url) = file_database();
    with_env(&[("SHAMBA_DATABASE_URL", &url)], || {
        let seeded = seed::run();
        assert_eq!(seeded.exit_code, 0, "output: {}", seeded.output);
        let payload = parse_payload(&seeded.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");

        let human = recommend::run(
            "Maize",
            "Loam",
            Decimal::from(2),
            Some(Decimal::from(10_000)),
            false,
        );
        assert_eq!(human.exit_code, 0, "output: {}", human.output);
        assert!(human.output.contains("TOP RECOMMENDATION"));
        assert!(human.output.contains("Urea 46:0:0"));
        assert!(human.output.contains("Within budget: yes"));

        let json = recommend::run("Maize", "Loam", Decimal::from(2), None, true);
        assert_eq!(json.exit_code, 0, "output: {}", json.output);
        let recommendation = parse_payload(&json.output);
        assert_eq!(recommendation["crop"], "Maize");
        assert_eq!(recommendation["soil"], "Loam");
        assert_eq!(recommendation["within_budget"], true);
        assert!(recommendation.get("budget_total").is_none());
    });
}

#[test]
fn unknown_crop_maps_to_a_not_found_failure() {
    let (_dir, url) = file_database();
    with_env(&[("SHAMBA_DATABASE_URL", &url)], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = recommend::run("Rice", "Loam", Decimal::from(2), None, false);
        assert_eq!(result.exit_code, 6, "output: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "crop_not_found");
    });
}

#[test]
fn recommend_without_schema_reports_catalog_unavailable() {
    with_env(&[("SHAMBA_DATABASE_URL", "sqlite::memory:")], || {
        let result = recommend::run("Maize", "Loam", Decimal::from(2), None, false);
        assert_eq!(result.exit_code, 5, "output: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "catalog_unavailable");
    });
}

#[test]
fn doctor_reports_pass_for_a_seeded_catalog() {
    let (_dir, url) = file_database();
    with_env(&[("SHAMBA_DATABASE_URL", &url)], || {
        assert_eq!(seed::run().exit_code, 0);

        let report = parse_payload(&doctor::run(true));
        assert_eq!(report["overall_status"], "pass", "report: {report}");
        assert_eq!(report["checks"].as_array().expect("checks").len(), 3);
    });
}

#[test]
fn doctor_flags_an_unseeded_catalog() {
    let (_dir, url) = file_database();
    with_env(&[("SHAMBA_DATABASE_URL", &url)], || {
        assert_eq!(migrate::run().exit_code, 0);

        let report = parse_payload(&doctor::run(true));
        assert_eq!(report["overall_status"], "fail");

        let readiness = report["checks"]
            .as_array()
            .expect("checks")
            .iter()
            .find(|check| check["name"] == "catalog_readiness")
            .expect("readiness check present");
        assert_eq!(readiness["status"], "fail");
    });
}

#[test]
fn config_renders_effective_values() {
    with_env(&[("SHAMBA_DATABASE_URL", "sqlite::memory:")], || {
        let report = parse_payload(&config::run());
        assert_eq!(report["database"]["url"], "sqlite::memory:");
        assert_eq!(report["logging"]["level"], "info");
    });
}
