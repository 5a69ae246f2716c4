use serde::Serialize;

use shamba_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Serialize)]
struct ConfigReport {
    database: DatabaseReport,
    logging: LoggingReport,
}

#[derive(Debug, Serialize)]
struct DatabaseReport {
    url: String,
    max_connections: u32,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct LoggingReport {
    level: String,
    format: LogFormat,
}

/// Render the effective configuration after file, env, and override layers.
/// There are no secrets in this configuration, so nothing needs redaction.
pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return format!(
                "{{\"status\":\"error\",\"error_class\":\"config_validation\",\"message\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            );
        }
    };

    let report = ConfigReport {
        database: DatabaseReport {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            timeout_secs: config.database.timeout_secs,
        },
        logging: LoggingReport {
            level: config.logging.level.clone(),
            format: config.logging.format,
        },
    };

    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|error| format!("{{\"error\":\"serialization failed: {error}\"}}"))
}
