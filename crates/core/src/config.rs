use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://shamba.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shamba.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHAMBA_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("SHAMBA_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("SHAMBA_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("SHAMBA_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("SHAMBA_DATABASE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("SHAMBA_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("SHAMBA_LOG_FORMAT") {
            self.logging.format =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "SHAMBA_LOG_FORMAT".to_string(),
                    value,
                })?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    if let Some(from_env) = read_env("SHAMBA_CONFIG") {
        let path = PathBuf::from(from_env);
        return path.exists().then_some(path);
    }

    [PathBuf::from("shamba.toml"), PathBuf::from("config/shamba.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    const KNOWN_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
    let level = logging.level.trim().to_ascii_lowercase();
    if !KNOWN_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Validation(format!(
            "logging.level must be one of trace|debug|info|warn|error, got `{}`",
            logging.level
        )));
    }

    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    const MANAGED_VARS: &[&str] = &[
        "SHAMBA_CONFIG",
        "SHAMBA_DATABASE_URL",
        "SHAMBA_DATABASE_MAX_CONNECTIONS",
        "SHAMBA_DATABASE_TIMEOUT_SECS",
        "SHAMBA_LOG_LEVEL",
        "SHAMBA_LOG_FORMAT",
    ];

    fn clear_managed_vars() {
        for var in MANAGED_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults_validate() {
        let _guard = env_lock().lock().expect("env lock");
        clear_managed_vars();

        let config = AppConfig::load(LoadOptions::default()).expect("load defaults");
        assert_eq!(config.database.url, "sqlite://shamba.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn file_patch_overrides_defaults() {
        let _guard = env_lock().lock().expect("env lock");
        clear_managed_vars();

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("shamba.toml");
        fs::write(
            &path,
            r#"
[database]
url = "sqlite://catalog.db"
max_connections = 2

[logging]
level = "debug"
format = "json"
"#,
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(path),
            ..LoadOptions::default()
        })
        .expect("load from file");

        assert_eq!(config.database.url, "sqlite://catalog.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.database.timeout_secs, 30);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn env_overrides_beat_the_file() {
        let _guard = env_lock().lock().expect("env lock");
        clear_managed_vars();

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("shamba.toml");
        fs::write(&path, "[database]\nurl = \"sqlite://from-file.db\"\n").expect("write config");

        env::set_var("SHAMBA_DATABASE_URL", "sqlite::memory:");
        let config = AppConfig::load(LoadOptions {
            config_path: Some(path),
            ..LoadOptions::default()
        })
        .expect("load");
        clear_managed_vars();

        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn programmatic_overrides_beat_env() {
        let _guard = env_lock().lock().expect("env lock");
        clear_managed_vars();

        env::set_var("SHAMBA_DATABASE_URL", "sqlite://from-env.db");
        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("load");
        clear_managed_vars();

        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn file_supports_env_interpolation() {
        let _guard = env_lock().lock().expect("env lock");
        clear_managed_vars();

        env::set_var("TEST_SHAMBA_DB_FILE", "interpolated.db");
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("shamba.toml");
        fs::write(&path, "[database]\nurl = \"sqlite://${TEST_SHAMBA_DB_FILE}\"\n")
            .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(path),
            ..LoadOptions::default()
        })
        .expect("load");
        env::remove_var("TEST_SHAMBA_DB_FILE");

        assert_eq!(config.database.url, "sqlite://interpolated.db");
    }

    #[test]
    fn missing_interpolation_variable_is_an_error() {
        let _guard = env_lock().lock().expect("env lock");
        clear_managed_vars();
        env::remove_var("TEST_SHAMBA_ABSENT");

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("shamba.toml");
        fs::write(&path, "[database]\nurl = \"sqlite://${TEST_SHAMBA_ABSENT}\"\n")
            .expect("write config");

        let error = AppConfig::load(LoadOptions {
            config_path: Some(path),
            ..LoadOptions::default()
        })
        .expect_err("must fail");

        assert!(matches!(error, ConfigError::MissingEnvInterpolation { var } if var == "TEST_SHAMBA_ABSENT"));
    }

    #[test]
    fn non_sqlite_url_fails_validation() {
        let _guard = env_lock().lock().expect("env lock");
        clear_managed_vars();

        let error = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("postgres://localhost/shamba".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect_err("must fail");

        assert!(matches!(error, ConfigError::Validation(_)));
    }

    #[test]
    fn bad_env_number_is_an_invalid_override() {
        let _guard = env_lock().lock().expect("env lock");
        clear_managed_vars();

        env::set_var("SHAMBA_DATABASE_MAX_CONNECTIONS", "many");
        let error = AppConfig::load(LoadOptions::default()).expect_err("must fail");
        clear_managed_vars();

        assert!(matches!(
            error,
            ConfigError::InvalidEnvOverride { key, .. } if key == "SHAMBA_DATABASE_MAX_CONNECTIONS"
        ));
    }

    #[test]
    fn require_file_reports_the_missing_path() {
        let _guard = env_lock().lock().expect("env lock");
        clear_managed_vars();

        let error = AppConfig::load(LoadOptions {
            config_path: Some("does-not-exist.toml".into()),
            require_file: true,
            ..LoadOptions::default()
        })
        .expect_err("must fail");

        assert!(matches!(error, ConfigError::MissingConfigFile(path) if path.ends_with("does-not-exist.toml")));
    }
}
