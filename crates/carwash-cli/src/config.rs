//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `CARWASH__API__BASE_URL`, `CARWASH__OUTPUT__NO_COLOR`, ...
//! 3. Config file (`--config`, else `./carwash.toml` over the platform file)
//! 4. Built-in defaults (always present)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use carwash_adapters::{DEFAULT_BASE_URL, HttpConfig};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "CARWASH";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote API settings.
    pub api: ApiConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.into(),
                timeout_secs: 30,
            },
            output: OutputConfig {
                no_color: false,
                format: "auto".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config files and the environment.
    ///
    /// An explicit `config_file` must exist and replaces both default
    /// locations. Otherwise the platform file and then `./carwash.toml` are
    /// read when present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let files = match config_file {
            Some(path) => vec![(path.clone(), true)],
            None => vec![
                (Self::config_path(), false),
                (PathBuf::from(Self::LOCAL_FILE), false),
            ],
        };
        Self::load_from(&files, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(files: &[(PathBuf, bool)], env: Environment) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("Invalid built-in defaults")?;

        let mut builder = Config::builder().add_source(defaults);
        for (path, required) in files {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(*required),
            );
        }

        let config = builder
            .add_source(env.separator("__").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `carwash.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "mrcarwash", "carwash")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(Self::LOCAL_FILE))
    }

    /// File name used by `carwash init --local`.
    pub const LOCAL_FILE: &'static str = "carwash.toml";

    /// Settings for the REST gateway.
    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }

    /// Value of a dotted key, as `config get` prints it.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.timeout_secs" => Some(self.api.timeout_secs.to_string()),
            "output.no_color" => Some(self.output.no_color.to_string()),
            "output.format" => Some(self.output.format.clone()),
            _ => None,
        }
    }

    pub const KEYS: [&'static str; 4] = [
        "api.base_url",
        "api.timeout_secs",
        "output.no_color",
        "output.format",
    ];

    /// The settings as a TOML document, the format `init` writes.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()))
    }

    fn required(file: &tempfile::NamedTempFile) -> Vec<(PathBuf, bool)> {
        vec![(file.path().to_path_buf(), true)]
    }

    fn write_toml(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_points_at_remote_api() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.http().timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let files = vec![(PathBuf::from("/nonexistent/carwash.toml"), false)];
        let cfg = AppConfig::load_from(&files, no_env()).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let files = vec![(PathBuf::from("/nonexistent/carwash.toml"), true)];
        assert!(AppConfig::load_from(&files, no_env()).is_err());
    }

    #[test]
    fn file_overrides_defaults_per_key() {
        let file = write_toml("[api]\nbase_url = \"http://localhost:3000/api\"\n");
        let cfg = AppConfig::load_from(&required(&file), no_env()).unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:3000/api");
        assert_eq!(cfg.api.timeout_secs, 30);
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_toml("[api]\ntimeout_secs = 5\n");
        let env = Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::from([
            ("CARWASH__API__TIMEOUT_SECS".to_string(), "9".to_string()),
            ("CARWASH__OUTPUT__NO_COLOR".to_string(), "true".to_string()),
        ])));
        let cfg = AppConfig::load_from(&required(&file), env).unwrap();
        assert_eq!(cfg.api.timeout_secs, 9);
        assert!(cfg.output.no_color);
    }

    #[test]
    fn later_files_override_earlier_ones() {
        let platform = write_toml("[api]\nbase_url = \"http://a/api\"\ntimeout_secs = 7\n");
        let local = write_toml("[api]\nbase_url = \"http://b/api\"\n");
        let files = vec![
            (platform.path().to_path_buf(), false),
            (local.path().to_path_buf(), false),
        ];
        let cfg = AppConfig::load_from(&files, no_env()).unwrap();
        assert_eq!(cfg.api.base_url, "http://b/api");
        assert_eq!(cfg.api.timeout_secs, 7);
    }

    #[test]
    fn every_key_is_gettable() {
        let cfg = AppConfig::default();
        for key in AppConfig::KEYS {
            assert!(cfg.get(key).is_some(), "{key}");
        }
        assert_eq!(cfg.get("output.no_color").as_deref(), Some("false"));
        assert!(cfg.get("does.not.exist").is_none());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let file = write_toml(&text);
        let cfg = AppConfig::load_from(&required(&file), no_env()).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }
}
