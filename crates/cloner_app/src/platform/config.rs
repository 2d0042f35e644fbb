//! Startup configuration: optional `cloner.ron`, overridden by CLI flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cloner_core::{ModelId, UnknownModel};
use cloner_engine::{Routes, ServiceSettings};
use cloner_logging::cloner_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cli::{Cli, LogTarget};

const CONFIG_FILENAME: &str = "cloner.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error(transparent)]
    Model(#[from] UnknownModel),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub scrape: String,
    pub generate: String,
    pub edit: String,
    pub latest_scraped: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        let routes = Routes::default();
        Self {
            scrape: routes.scrape,
            generate: routes.generate,
            edit: routes.edit,
            latest_scraped: routes.latest_scraped,
        }
    }
}

/// On-disk schema. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub routes: RoutesConfig,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// How long the raw page stays on screen after generation finishes.
    pub reveal_delay_ms: u64,
    pub model: String,
    pub download_dir: PathBuf,
    pub log: LogTarget,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let service = ServiceSettings::default();
        Self {
            backend_url: service.base_url,
            routes: RoutesConfig::default(),
            connect_timeout_secs: service.connect_timeout.as_secs(),
            request_timeout_secs: service.request_timeout.as_secs(),
            reveal_delay_ms: cloner_core::DEFAULT_REVEAL_DELAY.as_millis() as u64,
            model: ModelId::default().as_str().to_string(),
            download_dir: PathBuf::from("."),
            log: LogTarget::default(),
            log_file: PathBuf::from(cloner_logging::DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Loads `explicit`, or `./cloner.ron` if it exists, or the defaults.
    ///
    /// A missing explicit path is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILENAME);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|message| ConfigError::Parse {
            path: path.clone(),
            message,
        })?;
        cloner_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|err| err.to_string())
    }
}

/// Effective settings after applying CLI overrides.
#[derive(Debug, Clone)]
pub struct Settings {
    pub service: ServiceSettings,
    pub reveal_delay: Duration,
    pub model: ModelId,
    pub download_dir: PathBuf,
    pub log: LogTarget,
    pub log_file: PathBuf,
    pub initial_url: Option<String>,
}

impl Settings {
    pub fn resolve(config: AppConfig, cli: &Cli) -> Result<Self, ConfigError> {
        let model_text = cli.model.as_deref().unwrap_or(&config.model);
        let model: ModelId = model_text.parse()?;

        let service = ServiceSettings {
            base_url: cli.backend.clone().unwrap_or(config.backend_url),
            routes: Routes {
                scrape: config.routes.scrape,
                generate: config.routes.generate,
                edit: config.routes.edit,
                latest_scraped: config.routes.latest_scraped,
            },
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        };

        Ok(Self {
            service,
            reveal_delay: Duration::from_millis(config.reveal_delay_ms),
            model,
            download_dir: cli.download_dir.clone().unwrap_or(config.download_dir),
            log: cli.log.unwrap_or(config.log),
            log_file: config.log_file,
            initial_url: cli.url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(AppConfig::parse("()").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::parse(
            r#"(
                backend_url: "http://clone.internal:9000",
                routes: (edit: "/api/edit-html"),
                reveal_delay_ms: 0,
                log: Both,
            )"#,
        )
        .unwrap();
        assert_eq!(config.backend_url, "http://clone.internal:9000");
        assert_eq!(config.routes.edit, "/api/edit-html");
        assert_eq!(config.routes.scrape, "/api/scrape");
        assert_eq!(config.reveal_delay_ms, 0);
        assert_eq!(config.log, LogTarget::Both);
        assert_eq!(config.request_timeout_secs, 300);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(AppConfig::parse("(backend_url: 42)").is_err());
    }

    #[test]
    fn load_reads_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.ron");
        std::fs::write(&path, r#"(model: "meta-llama/Llama-2-13b")"#).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.model, "meta-llama/Llama-2-13b");
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.ron"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn cli_overrides_file() {
        let cli = Cli::parse_from([
            "cloner",
            "--backend",
            "http://cli:1",
            "--model",
            "meta-llama/Llama-2-13b",
            "--download-dir",
            "/tmp/out",
        ]);
        let settings = Settings::resolve(AppConfig::default(), &cli).unwrap();
        assert_eq!(settings.service.base_url, "http://cli:1");
        assert_eq!(settings.model, ModelId::Llama2_13b);
        assert_eq!(settings.download_dir, PathBuf::from("/tmp/out"));
        assert_eq!(settings.reveal_delay, Duration::from_millis(1500));
    }

    #[test]
    fn unknown_model_is_rejected() {
        let config = AppConfig {
            model: "gpt-2".to_string(),
            ..AppConfig::default()
        };
        let cli = Cli::parse_from(["cloner"]);
        let err = Settings::resolve(config, &cli).unwrap_err();
        assert!(matches!(err, ConfigError::Model(_)));
    }
}
