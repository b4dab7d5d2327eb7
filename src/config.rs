//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` (or the file named by `FINSENT_CONFIG`), then
//! applies `FINSENT_LOG_LEVEL` and `FINSENT_API_URL` overrides. The inference
//! credential comes from `HF_API_TOKEN` only and is never sourced from TOML.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::error::AppError;
use crate::logger;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const TOKEN_ENV: &str = "HF_API_TOKEN";

/// Proxy (relay) listener configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address the relay binds to.
    pub bind: String,
}

/// Which inference backend the relay forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Hosted,
    Dummy,
}

/// Outbound inference configuration, populated from `[inference]`.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub backend: Backend,
    /// Base URL; model ids are appended as path segments.
    pub api_base_url: String,
    pub sentiment_model: String,
    pub ner_model: String,
    /// Ask the upstream to block until a cold model is loaded.
    pub wait_for_model: bool,
    /// Check the model endpoints at startup to decide `model_ready`.
    pub startup_check: bool,
    /// `None` keeps the HTTP client's default (no overall timeout).
    pub timeout: Option<Duration>,
}

/// Presentation layer configuration.
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub bind: String,
    /// Base URL of the relay the presentation layer talks to.
    pub api_base_url: String,
}

/// Fully-resolved configuration shared by both binaries.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// `true` when the level came from `FINSENT_LOG_LEVEL` and should beat `RUST_LOG`.
    pub log_level_forced: bool,
    pub relay: RelayConfig,
    pub inference: InferenceConfig,
    pub ui: UiConfig,
    /// Bearer credential from `HF_API_TOKEN`.
    pub api_token: Option<String>,
}

impl Config {
    /// The bearer credential, or a config error when it is absent or blank.
    /// The relay calls this before building any client; absence is fatal.
    pub fn require_api_token(&self) -> Result<&str, AppError> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Config(format!("{TOKEN_ENV} is not set")))
    }
}

/// Environment-sourced values. Tests build this directly instead of
/// mutating process env.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub log_level: Option<String>,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("FINSENT_LOG_LEVEL").ok().filter(|s| !s.is_empty()),
            api_url: env::var("FINSENT_API_URL").ok().filter(|s| !s.is_empty()),
            api_token: env::var(TOKEN_ENV).ok(),
        }
    }
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    logging: RawLogging,
    #[serde(default)]
    relay: RawRelay,
    #[serde(default)]
    inference: RawInference,
    #[serde(default)]
    ui: RawUi,
}

#[derive(Deserialize)]
struct RawLogging {
    #[serde(default = "default_log_level")]
    level: String,
}

#[derive(Deserialize)]
struct RawRelay {
    #[serde(default = "default_relay_bind")]
    bind: String,
}

#[derive(Deserialize)]
struct RawInference {
    #[serde(default = "default_backend")]
    backend: String,
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_sentiment_model")]
    sentiment_model: String,
    #[serde(default = "default_ner_model")]
    ner_model: String,
    #[serde(default = "default_true")]
    wait_for_model: bool,
    #[serde(default = "default_true")]
    startup_check: bool,
    #[serde(default)]
    timeout_seconds: Option<u64>,
}

#[derive(Deserialize)]
struct RawUi {
    #[serde(default = "default_ui_bind")]
    bind: String,
    #[serde(default = "default_ui_api_base_url")]
    api_base_url: String,
}

impl Default for RawLogging {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Default for RawRelay {
    fn default() -> Self {
        Self { bind: default_relay_bind() }
    }
}

impl Default for RawInference {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            api_base_url: default_api_base_url(),
            sentiment_model: default_sentiment_model(),
            ner_model: default_ner_model(),
            wait_for_model: true,
            startup_check: true,
            timeout_seconds: None,
        }
    }
}

impl Default for RawUi {
    fn default() -> Self {
        Self { bind: default_ui_bind(), api_base_url: default_ui_api_base_url() }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_relay_bind() -> String { "127.0.0.1:8000".to_string() }
fn default_backend() -> String { "hosted".to_string() }
fn default_api_base_url() -> String { "https://api-inference.huggingface.co/models".to_string() }
fn default_sentiment_model() -> String { "cardiffnlp/twitter-roberta-base-sentiment-latest".to_string() }
fn default_ner_model() -> String { "dslim/bert-base-NER".to_string() }
fn default_ui_bind() -> String { "127.0.0.1:8501".to_string() }
fn default_ui_api_base_url() -> String { "http://127.0.0.1:8000".to_string() }
fn default_true() -> bool { true }

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load config from `FINSENT_CONFIG` or `config/default.toml`, then apply
/// env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let path = env::var("FINSENT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    load_from(&path, EnvOverrides::from_env())
}

/// Loader with an explicit path and overrides; tests call this directly.
pub fn load_from(path: &Path, overrides: EnvOverrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;
    resolve(parsed, overrides)
}

fn resolve(parsed: RawConfig, overrides: EnvOverrides) -> Result<Config, AppError> {
    let log_level_forced = overrides.log_level.is_some();
    let log_level = overrides.log_level.unwrap_or(parsed.logging.level);
    logger::parse_level(&log_level)
        .map_err(|e| AppError::Config(format!("[logging] level: {e}")))?;

    let inf = parsed.inference;
    let backend = match inf.backend.as_str() {
        "hosted" => Backend::Hosted,
        "dummy" => Backend::Dummy,
        other => {
            return Err(AppError::Config(format!("unknown inference backend: {other}")));
        }
    };
    if inf.timeout_seconds == Some(0) {
        return Err(AppError::Config("[inference] timeout_seconds must be > 0".into()));
    }

    let ui_api_base_url = overrides.api_url.unwrap_or(parsed.ui.api_base_url);

    Ok(Config {
        log_level,
        log_level_forced,
        relay: RelayConfig { bind: parsed.relay.bind },
        inference: InferenceConfig {
            backend,
            api_base_url: inf.api_base_url.trim_end_matches('/').to_string(),
            sentiment_model: inf.sentiment_model,
            ner_model: inf.ner_model,
            wait_for_model: inf.wait_for_model,
            startup_check: inf.startup_check,
            timeout: inf.timeout_seconds.map(Duration::from_secs),
        },
        ui: UiConfig {
            bind: parsed.ui.bind,
            api_base_url: ui_api_base_url.trim_end_matches('/').to_string(),
        },
        api_token: overrides.api_token,
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

#[cfg(test)]
impl Config {
    /// Offline config: dummy backend, no startup check, fixed token.
    pub fn test_default() -> Self {
        Self {
            log_level: "info".into(),
            log_level_forced: false,
            relay: RelayConfig { bind: "127.0.0.1:0".into() },
            inference: InferenceConfig {
                backend: Backend::Dummy,
                api_base_url: "http://127.0.0.1:0/models".into(),
                sentiment_model: "test/sentiment".into(),
                ner_model: "test/ner".into(),
                wait_for_model: true,
                startup_check: false,
                timeout: Some(Duration::from_secs(5)),
            },
            ui: UiConfig {
                bind: "127.0.0.1:0".into(),
                api_base_url: "http://127.0.0.1:0".into(),
            },
            api_token: Some("test-token".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[logging]
level = "warn"

[inference]
sentiment_model = "acme/finbert"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_minimal_config_fills_defaults() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), EnvOverrides::default()).unwrap();
        assert_eq!(cfg.log_level, "warn");
        assert!(!cfg.log_level_forced);
        assert_eq!(cfg.inference.sentiment_model, "acme/finbert");
        assert_eq!(cfg.inference.ner_model, "dslim/bert-base-NER");
        assert_eq!(cfg.inference.backend, Backend::Hosted);
        assert!(cfg.inference.wait_for_model);
        assert!(cfg.inference.timeout.is_none());
        assert_eq!(cfg.relay.bind, "127.0.0.1:8000");
        assert_eq!(cfg.ui.api_base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let f = write_toml("");
        let cfg = load_from(f.path(), EnvOverrides::default()).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.inference.startup_check);
    }

    #[test]
    fn shipped_default_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let cfg = load_from(&path, EnvOverrides::default()).unwrap();
        assert_eq!(cfg.inference.backend, Backend::Hosted);
    }

    #[test]
    fn missing_file_errors() {
        let err = load_from(Path::new("/nonexistent/finsent.toml"), EnvOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("config error"));
    }

    #[test]
    fn env_overrides_apply() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(
            f.path(),
            EnvOverrides {
                log_level: Some("debug".into()),
                api_url: Some("http://relay.internal:9000/".into()),
                api_token: Some("hf_abc".into()),
            },
        )
        .unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert!(cfg.log_level_forced);
        assert_eq!(cfg.ui.api_base_url, "http://relay.internal:9000");
        assert_eq!(cfg.require_api_token().unwrap(), "hf_abc");
    }

    #[test]
    fn missing_token_is_config_error() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), EnvOverrides::default()).unwrap();
        let err = cfg.require_api_token().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains(TOKEN_ENV));
    }

    #[test]
    fn blank_token_is_config_error() {
        let mut cfg = Config::test_default();
        cfg.api_token = Some("   ".into());
        assert!(cfg.require_api_token().is_err());
    }

    #[test]
    fn unknown_backend_rejected() {
        let f = write_toml("[inference]\nbackend = \"local-gpu\"\n");
        let err = load_from(f.path(), EnvOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("local-gpu"));
    }

    #[test]
    fn bad_log_level_rejected() {
        let f = write_toml("[logging]\nlevel = \"loud\"\n");
        assert!(load_from(f.path(), EnvOverrides::default()).is_err());
    }

    #[test]
    fn timeout_seconds_resolves() {
        let f = write_toml("[inference]\ntimeout_seconds = 30\n");
        let cfg = load_from(f.path(), EnvOverrides::default()).unwrap();
        assert_eq!(cfg.inference.timeout, Some(Duration::from_secs(30)));

        let f = write_toml("[inference]\ntimeout_seconds = 0\n");
        assert!(load_from(f.path(), EnvOverrides::default()).is_err());
    }
}
