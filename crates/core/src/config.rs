use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Engine-wide configuration, explicitly constructed and injected: no hidden
/// singletons, so several engine instances can run side by side.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub reasoning: ReasoningConfig,
    pub cache: CacheConfig,
    pub sources: SourcesConfig,
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ReasoningConfig {
    pub base_url: String,
    /// Overall bound on one reasoning call. Minutes-scale by design: the
    /// analysis step may involve expensive external reasoning.
    pub timeout_secs: u64,
    pub model: String,
}

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttl_secs: u64,
}

#[derive(Clone, Debug)]
pub struct SourcesConfig {
    pub mode: SourceMode,
    /// Per-source query timeout. The coordinator waits at most the slowest
    /// single timeout, not the sum.
    pub query_timeout_secs: u64,
    pub timocom_api_key: Option<SecretString>,
    pub transeu_api_key: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct PricingConfig {
    pub default_margin_pct: u8,
    /// Confidence reported by fallback analyses, deliberately below the
    /// typical reasoning-path confidence to signal reduced trust.
    pub fallback_confidence: u8,
    /// Base price used when not a single offer came back.
    pub nominal_base_price: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { default_margin_pct: 20, fallback_confidence: 75, nominal_base_price: 3000.0 }
    }
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Synthesize offers from the market model; no outbound calls.
    Simulated,
    /// Query the configured platform APIs.
    Live,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reasoning: ReasoningConfig {
                base_url: "http://localhost:8002".to_string(),
                timeout_secs: 150,
                model: "claude-sonnet".to_string(),
            },
            cache: CacheConfig { capacity: 1000, ttl_secs: 3600 },
            sources: SourcesConfig {
                mode: SourceMode::Simulated,
                query_timeout_secs: 10,
                timocom_api_key: None,
                transeu_api_key: None,
            },
            pricing: PricingConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    reasoning: Option<ReasoningPatch>,
    cache: Option<CachePatch>,
    sources: Option<SourcesPatch>,
    pricing: Option<PricingPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ReasoningPatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CachePatch {
    capacity: Option<usize>,
    ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SourcesPatch {
    mode: Option<SourceMode>,
    query_timeout_secs: Option<u64>,
    timocom_api_key: Option<String>,
    transeu_api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    default_margin_pct: Option<u8>,
    fallback_confidence: Option<u8>,
    nominal_base_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl EngineConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(options.config_path.as_deref()) {
            config.apply_patch(read_patch(&path)?);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("freightwise.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(reasoning) = patch.reasoning {
            if let Some(base_url) = reasoning.base_url {
                self.reasoning.base_url = base_url;
            }
            if let Some(timeout_secs) = reasoning.timeout_secs {
                self.reasoning.timeout_secs = timeout_secs;
            }
            if let Some(model) = reasoning.model {
                self.reasoning.model = model;
            }
        }

        if let Some(cache) = patch.cache {
            if let Some(capacity) = cache.capacity {
                self.cache.capacity = capacity;
            }
            if let Some(ttl_secs) = cache.ttl_secs {
                self.cache.ttl_secs = ttl_secs;
            }
        }

        if let Some(sources) = patch.sources {
            if let Some(mode) = sources.mode {
                self.sources.mode = mode;
            }
            if let Some(query_timeout_secs) = sources.query_timeout_secs {
                self.sources.query_timeout_secs = query_timeout_secs;
            }
            if let Some(timocom_key_value) = sources.timocom_api_key {
                self.sources.timocom_api_key = Some(timocom_key_value.into());
            }
            if let Some(transeu_key_value) = sources.transeu_api_key {
                self.sources.transeu_api_key = Some(transeu_key_value.into());
            }
        }

        if let Some(pricing) = patch.pricing {
            if let Some(default_margin_pct) = pricing.default_margin_pct {
                self.pricing.default_margin_pct = default_margin_pct;
            }
            if let Some(fallback_confidence) = pricing.fallback_confidence {
                self.pricing.fallback_confidence = fallback_confidence;
            }
            if let Some(nominal_base_price) = pricing.nominal_base_price {
                self.pricing.nominal_base_price = nominal_base_price;
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
        if let Ok(base_url) = env::var("FREIGHTWISE_REASONING_URL") {
            self.reasoning.base_url = base_url;
        }
        if let Ok(value) = env::var("FREIGHTWISE_REASONING_TIMEOUT_SECS") {
            self.reasoning.timeout_secs = parse_env("FREIGHTWISE_REASONING_TIMEOUT_SECS", &value)?;
        }
        if let Ok(value) = env::var("FREIGHTWISE_CACHE_CAPACITY") {
            self.cache.capacity = parse_env("FREIGHTWISE_CACHE_CAPACITY", &value)?;
        }
        if let Ok(value) = env::var("FREIGHTWISE_CACHE_TTL_SECS") {
            self.cache.ttl_secs = parse_env("FREIGHTWISE_CACHE_TTL_SECS", &value)?;
        }
        if let Ok(value) = env::var("FREIGHTWISE_SOURCE_MODE") {
            self.sources.mode = value.parse()?;
        }
        if let Ok(value) = env::var("FREIGHTWISE_SOURCE_TIMEOUT_SECS") {
            self.sources.query_timeout_secs = parse_env("FREIGHTWISE_SOURCE_TIMEOUT_SECS", &value)?;
        }
        if let Ok(key) = env::var("FREIGHTWISE_TIMOCOM_API_KEY") {
            self.sources.timocom_api_key = Some(key.into());
        }
        if let Ok(key) = env::var("FREIGHTWISE_TRANSEU_API_KEY") {
            self.sources.transeu_api_key = Some(key.into());
        }
        if let Ok(level) = env::var("FREIGHTWISE_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.reasoning.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("reasoning base_url must not be empty".into()));
        }
        if self.reasoning.timeout_secs == 0 {
            return Err(ConfigError::Validation("reasoning timeout_secs must be positive".into()));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::Validation("cache capacity must be positive".into()));
        }
        if self.sources.query_timeout_secs == 0 {
            return Err(ConfigError::Validation("source query timeout must be positive".into()));
        }
        if self.pricing.default_margin_pct > 100 {
            return Err(ConfigError::Validation("default margin must be at most 100%".into()));
        }
        if self.pricing.fallback_confidence > 100 {
            return Err(ConfigError::Validation("fallback confidence must be at most 100".into()));
        }
        if !(self.pricing.nominal_base_price > 0.0) {
            return Err(ConfigError::Validation("nominal base price must be positive".into()));
        }
        Ok(())
    }
}

impl std::str::FromStr for SourceMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "live" => Ok(Self::Live),
            other => Err(ConfigError::Validation(format!(
                "unsupported source mode `{other}` (expected simulated|live)"
            ))),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    let default = PathBuf::from("freightwise.toml");
    default.exists().then_some(default)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{ConfigError, EngineConfig, LoadOptions, SourceMode};

    #[test]
    fn defaults_pass_validation() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reasoning.timeout_secs, 150);
        assert_eq!(config.cache.capacity, 1000);
        assert_eq!(config.pricing.nominal_base_price, 3000.0);
    }

    #[test]
    fn toml_patch_overrides_selected_fields_only() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"
[reasoning]
base_url = "http://reasoning.internal:9000"

[cache]
capacity = 50

[sources]
mode = "live"
timocom_api_key = "tc-secret"
"#
        )
        .expect("write config");

        let config = EngineConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
        })
        .expect("config should load");

        assert_eq!(config.reasoning.base_url, "http://reasoning.internal:9000");
        assert_eq!(config.reasoning.timeout_secs, 150); // untouched default
        assert_eq!(config.cache.capacity, 50);
        assert_eq!(config.sources.mode, SourceMode::Live);
        assert!(config.sources.timocom_api_key.is_some());
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = EngineConfig::load(LoadOptions {
            config_path: Some("/nonexistent/freightwise.toml".into()),
            require_file: true,
        });
        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let mut config = EngineConfig::default();
        config.pricing.default_margin_pct = 140;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = EngineConfig::default();
        config.cache.capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn source_mode_parses_case_insensitively() {
        assert_eq!("Simulated".parse::<SourceMode>().unwrap(), SourceMode::Simulated);
        assert_eq!(" LIVE ".parse::<SourceMode>().unwrap(), SourceMode::Live);
        assert!("hybrid".parse::<SourceMode>().is_err());
    }
}
