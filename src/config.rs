use std::path::PathBuf;

use crate::ai::{ConnectionSettings, Credential, ModelChoice, SelectionError, API_KEY_ENV, DEFAULT_API_BASE};

pub const API_BASE_ENV: &str = "DEEPSEEK_API_BASE";
pub const MODEL_ENV: &str = "DEEPSEEK_MODEL";
pub const OUTPUT_DIR_ENV: &str = "LEXREVIEW_OUTPUT_DIR";
pub const REPORT_FONT_ENV: &str = "LEXREVIEW_REPORT_FONT";
pub const LOG_FILTER_ENV: &str = "RUST_LOG";

/// Default: warn for dependencies, info for this crate
pub const DEFAULT_LOG_FILTER: &str = "warn,lexreview_lib=info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    Invalid {
        var: &'static str,
        #[source]
        source: SelectionError,
    },
}

/// Runtime configuration.
///
/// Built from defaults, then `.env` / process environment, then CLI flags.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<Credential>,
    pub api_base: String,
    pub model: ModelChoice,
    /// Where downloaded reports are written
    pub output_dir: PathBuf,
    /// Unicode TTF for PDF reports
    pub report_font: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: ModelChoice::default(),
            output_dir: default_output_dir(),
            report_font: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: Option<ModelChoice>,
    pub output_dir: Option<PathBuf>,
    pub report_font: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let model = match var(MODEL_ENV) {
            Some(raw) => raw.parse().map_err(|source| ConfigError::Invalid {
                var: MODEL_ENV,
                source,
            })?,
            None => defaults.model,
        };

        Ok(Self {
            api_key: var(API_KEY_ENV).and_then(Credential::new),
            api_base: var(API_BASE_ENV)
                .map(|b| b.trim().to_string())
                .unwrap_or(defaults.api_base),
            model,
            output_dir: var(OUTPUT_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            report_font: var(REPORT_FONT_ENV).map(PathBuf::from),
            log_filter: var(LOG_FILTER_ENV).unwrap_or(defaults.log_filter),
        })
    }

    /// Apply command-line values on top
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.api_key = Credential::resolve(
            overrides.api_key.as_deref(),
            self.api_key.as_ref().map(Credential::expose),
        );
        if let Some(base) = overrides.api_base.filter(|b| !b.trim().is_empty()) {
            self.api_base = base.trim().to_string();
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if overrides.report_font.is_some() {
            self.report_font = overrides.report_font;
        }
        self
    }

    pub fn connection(&self) -> ConnectionSettings {
        ConnectionSettings::new(self.api_base.clone(), self.api_key.clone(), self.model)
    }
}

/// The user's downloads folder, or the working directory when there is none
fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
