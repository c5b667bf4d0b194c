use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use validator::Validate;

use crate::coa::InvertedRangePolicy;
use crate::error::CoaResult;
use crate::validation::validate_model;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate]
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[validate]
    pub analyzer: AnalyzerConfig,
    #[validate]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file_path: Option<String>,
}

/// Tuning for the extraction-and-evaluation engine.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Lines beyond this are dropped before classification.
    #[validate(range(min = 1))]
    pub max_lines: usize,
    /// Distinct header terms a line needs to count as a table header.
    #[validate(range(min = 1, max = 9))]
    pub min_header_matches: usize,
    /// Skip rows identical to an earlier row of the same document.
    pub dedupe_rows: bool,
    pub inverted_range: InvertedRangePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    pub color: bool,
    pub visualize: bool,
    #[validate(range(min = 10, max = 200))]
    pub bar_width: usize,
}

impl AppConfig {
    /// Layer defaults, `config/*` files, an optional explicit file and
    /// `COACHECK__*` environment variables, then validate the result.
    pub fn load(explicit: Option<&Path>) -> CoaResult<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: AppConfig = builder
            .add_source(Environment::with_prefix("COACHECK").separator("__"))
            .build()?
            .try_deserialize()?;

        validate_model(&config)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8083,
            max_request_size: 16 * 1024 * 1024, // 16MB
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_lines: 10_000,
            min_header_matches: 2,
            dedupe_rows: false,
            inverted_range: InvertedRangePolicy::Fail,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            visualize: false,
            bar_width: 50,
        }
    }
}
