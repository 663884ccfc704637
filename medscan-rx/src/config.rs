//! Bootstrap configuration for medscan-rx
//!
//! Priority: command line / environment (clap) → `medscan-rx.toml` →
//! built-in defaults.

use crate::services::openfda_client::OPENFDA_LABEL_URL;
use crate::services::rxclass_client::RXCLASS_MEMBERS_URL;
use medscan_common::config::LoggingConfig;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 5731;
pub const DEFAULT_NER_URL: &str = "http://127.0.0.1:5732";

/// Active ingredient extraction strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Whole-word match against the cached ingredient vocabulary
    #[default]
    Dictionary,
    /// Span recognition through the medscan-ner service
    ConceptLinking,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Dictionary => write!(f, "dictionary"),
            Strategy::ConceptLinking => write!(f, "concept_linking"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dictionary" => Ok(Strategy::Dictionary),
            "concept_linking" => Ok(Strategy::ConceptLinking),
            other => Err(format!(
                "unknown strategy '{}' (expected dictionary or concept_linking)",
                other
            )),
        }
    }
}

/// Contents of `medscan-rx.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct RxTomlConfig {
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub strategy: Strategy,

    #[serde(default = "default_ner_url")]
    pub ner_url: String,

    #[serde(default = "default_ingredient_source_url")]
    pub ingredient_source_url: String,

    #[serde(default = "default_brand_source_url")]
    pub brand_source_url: String,

    /// Relative paths resolve inside the root folder
    #[serde(default = "default_ingredient_cache_file")]
    pub ingredient_cache_file: PathBuf,

    #[serde(default = "default_trademark_cache_file")]
    pub trademark_cache_file: PathBuf,

    #[serde(default = "default_database_file")]
    pub database_file: PathBuf,

    /// Applies to every remote request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_ner_url() -> String {
    DEFAULT_NER_URL.to_string()
}

fn default_ingredient_source_url() -> String {
    RXCLASS_MEMBERS_URL.to_string()
}

fn default_brand_source_url() -> String {
    OPENFDA_LABEL_URL.to_string()
}

fn default_ingredient_cache_file() -> PathBuf {
    PathBuf::from("active_ingredients.json")
}

fn default_trademark_cache_file() -> PathBuf {
    PathBuf::from("trade_marks_all.json")
}

fn default_database_file() -> PathBuf {
    PathBuf::from("medscan.db")
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for RxTomlConfig {
    fn default() -> Self {
        Self {
            port: None,
            root_folder: None,
            strategy: Strategy::default(),
            ner_url: default_ner_url(),
            ingredient_source_url: default_ingredient_source_url(),
            brand_source_url: default_brand_source_url(),
            ingredient_cache_file: default_ingredient_cache_file(),
            trademark_cache_file: default_trademark_cache_file(),
            database_file: default_database_file(),
            http_timeout_secs: default_http_timeout_secs(),
            logging: LoggingConfig::default(),
        }
    }
}
