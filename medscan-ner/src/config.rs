//! Bootstrap configuration for medscan-ner
//!
//! Priority: command line / environment (clap) → `medscan-ner.toml` →
//! built-in defaults.

use crate::linker::LinkerConfig;
use medscan_common::config::LoggingConfig;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5732;

/// Contents of `medscan-ner.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NerTomlConfig {
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Concept dictionary JSON; relative paths resolve inside the root folder
    #[serde(default)]
    pub knowledge_base: Option<PathBuf>,

    #[serde(default)]
    pub linker: LinkerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default knowledge-base file name inside the root folder
pub fn default_knowledge_base() -> PathBuf {
    PathBuf::from("knowledge_base.json")
}
