//! # MedScan Common Library
//!
//! Shared code for the MedScan microservices:
//! - Error type used by configuration and file handling
//! - TOML bootstrap configuration and root folder resolution
//! - Logging initialization
//! - Wire types of the concept-linking API (shared by server and client)

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
