//! HTTP API handlers for medscan-ner

pub mod entities;
pub mod health;

pub use entities::{entity_routes, extract_entities};
pub use health::{health_check, health_routes};
