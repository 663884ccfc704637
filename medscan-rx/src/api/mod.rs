//! HTTP API handlers for medscan-rx

pub mod health;
pub mod recognize;
pub mod scans;

pub use health::{health_check, health_routes};
pub use recognize::{recognize, recognize_routes};
pub use scans::{list_scans, scan_routes};
