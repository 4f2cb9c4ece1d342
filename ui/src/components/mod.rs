//! UI Components
//!
//! - [`common`]: icons and the state banner
//! - [`logs`]: the telemetry dashboard

pub mod common;
pub mod logs;
