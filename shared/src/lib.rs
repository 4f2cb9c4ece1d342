//! Shared types for the Heimdall viewer
//!
//! This crate contains the types used on both sides of the log query API:
//! - Log entry and response wire types
//! - The canonical query sent to `/api/logs`
//! - Viewer configuration

pub mod config;
pub mod messages;

pub use config::*;
pub use messages::*;
