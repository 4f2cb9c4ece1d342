//! Heimdall UI Library
//!
//! A browser-resident viewer for request telemetry: it queries a logs
//! endpoint, aggregates the entries and shows scorecards, a per-minute
//! request chart and a request table.
//!
//! # Modules
//!
//! - [`query`]: filter form to [`heimdall_shared::QuerySpec`]
//! - [`client`]: fetch gateway ([`client::LogsClient`])
//! - [`aggregate`]: p95 latency, error rate and minute buckets
//! - [`render`]: table rows and chart draw primitives
//! - [`controller`]: refresh state machine and auto-refresh timer
//! - [`state`], [`components`], [`app`]: the Leptos front end

pub mod aggregate;
pub mod app;
pub mod client;
pub mod components;
pub mod controller;
pub mod query;
pub mod render;
pub mod state;

pub use app::App;
