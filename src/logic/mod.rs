//! Logic Module - Business Logic & Engines
//!
//! Chứa các engine xử lý: Metrics, Analytics, Dashboard, Scoring.
//!
//! Structure:
//! - `metrics/` - Evaluation payload, fetch transport, session cache
//! - `analytics/` - Threshold resolution and impact projection
//! - `dashboard/` - Session controller and rendering boundary
//! - `scoring/` - Typed client for the backend scoring endpoints

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod metrics;
pub mod scoring;
