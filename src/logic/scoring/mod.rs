//! Scoring Module - Backend Scoring Endpoints
//!
//! Typed client for the backend's scoring endpoints plus the
//! operator-facing input forms feeding them.

pub mod client;
pub mod forms;

pub use client::{
    BackendHealth, BatchSummary, PaymentRequest, PredictionResponse, SampleColumns,
    ScoringClient, ScoringError,
};
pub use forms::{read_csv_upload, PaymentForm, TransactionFeatures};
