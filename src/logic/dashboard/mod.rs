//! Dashboard Module - Session Controller & Rendering Boundary

pub mod controller;
pub mod view;

#[cfg(test)]
mod tests;

pub use controller::{spawn_activate, DashboardController, DashboardPhase};
pub use view::{DashboardSnapshot, LogSink, RenderSink, ViewState};
