//! API Module
//!
//! Tầng giao tiếp giữa frontend shells và core logic.
//!
//! Commands take the session context explicitly and return
//! `Result<T, String>` so shells can display errors directly.

pub mod commands;

pub use commands::*;
