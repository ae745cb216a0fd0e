//! Shared test utilities for the backend
//!
//! Provides the unified test logging initializer and helpers for asserting
//! Problem Details error responses without depending on backend types.

pub mod logging;
pub mod problem_details;
