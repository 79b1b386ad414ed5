//! API module
//!
//! Handles communication with the MediNexus reporting API.

pub mod client;

pub use client::{ApiError, ApiResult, HttpReportSource, ReportSource};
