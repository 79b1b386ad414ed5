//! MediNexus Reports Library
//!
//! Appointment analytics: period navigation, report fetching and
//! normalization, chart series, and CSV/PDF exports.

pub mod api;
pub mod build_info;
pub mod config;
pub mod mcp;
pub mod models;
pub mod reports;
pub mod tools;
