//! MediNexus report tools
//!
//! MCP tool implementations for appointment analytics reports.

pub mod reports;
pub mod status;
