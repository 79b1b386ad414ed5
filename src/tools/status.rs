//! Report service status tool
//!
//! Provides runtime status information and usage instructions.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::ReportConfig;

/// Report tool instructions for AI assistants
pub const REPORT_INSTRUCTIONS: &str = r#"
# MediNexus Report Instructions

This guide explains how to produce appointment analytics reports with the
MediNexus Reports tools.

## Overview

A report always covers one **period**:
- **weekly** - Monday to Sunday (7 days)
- **monthly** - first to last day of a calendar month

The service starts on the current week and month. Choose the kind with
`set_report_kind`, move with `next_report_period` / `previous_report_period`,
and check where you are with `get_report_period`.

## Workflow

1. `set_report_kind(kind: "weekly")` or `"monthly"`
2. Navigate to the period you want
3. `load_report` - fetches statistics for the active period
4. `get_report` / `get_chart_series` - inspect the loaded report
5. `export_report_csv` / `export_report_pdf` - write files to the export directory

Changing kind or period discards the loaded report. Exports load the active
period first when nothing is loaded.

## What a Report Contains

- Total appointments, completed and cancelled counts
- Gender breakdown: Male, Female, Other
- Status breakdown: Pending, Confirmed, Completed, Cancelled
- Optional detail rows: one per appointment (date, patient, gender, email,
  mobile, status, type, diagnosis, prescription)

Missing values from the API are reported as 0. If the API cannot be reached
the report is empty (all zeros) rather than an error. Breakdown totals are not
reconciled with the overall total.

## Export Files

| Export | File name |
|--------|-----------|
| CSV summary | `appointment-analytics-{kind}-{start}-{end}.csv` |
| CSV with details | `appointment-report-{kind}-{start}-{end}.csv` |
| PDF | `appointment-report-{kind}-{start}-{end}.pdf` |

Pass `include_details: true` to add per-appointment rows. The PDF summary is a
single A4 page; long detail tables continue on further pages.

If an export fails, `success` is false and no file is written.
"#;

/// Runtime status of the report service
#[derive(Debug, Clone, Serialize)]
pub struct ReportServiceStatus {
    pub build: BuildInfo,

    /// Reporting API and export configuration
    pub api_base_url: String,
    pub api_authenticated: bool,
    pub export_dir: String,
    pub export_file_count: Option<usize>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    api_base_url: String,
    api_authenticated: bool,
    export_dir: PathBuf,
}

impl StatusTracker {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            start_time: Instant::now(),
            api_base_url: config.api_base_url.clone(),
            api_authenticated: config.api_token.is_some(),
            export_dir: config.export_dir.clone(),
        }
    }

    pub fn get_status(&self) -> ReportServiceStatus {
        // Count exports if the directory exists yet
        let export_file_count = std::fs::read_dir(&self.export_dir)
            .ok()
            .map(|entries| entries.filter_map(Result::ok).count());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ReportServiceStatus {
            build: BuildInfo::current(),
            api_base_url: self.api_base_url.clone(),
            api_authenticated: self.api_authenticated,
            export_dir: self.export_dir.display().to_string(),
            export_file_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
