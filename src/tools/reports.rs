//! Report session tools
//!
//! Session state behind the MCP report tools: the active kind and period,
//! the last loaded report, and the CSV/PDF exports built from it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::api::ReportSource;
use crate::models::{ReportKind, ReportPeriod, ReportStatistics};
use crate::reports::{
    chart_data, export_csv, export_pdf, fetch_report, ChartData, ExportedFile, PeriodNavigator,
    ReportResult,
};

// ============================================================================
// Session State
// ============================================================================

/// Active period and the report loaded for it
///
/// Every change of kind or period discards the loaded report and bumps
/// `generation`. A fetch started under an older generation is not stored.
#[derive(Debug, Clone)]
pub struct ReportSession {
    navigator: PeriodNavigator,
    kind: ReportKind,
    report: Option<ReportStatistics>,
    generation: u64,
}

impl ReportSession {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            navigator: PeriodNavigator::new(today),
            kind: ReportKind::default(),
            report: None,
            generation: 0,
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn period(&self) -> ReportPeriod {
        self.navigator.period(self.kind)
    }

    pub fn report(&self) -> Option<&ReportStatistics> {
        self.report.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_kind(&mut self, kind: ReportKind) -> ReportPeriod {
        if kind != self.kind {
            self.kind = kind;
            self.invalidate();
        }
        self.period()
    }

    pub fn next(&mut self) -> ReportPeriod {
        self.navigator.next(self.kind);
        self.invalidate();
        self.period()
    }

    pub fn prev(&mut self) -> ReportPeriod {
        self.navigator.prev(self.kind);
        self.invalidate();
        self.period()
    }

    /// Snapshot of what a fetch should request
    pub fn begin_load(&self) -> (u64, ReportPeriod) {
        (self.generation, self.period())
    }

    /// Store a fetched report unless the session moved on while it was in flight
    pub fn complete_load(&mut self, generation: u64, report: ReportStatistics) -> bool {
        if generation != self.generation {
            warn!(
                "Discarding stale report for {} to {} (generation {} != {})",
                report.start_date, report.end_date, generation, self.generation
            );
            return false;
        }
        self.report = Some(report);
        true
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.report = None;
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    pub kind: String,
    pub label: String,
    pub start_date: String,
    pub end_date: String,
    pub report_loaded: bool,
}

#[derive(Debug, Serialize)]
pub struct LoadReportResponse {
    pub success: bool,
    /// False when the period changed while the request was in flight
    pub stored: bool,
    pub period: String,
    pub report: ReportStatistics,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ExportReportResponse {
    pub success: bool,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub bytes: usize,
    pub include_details: bool,
    pub message: String,
}

impl ExportReportResponse {
    fn from_result(result: ReportResult<ExportedFile>, include_details: bool) -> Self {
        match result {
            Ok(file) => Self {
                success: true,
                message: format!("Report exported to {}", file.path.display()),
                file_path: Some(file.path.display().to_string()),
                file_name: Some(file.file_name),
                mime_type: Some(file.mime_type.to_string()),
                bytes: file.bytes,
                include_details,
            },
            Err(e) => {
                error!("Export failed: {}", e);
                Self::failed(format!("Export failed: {}", e), include_details)
            }
        }
    }

    fn failed(message: String, include_details: bool) -> Self {
        Self {
            success: false,
            file_path: None,
            file_name: None,
            mime_type: None,
            bytes: 0,
            include_details,
            message,
        }
    }
}

// ============================================================================
// Navigation
// ============================================================================

pub fn get_period(session: &ReportSession) -> PeriodResponse {
    let period = session.period();
    PeriodResponse {
        kind: period.kind.as_str().to_string(),
        label: period.label(),
        start_date: period.start_iso(),
        end_date: period.end_iso(),
        report_loaded: session.report().is_some(),
    }
}

pub fn set_report_kind(session: &mut ReportSession, kind: &str) -> Result<PeriodResponse, String> {
    let kind = ReportKind::from_str(kind)
        .ok_or_else(|| format!("Invalid report kind '{}'. Use 'weekly' or 'monthly'", kind))?;
    session.set_kind(kind);
    Ok(get_period(session))
}

pub fn next_period(session: &mut ReportSession) -> PeriodResponse {
    session.next();
    get_period(session)
}

pub fn previous_period(session: &mut ReportSession) -> PeriodResponse {
    session.prev();
    get_period(session)
}

// ============================================================================
// Loading
// ============================================================================

/// Fetch the active period's report and try to store it in the session
///
/// The session lock is released for the duration of the request.
async fn fetch_into_session(
    session: &Mutex<ReportSession>,
    source: &dyn ReportSource,
) -> (ReportPeriod, ReportStatistics, bool) {
    let (generation, period) = session.lock().await.begin_load();

    let report = fetch_report(source, &period).await;

    let stored = session.lock().await.complete_load(generation, report.clone());
    (period, report, stored)
}

pub async fn load_report(session: &Mutex<ReportSession>, source: &dyn ReportSource) -> LoadReportResponse {
    let (period, report, stored) = fetch_into_session(session, source).await;
    let message = if stored {
        format!("Loaded {}", period.label())
    } else {
        format!("Loaded {}, but the period changed before it arrived", period.label())
    };

    LoadReportResponse {
        success: true,
        stored,
        period: period.label(),
        report,
        message,
    }
}

pub fn get_report(session: &ReportSession) -> Result<ReportStatistics, String> {
    session
        .report()
        .cloned()
        .ok_or_else(|| "No report loaded. Call load_report first.".to_string())
}

/// Chart series for the loaded report, empty when nothing is loaded
pub fn chart_series(session: &ReportSession) -> ChartData {
    chart_data(session.report())
}

/// The loaded report and the period it was requested for, fetching the
/// active period first if needed
async fn loaded_report(
    session: &Mutex<ReportSession>,
    source: &dyn ReportSource,
) -> (ReportPeriod, ReportStatistics) {
    {
        let guard = session.lock().await;
        if let Some(report) = guard.report() {
            return (guard.period(), report.clone());
        }
    }

    info!("No report loaded, fetching before export");
    let (period, report, _) = fetch_into_session(session, source).await;
    (period, report)
}

// ============================================================================
// Exports
// ============================================================================

pub async fn export_report_csv(
    session: &Mutex<ReportSession>,
    source: &dyn ReportSource,
    export_dir: &Path,
    include_details: bool,
) -> ExportReportResponse {
    let (period, report) = loaded_report(session, source).await;
    ExportReportResponse::from_result(
        export_csv(export_dir, &period, &report, include_details),
        include_details,
    )
}

/// Chart rasterization and page layout run on the blocking pool
pub async fn export_report_pdf(
    session: &Mutex<ReportSession>,
    source: &dyn ReportSource,
    export_dir: PathBuf,
    include_details: bool,
) -> ExportReportResponse {
    let (period, report) = loaded_report(session, source).await;

    let result = tokio::task::spawn_blocking(move || {
        export_pdf(&export_dir, &period, &report, include_details)
    })
    .await;

    match result {
        Ok(result) => ExportReportResponse::from_result(result, include_details),
        Err(e) => {
            error!("PDF export task failed: {}", e);
            ExportReportResponse::failed(format!("Export failed: {}", e), include_details)
        }
    }
}
