//! Report pipeline
//!
//! Period navigation, fetching, chart series and the CSV/PDF exporters.

pub mod charts;
pub mod csv_export;
pub mod error;
pub mod fetcher;
pub mod layout;
pub mod navigator;
pub mod pdf_export;

use std::path::{Path, PathBuf};

use serde::Serialize;

pub use charts::{chart_data, render_chart, ChartData, ChartPoint, ChartSnapshot, SeriesColor};
pub use csv_export::{csv_file_name, export_csv, render_csv, CSV_MIME_TYPE};
pub use error::{ReportError, ReportResult};
pub use fetcher::fetch_report;
pub use navigator::{week_start, PeriodNavigator};
pub use pdf_export::{export_pdf, pdf_file_name, render_pdf, PDF_MIME_TYPE};

/// A file written to the export directory
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: usize,
}

/// Write a finished export in one call, creating `dir` if needed
pub(crate) fn write_export(
    dir: &Path,
    file_name: &str,
    mime_type: &'static str,
    content: &[u8],
) -> ReportResult<ExportedFile> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, content)?;

    tracing::info!("Wrote {} ({} bytes)", path.display(), content.len());

    Ok(ExportedFile {
        path,
        file_name: file_name.to_string(),
        mime_type,
        bytes: content.len(),
    })
}
