//! Report pipeline errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
