//! Utility to export one report period to CSV and PDF
//!
//! Usage: export_report <weekly|monthly> [YYYY-MM-DD] [--details]
//!
//! The date picks the week or month to export (default: today).

use medinexus_reports::api::HttpReportSource;
use medinexus_reports::config::ReportConfig;
use medinexus_reports::models::{parse_iso_date, ReportKind};
use medinexus_reports::reports::{export_csv, export_pdf, fetch_report, PeriodNavigator};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: export_report <weekly|monthly> [YYYY-MM-DD] [--details]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("medinexus_reports=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let include_details = args.iter().any(|a| a == "--details");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let kind = match positional.first().and_then(|k| ReportKind::from_str(k)) {
        Some(kind) => kind,
        None => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let navigator = match positional.get(1) {
        Some(date) => match parse_iso_date(date) {
            Some(date) => PeriodNavigator::new(date),
            None => {
                eprintln!("Invalid date '{}'\n{}", date, USAGE);
                std::process::exit(2);
            }
        },
        None => PeriodNavigator::today(),
    };

    let config = ReportConfig::from_env();
    let period = navigator.period(kind);
    println!("Exporting {}", period.label());

    let source = HttpReportSource::new(&config);
    let stats = fetch_report(&source, &period).await;
    println!("  Total appointments: {}", stats.total_appointments);
    println!("  Detail rows: {}", stats.detailed_data.len());

    let csv = export_csv(&config.export_dir, &period, &stats, include_details)?;
    println!("  CSV: {}", csv.path.display());

    let pdf = export_pdf(&config.export_dir, &period, &stats, include_details)?;
    println!("  PDF: {}", pdf.path.display());

    Ok(())
}
