//! Report fetching
//!
//! Requests a period's statistics and normalizes whatever comes back.
//! Transport and decoding failures never reach the caller: they are logged
//! and the period's all-zero report is returned instead.

use tracing::{error, info};

use crate::api::ReportSource;
use crate::models::{normalize, ReportKind, ReportPeriod, ReportStatistics};

pub async fn fetch_report(source: &dyn ReportSource, period: &ReportPeriod) -> ReportStatistics {
    let result = match period.kind {
        ReportKind::Weekly => source.weekly_report(&period.start_iso()).await,
        ReportKind::Monthly => source.monthly_report(period.year(), period.month()).await,
    };

    match result {
        Ok(raw) => {
            let stats = normalize(raw, period);
            info!(
                "Loaded {} report: {} appointments, {} detail rows",
                period.label(),
                stats.total_appointments,
                stats.detailed_data.len()
            );
            stats
        }
        Err(e) => {
            error!("Failed to fetch {} report: {}", period.label(), e);
            ReportStatistics::empty(period)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::StubSource;
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_report() {
        let source = StubSource::failing();
        let period = ReportPeriod::weekly(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());

        let stats = fetch_report(&source, &period).await;

        assert_eq!(stats.total_appointments, 0);
        assert_eq!(stats.start_date, "2024-03-04");
        assert_eq!(stats.end_date, "2024-03-10");
        assert_eq!(*source.requests.lock().unwrap(), vec!["weekly:2024-03-04"]);
    }

    #[tokio::test]
    async fn test_monthly_fetch_sends_year_and_month() {
        let source = StubSource::returning(serde_json::json!({
            "totalAppointments": 3,
            "statusWise": {"Completed": 2, "Cancelled": 1}
        }));
        let period = ReportPeriod::monthly(2024, 2).unwrap();

        let stats = fetch_report(&source, &period).await;

        assert_eq!(*source.requests.lock().unwrap(), vec!["monthly:2024-2"]);
        assert_eq!(stats.total_appointments, 3);
        assert_eq!(stats.completed_appointments, 2);
        assert_eq!(stats.cancelled_appointments, 1);
        assert_eq!(stats.end_date, "2024-02-29");
    }
}
