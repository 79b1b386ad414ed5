//! CSV export
//!
//! Every cell is quoted and internal quotes are doubled. Row order is fixed:
//! title, period, generation time, then the summary, gender and status
//! blocks separated by blank lines. The detail variant appends one row per
//! appointment.

use std::path::Path;

use chrono::NaiveDateTime;
use csv::{QuoteStyle, WriterBuilder};

use super::error::ReportResult;
use super::{write_export, ExportedFile};
use crate::models::{ReportKind, ReportPeriod, ReportStatistics};

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

const DETAIL_HEADERS: [&str; 9] = [
    "Date",
    "Patient Name",
    "Gender",
    "Email",
    "Mobile Number",
    "Status",
    "Appointment Type",
    "Diagnosis",
    "Prescription",
];

/// `appointment-analytics-{kind}-{start}-{end}.csv`, or
/// `appointment-report-{kind}-{start}-{end}.csv` when detail rows are included.
/// Dates come from the requested period, never from the response body.
pub fn csv_file_name(period: &ReportPeriod, include_details: bool) -> String {
    let prefix = if include_details {
        "appointment-report"
    } else {
        "appointment-analytics"
    };
    format!(
        "{}-{}-{}-{}.csv",
        prefix,
        period.kind.as_str(),
        period.start_iso(),
        period.end_iso()
    )
}

fn row<const N: usize>(cells: [&str; N]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn count_row(label: &str, value: u64) -> Vec<String> {
    vec![label.to_string(), value.to_string()]
}

/// Write one block of rows, every cell quoted
fn write_block(out: &mut Vec<u8>, rows: &[Vec<String>]) -> ReportResult<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .flexible(true)
        .from_writer(&mut *out);

    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the CSV document as a string
pub fn render_csv(
    kind: ReportKind,
    stats: &ReportStatistics,
    include_details: bool,
    generated_at: NaiveDateTime,
) -> ReportResult<String> {
    let title = if include_details {
        "Appointment Report"
    } else {
        "Appointment Analytics Report"
    };
    let period_label = format!(
        "{}: {} to {}",
        kind.display_name(),
        stats.start_date,
        stats.end_date
    );
    let generated = generated_at.format("%Y-%m-%d %H:%M:%S").to_string();

    let mut blocks: Vec<Vec<Vec<String>>> = vec![
        vec![
            row([title]),
            row(["Period", period_label.as_str()]),
            row(["Generated", generated.as_str()]),
        ],
        vec![
            row(["Summary"]),
            count_row("Total Appointments", stats.total_appointments),
            count_row("Completed Appointments", stats.completed_appointments),
            count_row("Cancelled Appointments", stats.cancelled_appointments),
        ],
        vec![
            row(["Gender Distribution"]),
            count_row("Male", stats.gender_wise.male),
            count_row("Female", stats.gender_wise.female),
            count_row("Other", stats.gender_wise.other),
        ],
        vec![
            row(["Status Distribution"]),
            count_row("Pending", stats.status_wise.pending),
            count_row("Confirmed", stats.status_wise.confirmed),
            count_row("Completed", stats.status_wise.completed),
            count_row("Cancelled", stats.status_wise.cancelled),
        ],
    ];

    if include_details {
        let mut details = vec![row(["Appointment Details"]), row(DETAIL_HEADERS)];
        details.extend(stats.detailed_data.iter().map(|r| {
            vec![
                r.date.clone(),
                r.patient_name.clone(),
                r.gender.clone(),
                r.email.clone(),
                r.mobile_number.clone(),
                r.status.as_str().to_string(),
                r.appointment_type.clone(),
                r.diagnosis.clone().unwrap_or_default(),
                r.prescription.clone().unwrap_or_default(),
            ]
        }));
        blocks.push(details);
    }

    let mut out = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        write_block(&mut out, block)?;
    }

    Ok(String::from_utf8(out)?)
}

/// Render the report fetched for `period` and write it into `dir`
pub fn export_csv(
    dir: &Path,
    period: &ReportPeriod,
    stats: &ReportStatistics,
    include_details: bool,
) -> ReportResult<ExportedFile> {
    let generated_at = chrono::Local::now().naive_local();
    let content = render_csv(period.kind, stats, include_details, generated_at)?;
    let file_name = csv_file_name(period, include_details);
    write_export(dir, &file_name, CSV_MIME_TYPE, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{normalize, AppointmentRecord, AppointmentStatus, GenderWise, StatusWise};
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn week() -> ReportPeriod {
        ReportPeriod::weekly(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
    }

    fn stats() -> ReportStatistics {
        let period = week();
        ReportStatistics {
            total_appointments: 3,
            gender_wise: GenderWise { male: 1, female: 2, other: 0 },
            status_wise: StatusWise { pending: 0, confirmed: 1, completed: 1, cancelled: 1 },
            cancelled_appointments: 1,
            completed_appointments: 1,
            detailed_data: vec![AppointmentRecord {
                date: "2024-03-05".to_string(),
                patient_name: "O\"Brien".to_string(),
                gender: "Male".to_string(),
                email: "obrien@example.com".to_string(),
                mobile_number: "555-0100".to_string(),
                status: AppointmentStatus::Completed,
                appointment_type: "Consultation".to_string(),
                diagnosis: Some("Flu, mild".to_string()),
                prescription: None,
            }],
            ..ReportStatistics::empty(&period)
        }
    }

    #[test]
    fn test_summary_csv_layout() {
        let csv = render_csv(ReportKind::Weekly, &stats(), false, generated_at()).unwrap();
        let expected = "\
\"Appointment Analytics Report\"
\"Period\",\"Weekly: 2024-03-04 to 2024-03-10\"
\"Generated\",\"2024-03-05 09:30:00\"

\"Summary\"
\"Total Appointments\",\"3\"
\"Completed Appointments\",\"1\"
\"Cancelled Appointments\",\"1\"

\"Gender Distribution\"
\"Male\",\"1\"
\"Female\",\"2\"
\"Other\",\"0\"

\"Status Distribution\"
\"Pending\",\"0\"
\"Confirmed\",\"1\"
\"Completed\",\"1\"
\"Cancelled\",\"1\"
";
        assert_eq!(csv, expected);
        assert!(!csv.contains("O\"\"Brien"));
    }

    #[test]
    fn test_detail_csv_escapes_quotes() {
        let csv = render_csv(ReportKind::Weekly, &stats(), true, generated_at()).unwrap();
        assert!(csv.starts_with("\"Appointment Report\"\n"));
        assert!(csv.contains("\"Date\",\"Patient Name\",\"Gender\""));
        assert!(csv.contains(
            "\"2024-03-05\",\"O\"\"Brien\",\"Male\",\"obrien@example.com\",\"555-0100\",\"Completed\",\"Consultation\",\"Flu, mild\",\"\"\n"
        ));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            csv_file_name(&week(), false),
            "appointment-analytics-weekly-2024-03-04-2024-03-10.csv"
        );
        assert_eq!(
            csv_file_name(&ReportPeriod::monthly(2024, 2).unwrap(), true),
            "appointment-report-monthly-2024-02-01-2024-02-29.csv"
        );
    }

    #[test]
    fn test_export_name_ignores_response_dates() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("exports");
        let raw = serde_json::from_value(serde_json::json!({
            "totalAppointments": 1,
            "startDate": "x/../../escaped",
            "endDate": "2024-03-10T23:59:59.999Z"
        }))
        .unwrap();
        let hostile = normalize(raw, &week());
        assert_eq!(hostile.start_date, "x/../../escaped");

        let exported = export_csv(&export_dir, &week(), &hostile, false).unwrap();
        assert_eq!(exported.file_name, "appointment-analytics-weekly-2024-03-04-2024-03-10.csv");
        assert_eq!(exported.path.parent(), Some(export_dir.as_path()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(std::fs::read_dir(&export_dir).unwrap().count(), 1);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exported = export_csv(dir.path(), &week(), &stats(), true).unwrap();
        assert_eq!(exported.mime_type, CSV_MIME_TYPE);
        let written = std::fs::read_to_string(&exported.path).unwrap();
        assert_eq!(written.len(), exported.bytes);
        assert!(written.contains("\"O\"\"Brien\""));
    }
}
