//! Appointment detail model
//!
//! One row per appointment as returned in a report's `detailedData` array.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Appointment status enum
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    /// Status string the backend sent that is not one of the known four
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Other(s) => s,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending" => AppointmentStatus::Pending,
            "confirmed" => AppointmentStatus::Confirmed,
            "completed" => AppointmentStatus::Completed,
            "cancelled" | "canceled" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Other(s.to_string()),
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Pending
    }
}

impl From<String> for AppointmentStatus {
    fn from(s: String) -> Self {
        AppointmentStatus::from_str(&s)
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A single appointment in a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub patient_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mobile_number: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: AppointmentStatus,
    #[serde(default, deserialize_with = "lenient_string")]
    pub appointment_type: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub diagnosis: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub prescription: Option<String>,
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accept strings, numbers and booleans; anything else (including null) is empty
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_string).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_string))
}

/// Null, blank or non-scalar statuses fall back to the default status
fn lenient_status<'de, D>(deserializer: D) -> Result<AppointmentStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(value_to_string)
        .filter(|s| !s.trim().is_empty())
        .map(AppointmentStatus::from)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!(AppointmentStatus::from_str("completed"), AppointmentStatus::Completed);
        assert_eq!(AppointmentStatus::from_str("Canceled"), AppointmentStatus::Cancelled);
        assert_eq!(
            AppointmentStatus::from_str("No-Show"),
            AppointmentStatus::Other("No-Show".to_string())
        );
    }

    #[test]
    fn test_record_deserializes_sparse_payload() {
        let json = r#"{
            "date": "2024-03-05",
            "patientName": "Ada Lovelace",
            "mobileNumber": 5551234,
            "status": "Confirmed",
            "gender": null
        }"#;
        let record: AppointmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.patient_name, "Ada Lovelace");
        assert_eq!(record.mobile_number, "5551234");
        assert_eq!(record.gender, "");
        assert_eq!(record.status, AppointmentStatus::Confirmed);
        assert_eq!(record.diagnosis, None);
    }

    #[test]
    fn test_record_keeps_rows_with_odd_status() {
        let rows: Vec<AppointmentRecord> = serde_json::from_str(
            r#"[
                {"date": "2024-03-05", "patientName": "A", "status": null},
                {"date": "2024-03-06", "patientName": "B", "status": 3},
                {"date": "2024-03-07", "patientName": "C", "status": {"code": 1}},
                {"date": "2024-03-08", "patientName": "D", "status": " "}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].status, AppointmentStatus::Pending);
        assert_eq!(rows[1].status, AppointmentStatus::Other("3".to_string()));
        assert_eq!(rows[2].status, AppointmentStatus::Pending);
        assert_eq!(rows[3].status, AppointmentStatus::Pending);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = AppointmentRecord {
            patient_name: "Grace".to_string(),
            status: AppointmentStatus::Cancelled,
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["patientName"], "Grace");
        assert_eq!(value["status"], "Cancelled");
    }
}
