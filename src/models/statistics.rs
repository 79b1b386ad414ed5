//! Report statistics model
//!
//! `RawReportStatistics` mirrors the loosely-typed payload returned by the
//! reporting API: every field may be missing, null, or of the wrong type.
//! `normalize` turns it into a `ReportStatistics` where every count is
//! present, defaulting to zero.
//!
//! The coalescing rule is "value or zero": a missing value and a zero value
//! are treated the same, so the dedicated `cancelledAppointments` and
//! `completedAppointments` fields fall back to the status breakdown whenever
//! they are absent *or* zero.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::appointment::AppointmentRecord;
use super::period::ReportPeriod;

/// Appointment counts by patient gender
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderWise {
    #[serde(rename = "Male")]
    pub male: u64,
    #[serde(rename = "Female")]
    pub female: u64,
    #[serde(rename = "Other")]
    pub other: u64,
}

/// Appointment counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusWise {
    #[serde(rename = "Pending")]
    pub pending: u64,
    #[serde(rename = "Confirmed")]
    pub confirmed: u64,
    #[serde(rename = "Completed")]
    pub completed: u64,
    #[serde(rename = "Cancelled")]
    pub cancelled: u64,
}

/// Fully populated report record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatistics {
    pub total_appointments: u64,
    pub gender_wise: GenderWise,
    pub status_wise: StatusWise,
    pub cancelled_appointments: u64,
    pub completed_appointments: u64,
    pub detailed_data: Vec<AppointmentRecord>,
    pub start_date: String,
    pub end_date: String,
}

impl ReportStatistics {
    /// All-zero record for `period`, used when the payload is unusable
    pub fn empty(period: &ReportPeriod) -> Self {
        Self {
            total_appointments: 0,
            gender_wise: GenderWise::default(),
            status_wise: StatusWise::default(),
            cancelled_appointments: 0,
            completed_appointments: 0,
            detailed_data: Vec::new(),
            start_date: period.start_iso(),
            end_date: period.end_iso(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_appointments == 0 && self.detailed_data.is_empty()
    }
}

// ============================================================================
// Raw Payload Types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawGenderWise {
    #[serde(rename = "Male", default, deserialize_with = "lenient_count")]
    pub male: Option<u64>,
    #[serde(rename = "Female", default, deserialize_with = "lenient_count")]
    pub female: Option<u64>,
    #[serde(rename = "Other", default, deserialize_with = "lenient_count")]
    pub other: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawStatusWise {
    #[serde(rename = "Pending", default, deserialize_with = "lenient_count")]
    pub pending: Option<u64>,
    #[serde(rename = "Confirmed", default, deserialize_with = "lenient_count")]
    pub confirmed: Option<u64>,
    #[serde(rename = "Completed", default, deserialize_with = "lenient_count")]
    pub completed: Option<u64>,
    #[serde(rename = "Cancelled", default, deserialize_with = "lenient_count")]
    pub cancelled: Option<u64>,
}

/// Report payload as received from the API
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReportStatistics {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_appointments: Option<u64>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub gender_wise: Option<RawGenderWise>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub status_wise: Option<RawStatusWise>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub cancelled_appointments: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub completed_appointments: Option<u64>,
    #[serde(default)]
    pub detailed_data: Option<Value>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end_date: Option<String>,
}

/// Any JSON number becomes a count: negatives clamp to zero, fractions truncate.
/// Everything else (missing, null, strings, booleans, containers) is `None`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn count_from_value(value: &Value) -> Option<u64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(u) = n.as_u64() {
        return Some(u);
    }
    let f = n.as_f64()?;
    if f.is_nan() {
        return None;
    }
    Some(f.max(0.0).trunc() as u64)
}

fn lenient_nested<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(Value::is_object)
        .and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

fn or_zero(value: Option<u64>) -> u64 {
    value.unwrap_or(0)
}

/// Treats zero the same as missing
fn truthy(value: Option<u64>) -> Option<u64> {
    value.filter(|n| *n != 0)
}

fn parse_detailed_data(value: Option<Value>) -> Vec<AppointmentRecord> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<AppointmentRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping malformed appointment row {}: {}", index, e),
        }
    }
    records
}

/// Normalize a raw payload into a complete record for the requested period.
///
/// A payload without a numeric `totalAppointments` is discarded and replaced
/// by `ReportStatistics::empty(period)`.
pub fn normalize(raw: RawReportStatistics, period: &ReportPeriod) -> ReportStatistics {
    let Some(total_appointments) = raw.total_appointments else {
        tracing::debug!(
            "Report payload for {} has no numeric totalAppointments, using empty report",
            period.label()
        );
        return ReportStatistics::empty(period);
    };

    let gender = raw.gender_wise.unwrap_or_default();
    let status = raw.status_wise.unwrap_or_default();

    let status_wise = StatusWise {
        pending: or_zero(status.pending),
        confirmed: or_zero(status.confirmed),
        completed: or_zero(status.completed),
        cancelled: or_zero(status.cancelled),
    };

    ReportStatistics {
        total_appointments,
        gender_wise: GenderWise {
            male: or_zero(gender.male),
            female: or_zero(gender.female),
            other: or_zero(gender.other),
        },
        status_wise,
        cancelled_appointments: truthy(raw.cancelled_appointments).unwrap_or(status_wise.cancelled),
        completed_appointments: truthy(raw.completed_appointments).unwrap_or(status_wise.completed),
        detailed_data: parse_detailed_data(raw.detailed_data),
        start_date: raw.start_date.unwrap_or_else(|| period.start_iso()),
        end_date: raw.end_date.unwrap_or_else(|| period.end_iso()),
    }
}
