//! Data models
//!
//! Report periods, normalized statistics and appointment detail rows.

mod appointment;
mod period;
mod statistics;

pub use appointment::{AppointmentRecord, AppointmentStatus};
pub use period::{last_day_of_month, parse_iso_date, ReportKind, ReportPeriod, ISO_DATE_FORMAT};
pub use statistics::{
    normalize, GenderWise, RawGenderWise, RawReportStatistics, RawStatusWise, ReportStatistics,
    StatusWise,
};
