use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Stored as the TEXT `Present` / `Absent`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(example = "2024-01-01T09:00:00", format = "date-time", value_type = String)]
    pub created_at: NaiveDateTime,
}

/// Result of marking attendance; `created` is false when an existing row for
/// the same date was overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedAttendance {
    pub record: Attendance,
    pub created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSummary {
    #[schema(example = 5)]
    pub total_records: i64,
    #[schema(example = 3)]
    pub total_present: i64,
    #[schema(example = 2)]
    pub total_absent: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_serializes_as_variant_name() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"Present\""
        );
        assert_eq!(AttendanceStatus::Absent.to_string(), "Absent");
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert!(serde_json::from_str::<AttendanceStatus>("\"Late\"").is_err());
        assert!(serde_json::from_str::<AttendanceStatus>("\"present\"").is_err());
        assert_eq!(
            AttendanceStatus::from_str("Absent").unwrap(),
            AttendanceStatus::Absent
        );
    }
}
