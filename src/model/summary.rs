use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::attendance::AttendanceStatus;
use super::employee::Employee;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DepartmentCount {
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 4)]
    pub count: i64,
}

/// One of the latest attendance marks, joined with the owning employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct RecentAttendance {
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "2024-01-01")]
    pub date: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    #[schema(example = 12)]
    pub total_employees: i64,
    #[schema(example = 9)]
    pub present_today: i64,
    #[schema(example = 2)]
    pub absent_today: i64,
    #[schema(example = json!(["Engineering", "Finance"]))]
    pub departments: Vec<String>,
    pub department_counts: Vec<DepartmentCount>,
    pub recent_employees: Vec<Employee>,
    pub recent_attendance: Vec<RecentAttendance>,
}
