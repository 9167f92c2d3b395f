use crate::api::attendance::{
    AttendanceListResponse, EmployeeAttendanceSummary, MarkAttendance, MarkAttendanceByCode,
};
use crate::api::employee::{EmployeeListResponse, EmployeePayload};
use crate::model::{
    Attendance, AttendanceStatus, DashboardSummary, DepartmentCount, Employee, RecentAttendance,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

A small human-resources record keeper.

### 🔹 Key Features
- **Employee Management**
  - Create, update, list, view and delete employee records
  - Employee code and email are unique across the organisation
- **Attendance Management**
  - One `Present` / `Absent` mark per employee per day; marking again overwrites
  - History with inclusive date-range filtering and per-employee totals
- **Dashboard**
  - Headcount, today's attendance, departments and recent activity

### 📦 Response Format
- JSON responses wrapped in `{ "data": ... }`
- Errors as `{ "message": ..., "details": [...] }`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::health::health,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::get_employee_by_code,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::mark_attendance_by_code,
        crate::api::attendance::get_attendance,
        crate::api::attendance::get_attendance_summary,

        crate::api::dashboard::dashboard_summary
    ),
    components(
        schemas(
            Employee,
            EmployeePayload,
            EmployeeListResponse,
            Attendance,
            AttendanceStatus,
            MarkAttendance,
            MarkAttendanceByCode,
            AttendanceListResponse,
            EmployeeAttendanceSummary,
            DashboardSummary,
            DepartmentCount,
            RecentAttendance
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Dashboard", description = "Organisation-wide summary"),
        (name = "Health", description = "Liveness check"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/employees",
            "/api/employees/{employee_id}",
            "/api/employees/code/{employee_code}",
            "/api/attendance",
            "/api/attendance/{employee_id}",
            "/api/attendance/{employee_id}/summary",
            "/api/dashboard/summary",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
