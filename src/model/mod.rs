pub mod attendance;
pub mod employee;
pub mod summary;

pub use attendance::{Attendance, AttendanceStatus, AttendanceSummary, MarkedAttendance};
pub use employee::{Employee, NewEmployee};
pub use summary::{DashboardSummary, DepartmentCount, RecentAttendance};
