use chrono::NaiveDate;
use sqlx::{Connection, SqliteConnection};
use tracing::debug;

use crate::error::StoreResult;
use crate::model::{DashboardSummary, DepartmentCount, Employee, RecentAttendance};

pub const RECENT_EMPLOYEES: i64 = 5;
pub const RECENT_ATTENDANCE: i64 = 10;

/// Organisation-wide dashboard figures, recomputed on every call.
///
/// `today` is supplied by the caller so the result is reproducible for a given
/// date. All reads run in one transaction and see the same snapshot.
pub async fn get_dashboard_summary(
    conn: &mut SqliteConnection,
    today: NaiveDate,
) -> StoreResult<DashboardSummary> {
    let mut tx = conn.begin().await?;

    let total_employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(&mut *tx)
        .await?;

    let (present_today, absent_today) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COUNT(CASE WHEN status = 'Present' THEN 1 END),
            COUNT(CASE WHEN status = 'Absent' THEN 1 END)
        FROM attendance
        WHERE date = ?
        "#,
    )
    .bind(today)
    .fetch_one(&mut *tx)
    .await?;

    let department_counts = sqlx::query_as::<_, DepartmentCount>(
        r#"
        SELECT department, COUNT(*) AS count
        FROM employees
        GROUP BY department
        ORDER BY count DESC, department ASC
        "#,
    )
    .fetch_all(&mut *tx)
    .await?;

    let mut departments: Vec<String> = department_counts
        .iter()
        .map(|d| d.department.clone())
        .collect();
    departments.sort();

    let recent_employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_code, full_name, email, department, created_at
        FROM employees
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(RECENT_EMPLOYEES)
    .fetch_all(&mut *tx)
    .await?;

    let recent_attendance = sqlx::query_as::<_, RecentAttendance>(
        r#"
        SELECT a.employee_id, e.employee_code, e.full_name, a.date, a.status
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        ORDER BY a.id DESC
        LIMIT ?
        "#,
    )
    .bind(RECENT_ATTENDANCE)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    debug!(
        %today,
        total_employees,
        present_today,
        absent_today,
        "Dashboard summary computed"
    );

    Ok(DashboardSummary {
        total_employees,
        present_today,
        absent_today,
        departments,
        department_counts,
        recent_employees,
        recent_attendance,
    })
}
