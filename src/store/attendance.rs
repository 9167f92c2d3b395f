use chrono::NaiveDate;
use sqlx::{Connection, SqliteConnection};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::model::{Attendance, AttendanceStatus, AttendanceSummary, MarkedAttendance};

/// Records `status` for `(employee_id, date)`, overwriting any earlier mark
/// for that day.
///
/// The transaction opens with a write, so it holds the write lock from the
/// first statement and concurrent marks for the same pair serialize. The
/// UNIQUE(employee_id, date) constraint guarantees a single row; the foreign
/// key rejects unknown employees.
pub async fn mark_attendance(
    conn: &mut SqliteConnection,
    employee_id: i64,
    date: NaiveDate,
    status: AttendanceStatus,
) -> StoreResult<MarkedAttendance> {
    let mut tx = conn.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, status)
        VALUES (?, ?, ?)
        ON CONFLICT (employee_id, date) DO NOTHING
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .bind(status)
    .execute(&mut *tx)
    .await
    .map_err(map_missing_employee)?
    .rows_affected();

    let created = inserted == 1;
    if !created {
        sqlx::query("UPDATE attendance SET status = ? WHERE employee_id = ? AND date = ?")
            .bind(status)
            .bind(employee_id)
            .bind(date)
            .execute(&mut *tx)
            .await?;
    }

    let record = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, date, status, created_at
        FROM attendance
        WHERE employee_id = ? AND date = ?
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(employee_id, %date, %status, created, "Attendance marked");
    Ok(MarkedAttendance { record, created })
}

/// Attendance history, newest date first. Both bounds are inclusive.
pub async fn get_attendance(
    conn: &mut SqliteConnection,
    employee_id: i64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> StoreResult<Vec<Attendance>> {
    let mut sql = String::from(
        r#"
        SELECT id, employee_id, date, status, created_at
        FROM attendance
        WHERE employee_id = ?
        "#,
    );
    let mut bounds = Vec::with_capacity(2);

    if let Some(start) = start_date {
        sql.push_str(" AND date >= ?");
        bounds.push(start);
    }
    if let Some(end) = end_date {
        sql.push_str(" AND date <= ?");
        bounds.push(end);
    }
    sql.push_str(" ORDER BY date DESC");

    debug!(employee_id, ?start_date, ?end_date, "Fetching attendance");

    let mut query = sqlx::query_as::<_, Attendance>(&sql).bind(employee_id);
    for bound in bounds {
        query = query.bind(bound);
    }

    let records = query.fetch_all(&mut *conn).await?;
    Ok(records)
}

pub async fn get_attendance_summary(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> StoreResult<AttendanceSummary> {
    let (total_records, total_present, total_absent) = sqlx::query_as::<_, (i64, i64, i64)>(
        r#"
        SELECT
            COUNT(*),
            COUNT(CASE WHEN status = 'Present' THEN 1 END),
            COUNT(CASE WHEN status = 'Absent' THEN 1 END)
        FROM attendance
        WHERE employee_id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(AttendanceSummary {
        total_records,
        total_present,
        total_absent,
    })
}

fn map_missing_employee(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return StoreError::NotFound;
        }
    }
    StoreError::Database(err)
}
