use sqlx::{Connection, SqliteConnection};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::model::{Employee, NewEmployee};

const SELECT_EMPLOYEE: &str = r#"
    SELECT id, employee_code, full_name, email, department, created_at
    FROM employees
"#;

/// Inserts a new employee.
///
/// Code and email are looked up first so the caller gets a precise error. The
/// insert itself is a single statement; if a concurrent create wins the race
/// the UNIQUE constraint rejects this one and it is reported the same way.
pub async fn create_employee(
    conn: &mut SqliteConnection,
    new: &NewEmployee,
) -> StoreResult<Employee> {
    ensure_unique(conn, new, None).await?;

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        INSERT INTO employees (employee_code, full_name, email, department)
        VALUES (?, ?, ?, ?)
        RETURNING id, employee_code, full_name, email, department, created_at
        "#,
    )
    .bind(&new.employee_code)
    .bind(&new.full_name)
    .bind(&new.email)
    .bind(&new.department)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| map_unique_violation(e, new))?;

    info!(
        id = employee.id,
        employee_code = %employee.employee_code,
        "Employee created"
    );
    Ok(employee)
}

pub async fn get_employee(conn: &mut SqliteConnection, id: i64) -> StoreResult<Employee> {
    sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StoreError::NotFound)
}

pub async fn get_employee_by_code(
    conn: &mut SqliteConnection,
    code: &str,
) -> StoreResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} WHERE employee_code = ?"))
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(employee)
}

pub async fn get_employee_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> StoreResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} WHERE email = ?"))
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(employee)
}

/// Page of employees in `id` order. No cap is applied here.
pub async fn list_employees(
    conn: &mut SqliteConnection,
    offset: i64,
    limit: i64,
) -> StoreResult<Vec<Employee>> {
    debug!(offset, limit, "Fetching employees");

    let employees = sqlx::query_as::<_, Employee>(&format!(
        "{SELECT_EMPLOYEE} ORDER BY id ASC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(&mut *conn)
    .await?;
    Ok(employees)
}

pub async fn count_employees(conn: &mut SqliteConnection) -> StoreResult<i64> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(&mut *conn)
        .await?;
    Ok(total)
}

/// Replaces all four mutable fields. A missing id is `NotFound` even when the
/// payload carries keys owned by someone else; a code or email that belongs
/// to a different employee is rejected.
pub async fn update_employee(
    conn: &mut SqliteConnection,
    id: i64,
    update: &NewEmployee,
) -> StoreResult<Employee> {
    get_employee(conn, id).await?;
    ensure_unique(conn, update, Some(id)).await?;

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        UPDATE employees
        SET employee_code = ?, full_name = ?, email = ?, department = ?
        WHERE id = ?
        RETURNING id, employee_code, full_name, email, department, created_at
        "#,
    )
    .bind(&update.employee_code)
    .bind(&update.full_name)
    .bind(&update.email)
    .bind(&update.department)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| map_unique_violation(e, update))?
    .ok_or(StoreError::NotFound)?;

    info!(id, employee_code = %employee.employee_code, "Employee updated");
    Ok(employee)
}

/// Deletes the employee and every attendance row it owns in one transaction.
pub async fn delete_employee(conn: &mut SqliteConnection, id: i64) -> StoreResult<Employee> {
    let mut tx = conn.begin().await?;

    // Counted here; the FK cascade would remove these silently.
    let removed = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        DELETE FROM employees
        WHERE id = ?
        RETURNING id, employee_code, full_name, email, department, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(StoreError::NotFound)?;

    tx.commit().await?;

    info!(id, attendance_removed = removed, "Employee deleted");
    Ok(employee)
}

/// `exclude_id` skips the record being updated so it does not conflict with itself.
async fn ensure_unique(
    conn: &mut SqliteConnection,
    candidate: &NewEmployee,
    exclude_id: Option<i64>,
) -> StoreResult<()> {
    let owned_by_other = |e: &Employee| Some(e.id) != exclude_id;

    if get_employee_by_code(conn, &candidate.employee_code)
        .await?
        .is_some_and(|e| owned_by_other(&e))
    {
        return Err(StoreError::DuplicateCode(candidate.employee_code.clone()));
    }

    if get_employee_by_email(conn, &candidate.email)
        .await?
        .is_some_and(|e| owned_by_other(&e))
    {
        return Err(StoreError::DuplicateEmail(candidate.email.clone()));
    }

    Ok(())
}

fn map_unique_violation(err: sqlx::Error, candidate: &NewEmployee) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return if db_err.message().contains("employees.email") {
                StoreError::DuplicateEmail(candidate.email.clone())
            } else {
                StoreError::DuplicateCode(candidate.employee_code.clone())
            };
        }
    }
    StoreError::Database(err)
}
