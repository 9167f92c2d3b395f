use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::api::error::{ApiError, acquire};
use crate::error::StoreError;
use crate::model::{Attendance, AttendanceStatus, MarkedAttendance};
use crate::store::{attendance as store, employee as employee_store};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Present")]
    pub status: AttendanceStatus,
}

/// Mark attendance addressed by the external employee code.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MarkAttendanceByCode {
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Absent")]
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Inclusive lower bound
    #[param(value_type = Option<String>, example = "2024-01-01")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound
    #[param(value_type = Option<String>, example = "2024-01-31")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<Attendance>,
    #[schema(example = 1)]
    pub count: usize,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeAttendanceSummary {
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = 5)]
    pub total_records: i64,
    #[schema(example = 3)]
    pub total_present: i64,
    #[schema(example = 2)]
    pub total_absent: i64,
}

fn marked_response(marked: MarkedAttendance) -> HttpResponse {
    if marked.created {
        HttpResponse::Created().json(json!({
            "data": marked.record,
            "message": "Attendance marked successfully"
        }))
    } else {
        HttpResponse::Ok().json(json!({
            "data": marked.record,
            "message": "Attendance updated successfully"
        }))
    }
}

/// Mark attendance by system id
#[utoipa::path(
    post,
    path = "/api/attendance/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee ID")
    ),
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance marked", body = Attendance),
        (status = 200, description = "Existing attendance for that date overwritten", body = Attendance),
        (status = 400, description = "Malformed date or status"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let MarkAttendance { date, status } = payload.into_inner();

    let mut conn = acquire(pool.get_ref()).await?;
    employee_store::get_employee(&mut conn, employee_id).await?;
    let marked = store::mark_attendance(&mut conn, employee_id, date, status).await?;

    Ok(marked_response(marked))
}

/// Mark attendance by employee code
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendanceByCode,
    responses(
        (status = 201, description = "Attendance marked", body = Attendance),
        (status = 200, description = "Existing attendance for that date overwritten", body = Attendance),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance_by_code(
    pool: web::Data<SqlitePool>,
    payload: web::Json<MarkAttendanceByCode>,
) -> Result<HttpResponse, ApiError> {
    let MarkAttendanceByCode {
        employee_code,
        date,
        status,
    } = payload.into_inner();

    let employee_code = employee_code.trim();
    if employee_code.is_empty() {
        return Err(ApiError::Validation(vec![
            "Employee code is required".to_string(),
        ]));
    }

    let mut conn = acquire(pool.get_ref()).await?;
    let employee = employee_store::get_employee_by_code(&mut conn, employee_code)
        .await?
        .ok_or(StoreError::NotFound)?;
    let marked = store::mark_attendance(&mut conn, employee.id, date, status).await?;

    Ok(marked_response(marked))
}

/// Attendance history for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee ID"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "Attendance records, newest date first", body = AttendanceListResponse),
        (status = 400, description = "start_date is after end_date"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let AttendanceQuery {
        start_date,
        end_date,
    } = query.into_inner();

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(ApiError::Validation(vec![
                "start_date cannot be after end_date".to_string(),
            ]));
        }
    }

    let mut conn = acquire(pool.get_ref()).await?;
    employee_store::get_employee(&mut conn, employee_id).await?;
    let records = store::get_attendance(&mut conn, employee_id, start_date, end_date).await?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        count: records.len(),
        data: records,
    }))
}

/// Present/absent totals for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}/summary",
    params(
        ("employee_id" = i64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Attendance totals", body = EmployeeAttendanceSummary),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance_summary(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let mut conn = acquire(pool.get_ref()).await?;
    let employee = employee_store::get_employee(&mut conn, employee_id).await?;
    let summary = store::get_attendance_summary(&mut conn, employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "data": EmployeeAttendanceSummary {
            employee_id: employee.id,
            employee_code: employee.employee_code,
            full_name: employee.full_name,
            total_records: summary.total_records,
            total_present: summary.total_present,
            total_absent: summary.total_absent,
        }
    })))
}
