use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::error::{ApiError, acquire};
use crate::config::Config;
use crate::error::StoreError;
use crate::model::{Employee, NewEmployee};
use crate::store::employee as store;

pub const DEFAULT_LIMIT: i64 = 100;

/// Body for both create and full-replace update.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct EmployeePayload {
    #[schema(example = "EMP-001")]
    #[validate(length(min = 1, message = "Employee code is required"))]
    pub employee_code: String,
    #[schema(example = "John Doe")]
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[schema(example = "john@email.com", format = "email")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[schema(example = "Engineering")]
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
}

impl EmployeePayload {
    /// Trims every field and lowercases the email, then validates.
    pub fn into_new_employee(self) -> Result<NewEmployee, ApiError> {
        let payload = EmployeePayload {
            employee_code: self.employee_code.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            department: self.department.trim().to_string(),
        };
        payload.validate()?;

        Ok(NewEmployee {
            employee_code: payload.employee_code,
            full_name: payload.full_name,
            email: payload.email,
            department: payload.department,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Number of employees to skip
    #[param(example = 0)]
    pub offset: Option<i64>,
    /// Page size, capped by the server
    #[param(example = 100)]
    pub limit: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub count: usize,
    #[schema(example = 0)]
    pub offset: i64,
    #[schema(example = 100)]
    pub limit: i64,
    #[schema(example = 1)]
    pub total: i64,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Employee created successfully", body = Employee),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "message": "Validation failed",
            "details": ["Invalid email format"]
        })),
        (status = 409, description = "Employee code or email already in use", body = Object, example = json!({
            "message": "Duplicate Email",
            "details": ["An employee with email \"john@email.com\" is already registered"]
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.into_inner().into_new_employee()?;

    let mut conn = acquire(pool.get_ref()).await?;
    let employee = store::create_employee(&mut conn, &new).await?;

    Ok(HttpResponse::Created().json(json!({
        "data": employee,
        "message": "Employee created successfully"
    })))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(ListQuery),
    responses(
        (status = 200, description = "Employees ordered by id", body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let offset = query.offset.unwrap_or(0).max(0);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, config.list_limit_max.max(1));
    debug!(offset, limit, "Listing employees");

    let mut conn = acquire(pool.get_ref()).await?;
    let employees = store::list_employees(&mut conn, offset, limit).await?;
    let total = store::count_employees(&mut conn).await?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        count: employees.len(),
        data: employees,
        offset,
        limit,
        total,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let mut conn = acquire(pool.get_ref()).await?;
    let employee = store::get_employee(&mut conn, employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "data": employee })))
}

/// Get Employee by external employee code
#[utoipa::path(
    get,
    path = "/api/employees/code/{employee_code}",
    params(
        ("employee_code" = String, Path, description = "Externally assigned employee code")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_employee_by_code(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let code = path.into_inner();

    let mut conn = acquire(pool.get_ref()).await?;
    let employee = store::get_employee_by_code(&mut conn, code.trim())
        .await?
        .ok_or(StoreError::NotFound)?;

    Ok(HttpResponse::Ok().json(json!({ "data": employee })))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee ID")
    ),
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Employee updated successfully", body = Employee),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 409, description = "Employee code or email owned by another employee")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let update = payload.into_inner().into_new_employee()?;

    let mut conn = acquire(pool.get_ref()).await?;
    let employee = store::update_employee(&mut conn, employee_id, &update).await?;

    Ok(HttpResponse::Ok().json(json!({
        "data": employee,
        "message": "Employee updated successfully"
    })))
}

/// Delete Employee along with its attendance history
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let mut conn = acquire(pool.get_ref()).await?;
    let employee = store::delete_employee(&mut conn, employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "data": employee,
        "message": "Employee deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(code: &str, name: &str, email: &str, department: &str) -> EmployeePayload {
        EmployeePayload {
            employee_code: code.to_string(),
            full_name: name.to_string(),
            email: email.to_string(),
            department: department.to_string(),
        }
    }

    #[test]
    fn payload_is_trimmed_and_email_lowercased() {
        let new = payload("  E1 ", " Ann Lee ", " Ann@X.com ", " Eng ")
            .into_new_employee()
            .unwrap();
        assert_eq!(new, NewEmployee::new("E1", "Ann Lee", "ann@x.com", "Eng"));
    }

    #[test]
    fn blank_fields_and_bad_email_are_rejected() {
        let err = payload(" ", "", "not-an-email", "  ")
            .into_new_employee()
            .unwrap_err();
        match err {
            ApiError::Validation(details) => assert_eq!(
                details,
                vec![
                    "Department is required",
                    "Employee code is required",
                    "Full name is required",
                    "Invalid email format",
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
