use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;

use crate::api::error::{ApiError, acquire};
use crate::model::DashboardSummary;
use crate::store::summary as store;

/// Dashboard summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    responses(
        (status = 200, description = "Organisation-wide figures for today (UTC)", body = DashboardSummary)
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_summary(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let today = Utc::now().date_naive();

    let mut conn = acquire(pool.get_ref()).await?;
    let summary = store::get_dashboard_summary(&mut conn, today).await?;

    Ok(HttpResponse::Ok().json(json!({ "data": summary })))
}
