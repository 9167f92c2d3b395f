#![allow(dead_code)]

use std::str::FromStr;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use hrms_lite::model::{Employee, NewEmployee};
use hrms_lite::store::employee;

/// Single-connection in-memory database with the schema applied. The
/// connection is never recycled, otherwise the database would vanish with it.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    hrms_lite::db::migrate(&pool).await.unwrap();
    pool
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_employee(code: &str, department: &str) -> NewEmployee {
    NewEmployee::new(
        code,
        format!("Employee {code}"),
        format!("{}@example.com", code.to_lowercase()),
        department,
    )
}

pub async fn seed(pool: &SqlitePool, code: &str, department: &str) -> Employee {
    let mut conn = pool.acquire().await.unwrap();
    employee::create_employee(&mut conn, &new_employee(code, department))
        .await
        .unwrap()
}
