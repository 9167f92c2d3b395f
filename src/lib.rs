//! HRMS Lite: employee records, daily attendance and a dashboard summary,
//! served over actix-web with SQLite storage.

pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod routes;
pub mod store;
