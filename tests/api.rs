//! HTTP-level tests: routing, validation, envelopes and status mapping.

mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web::Data};
use chrono::Utc;
use serde_json::{Value, json};

use common::memory_pool;
use hrms_lite::config::Config;
use hrms_lite::routes;

macro_rules! app {
    ($pool:expr) => {
        app!($pool, Config::default().rate_per_min)
    };
    ($pool:expr, $rate:expr) => {{
        let config = Config {
            list_limit_max: 3,
            rate_per_min: $rate,
            ..Config::default()
        };
        let limiter = routes::build_limiter(config.rate_per_min).unwrap();
        test::init_service(
            App::new()
                .app_data(Data::new($pool.clone()))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| routes::configure(cfg, &config, &limiter)),
        )
        .await
    }};
}

/// The limiter keys on the peer IP, which test requests lack by default.
fn from_client(req: test::TestRequest) -> test::TestRequest {
    req.peer_addr("127.0.0.1:40000".parse().unwrap())
}

/// Sends the request and returns the status with the decoded JSON body.
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, from_client($req).to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn ann() -> Value {
    json!({
        "employee_code": "E1",
        "full_name": "Ann Lee",
        "email": "ann@x.com",
        "department": "Eng"
    })
}

#[actix_web::test]
async fn health_reports_ok() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn employee_crud_round_trip() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/api/employees").set_json(ann())
    );
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["employee_code"], "E1");

    let (status, body) = send!(app, test::TestRequest::get().uri(&format!("/api/employees/{id}")));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["full_name"], "Ann Lee");

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/employees/code/E1"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/employees/{id}"))
            .set_json(json!({
                "employee_code": "E1",
                "full_name": "Ann Smith",
                "email": "ann.smith@x.com",
                "department": "Finance"
            }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["department"], "Finance");

    let (status, body) = send!(app, test::TestRequest::delete().uri(&format!("/api/employees/{id}")));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["full_name"], "Ann Smith");

    let (status, body) = send!(app, test::TestRequest::get().uri(&format!("/api/employees/{id}")));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Employee not found");
}

#[actix_web::test]
async fn create_sanitizes_input() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/api/employees").set_json(json!({
            "employee_code": "  E9 ",
            "full_name": " Zoe ",
            "email": " Zoe@Example.COM ",
            "department": " Ops "
        }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["employee_code"], "E9");
    assert_eq!(body["data"]["email"], "zoe@example.com");
    assert_eq!(body["data"]["department"], "Ops");
}

#[actix_web::test]
async fn create_rejects_invalid_payloads() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/api/employees").set_json(json!({
            "employee_code": "E1",
            "full_name": "Ann Lee",
            "email": "not-an-email",
            "department": "Eng"
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["details"], json!(["Invalid email format"]));

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/employees")
            .set_json(json!({ "employee_code": "E1" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn duplicates_are_conflicts() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let (status, _) = send!(app, test::TestRequest::post().uri("/api/employees").set_json(ann()));
    assert_eq!(status, StatusCode::CREATED);

    let mut same_code = ann();
    same_code["email"] = json!("someone@x.com");
    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/api/employees").set_json(same_code)
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Duplicate Employee Code");

    let mut same_email = ann();
    same_email["employee_code"] = json!("E2");
    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/api/employees").set_json(same_email)
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Duplicate Email");
}

#[actix_web::test]
async fn list_is_paged_and_limit_is_capped() {
    let pool = memory_pool().await;
    let app = app!(pool);

    for i in 0..5 {
        let (status, _) = send!(
            app,
            test::TestRequest::post().uri("/api/employees").set_json(json!({
                "employee_code": format!("E{i}"),
                "full_name": format!("Person {i}"),
                "email": format!("p{i}@x.com"),
                "department": "Eng"
            }))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/employees?limit=50"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 3);
    assert_eq!(body["count"], 3);
    assert_eq!(body["total"], 5);
    assert_eq!(body["data"][0]["employee_code"], "E0");

    let (_, body) = send!(app, test::TestRequest::get().uri("/api/employees?offset=3&limit=2"));
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["employee_code"], "E3");
}

#[actix_web::test]
async fn unknown_employee_is_not_found_everywhere() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let mark = json!({ "date": "2024-01-01", "status": "Present" });
    let cases = [
        test::TestRequest::get().uri("/api/employees/99"),
        test::TestRequest::put().uri("/api/employees/99").set_json(ann()),
        test::TestRequest::delete().uri("/api/employees/99"),
        test::TestRequest::get().uri("/api/employees/code/NOPE"),
        test::TestRequest::post().uri("/api/attendance/99").set_json(mark.clone()),
        test::TestRequest::get().uri("/api/attendance/99"),
        test::TestRequest::get().uri("/api/attendance/99/summary"),
        test::TestRequest::post().uri("/api/attendance").set_json(json!({
            "employee_code": "NOPE",
            "date": "2024-01-01",
            "status": "Present"
        })),
    ];

    for req in cases {
        let (status, body) = send!(app, req);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Employee not found");
    }
}

#[actix_web::test]
async fn update_of_missing_employee_with_taken_code_is_not_found() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let (status, _) = send!(
        app,
        test::TestRequest::post().uri("/api/employees").set_json(ann())
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        test::TestRequest::put().uri("/api/employees/999").set_json(ann())
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Employee not found");
}

#[actix_web::test]
async fn malformed_path_ids_are_bad_requests() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let mark = json!({ "date": "2024-01-01", "status": "Present" });
    let cases = [
        test::TestRequest::get().uri("/api/employees/abc"),
        test::TestRequest::put().uri("/api/employees/abc").set_json(ann()),
        test::TestRequest::delete().uri("/api/employees/abc"),
        test::TestRequest::post().uri("/api/attendance/abc").set_json(mark),
        test::TestRequest::get().uri("/api/attendance/abc/summary"),
    ];

    for req in cases {
        let (status, body) = send!(app, req);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().is_some_and(|m| m.contains("abc")));
    }
}

#[actix_web::test]
async fn api_scope_is_rate_limited_per_client() {
    let pool = memory_pool().await;
    let app = app!(pool, 1);

    let (status, _) = send!(app, test::TestRequest::get().uri("/api/health"));
    assert_eq!(status, StatusCode::OK);

    let req = from_client(test::TestRequest::get().uri("/api/health")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[actix_web::test]
async fn attendance_flow_by_id_and_code() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let (_, body) = send!(app, test::TestRequest::post().uri("/api/employees").set_json(ann()));
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/attendance/{id}"))
            .set_json(json!({ "date": "2024-01-01", "status": "Present" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Present");
    assert_eq!(body["data"]["date"], "2024-01-01");

    // Same day again through the code-based route overwrites it.
    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/api/attendance").set_json(json!({
            "employee_code": "E1",
            "date": "2024-01-01",
            "status": "Absent"
        }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Absent");

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/attendance/{id}"))
            .set_json(json!({ "date": "2024-01-02", "status": "Present" }))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance/{id}?start_date=2024-01-01&end_date=2024-01-01"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["status"], "Absent");

    let (_, body) = send!(app, test::TestRequest::get().uri(&format!("/api/attendance/{id}")));
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["date"], "2024-01-02");

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/attendance/{id}/summary"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["employee_code"], "E1");
    assert_eq!(body["data"]["full_name"], "Ann Lee");
    assert_eq!(body["data"]["total_records"], 2);
    assert_eq!(body["data"]["total_present"], 1);
    assert_eq!(body["data"]["total_absent"], 1);
}

#[actix_web::test]
async fn attendance_input_is_validated() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let (_, body) = send!(app, test::TestRequest::post().uri("/api/employees").set_json(ann()));
    let id = body["data"]["id"].as_i64().unwrap();

    let bad_bodies = [
        json!({ "date": "2024-01-01", "status": "Late" }),
        json!({ "date": "2024-13-01", "status": "Present" }),
        json!({ "date": "01/02/2024", "status": "Present" }),
        json!({ "status": "Present" }),
    ];
    for bad in bad_bodies {
        let (status, _) = send!(
            app,
            test::TestRequest::post()
                .uri(&format!("/api/attendance/{id}"))
                .set_json(bad)
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/api/attendance").set_json(json!({
            "employee_code": "   ",
            "date": "2024-01-01",
            "status": "Present"
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], json!(["Employee code is required"]));

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance/{id}?start_date=2024-02-01&end_date=2024-01-01"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/attendance/{id}?start_date=yesterday"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn dashboard_reflects_today() {
    let pool = memory_pool().await;
    let app = app!(pool);

    let (_, body) = send!(app, test::TestRequest::post().uri("/api/employees").set_json(ann()));
    let id = body["data"]["id"].as_i64().unwrap();
    let today = Utc::now().date_naive().to_string();

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/attendance/{id}"))
            .set_json(json!({ "date": today, "status": "Present" }))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/dashboard/summary"));
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total_employees"], 1);
    assert_eq!(data["present_today"], 1);
    assert_eq!(data["absent_today"], 0);
    assert_eq!(data["departments"], json!(["Eng"]));
    assert_eq!(data["recent_employees"][0]["employee_code"], "E1");
    assert_eq!(data["recent_attendance"][0]["full_name"], "Ann Lee");
    assert_eq!(data["recent_attendance"][0]["date"], today);
}
