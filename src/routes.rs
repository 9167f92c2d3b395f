use crate::{
    api::{ApiError, attendance, dashboard, employee, health},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

/// Per-peer-IP quota of `requests_per_min` with an equal burst. The config is
/// shared by every worker's `Governor`, so all workers draw from one budget.
pub fn build_limiter(
    requests_per_min: u32,
) -> Option<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

/// Parse failures on JSON bodies, query strings and path segments come back
/// as 400 `{message}`.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    );
}

/// Mounts every endpoint under `config.api_prefix`, rate limited per peer IP.
pub fn configure(
    cfg: &mut web::ServiceConfig,
    config: &Config,
    limiter: &GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>,
) {
    extractor_configs(cfg);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(limiter))
            .route("/health", web::get().to(health::health))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/code/{employee_code}
                    .service(
                        web::resource("/code/{employee_code}")
                            .route(web::get().to(employee::get_employee_by_code)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::mark_attendance_by_code)),
                    )
                    // /attendance/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::post().to(attendance::mark_attendance))
                            .route(web::get().to(attendance::get_attendance)),
                    )
                    // /attendance/{employee_id}/summary
                    .service(
                        web::resource("/{employee_id}/summary")
                            .route(web::get().to(attendance::get_attendance_summary)),
                    ),
            )
            .service(
                web::scope("/dashboard")
                    .route("/summary", web::get().to(dashboard::dashboard_summary)),
            ),
    );
}
