use crate::{
    api::{attendance, permission, report, task},
    auth::middleware::auth_middleware,
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::{Result, anyhow};
use std::sync::Arc;

pub type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` with a burst of the same size.
pub fn build_limiter(requests_per_min: u32) -> Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("Invalid rate limit of {requests_per_min} requests per minute"))?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Arc<Limiter>) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(limiter) // rate limiting
            .configure(protected_services),
    );
}

/// Everything behind the bearer token, relative to the API prefix.
pub fn protected_services(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid request body: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid path: {err}")).into()
    }))
    .service(
        web::scope("/attendance")
            // /attendance
            .service(web::resource("").route(web::post().to(attendance::record_action)))
            // /attendance/today/{user_id}
            .service(web::resource("/today/{user_id}").route(web::get().to(attendance::today)))
            // /attendance/records/{user_id}/{month}/{year}
            .service(
                web::resource("/records/{user_id}/{month}/{year}")
                    .route(web::get().to(attendance::month_records)),
            )
            // /attendance/{id}
            .service(web::resource("/{id}").route(web::delete().to(attendance::delete_record)))
            // /attendance/{id}/tasks
            .service(
                web::resource("/{id}/tasks")
                    .route(web::get().to(task::list_tasks))
                    .route(web::post().to(task::add_task)),
            )
            // /attendance/{id}/tasks/delete (before /{task_id}, which would swallow it)
            .service(web::resource("/{id}/tasks/delete").route(web::put().to(task::delete_tasks)))
            // /attendance/{id}/tasks/{task_id}
            .service(
                web::resource("/{id}/tasks/{task_id}")
                    .route(web::patch().to(task::update_task))
                    .route(web::delete().to(task::delete_task)),
            ),
    )
    .service(
        web::scope("/reports")
            // /reports/monthly/{user_id}/{month}/{year}
            .service(
                web::resource("/monthly/{user_id}/{month}/{year}")
                    .route(web::get().to(report::monthly_report)),
            ),
    )
    .service(
        web::scope("/permissions")
            // /permissions
            .service(
                web::resource("")
                    .route(web::get().to(permission::list_permissions))
                    .route(web::post().to(permission::create_permission)),
            )
            // /permissions/monthly/{user_id}/{month}/{year}
            .service(
                web::resource("/monthly/{user_id}/{month}/{year}")
                    .route(web::get().to(permission::monthly_permissions)),
            )
            // /permissions/{id}
            .service(
                web::resource("/{id}")
                    .route(web::put().to(permission::update_permission))
                    .route(web::delete().to(permission::delete_permission)),
            ),
    );
}
