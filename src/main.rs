use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod services;
mod store;
mod timekeeping;
mod utils;

use config::Config;
use db::{init_db, run_migrations};

use crate::docs::ApiDoc;
use crate::services::attendance::AttendanceService;
use crate::services::report::ReportService;
use crate::services::task::TaskService;
use crate::store::{AttendanceStore, TaskStore};
use crate::store::mysql::MySqlAttendanceStore;
use crate::timekeeping::clock::{Clock, SystemClock};
use serde_json::json;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
        info!("Migrations applied");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mysql_store = Arc::new(MySqlAttendanceStore::new(pool.clone()));
    let store: Arc<dyn AttendanceStore> = mysql_store.clone();
    let task_store: Arc<dyn TaskStore> = mysql_store;
    let attendance = Data::new(AttendanceService::new(store.clone(), clock.clone()));
    let reports = Data::new(ReportService::new(
        store,
        clock,
        config.weekend_policy.clone(),
    ));
    let tasks = Data::new(TaskService::new(task_store));

    // One limiter shared by every worker
    let limiter = Arc::new(routes::build_limiter(config.rate_protected_per_min)?);

    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(config_data.clone())
            .app_data(attendance.clone())
            .app_data(reports.clone())
            .app_data(tasks.clone())
            .service(health)
            .configure(|cfg| routes::configure(cfg, &config, limiter.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
