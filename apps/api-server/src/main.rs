//! # Board API Server
//!
//! Actix-web HTTP server for posts and likes, plus the hourly
//! recommended-post refresh.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Board API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    #[cfg(feature = "scheduler")]
    let mut scheduler = start_scheduler(&state, &config)
        .await
        .map_err(std::io::Error::other)?;

    let app_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(app_state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    #[cfg(feature = "scheduler")]
    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "Scheduler shutdown failed");
    }

    Ok(())
}

/// Register the refresh job exactly once and start ticking.
#[cfg(feature = "scheduler")]
async fn start_scheduler(
    state: &AppState,
    config: &AppConfig,
) -> Result<background::scheduler::Scheduler, tokio_cron_scheduler::JobSchedulerError> {
    use background::scheduler::{Scheduler, SchedulerConfig};

    let scheduler = Scheduler::new(SchedulerConfig::from_env()).await?;
    if scheduler.is_enabled() {
        background::recommendation::register(
            &scheduler,
            state.recommendations.clone(),
            &config.refresh_job,
        )
        .await?;
    }
    scheduler.start().await?;
    Ok(scheduler)
}
