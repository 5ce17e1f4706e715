use std::sync::Arc;

use anyhow::Context;

mod app;
mod auth;
mod config;
mod courses;
mod db;
mod docs;
mod error;
mod professors;
mod state;
#[cfg(test)]
mod testing;
mod validation;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "course_catalog=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    let db = db::connect(&config.database_url).await?;

    // unique indexes must exist before serving writes
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run migrations")?;
    tracing::info!("migrations applied");

    let app = app::build_app(AppState::postgres(db, config.clone()));
    app::serve(app, &config).await
}
