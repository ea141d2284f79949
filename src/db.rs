use std::{future::Future, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::warn;

use crate::{config::AppConfig, error::AppError};

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Runs a storage call under `limit`. When the deadline fires first the call
/// is dropped and the caller sees `AppError::Cancelled`.
pub async fn with_deadline<T, F>(limit: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(v) => Ok(v),
        Err(_) => {
            warn!(limit_ms = limit.as_millis() as u64, "storage call exceeded deadline");
            Err(AppError::Cancelled)
        }
    }
}
