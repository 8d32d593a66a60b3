use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::profiles::avatar::AvatarStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Remote avatar storage behind a seam. Production wires S3/MinIO.
    pub avatars: Arc<dyn AvatarStore>,
    pub config: Config,
}
