pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod notes;
pub mod onboarding;
pub mod password;
pub mod routes;
pub mod token;
pub mod validation;

use std::sync::Arc;

use tracing::error;

use sober_db::Database;

use crate::config::Config;
use crate::error::ApiError;
use crate::token::{TokenError, TokenIssuer};

pub use routes::router;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub tokens: TokenIssuer,
    pub config: Config,
}

impl AppStateInner {
    pub fn new(config: Config, db: Database) -> Result<AppState, TokenError> {
        let tokens = TokenIssuer::new(&config.jwt_secret)?;
        Ok(Arc::new(Self {
            db: Arc::new(db),
            tokens,
            config,
        }))
    }
}

/// Runs database or hashing work off the async runtime.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.to_string())
    })?
}
