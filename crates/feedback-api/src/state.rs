use std::sync::Arc;

use feedback_db::Database;
use tracing::error;

use crate::error::ApiError;
use crate::notify::SubmissionNotifier;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    /// Argon2 PHC string for the admin password.
    pub admin_password_hash: String,
    pub notifier: Arc<dyn SubmissionNotifier>,
}

/// Run a blocking store call off the async runtime.
pub async fn run_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> T + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })
}
