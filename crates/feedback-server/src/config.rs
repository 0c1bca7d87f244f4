use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, warn};

use feedback_api::auth::{hash_password, is_valid_hash};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub admin_password_hash: String,
    pub notify_webhook: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("FEEDBACK_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("FEEDBACK_JWT_SECRET is unset or still a placeholder; set it in .env and restart");
        }

        let port: u16 = std::env::var("FEEDBACK_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .context("FEEDBACK_PORT must be a port number")?;

        Ok(Self {
            host: std::env::var("FEEDBACK_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            db_path: std::env::var("FEEDBACK_DB_PATH")
                .unwrap_or_else(|_| "feedback.db".into())
                .into(),
            jwt_secret,
            admin_password_hash: admin_password_hash()?,
            notify_webhook: std::env::var("FEEDBACK_NOTIFY_WEBHOOK")
                .ok()
                .filter(|url| !url.trim().is_empty()),
        })
    }
}

/// Prefer a pre-computed argon2 hash; fall back to hashing a plaintext
/// password at startup.
fn admin_password_hash() -> Result<String> {
    if let Ok(hash) = std::env::var("FEEDBACK_ADMIN_PASSWORD_HASH") {
        if !is_valid_hash(&hash) {
            bail!("FEEDBACK_ADMIN_PASSWORD_HASH is not a valid argon2 PHC string");
        }
        info!("Admin password loaded from hash");
        return Ok(hash);
    }

    match std::env::var("FEEDBACK_ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => {
            warn!("FEEDBACK_ADMIN_PASSWORD is set in plaintext; prefer FEEDBACK_ADMIN_PASSWORD_HASH");
            hash_password(&password).map_err(|e| anyhow!("Failed to hash admin password: {}", e))
        }
        _ => bail!("Set FEEDBACK_ADMIN_PASSWORD_HASH (or FEEDBACK_ADMIN_PASSWORD) to enable the admin panel"),
    }
}
