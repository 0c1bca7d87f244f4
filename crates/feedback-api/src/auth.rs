use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{error, info, warn};

use feedback_types::api::{AdminLoginRequest, AdminLoginResponse};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::{ADMIN_ROLE, Claims};
use crate::state::AppState;

const TOKEN_TTL_HOURS: i64 = 12;

/// POST /api/admin/login: verify the admin password and issue a token.
pub async fn admin_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AdminLoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let parsed_hash = PasswordHash::new(&state.admin_password_hash).map_err(|e| {
        error!("Configured admin password hash is invalid: {}", e);
        ApiError::Internal
    })?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| {
            warn!("Failed admin login attempt");
            ApiError::Unauthorized
        })?;

    let expires_at = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);
    let token = create_token(&state.jwt_secret, expires_at).map_err(|e| {
        error!("Failed to sign admin token: {}", e);
        ApiError::Internal
    })?;

    info!("Admin logged in");
    Ok(Json(AdminLoginResponse { token, expires_at }))
}

pub fn create_token(
    secret: &str,
    expires_at: DateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: "admin".to_string(),
        role: ADMIN_ROLE.to_string(),
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Hash a password with Argon2id into a PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Check that a configured PHC string can be used for verification.
pub fn is_valid_hash(hash: &str) -> bool {
    PasswordHash::new(hash).is_ok()
}
