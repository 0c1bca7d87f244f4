//! JSON body extractor whose rejections use the `{"error": ...}` body of
//! every other failure.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` with [`ApiError`] as the rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
