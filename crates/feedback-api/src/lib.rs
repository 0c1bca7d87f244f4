pub mod admin;
pub mod auth;
pub mod comments;
pub mod error;
pub mod export;
pub mod extract;
pub mod middleware;
pub mod notify;
pub mod state;
pub mod submissions;
pub mod votes;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// All `/api` routes. Admin routes sit behind [`middleware::require_admin`].
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route(
            "/api/feedback",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route("/api/feedback/{id}", get(submissions::get_submission))
        .route("/api/feedback/{id}/vote", post(votes::toggle_vote))
        .route(
            "/api/feedback/{id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route("/api/admin/login", post(auth::admin_login));

    let admin_routes = Router::new()
        .route("/api/admin/feedback/export", get(admin::export_submissions))
        .route("/api/admin/feedback/{id}", delete(admin::delete_submission))
        .route("/api/admin/feedback/{id}/status", patch(admin::update_status))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}
