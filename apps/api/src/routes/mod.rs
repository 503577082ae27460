pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::insights::handlers as insights;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Insights API
        .route("/api/v1/insights", get(insights::handle_get_insight))
        .route(
            "/api/v1/insights/refresh",
            post(insights::handle_refresh_all),
        )
        // Users API
        .route(
            "/api/v1/users/:id/profile",
            put(users::handle_update_profile),
        )
        .route(
            "/api/v1/users/:id/onboarding",
            get(users::handle_onboarding_status),
        )
        .route(
            "/api/v1/users/:id/insights",
            get(users::handle_user_insights),
        )
        .with_state(state)
}
