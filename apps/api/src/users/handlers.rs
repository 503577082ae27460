use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::insights::schema::Insight;
use crate::models::user::User;
use crate::state::AppState;
use crate::users::profile::{validate_profile, ProfileRequest};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub insight: Insight,
}

#[derive(Debug, Serialize)]
pub struct OnboardingStatus {
    pub is_onboarded: bool,
}

async fn require_user(state: &AppState, user_id: Uuid) -> Result<User, AppError> {
    state
        .users
        .find(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

/// PUT /api/v1/users/:id/profile
///
/// Saves the profile and links the user to their industry's insight.
/// The insight is resolved (and generated if new) before the user row is written,
/// so a failed generation leaves the profile untouched.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = validate_profile(request).map_err(AppError::Validation)?;
    require_user(&state, user_id).await?;

    let insight = state.insights.resolve_for_user(&profile.industry).await?;
    let user = state
        .users
        .save_profile(user_id, &insight.industry, insight.id, &profile)
        .await?;

    info!("User {user_id} onboarded to industry '{}'", insight.industry);
    Ok(Json(ProfileResponse { user, insight }))
}

/// GET /api/v1/users/:id/onboarding
pub async fn handle_onboarding_status(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<OnboardingStatus>, AppError> {
    let user = require_user(&state, user_id).await?;
    Ok(Json(OnboardingStatus {
        is_onboarded: user.industry_insight_id.is_some(),
    }))
}

/// GET /api/v1/users/:id/insights
///
/// Returns the insight for the user's saved industry, linking it if needed.
pub async fn handle_user_insights(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Insight>, AppError> {
    let user = require_user(&state, user_id).await?;
    let industry = user.industry.as_deref().ok_or_else(|| {
        AppError::Validation("User has not selected an industry yet".to_string())
    })?;

    let insight = state.insights.resolve_for_user(industry).await?;
    if user.industry_insight_id != Some(insight.id) {
        state.users.link_insight(user_id, insight.id).await?;
    }

    Ok(Json(insight))
}
