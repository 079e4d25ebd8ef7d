// src/badges/handlers.rs

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tracing::info;

use super::models::{Badge, CourseTitleParams, CreateBadge};
use super::services::BadgesService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppJson, AppQuery, AppState, Validator};

/// POST /api/badges - Award a badge to the caller
pub async fn create_badge(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    AppJson(request): AppJson<CreateBadge>,
) -> Result<Json<Badge>, ApiError> {
    request.validate().into_result()?;

    let badge = BadgesService::new(state.db.clone())
        .award(&user.id, &request)
        .await?;

    Ok(Json(badge))
}

/// GET /api/badges/me
pub async fn list_my_badges(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
) -> Result<Json<Vec<Badge>>, ApiError> {
    let badges = BadgesService::new(state.db.clone())
        .list_for_user(&user.id)
        .await?;

    Ok(Json(badges))
}

/// GET /api/badges/user/:id - Public; unknown users simply have no badges
pub async fn list_user_badges(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Badge>>, ApiError> {
    let badges = BadgesService::new(state.db.clone())
        .list_for_user(&user_id)
        .await?;

    Ok(Json(badges))
}

/// PUT /api/badges/:id?course_title=
pub async fn update_badge_course_title(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Path(badge_id): Path<String>,
    AppQuery(params): AppQuery<CourseTitleParams>,
) -> Result<Json<Badge>, ApiError> {
    info!(badge_id = %badge_id, user_id = %user.id, "Badge title backfill");

    let badge = BadgesService::new(state.db.clone())
        .set_course_title(&badge_id, &user.id, &params.course_title)
        .await?;

    Ok(Json(badge))
}
