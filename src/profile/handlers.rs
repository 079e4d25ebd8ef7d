// src/profile/handlers.rs

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tracing::info;

use super::models::UpdateProfileRequest;
use crate::auth::{AuthedUser, User, UsersService};
use crate::common::{ApiError, AppJson, AppState, Validator};

/// PUT /api/auth/profile - Update the caller's name, bio or age
pub async fn update_profile_handler(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(mut user): AuthedUser,
    AppJson(request): AppJson<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    request.validate().into_result()?;

    if request.is_empty() {
        return Ok(Json(user));
    }

    info!(user_id = %user.id, "Profile update request received");

    request.apply(&mut user);
    let updated = UsersService::new(state.db.clone()).save_profile(&user).await?;

    Ok(Json(updated))
}
