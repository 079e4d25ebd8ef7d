// src/courses/handlers.rs

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;

use super::models::{Course, CourseListParams, CreateCourse, UpdateCourse};
use super::services::CoursesService;
use crate::auth::models::MessageResponse;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppJson, AppQuery, AppState, Validator};

// ============================================================================
// Public routes
// ============================================================================

/// GET /api/courses - Published courses, optionally one category
pub async fn list_courses(
    Extension(state): Extension<Arc<AppState>>,
    AppQuery(params): AppQuery<CourseListParams>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = CoursesService::new(state.db.clone())
        .list_published(params.category.as_deref())
        .await?;

    Ok(Json(courses))
}

/// GET /api/courses/:id - Counts as a view. Drafts are visible to their
/// creator only.
pub async fn get_course(
    Extension(state): Extension<Arc<AppState>>,
    viewer: Option<AuthedUser>,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let viewer_id = viewer.map(|AuthedUser(user)| user.id);
    let course = CoursesService::new(state.db.clone())
        .view(&course_id, viewer_id.as_deref())
        .await?;
    Ok(Json(course))
}

// ============================================================================
// Creator routes
// ============================================================================

/// POST /api/courses
pub async fn create_course(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    AppJson(request): AppJson<CreateCourse>,
) -> Result<Json<Course>, ApiError> {
    request.validate().into_result()?;

    let course = CoursesService::new(state.db.clone())
        .create(&user, request)
        .await?;

    Ok(Json(course))
}

/// GET /api/courses/created
pub async fn list_created_courses(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = CoursesService::new(state.db.clone())
        .list_created_by(&user.id)
        .await?;

    Ok(Json(courses))
}

/// PUT /api/courses/:id
pub async fn update_course(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Path(course_id): Path<String>,
    AppJson(changes): AppJson<UpdateCourse>,
) -> Result<Json<Course>, ApiError> {
    changes.validate().into_result()?;

    let course = CoursesService::new(state.db.clone())
        .update(&course_id, &user.id, changes)
        .await?;

    Ok(Json(course))
}

/// POST /api/courses/:id/publish
pub async fn publish_course(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let course = CoursesService::new(state.db.clone())
        .set_published(&course_id, &user.id, true)
        .await?;

    Ok(Json(course))
}

/// POST /api/courses/:id/unpublish
pub async fn unpublish_course(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let course = CoursesService::new(state.db.clone())
        .set_published(&course_id, &user.id, false)
        .await?;

    Ok(Json(course))
}

/// DELETE /api/courses/:id
pub async fn delete_course(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Path(course_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    CoursesService::new(state.db.clone())
        .delete(&course_id, &user.id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Course deleted successfully".to_string(),
    }))
}
