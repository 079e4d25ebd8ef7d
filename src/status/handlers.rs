// src/status/handlers.rs

use axum::extract::{Extension, Json};
use std::sync::Arc;

use super::models::{CreateStatusCheck, StatusCheck};
use crate::auth::models::MessageResponse;
use crate::common::{
    generate_status_check_id, now_rfc3339, require_text, ApiError, AppJson, AppState,
    ValidationResult,
};

const MAX_CLIENT_NAME_LEN: usize = 200;
const MAX_LISTED_CHECKS: i64 = 1000;

/// GET /api/
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello World".to_string(),
    })
}

/// POST /api/status
pub async fn create_status_check(
    Extension(state): Extension<Arc<AppState>>,
    AppJson(request): AppJson<CreateStatusCheck>,
) -> Result<Json<StatusCheck>, ApiError> {
    let mut validation = ValidationResult::new();
    require_text(&mut validation, "client_name", &request.client_name, MAX_CLIENT_NAME_LEN);
    validation.into_result()?;

    let check = StatusCheck {
        id: generate_status_check_id(),
        client_name: request.client_name,
        timestamp: now_rfc3339(),
    };

    sqlx::query("INSERT INTO status_checks (id, client_name, timestamp) VALUES (?, ?, ?)")
        .bind(&check.id)
        .bind(&check.client_name)
        .bind(&check.timestamp)
        .execute(&state.db)
        .await?;

    Ok(Json(check))
}

/// GET /api/status
pub async fn list_status_checks(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<StatusCheck>>, ApiError> {
    let checks = sqlx::query_as::<_, StatusCheck>(
        "SELECT * FROM status_checks ORDER BY timestamp ASC, rowid ASC LIMIT ?",
    )
    .bind(MAX_LISTED_CHECKS)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(checks))
}
