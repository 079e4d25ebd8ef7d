//! Badge ledger storage

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{Badge, CreateBadge};
use crate::common::{generate_badge_id, now_rfc3339, title_case, ApiError};

pub struct BadgesService {
    db: SqlitePool,
}

impl BadgesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Awards a badge unless the user already holds one for the same
    /// course and category. The unique index decides races between
    /// concurrent requests, so no prior lookup is needed.
    pub async fn award(&self, user_id: &str, request: &CreateBadge) -> Result<Badge, ApiError> {
        let badge = Badge {
            id: generate_badge_id(),
            user_id: user_id.to_string(),
            course_id: request.course_id,
            course_title: String::new(),
            course_category: request.course_category.clone(),
            badge_name: format!("{} Completion", title_case(&request.course_category)),
            badge_description: format!(
                "Successfully completed course with {}% score",
                request.quiz_score
            ),
            earned_at: now_rfc3339(),
            quiz_score: request.quiz_score,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO badges (
                id, user_id, course_id, course_title, course_category,
                badge_name, badge_description, earned_at, quiz_score
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, course_id, course_category) DO NOTHING
            "#,
        )
        .bind(&badge.id)
        .bind(&badge.user_id)
        .bind(badge.course_id)
        .bind(&badge.course_title)
        .bind(&badge.course_category)
        .bind(&badge.badge_name)
        .bind(&badge.badge_description)
        .bind(&badge.earned_at)
        .bind(badge.quiz_score)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            debug!(
                user_id = %user_id,
                course_id = request.course_id,
                course_category = %request.course_category,
                "Duplicate badge award rejected"
            );
            return Err(ApiError::Conflict(
                "Badge already earned for this course".to_string(),
            ));
        }

        info!(
            badge_id = %badge.id,
            user_id = %user_id,
            course_id = badge.course_id,
            "Badge awarded"
        );

        Ok(badge)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Badge>, sqlx::Error> {
        sqlx::query_as::<_, Badge>(
            "SELECT * FROM badges WHERE user_id = ? ORDER BY earned_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
    }

    /// Sets the display title on a badge owned by `user_id`. Badges owned by
    /// someone else are reported as missing.
    pub async fn set_course_title(
        &self,
        badge_id: &str,
        user_id: &str,
        course_title: &str,
    ) -> Result<Badge, ApiError> {
        sqlx::query_as::<_, Badge>(
            r#"
            UPDATE badges SET course_title = ?
            WHERE id = ? AND user_id = ?
            RETURNING *
            "#,
        )
        .bind(course_title)
        .bind(badge_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Badge not found".to_string()))
    }
}
