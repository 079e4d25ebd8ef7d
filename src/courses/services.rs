//! Course catalog storage

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{Course, CourseRow, CreateCourse, UpdateCourse};
use crate::auth::User;
use crate::common::{generate_course_id, now_rfc3339, ApiError};

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value)
        .map_err(|e| ApiError::InternalServer(format!("Failed to encode course content: {}", e)))
}

fn course_not_found() -> ApiError {
    ApiError::NotFound("Course not found".to_string())
}

pub struct CoursesService {
    db: SqlitePool,
}

impl CoursesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Stores a new, unpublished course owned by `creator`.
    pub async fn create(&self, creator: &User, request: CreateCourse) -> Result<Course, ApiError> {
        let course = Course {
            id: generate_course_id(),
            title: request.title,
            description: request.description,
            duration: request.duration,
            instructor: creator.name.clone(),
            level: request.level,
            category: request.category,
            tags: request.tags,
            sessions: request.sessions,
            quiz: request.quiz,
            created_by: creator.id.clone(),
            created_at: now_rfc3339(),
            published: false,
            views: 0,
        };

        sqlx::query(
            r#"
            INSERT INTO courses (
                id, title, description, duration, instructor, level, category,
                tags, sessions, quiz, created_by, created_at, published, views
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0)
            "#,
        )
        .bind(&course.id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.duration)
        .bind(&course.instructor)
        .bind(&course.level)
        .bind(&course.category)
        .bind(to_json(&course.tags)?)
        .bind(to_json(&course.sessions)?)
        .bind(to_json(&course.quiz)?)
        .bind(&course.created_by)
        .bind(&course.created_at)
        .execute(&self.db)
        .await?;

        info!(course_id = %course.id, created_by = %course.created_by, "Course created");

        Ok(course)
    }

    /// Published courses, newest first.
    pub async fn list_published(&self, category: Option<&str>) -> Result<Vec<Course>, sqlx::Error> {
        let rows = match category {
            Some(category) => {
                sqlx::query_as::<_, CourseRow>(
                    r#"
                    SELECT * FROM courses
                    WHERE published = 1 AND category = ?
                    ORDER BY created_at DESC, rowid DESC
                    "#,
                )
                .bind(category)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, CourseRow>(
                    "SELECT * FROM courses WHERE published = 1 ORDER BY created_at DESC, rowid DESC",
                )
                .fetch_all(&self.db)
                .await?
            }
        };

        Ok(rows.into_iter().map(Course::from).collect())
    }

    /// Every course `user_id` created, published or not, newest first.
    pub async fn list_created_by(&self, user_id: &str) -> Result<Vec<Course>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CourseRow>(
            "SELECT * FROM courses WHERE created_by = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Course::from).collect())
    }

    /// Fetches a course and counts the view in the same statement.
    /// Unpublished courses are only found for their creator.
    pub async fn view(&self, course_id: &str, viewer_id: Option<&str>) -> Result<Course, ApiError> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            UPDATE courses SET views = views + 1
            WHERE id = ? AND (published = 1 OR created_by = ?)
            RETURNING *
            "#,
        )
        .bind(course_id)
        .bind(viewer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(course_not_found)?;

        Ok(Course::from(row))
    }

    async fn find_owned(&self, course_id: &str, user_id: &str) -> Result<Course, ApiError> {
        let row = sqlx::query_as::<_, CourseRow>(
            "SELECT * FROM courses WHERE id = ? AND created_by = ?",
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(course_not_found)?;

        Ok(Course::from(row))
    }

    /// Applies a partial update to a course owned by `user_id`.
    pub async fn update(
        &self,
        course_id: &str,
        user_id: &str,
        changes: UpdateCourse,
    ) -> Result<Course, ApiError> {
        let mut course = self.find_owned(course_id, user_id).await?;
        changes.apply(&mut course);

        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            UPDATE courses SET
                title = ?, description = ?, duration = ?, level = ?, category = ?,
                tags = ?, sessions = ?, quiz = ?
            WHERE id = ? AND created_by = ?
            RETURNING *
            "#,
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.duration)
        .bind(&course.level)
        .bind(&course.category)
        .bind(to_json(&course.tags)?)
        .bind(to_json(&course.sessions)?)
        .bind(to_json(&course.quiz)?)
        .bind(course_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(course_not_found)?;

        info!(course_id = %course_id, "Course updated");

        Ok(Course::from(row))
    }

    pub async fn set_published(
        &self,
        course_id: &str,
        user_id: &str,
        published: bool,
    ) -> Result<Course, ApiError> {
        let row = sqlx::query_as::<_, CourseRow>(
            "UPDATE courses SET published = ? WHERE id = ? AND created_by = ? RETURNING *",
        )
        .bind(published as i64)
        .bind(course_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(course_not_found)?;

        info!(course_id = %course_id, published, "Course visibility changed");

        Ok(Course::from(row))
    }

    pub async fn delete(&self, course_id: &str, user_id: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ? AND created_by = ?")
            .bind(course_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            debug!(course_id = %course_id, user_id = %user_id, "Delete matched no owned course");
            return Err(course_not_found());
        }

        info!(course_id = %course_id, "Course deleted");

        Ok(())
    }
}
