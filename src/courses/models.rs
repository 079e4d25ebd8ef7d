// src/courses/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::Patch;

// ============================================================================
// Nested course content
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CourseSession {
    pub id: i64,
    pub title: String,
    pub duration: String,
    pub description: String,
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Quiz {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

// ============================================================================
// Course Models
// ============================================================================

/// Row as stored; `tags`, `sessions` and `quiz` hold JSON text.
#[derive(FromRow, Debug)]
pub struct CourseRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub instructor: String,
    pub level: String,
    pub category: String,
    pub tags: String,
    pub sessions: String,
    pub quiz: String,
    pub created_by: String,
    pub created_at: String,
    pub published: i64, // 0 or 1 in SQLite
    pub views: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub instructor: String,
    pub level: String,
    pub category: String,
    pub tags: Vec<String>,
    pub sessions: Vec<CourseSession>,
    pub quiz: Quiz,
    pub created_by: String,
    pub created_at: String,
    pub published: bool,
    pub views: i64,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: row.id,
            title: row.title,
            description: row.description,
            duration: row.duration,
            instructor: row.instructor,
            level: row.level,
            category: row.category,
            tags: serde_json::from_str(&row.tags).unwrap_or_default(),
            sessions: serde_json::from_str(&row.sessions).unwrap_or_default(),
            quiz: serde_json::from_str(&row.quiz).unwrap_or_default(),
            created_by: row.created_by,
            created_at: row.created_at,
            published: row.published == 1,
            views: row.views,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub level: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sessions: Vec<CourseSession>,
    #[serde(default)]
    pub quiz: Quiz,
}

/// Body of `PUT /api/courses/:id`; absent keys keep their stored value.
#[derive(Deserialize, Debug, Default)]
pub struct UpdateCourse {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub duration: Patch<String>,
    #[serde(default)]
    pub level: Patch<String>,
    #[serde(default)]
    pub category: Patch<String>,
    #[serde(default)]
    pub tags: Patch<Vec<String>>,
    #[serde(default)]
    pub sessions: Patch<Vec<CourseSession>>,
    #[serde(default)]
    pub quiz: Patch<Quiz>,
}

impl UpdateCourse {
    pub fn apply(self, course: &mut Course) {
        self.title.apply_to(&mut course.title);
        self.description.apply_to(&mut course.description);
        self.duration.apply_to(&mut course.duration);
        self.level.apply_to(&mut course.level);
        self.category.apply_to(&mut course.category);
        self.tags.apply_to(&mut course.tags);
        self.sessions.apply_to(&mut course.sessions);
        self.quiz.apply_to(&mut course.quiz);
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct CourseListParams {
    pub category: Option<String>,
}
