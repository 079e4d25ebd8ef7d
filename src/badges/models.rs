// src/badges/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Badge {
    pub id: String,
    pub user_id: String,
    pub course_id: i64,
    pub course_title: String,
    pub course_category: String,
    pub badge_name: String,
    pub badge_description: String,
    pub earned_at: String,
    pub quiz_score: i64,
}

#[derive(Deserialize, Debug)]
pub struct CreateBadge {
    pub course_id: i64,
    pub course_category: String,
    pub quiz_score: i64,
}

#[derive(Deserialize, Debug)]
pub struct CourseTitleParams {
    pub course_title: String,
}
