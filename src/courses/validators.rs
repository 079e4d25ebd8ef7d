// src/courses/validators.rs

use super::models::{CourseSession, CreateCourse, Quiz, UpdateCourse};
use crate::common::{require_text, ValidationResult, Validator};

pub const COURSE_LEVELS: [&str; 5] = ["Beginner", "Intermediate", "Advanced", "Expert", "All Levels"];
pub const COURSE_CATEGORIES: [&str; 3] = ["masterclasses", "careerpaths", "crashcourses"];

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;
const MAX_DURATION_LEN: usize = 50;
const MAX_TAGS: usize = 20;
const MAX_TAG_LEN: usize = 50;

fn check_level(result: &mut ValidationResult, level: &str) {
    if !COURSE_LEVELS.contains(&level) {
        result.add_error(
            "level",
            &format!("must be one of: {}", COURSE_LEVELS.join(", ")),
        );
    }
}

fn check_category(result: &mut ValidationResult, category: &str) {
    if !COURSE_CATEGORIES.contains(&category) {
        result.add_error(
            "category",
            &format!("must be one of: {}", COURSE_CATEGORIES.join(", ")),
        );
    }
}

fn check_tags(result: &mut ValidationResult, tags: &[String]) {
    if tags.len() > MAX_TAGS {
        result.add_error("tags", &format!("at most {} tags allowed", MAX_TAGS));
    }
    if tags
        .iter()
        .any(|tag| tag.trim().is_empty() || tag.chars().count() > MAX_TAG_LEN)
    {
        result.add_error(
            "tags",
            &format!("tags must be non-empty and at most {} characters", MAX_TAG_LEN),
        );
    }
}

fn check_sessions(result: &mut ValidationResult, sessions: &[CourseSession]) {
    for (index, session) in sessions.iter().enumerate() {
        require_text(
            result,
            &format!("sessions[{}].title", index),
            &session.title,
            MAX_TITLE_LEN,
        );
    }
}

fn check_quiz(result: &mut ValidationResult, quiz: &Quiz) {
    for (index, question) in quiz.questions.iter().enumerate() {
        let field = format!("quiz.questions[{}]", index);
        if question.question.trim().is_empty() {
            result.add_error(&field, "question text is required");
        }
        if question.options.len() < 2 {
            result.add_error(&field, "needs at least two options");
        }
        if question.correct < 0 || question.correct as usize >= question.options.len() {
            result.add_error(&field, "correct must index one of the options");
        }
    }
}

impl Validator for CreateCourse {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        require_text(&mut result, "title", &self.title, MAX_TITLE_LEN);
        require_text(&mut result, "description", &self.description, MAX_DESCRIPTION_LEN);
        require_text(&mut result, "duration", &self.duration, MAX_DURATION_LEN);
        check_level(&mut result, &self.level);
        check_category(&mut result, &self.category);
        check_tags(&mut result, &self.tags);
        check_sessions(&mut result, &self.sessions);
        check_quiz(&mut result, &self.quiz);

        result
    }
}

impl Validator for UpdateCourse {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(title) = self.title.as_set() {
            require_text(&mut result, "title", title, MAX_TITLE_LEN);
        }
        if let Some(description) = self.description.as_set() {
            require_text(&mut result, "description", description, MAX_DESCRIPTION_LEN);
        }
        if let Some(duration) = self.duration.as_set() {
            require_text(&mut result, "duration", duration, MAX_DURATION_LEN);
        }
        if let Some(level) = self.level.as_set() {
            check_level(&mut result, level);
        }
        if let Some(category) = self.category.as_set() {
            check_category(&mut result, category);
        }
        if let Some(tags) = self.tags.as_set() {
            check_tags(&mut result, tags);
        }
        if let Some(sessions) = self.sessions.as_set() {
            check_sessions(&mut result, sessions);
        }
        if let Some(quiz) = self.quiz.as_set() {
            check_quiz(&mut result, quiz);
        }

        result
    }
}
