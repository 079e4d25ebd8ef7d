// src/badges/validators.rs

use super::models::CreateBadge;
use crate::common::{require_text, ValidationResult, Validator};

pub const MAX_CATEGORY_LEN: usize = 50;

impl Validator for CreateBadge {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        require_text(&mut result, "course_category", &self.course_category, MAX_CATEGORY_LEN);

        if !(0..=100).contains(&self.quiz_score) {
            result.add_error("quiz_score", "must be between 0 and 100");
        }

        result
    }
}
