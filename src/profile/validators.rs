// src/profile/validators.rs

use super::models::UpdateProfileRequest;
use crate::common::{require_text, ValidationResult, Validator};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ABOUT_ME_LEN: usize = 2000;
pub const MAX_AGE: i64 = 150;

impl Validator for UpdateProfileRequest {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = self.name.as_set() {
            require_text(&mut result, "name", name, MAX_NAME_LEN);
        }

        if let Some(about_me) = self.about_me.as_set() {
            if about_me.chars().count() > MAX_ABOUT_ME_LEN {
                result.add_error(
                    "about_me",
                    &format!("must not exceed {} characters", MAX_ABOUT_ME_LEN),
                );
            }
        }

        if let Some(Some(age)) = self.age.as_set() {
            if !(0..=MAX_AGE).contains(age) {
                result.add_error("age", &format!("must be between 0 and {}", MAX_AGE));
            }
        }

        result
    }
}
