// src/profile/models.rs

use serde::Deserialize;

use crate::auth::User;
use crate::common::Patch;

/// Body of `PUT /api/auth/profile`.
///
/// Only keys present in the JSON are applied; `"age": null` clears the age.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub about_me: Patch<String>,
    #[serde(default)]
    pub age: Patch<Option<i64>>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        !(self.name.is_set() || self.about_me.is_set() || self.age.is_set())
    }

    /// Applies every set field to `user`, leaving the rest untouched.
    pub fn apply(self, user: &mut User) {
        self.name.apply_to(&mut user.name);
        self.about_me.apply_to(&mut user.about_me);
        self.age.apply_to(&mut user.age);
    }
}
