//! User record storage

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{ProviderProfile, User};
use crate::common::{generate_user_id, ApiError};

pub struct UsersService {
    db: SqlitePool,
}

impl UsersService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE google_id = ?")
            .bind(google_id)
            .fetch_optional(&self.db)
            .await
    }

    /// Inserts the user on first sign-in, otherwise refreshes the fields the
    /// provider owns. `id`, `about_me`, `age` and `created_at` survive
    /// repeated logins; an empty provider picture keeps the stored one.
    pub async fn upsert_from_provider(
        &self,
        profile: &ProviderProfile,
        now: &str,
    ) -> Result<(), sqlx::Error> {
        let new_id = generate_user_id();

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, google_id, email, name, picture, about_me, age, created_at, last_login
            ) VALUES (?, ?, ?, ?, ?, '', NULL, ?, ?)
            ON CONFLICT(google_id) DO UPDATE SET
                email = excluded.email,
                name = excluded.name,
                picture = CASE
                    WHEN excluded.picture <> '' THEN excluded.picture
                    ELSE users.picture
                END,
                last_login = excluded.last_login
            "#,
        )
        .bind(&new_id)
        .bind(&profile.sub)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(profile.picture.as_deref().unwrap_or(""))
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        debug!(
            google_id = %profile.sub,
            rows_affected = result.rows_affected(),
            "User upserted from provider profile"
        );

        Ok(())
    }

    /// Writes the user-editable profile fields back to storage.
    pub async fn save_profile(&self, user: &User) -> Result<User, ApiError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET name = ?, about_me = ?, age = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.about_me)
        .bind(user.age)
        .bind(&user.id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        info!(user_id = %updated.id, "Profile saved");

        Ok(updated)
    }
}
