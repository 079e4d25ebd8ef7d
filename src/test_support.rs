//! Shared fixtures for unit and router tests

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::auth::models::{Identity, ProviderProfile, ProviderUserInfo, User};
use crate::auth::oauth::{IdentityProvider, ProviderError};
use crate::auth::{token, UsersService};
use crate::common::{migrations::run_migrations, now_rfc3339, AppConfig, AppState};

/// A migrated in-memory database. A single connection keeps every query on
/// the same in-memory instance.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");

    run_migrations(&pool, false).await.expect("migrations");

    pool
}

/// Identity provider that answers every code exchange with a fixed profile,
/// or with an `invalid_grant` failure when `profile` is `None`.
pub struct FakeProvider {
    pub profile: Option<ProviderUserInfo>,
    pub exchanges: AtomicUsize,
}

impl FakeProvider {
    pub fn returning(sub: &str, email: &str, name: &str) -> Self {
        Self {
            profile: Some(ProviderUserInfo {
                sub: Some(sub.to_string()),
                email: Some(email.to_string()),
                name: Some(name.to_string()),
                picture: Some(format!("https://example.com/{}.png", sub)),
            }),
            exchanges: AtomicUsize::new(0),
        }
    }

    pub fn with_info(info: ProviderUserInfo) -> Self {
        Self {
            profile: Some(info),
            exchanges: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            profile: None,
            exchanges: AtomicUsize::new(0),
        }
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, ProviderError> {
        Ok(format!(
            "https://accounts.google.com/o/oauth2/v2/auth?redirect_uri={}&state={}",
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state)
        ))
    }

    async fn exchange_code(
        &self,
        _code: &str,
        _redirect_uri: &str,
    ) -> Result<ProviderUserInfo, ProviderError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        self.profile
            .clone()
            .ok_or_else(|| ProviderError::OAuthFailed("invalid_grant".to_string()))
    }
}

pub fn test_state_with(pool: SqlitePool, provider: Arc<dyn IdentityProvider>) -> Arc<AppState> {
    Arc::new(AppState {
        db: pool,
        config: AppConfig::for_tests(),
        identity_provider: provider,
    })
}

pub async fn test_state() -> Arc<AppState> {
    test_state_with(test_pool().await, Arc::new(FakeProvider::failing()))
}

/// Stores a user as if they had signed in with Google.
pub async fn insert_user(pool: &SqlitePool, google_id: &str, email: &str, name: &str) -> User {
    let users = UsersService::new(pool.clone());
    users
        .upsert_from_provider(
            &ProviderProfile {
                sub: google_id.to_string(),
                email: email.to_string(),
                name: name.to_string(),
                picture: None,
            },
            &now_rfc3339(),
        )
        .await
        .expect("upsert user");

    users
        .find_by_google_id(google_id)
        .await
        .expect("lookup user")
        .expect("user exists")
}

/// A valid token for `user` signed with the test secret.
pub fn token_for(user: &User) -> String {
    token::mint(
        &Identity {
            sub: user.google_id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        },
        &AppConfig::for_tests().jwt_secret,
        Duration::hours(24),
        Utc::now(),
    )
    .expect("mint token")
}

pub fn bearer_for(user: &User) -> String {
    format!("Bearer {}", token_for(user))
}

/// Sends one request through the full router and decodes the JSON body.
/// Non-JSON bodies (redirects, empty responses) decode to `Value::Null`.
pub async fn send(
    state: Arc<AppState>,
    request: axum::http::Request<axum::body::Body>,
) -> (axum::http::StatusCode, serde_json::Value) {
    use tower::ServiceExt;

    let response = crate::app::build_router(state)
        .oneshot(request)
        .await
        .expect("router response");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, body)
}

/// Builds a JSON request, optionally carrying an Authorization header.
pub fn json_request(
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: Option<serde_json::Value>,
) -> axum::http::Request<axum::body::Body> {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(axum::http::header::AUTHORIZATION, value);
    }

    match body {
        Some(json) => builder
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(axum::body::Body::empty()).expect("request"),
    }
}
