//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - Token minting and verification
//! - Bearer header resolution and its rejection order
//! - The Google sign-in handshake against a fake provider

#[cfg(test)]
mod tests {
    use super::super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use std::sync::Arc;

    use crate::auth::models::{CallbackParams, Claims, Identity, ProviderUserInfo};
    use crate::auth::oauth::{self, HandshakeError};
    use crate::auth::resolver::{authenticate, bearer_token, AuthError};
    use crate::auth::token::{mint, verify, TokenError};
    use crate::test_support::{
        bearer_for, insert_user, json_request, send, test_pool, test_state_with, FakeProvider,
    };

    const SECRET: &str = "test_secret_key";

    fn identity(sub: &str) -> Identity {
        Identity {
            sub: sub.to_string(),
            email: format!("{}@example.com", sub),
            name: "Test User".to_string(),
        }
    }

    async fn user_count(pool: &sqlx::SqlitePool) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    // ---- Token codec ----

    #[test]
    fn test_mint_then_verify_returns_claims() {
        let now = Utc::now();
        let token = mint(&identity("google-123"), SECRET, Duration::hours(24), now).unwrap();

        let claims = verify(&token, SECRET, now).unwrap();
        assert_eq!(claims.sub, "google-123");
        assert_eq!(claims.email, "google-123@example.com");
        assert_eq!(claims.name, "Test User");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_verify_rejects_at_and_after_expiry() {
        let issued = Utc::now();
        let token = mint(&identity("google-123"), SECRET, Duration::hours(24), issued).unwrap();

        let at_expiry = issued + Duration::hours(24);
        assert!(matches!(verify(&token, SECRET, at_expiry), Err(TokenError::Expired)));

        let later = issued + Duration::days(3);
        assert!(matches!(verify(&token, SECRET, later), Err(TokenError::Expired)));

        let just_before = issued + Duration::hours(24) - Duration::seconds(1);
        assert!(verify(&token, SECRET, just_before).is_ok());
    }

    #[test]
    fn test_verify_fails_with_wrong_secret() {
        let now = Utc::now();
        let token = mint(&identity("google-123"), SECRET, Duration::hours(24), now).unwrap();

        let result = verify(&token, "wrong_secret_key", now);
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_bad_signature_reported_before_expiry() {
        let issued = Utc::now() - Duration::days(2);
        let token = mint(&identity("google-123"), SECRET, Duration::hours(24), issued).unwrap();

        let result = verify(&token, "wrong_secret_key", Utc::now());
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_verify_rejects_garbage_and_other_algorithms() {
        let now = Utc::now();
        assert!(matches!(verify("invalid_token_here", SECRET, now), Err(TokenError::Malformed(_))));
        assert!(matches!(verify("", SECRET, now), Err(TokenError::Malformed(_))));

        let claims = Claims {
            sub: "google-123".to_string(),
            email: "a@example.com".to_string(),
            name: "A".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let hs512 = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(matches!(verify(&hs512, SECRET, now), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_verify_rejects_token_missing_claims() {
        #[derive(serde::Serialize)]
        struct Partial {
            sub: String,
            exp: i64,
        }

        let now = Utc::now();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: "google-123".to_string(),
                exp: (now + Duration::hours(1)).timestamp(),
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(verify(&token, SECRET, now), Err(TokenError::Malformed(_))));
    }

    // ---- Bearer header parsing ----

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(Some("bearer abc")).unwrap(), "abc");

        for raw in [
            None,
            Some(""),
            Some("Bearer"),
            Some("Bearer "),
            Some("Bearer  abc"),
            Some("Bearer abc def"),
            Some("Basic dXNlcjpwYXNz"),
            Some("Token abc"),
            Some("abc.def.ghi"),
        ] {
            assert!(
                matches!(bearer_token(raw), Err(AuthError::MissingCredential)),
                "expected MissingCredential for {:?}",
                raw
            );
        }
    }

    // ---- Identity resolver ----

    #[tokio::test]
    async fn test_authenticate_resolves_known_user() {
        let pool = test_pool().await;
        let user = insert_user(&pool, "google-123", "test@example.com", "Test User").await;
        let now = Utc::now();
        let token = mint(&identity("google-123"), SECRET, Duration::hours(24), now).unwrap();

        let resolved = authenticate(&pool, SECRET, Some(format!("Bearer {}", token).as_str()), now)
            .await
            .unwrap();
        assert_eq!(resolved, user);
    }

    #[tokio::test]
    async fn test_authenticate_failure_kinds() {
        let pool = test_pool().await;
        insert_user(&pool, "google-123", "test@example.com", "Test User").await;
        let now = Utc::now();

        let missing = authenticate(&pool, SECRET, None, now).await;
        assert!(matches!(missing, Err(AuthError::MissingCredential)));

        let wrong_scheme = authenticate(&pool, SECRET, Some("Basic abc"), now).await;
        assert!(matches!(wrong_scheme, Err(AuthError::MissingCredential)));

        let invalid = authenticate(&pool, SECRET, Some("Bearer invalid_token_here"), now).await;
        assert!(matches!(invalid, Err(AuthError::InvalidCredential)));

        let mis_signed = mint(&identity("google-123"), "other", Duration::hours(24), now).unwrap();
        let result = authenticate(&pool, SECRET, Some(format!("Bearer {}", mis_signed).as_str()), now).await;
        assert!(matches!(result, Err(AuthError::InvalidCredential)));

        let expired = mint(
            &identity("google-123"),
            SECRET,
            Duration::hours(24),
            now - Duration::hours(25),
        )
        .unwrap();
        let result = authenticate(&pool, SECRET, Some(format!("Bearer {}", expired).as_str()), now).await;
        assert!(matches!(result, Err(AuthError::ExpiredCredential)));

        let stranger = mint(&identity("google-unknown"), SECRET, Duration::hours(24), now).unwrap();
        let result = authenticate(&pool, SECRET, Some(format!("Bearer {}", stranger).as_str()), now).await;
        assert!(matches!(result, Err(AuthError::UnknownSubject)));
    }

    #[tokio::test]
    async fn test_expired_token_for_unknown_user_is_reported_as_expired() {
        let pool = test_pool().await;
        let now = Utc::now();
        let expired = mint(
            &identity("google-unknown"),
            SECRET,
            Duration::hours(1),
            now - Duration::hours(2),
        )
        .unwrap();

        let result = authenticate(&pool, SECRET, Some(format!("Bearer {}", expired).as_str()), now).await;
        assert!(matches!(result, Err(AuthError::ExpiredCredential)));
    }

    #[tokio::test]
    async fn test_authenticate_never_writes() {
        let pool = test_pool().await;
        let now = Utc::now();
        let token = mint(&identity("google-new"), SECRET, Duration::hours(24), now).unwrap();

        let result = authenticate(&pool, SECRET, Some(format!("Bearer {}", token).as_str()), now).await;
        assert!(matches!(result, Err(AuthError::UnknownSubject)));

        assert_eq!(user_count(&pool).await, 0);
    }

    // ---- Handshake ----

    /// Starts a login and returns callback params plus the cookie nonce a
    /// browser would send back.
    fn started_login(
        state: &crate::common::AppState,
        return_target: Option<&str>,
    ) -> (CallbackParams, String) {
        let redirect = oauth::begin_login(state, return_target, Utc::now()).unwrap();
        let signed_state = redirect
            .url
            .split("state=")
            .nth(1)
            .map(|s| urlencoding::decode(s).unwrap().into_owned())
            .unwrap();

        (
            CallbackParams {
                code: Some("auth-code".to_string()),
                state: Some(signed_state),
                error: None,
            },
            redirect.nonce,
        )
    }

    #[tokio::test]
    async fn test_begin_login_redirects_to_provider() {
        let pool = test_pool().await;
        let state = test_state_with(pool, Arc::new(FakeProvider::failing()));

        let redirect = oauth::begin_login(&state, None, Utc::now()).unwrap();
        assert!(redirect.url.contains("accounts.google.com"));
        assert!(redirect.url.contains("state="));
        assert_eq!(redirect.nonce.len(), 32);
    }

    #[tokio::test]
    async fn test_complete_login_creates_user_and_token() {
        let pool = test_pool().await;
        let provider = Arc::new(FakeProvider::returning("google-123", "test@example.com", "Test User"));
        let state = test_state_with(pool.clone(), provider.clone());

        let (params, nonce) = started_login(&state, Some("/dashboard"));
        let completed = oauth::complete_login(&state, params, Some(&nonce), Utc::now())
            .await
            .unwrap();

        assert_eq!(completed.return_to, "/dashboard");
        assert_eq!(provider.exchange_count(), 1);

        let claims = verify(&completed.token, SECRET, Utc::now()).unwrap();
        assert_eq!(claims.sub, "google-123");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.name, "Test User");

        let user = UsersService::new(pool)
            .find_by_google_id("google-123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.picture, "https://example.com/google-123.png");
        assert_eq!(user.about_me, "");
        assert_eq!(user.age, None);
    }

    #[tokio::test]
    async fn test_complete_login_is_idempotent_on_subject() {
        let pool = test_pool().await;
        let first = test_state_with(
            pool.clone(),
            Arc::new(FakeProvider::returning("google-123", "old@example.com", "Old Name")),
        );

        let (params, nonce) = started_login(&first, None);
        oauth::complete_login(&first, params, Some(&nonce), Utc::now())
            .await
            .unwrap();

        let users = UsersService::new(pool.clone());
        let mut original = users.find_by_google_id("google-123").await.unwrap().unwrap();
        original.about_me = "I teach Rust".to_string();
        original.age = Some(33);
        users.save_profile(&original).await.unwrap();

        let second = test_state_with(
            pool.clone(),
            Arc::new(FakeProvider::returning("google-123", "new@example.com", "New Name")),
        );
        let (params, nonce) = started_login(&second, None);
        oauth::complete_login(&second, params, Some(&nonce), Utc::now())
            .await
            .unwrap();

        assert_eq!(user_count(&pool).await, 1);

        let refreshed = users.find_by_google_id("google-123").await.unwrap().unwrap();
        assert_eq!(refreshed.id, original.id);
        assert_eq!(refreshed.created_at, original.created_at);
        assert_eq!(refreshed.email, "new@example.com");
        assert_eq!(refreshed.name, "New Name");
        assert_eq!(refreshed.about_me, "I teach Rust");
        assert_eq!(refreshed.age, Some(33));
    }

    #[tokio::test]
    async fn test_complete_login_rejects_mismatched_nonce_without_writing() {
        let pool = test_pool().await;
        let provider = Arc::new(FakeProvider::returning("google-123", "test@example.com", "Test User"));
        let state = test_state_with(pool.clone(), provider.clone());

        let (params, _nonce) = started_login(&state, None);
        let result = oauth::complete_login(&state, params, Some("someone-elses-nonce"), Utc::now()).await;
        assert!(matches!(result, Err(HandshakeError::StateMismatch)));

        let (params, _nonce) = started_login(&state, None);
        let result = oauth::complete_login(&state, params, None, Utc::now()).await;
        assert!(matches!(result, Err(HandshakeError::StateMismatch)));

        assert_eq!(provider.exchange_count(), 0);
        assert_eq!(user_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_complete_login_rejects_expired_or_forged_state() {
        let pool = test_pool().await;
        let state = test_state_with(
            pool,
            Arc::new(FakeProvider::returning("google-123", "test@example.com", "Test User")),
        );

        let (params, nonce) = started_login(&state, None);
        let too_late = Utc::now() + Duration::minutes(oauth::STATE_TTL_MINUTES + 1);
        let result = oauth::complete_login(&state, params, Some(&nonce), too_late).await;
        assert!(matches!(result, Err(HandshakeError::InvalidState)));

        let forged = CallbackParams {
            code: Some("auth-code".to_string()),
            state: Some("not-a-state".to_string()),
            error: None,
        };
        let result = oauth::complete_login(&state, forged, Some(&nonce), Utc::now()).await;
        assert!(matches!(result, Err(HandshakeError::InvalidState)));

        // A bearer token is not a valid state token.
        let bearer = mint(&identity("google-123"), SECRET, Duration::hours(1), Utc::now()).unwrap();
        let confused = CallbackParams {
            code: Some("auth-code".to_string()),
            state: Some(bearer),
            error: None,
        };
        let result = oauth::complete_login(&state, confused, Some(&nonce), Utc::now()).await;
        assert!(matches!(result, Err(HandshakeError::InvalidState)));
    }

    #[tokio::test]
    async fn test_complete_login_failures_never_write() {
        let pool = test_pool().await;

        let denied_state = test_state_with(pool.clone(), Arc::new(FakeProvider::failing()));
        let denied = CallbackParams {
            error: Some("access_denied".to_string()),
            ..Default::default()
        };
        let result = oauth::complete_login(&denied_state, denied, None, Utc::now()).await;
        assert!(matches!(result, Err(HandshakeError::ProviderDenied(_))));

        let (params, nonce) = started_login(&denied_state, None);
        let result = oauth::complete_login(&denied_state, params, Some(&nonce), Utc::now()).await;
        assert!(matches!(result, Err(HandshakeError::Provider(_))));

        let incomplete_state = test_state_with(
            pool.clone(),
            Arc::new(FakeProvider::with_info(ProviderUserInfo {
                sub: Some("google-123".to_string()),
                email: None,
                name: Some("Test User".to_string()),
                picture: None,
            })),
        );
        let (params, nonce) = started_login(&incomplete_state, None);
        let result = oauth::complete_login(&incomplete_state, params, Some(&nonce), Utc::now()).await;
        assert!(matches!(result, Err(HandshakeError::IncompleteProfile("email"))));

        let (mut params, nonce) = started_login(&incomplete_state, None);
        params.code = None;
        let result = oauth::complete_login(&incomplete_state, params, Some(&nonce), Utc::now()).await;
        assert!(matches!(result, Err(HandshakeError::MissingCode)));

        assert_eq!(user_count(&pool).await, 0);
    }

    #[test]
    fn test_sanitize_return_target() {
        assert_eq!(oauth::sanitize_return_target(Some("/profile")), "/profile");
        assert_eq!(oauth::sanitize_return_target(None), oauth::DEFAULT_RETURN_TARGET);
        for hostile in ["https://evil.example", "//evil.example", "/\\evil", "profile", ""] {
            assert_eq!(
                oauth::sanitize_return_target(Some(hostile)),
                oauth::DEFAULT_RETURN_TARGET,
                "{:?} should fall back",
                hostile
            );
        }
    }

    #[test]
    fn test_state_cookie_round_trip() {
        use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; oauth_state=abc123"));
        assert_eq!(oauth::state_cookie(&headers), Some("abc123".to_string()));

        let header = oauth::state_cookie_header("abc123", true);
        assert!(header.starts_with("oauth_state=abc123;"));
        assert!(header.contains("HttpOnly"));
        assert!(header.ends_with("; Secure"));

        assert_eq!(oauth::state_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn test_with_query_param_encodes_value() {
        assert_eq!(
            oauth::with_query_param("http://localhost:3000/auth/error", "message", "a b&c"),
            "http://localhost:3000/auth/error?message=a%20b%26c"
        );
        assert_eq!(
            oauth::with_query_param("http://x/cb?next=1", "token", "t"),
            "http://x/cb?next=1&token=t"
        );
    }

    // ---- HTTP ----

    async fn raw_get(
        state: Arc<crate::common::AppState>,
        uri: &str,
        cookie: Option<&str>,
    ) -> axum::response::Response {
        use tower::ServiceExt;

        let mut request = axum::http::Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(axum::http::header::COOKIE, cookie);
        }

        crate::app::build_router(state)
            .oneshot(request.body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn header<'a>(response: &'a axum::response::Response, name: axum::http::HeaderName) -> &'a str {
        response.headers().get(name).unwrap().to_str().unwrap()
    }

    #[tokio::test]
    async fn test_me_without_header_is_401() {
        let state = test_state_with(test_pool().await, Arc::new(FakeProvider::failing()));

        let (status, body) = send(state, json_request("GET", "/api/auth/me", None, None)).await;

        assert_eq!(status, 401);
        assert_eq!(body["error"], "Missing or invalid authorization header");
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_me_for_deleted_user_is_401() {
        let pool = test_pool().await;
        let state = test_state_with(pool.clone(), Arc::new(FakeProvider::failing()));
        let user = insert_user(&pool, "google-gone", "gone@example.com", "Gone").await;
        let auth = bearer_for(&user);
        sqlx::query("DELETE FROM users").execute(&pool).await.unwrap();

        let (status, body) = send(state, json_request("GET", "/api/auth/me", Some(&auth), None)).await;

        assert_eq!(status, 401);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn test_logout_acknowledges() {
        let state = test_state_with(test_pool().await, Arc::new(FakeProvider::failing()));

        let (status, body) = send(state, json_request("POST", "/api/auth/logout", None, None)).await;

        assert_eq!(status, 200);
        assert_eq!(body["message"], "Logged out successfully");
    }

    #[tokio::test]
    async fn test_full_sign_in_over_http() {
        use axum::http::header::{LOCATION, SET_COOKIE};

        let pool = test_pool().await;
        let provider = Arc::new(FakeProvider::returning("google-http", "http@example.com", "Http User"));
        let state = test_state_with(pool.clone(), provider);

        let login = raw_get(state.clone(), "/api/auth/login/google?redirect=/badges", None).await;
        assert_eq!(login.status(), 302);
        let cookie = header(&login, SET_COOKIE);
        assert!(cookie.starts_with("oauth_state="));
        assert!(cookie.contains("Path=/api/auth"));
        let cookie_pair = cookie.split(';').next().unwrap().to_string();

        let location = header(&login, LOCATION);
        assert!(location.starts_with("https://accounts.google.com/"));
        let signed_state = location.split("state=").nth(1).unwrap().to_string();

        let callback = raw_get(
            state.clone(),
            &format!("/api/auth/google?code=abc&state={}", signed_state),
            Some(&cookie_pair),
        )
        .await;
        assert_eq!(callback.status(), 302);
        let target = header(&callback, LOCATION);
        assert!(target.starts_with("http://localhost:3000/badges?token="));
        assert!(header(&callback, SET_COOKIE).contains("Max-Age=0"));

        let token = target.split("token=").nth(1).unwrap();
        let (status, me) = send(
            state,
            json_request("GET", "/api/auth/me", Some(&format!("Bearer {}", token)), None),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(me["email"], "http@example.com");
        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_callback_failure_redirects_to_error_page() {
        use axum::http::header::LOCATION;

        let pool = test_pool().await;
        let state = test_state_with(pool.clone(), Arc::new(FakeProvider::failing()));

        let response = raw_get(state, "/api/auth/google?error=access_denied", None).await;

        assert_eq!(response.status(), 302);
        assert!(header(&response, LOCATION).starts_with("http://localhost:3000/auth/error?message="));
        assert_eq!(user_count(&pool).await, 0);
    }
}
