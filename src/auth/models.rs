//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims carried by a bearer token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Google subject id of the signed-in user
    pub sub: String,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// The identity a token is minted for
#[derive(Debug, Clone)]
pub struct Identity {
    pub sub: String,
    pub email: String,
    pub name: String,
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub picture: String,
    pub about_me: String,
    pub age: Option<i64>,
    pub created_at: String,
    pub last_login: String,
}

/// Query string accepted by `GET /api/auth/login/google`
#[derive(Deserialize, Debug, Default)]
pub struct LoginParams {
    /// Frontend path to land on after a successful sign-in
    pub redirect: Option<String>,
}

/// Query string Google appends when it calls back into the service
#[derive(Deserialize, Debug, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Profile fields as returned by the identity provider's userinfo endpoint.
/// Any of them may be missing; the handshake rejects incomplete profiles.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ProviderUserInfo {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// A provider profile that passed the completeness check
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
