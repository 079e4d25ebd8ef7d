// src/services/google.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::auth::models::ProviderUserInfo;
use crate::auth::oauth::{IdentityProvider, ProviderError};

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Scopes needed to read the signed-in user's identity
const SCOPES: &str = "openid email profile";

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// The part of Google's token response the handshake needs
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Google OpenID Connect client for the sign-in handshake
pub struct GoogleService {
    client: Client,
    config: Option<GoogleConfig>,
}

impl GoogleService {
    pub fn new(client: Client, client_id: Option<String>, client_secret: Option<String>) -> Self {
        let config = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(GoogleConfig {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    fn get_config(&self) -> Result<&GoogleConfig, ProviderError> {
        self.config.as_ref().ok_or(ProviderError::NotConfigured)
    }

    async fn fetch_token(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, ProviderError> {
        let config = self.get_config()?;

        let params = [
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(ProviderError::OAuthFailed(format!("HTTP {}", status)));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| ProviderError::SerializationError(e.to_string()))
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<ProviderUserInfo, ProviderError> {
        let response = self
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Userinfo request failed");
            return Err(ProviderError::OAuthFailed(format!(
                "userinfo returned HTTP {}",
                status
            )));
        }

        response
            .json::<ProviderUserInfo>()
            .await
            .map_err(|e| ProviderError::SerializationError(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for GoogleService {
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, ProviderError> {
        let config = self.get_config()?;

        let auth_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&prompt=select_account",
            AUTHORIZATION_ENDPOINT,
            urlencoding::encode(&config.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state)
        );

        debug!("Generated Google OAuth authorization URL with scopes: {}", SCOPES);
        Ok(auth_url)
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ProviderUserInfo, ProviderError> {
        let token_response = self.fetch_token(code, redirect_uri).await?;
        let user_info = self.fetch_user_info(&token_response.access_token).await?;

        info!("Successfully exchanged authorization code for Google profile");
        Ok(user_info)
    }
}
