//! Autenticación con cuenta de servicio de Google
//!
//! Firma una aserción JWT (RS256) con la clave de la cuenta de servicio y la
//! cambia por un access token OAuth. El token se cachea hasta poco antes de
//! su expiración.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::utils::errors::{backend_error, AppError, AppResult};

pub const GOOGLE_SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Se renueva el token este margen antes de que caduque
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Campos usados del JSON de la cuenta de servicio
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> AppResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("invalid service account credentials: {}", e)))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Access token cacheado
#[derive(Clone, Debug)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(token: String, expires_in_secs: i64) -> Self {
        Self {
            token,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) > self.expires_at
    }
}

pub struct GoogleAuth {
    client: Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cached: RwLock<Option<AccessToken>>,
}

impl GoogleAuth {
    pub fn new(client: Client, key: ServiceAccountKey) -> AppResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AppError::Config(format!("invalid service account private key: {}", e)))?;

        Ok(Self {
            client,
            key,
            encoding_key,
            cached: RwLock::new(None),
        })
    }

    /// Token vigente, renovándolo si hace falta
    pub async fn access_token(&self) -> AppResult<String> {
        if let Some(token) = self.cached.read().await.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Otra tarea pudo renovarlo mientras esperábamos el lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let token = self.fetch_token().await?;
        *cached = Some(token.clone());
        Ok(token.token)
    }

    fn signed_assertion(&self, now: DateTime<Utc>) -> AppResult<String> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: GOOGLE_SCOPES,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Jwt(e.to_string()))
    }

    async fn fetch_token(&self) -> AppResult<AccessToken> {
        log::info!("🔑 Solicitando access token para {}", self.key.client_email);
        let assertion = self.signed_assertion(Utc::now())?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("❌ Token OAuth rechazado ({}): {}", status, body);
            return Err(backend_error("fetch access token", status));
        }

        let body: TokenResponse = response.json().await?;
        log::info!("✅ Access token obtenido, expira en {}s", body.expires_in);
        Ok(AccessToken::new(body.access_token, body.expires_in))
    }
}
