use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::time::{Duration, Instant};

use crate::error::SheetsError;

/// Default OAuth2 token endpoint for service accounts.
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested for the run: spreadsheet read/write plus Drive lookup
/// so spreadsheets can be opened by name.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh a cached token this long before Google expires it.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// The fields of a Google service-account JSON key that the client uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// A bearer token with its local expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    expires_at: Instant,
}

impl AccessToken {
    pub fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN < self.expires_at
    }
}

impl ServiceAccountKey {
    /// Parse a key from its JSON text (the content of the downloaded key file).
    pub fn from_json(json: &str) -> Result<Self, SheetsError> {
        let key: Self = serde_json::from_str(json)
            .map_err(|e| SheetsError::credentials(format!("malformed service account key: {e}")))?;
        if key.client_email.trim().is_empty() || key.private_key.trim().is_empty() {
            return Err(SheetsError::credentials(
                "service account key is missing client_email or private_key",
            ));
        }
        Ok(key)
    }

    /// Read and parse a key file.
    pub fn from_file(path: &Path) -> Result<Self, SheetsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Signed RS256 JWT asserting this service account, valid for one hour
    /// from `now` (seconds since the epoch).
    pub fn assertion(&self, now: i64) -> Result<String, SheetsError> {
        let claims = Claims {
            iss: &self.client_email,
            scope: SCOPES.join(" "),
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let key = jsonwebtoken::EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| SheetsError::credentials(format!("unusable private key: {e}")))?;

        jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|e| SheetsError::credentials(format!("failed to sign assertion: {e}")))
    }

    /// Exchange a fresh assertion for an access token (JWT bearer grant).
    pub async fn fetch_token(&self, http: &reqwest::Client) -> Result<AccessToken, SheetsError> {
        let assertion = self.assertion(chrono::Utc::now().timestamp())?;

        let resp = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let detail = serde_json::from_str::<TokenErrorResponse>(&text)
                .map(|e| match e.error_description {
                    Some(desc) => format!("{}: {}", e.error, desc),
                    None => e.error,
                })
                .unwrap_or_else(|_| text.chars().take(200).collect());
            return Err(SheetsError::auth(format!(
                "token exchange for {} rejected (HTTP {}): {}",
                self.client_email,
                status.as_u16(),
                detail
            )));
        }

        let token: TokenResponse = serde_json::from_str(&text)?;
        log::debug!(
            "Obtained access token for {} (expires in {}s)",
            self.client_email,
            token.expires_in
        );
        Ok(AccessToken {
            token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}
