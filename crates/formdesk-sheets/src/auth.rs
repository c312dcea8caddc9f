use formdesk_core::error::{FormdeskError, Result};
use formdesk_core::types::now_unix;
use tokio::sync::Mutex;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

struct CachedToken {
    access_token: String,
    expiry: i64,
}

/// Manages the Google access token via the OAuth refresh grant.
///
/// The refresh token comes from config; the short-lived access token is
/// cached in memory with its expiry (there is no persistence layer in this
/// service, by scope).
pub struct SheetsAuth {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl SheetsAuth {
    pub fn new(client_id: String, client_secret: String, refresh_token: String) -> Self {
        Self {
            client_id,
            client_secret,
            refresh_token,
            http: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    /// Get a valid access token, refreshing if necessary.
    /// Refreshes 60 seconds before actual expiry.
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(tok) = cached.as_ref() {
            if now_unix() < tok.expiry - 60 {
                return Ok(tok.access_token.clone());
            }
        }

        let (access_token, expires_in) = self.refresh().await?;
        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            expiry: now_unix() + expires_in,
        });

        Ok(access_token)
    }

    async fn refresh(&self) -> Result<(String, i64)> {
        if self.refresh_token.is_empty() {
            return Err(FormdeskError::Sheets(
                "no Google refresh token configured".to_string(),
            ));
        }

        let params = [
            ("refresh_token", self.refresh_token.as_str()),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("grant_type", "refresh_token"),
        ];

        let resp = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| FormdeskError::Sheets(format!("google token refresh failed: {e}")))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| FormdeskError::Sheets(format!("google token read failed: {e}")))?;

        if status != 200 {
            return Err(FormdeskError::Http { status, body: text });
        }

        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| FormdeskError::Sheets(format!("google token parse failed: {e}")))?;

        let access_token = json["access_token"]
            .as_str()
            .ok_or_else(|| FormdeskError::Sheets("missing access_token in refresh".to_string()))?
            .to_string();
        let expires_in = json["expires_in"].as_i64().unwrap_or(3600);

        Ok((access_token, expires_in))
    }
}
