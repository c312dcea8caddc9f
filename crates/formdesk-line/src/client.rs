use formdesk_core::error::{FormdeskError, Result};
use formdesk_core::types::OutMessage;
use reqwest::Client;
use serde_json::Value;

use crate::message::to_line_message;
use crate::types::Profile;

const API_BASE: &str = "https://api.line.me";

/// A reply batch may carry at most 5 message objects.
const MAX_MESSAGES: usize = 5;

pub struct LineClient {
    client: Client,
    token: String,
    base_url: String,
}

impl LineClient {
    pub fn new(token: String) -> Self {
        Self {
            client: Client::new(),
            token,
            base_url: API_BASE.to_string(),
        }
    }

    /// Send messages bound to an inbound event's reply token.
    pub async fn reply(&self, reply_token: &str, messages: &[OutMessage]) -> Result<()> {
        let url = format!("{}/v2/bot/message/reply", self.base_url);
        let body = serde_json::json!({
            "replyToken": reply_token,
            "messages": render_batch(messages),
        });
        self.post(&url, &body).await
    }

    /// Push messages directly to a requester, bypassing the reply channel.
    pub async fn push(&self, user_id: &str, messages: &[OutMessage]) -> Result<()> {
        let url = format!("{}/v2/bot/message/push", self.base_url);
        let body = serde_json::json!({
            "to": user_id,
            "messages": render_batch(messages),
        });
        self.post(&url, &body).await
    }

    /// Fetch a requester's profile (display name).
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile> {
        let url = format!("{}/v2/bot/profile/{user_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| FormdeskError::Line(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FormdeskError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| FormdeskError::Line(e.to_string()))
    }

    async fn post(&self, url: &str, body: &Value) -> Result<()> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| FormdeskError::Line(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FormdeskError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

fn render_batch(messages: &[OutMessage]) -> Vec<Value> {
    messages
        .iter()
        .take(MAX_MESSAGES)
        .map(to_line_message)
        .collect()
}
