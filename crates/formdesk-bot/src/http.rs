use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use formdesk_core::error::{FormdeskError, Result};
use formdesk_line::types::WebhookBody;

use crate::bot::Bot;

async fn webhook(
    State(bot): State<Arc<Bot>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let secret = &bot.config.line.channel_secret;
    if !secret.is_empty() {
        let signature = headers
            .get("x-line-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !formdesk_line::signature::verify(secret, &body, signature) {
            log!(" [auth] webhook signature mismatch");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let parsed: WebhookBody = match serde_json::from_slice(&body) {
        Ok(b) => b,
        Err(e) => {
            log!(" [recv] unparseable webhook body: {e}");
            return StatusCode::BAD_REQUEST;
        }
    };

    // Each event is independent; acknowledge the webhook immediately and
    // let the handlers run to completion on their own.
    for event in parsed.events {
        let bot = Arc::clone(&bot);
        tokio::spawn(async move {
            if let Err(e) = bot.handle_event(&event).await {
                log!(" error handling event: {e}");
            }
        });
    }

    StatusCode::OK
}

async fn health() -> &'static str {
    "ok"
}

/// Bind the webhook server and run until the process exits.
pub async fn serve(bot: Arc<Bot>) -> Result<()> {
    let addr = format!("{}:{}", bot.config.server.bind, bot.config.server.port);

    if bot.config.line.channel_secret.is_empty() {
        log!(" [auth] channel_secret is empty, signature verification DISABLED");
    }

    let app = Router::new()
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .with_state(Arc::clone(&bot));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FormdeskError::Server(format!("failed to bind {addr}: {e}")))?;

    log!(" listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| FormdeskError::Server(format!("webhook server error: {e}")))?;

    Ok(())
}
