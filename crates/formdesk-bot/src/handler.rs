use std::fmt;

use formdesk_core::error::Result;
use formdesk_core::types::{parse_page_directive, parse_table, OutMessage};
use formdesk_engine::render::{render, render_page};
use formdesk_engine::resolver::{resolve, Outcome};
use formdesk_line::types::WebhookEvent;

use crate::bot::Bot;
use crate::util::format_timestamp;

/// How a response ultimately left the process, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Replied,
    Pushed,
    Failed,
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replied => write!(f, "replied"),
            Self::Pushed => write!(f, "pushed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl Bot {
    /// Handle one inbound webhook event end to end.
    pub async fn handle_event(&self, event: &WebhookEvent) -> Result<()> {
        if event.event_type != "message" {
            return Ok(());
        }
        let message = match &event.message {
            Some(m) if m.message_type == "text" => m,
            _ => return Ok(()),
        };
        let text = match message.text.as_deref() {
            Some(t) if !t.trim().is_empty() => t.trim(),
            _ => {
                log!(" [skip] empty message");
                return Ok(());
            }
        };
        let user_id = event
            .source
            .as_ref()
            .and_then(|s| s.user_id.as_deref())
            .unwrap_or("")
            .to_string();

        let preview: String = text.chars().take(80).collect();
        log!(" [recv] from={user_id} \"{preview}\"");

        if self.is_blocked(&user_id).await {
            log!(" [auth] DENIED user={user_id}");
            return Ok(());
        }

        if !self.config.sheets.log_sheet.is_empty() && !user_id.is_empty() {
            if let Err(e) = self.log_interaction(&user_id).await {
                log!(" [log] interaction log failed: {e}");
            }
        }

        // Page-advance directive: serve from the session store when it hits,
        // otherwise fall through to normal resolution.
        if let Some(index) = parse_page_directive(text) {
            if let Some((page, total)) = self.sessions.advance(&user_id, index) {
                log!(" [route] page {}/{total}", index + 1);
                let msg = render_page(&page, index, total);
                let delivery = self.deliver(event, &user_id, &[msg]).await;
                log!(" [send] {delivery}");
                return Ok(());
            }
            log!(" [route] no session for page directive, resolving as text");
        }

        let grid = self.fetch_table().await?;
        let records = parse_table(&grid);

        let outcome = resolve(text, &records, self.config.search.fuzzy_threshold);
        match &outcome {
            Outcome::EmptyTable => log!(" [resolve] empty table"),
            Outcome::NotFound => log!(" [resolve] not found"),
            Outcome::Detail(rows) => log!(" [resolve] detail ({} rows)", rows.len()),
            Outcome::Candidates(codes) => log!(" [resolve] {} candidates", codes.len()),
        }

        let rendered = render(&outcome, &records, self.config.search.page_size);
        if let Some(pages) = rendered.pages {
            if !user_id.is_empty() {
                self.sessions.put(&user_id, pages);
            }
        }

        let delivery = self.deliver(event, &user_id, &rendered.messages).await;
        log!(" [send] {delivery}");
        Ok(())
    }

    /// Fetch the form table, retrying the read once on failure.
    async fn fetch_table(&self) -> Result<Vec<Vec<String>>> {
        let range = &self.config.sheets.data_range;
        match self.sheets.values_get(range).await {
            Ok(grid) => Ok(grid),
            Err(first) => {
                log!(" [sheets] fetch failed, retrying once: {first}");
                self.sheets.values_get(range).await
            }
        }
    }

    /// Attempt the reply channel, then one push fallback.
    async fn deliver(
        &self,
        event: &WebhookEvent,
        user_id: &str,
        messages: &[OutMessage],
    ) -> Delivery {
        if let Some(token) = event.reply_token.as_deref() {
            match self.line.reply(token, messages).await {
                Ok(()) => return Delivery::Replied,
                Err(e) => log!(" [send] reply failed: {e}"),
            }
        }
        if !user_id.is_empty() {
            match self.line.push(user_id, messages).await {
                Ok(()) => return Delivery::Pushed,
                Err(e) => log!(" [send] push fallback failed: {e}"),
            }
        }
        Delivery::Failed
    }

    /// Check the blocklist sheet. Fetch failures fail open.
    async fn is_blocked(&self, user_id: &str) -> bool {
        let range = &self.config.sheets.blocklist_range;
        if range.is_empty() || user_id.is_empty() {
            return false;
        }
        match self.sheets.values_get(range).await {
            Ok(grid) => grid.iter().flatten().any(|cell| cell == user_id),
            Err(e) => {
                log!(" [auth] blocklist check failed (fail-open): {e}");
                false
            }
        }
    }

    /// Append-or-update this requester's row in the interaction log sheet.
    async fn log_interaction(&self, user_id: &str) -> Result<()> {
        let sheet = &self.config.sheets.log_sheet;

        let display_name = match self.line.get_profile(user_id).await {
            Ok(profile) => profile.display_name,
            Err(e) => {
                log!(" [log] profile fetch failed: {e}");
                String::new()
            }
        };

        let row = vec![
            user_id.to_string(),
            display_name,
            format_timestamp(formdesk_core::types::now_unix()),
        ];

        let ids = self.sheets.values_get(&format!("{sheet}!A:A")).await?;
        match find_log_row(&ids, user_id) {
            Some(row_number) => {
                let range = format!("{sheet}!A{row_number}:C{row_number}");
                self.sheets.values_update(&range, &row).await
            }
            None => self.sheets.values_append(&format!("{sheet}!A:C"), &row).await,
        }
    }
}

/// 1-based sheet row of the requester's existing log entry, if any.
fn find_log_row(ids: &[Vec<String>], user_id: &str) -> Option<usize> {
    ids.iter()
        .position(|row| row.first().map(|cell| cell == user_id).unwrap_or(false))
        .map(|idx| idx + 1)
}
