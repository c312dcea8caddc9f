use std::sync::Arc;
use std::time::Duration;

use formdesk_core::config::Config;
use formdesk_engine::session::SessionStore;
use formdesk_line::client::LineClient;
use formdesk_sheets::auth::SheetsAuth;
use formdesk_sheets::client::SheetsClient;

/// The orchestration struct that ties all components together.
///
/// Built once at startup and shared via `Arc`; every collaborator hangs off
/// it so handlers never reach for globals.
pub struct Bot {
    pub(crate) config: Config,
    pub(crate) line: LineClient,
    pub(crate) sheets: SheetsClient,
    pub(crate) sessions: SessionStore,
}

impl Bot {
    pub fn new(config: Config) -> Self {
        let line = LineClient::new(config.line.channel_token.clone());

        let auth = Arc::new(SheetsAuth::new(
            config.sheets.client_id.clone(),
            config.sheets.client_secret.clone(),
            config.sheets.refresh_token.clone(),
        ));
        let sheets = SheetsClient::new(auth, config.sheets.spreadsheet_id.clone());

        let sessions = SessionStore::new(
            config.session.capacity,
            Duration::from_secs(config.session.ttl_secs),
        );

        Self {
            config,
            line,
            sheets,
            sessions,
        }
    }
}
