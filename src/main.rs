use formdesk_core::config::Config;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config_path =
        std::env::var("FORMDESK_CONFIG").unwrap_or_else(|_| "formdesk.toml".to_string());

    let config = Config::load(Path::new(&config_path)).unwrap_or_else(|e| {
        eprintln!("fatal: failed to load config: {e}");
        std::process::exit(1);
    });

    if config.line.channel_token.is_empty() {
        eprintln!("fatal: FORMDESK_LINE_CHANNEL_TOKEN is not set");
        std::process::exit(1);
    }
    if config.sheets.spreadsheet_id.is_empty() {
        eprintln!("fatal: FORMDESK_SPREADSHEET_ID is not set");
        std::process::exit(1);
    }

    eprintln!("formdesk: starting...");

    let bot = Arc::new(formdesk_bot::bot::Bot::new(config));

    if let Err(e) = formdesk_bot::http::serve(bot).await {
        eprintln!("fatal: server error: {e}");
        std::process::exit(1);
    }
}
