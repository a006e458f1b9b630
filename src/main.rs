use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::{error, info};

use hemis_bot::cache::SnapshotCache;
use hemis_bot::config::Config;
use hemis_bot::data::schema::SHEET_SCHEMA_V1;
use hemis_bot::data::source::{RowSource, SheetsClient};
use hemis_bot::handlers::BotHandlers;
use hemis_bot::logging::init_tracing;
use hemis_bot::services::{ActionLogger, TextChart};
use hemis_bot::telegram::api::TelegramClient;
use hemis_bot::utils::app_paths::AppPaths;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::load()?;
    if config.telegram.bot_token.is_empty() {
        bail!("BOT_TOKEN is not set (environment or config file)");
    }
    if config.sheet.sheet_id.is_empty() {
        bail!("SHEET_ID is not set (environment or config file)");
    }

    let schema = SHEET_SCHEMA_V1;
    let source: Arc<dyn RowSource> = Arc::new(SheetsClient::new(
        config.sheet.api_token.clone(),
        schema,
    ));
    let cache = Arc::new(SnapshotCache::new(
        Arc::clone(&source),
        schema,
        Duration::from_secs(config.behavior.cache_ttl_secs),
    ));

    let log_path = match &config.behavior.action_log_path {
        Some(path) => path.clone(),
        None => AppPaths::action_log_file()?,
    };
    let actions = ActionLogger::new(log_path);

    let telegram = TelegramClient::new(&config.telegram.bot_token);
    let poll_timeout = config.telegram.poll_timeout_secs;

    let handlers = Arc::new(BotHandlers::new(
        config,
        schema,
        telegram.clone(),
        cache,
        source,
        actions,
        Box::new(TextChart),
    ));

    info!(target: "system", "bot started, polling for updates");

    let mut offset = 0i64;
    loop {
        let updates = match telegram.get_updates(offset, poll_timeout).await {
            Ok(updates) => updates,
            Err(e) => {
                error!(target: "telegram", "getUpdates failed: {e}");
                tokio::time::sleep(Duration::from_secs(3)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let handlers = Arc::clone(&handlers);
            // One task per update: a slow fetch in one conversation must
            // not stall the others.
            tokio::spawn(async move {
                handlers.handle_update(update).await;
            });
        }
    }
}
