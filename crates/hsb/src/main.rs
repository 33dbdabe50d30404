use std::sync::Arc;

use teloxide::Bot;
use tracing::{error, info};

use hsb_core::{config::Config, poller::Poller};
use hsb_practicum::PracticumClient;
use hsb_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    hsb_core::logging::init("hsb");

    // Missing credentials stop the process here, before any network use.
    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("startup configuration is invalid: {e}");
            return Err(e.into());
        }
    };

    let source = Arc::new(PracticumClient::new(
        cfg.endpoint.clone(),
        cfg.practicum_token.clone(),
        cfg.request_timeout,
    ));
    let messenger = Arc::new(TelegramMessenger::new(Bot::new(
        cfg.telegram_bot_token.clone(),
    )));

    info!(
        endpoint = %cfg.endpoint,
        poll_interval_secs = cfg.poll_interval.as_secs(),
        "homework status bot started"
    );

    let from_date = chrono::Utc::now().timestamp();
    Poller::new(cfg, source, messenger, from_date).run().await;

    Ok(())
}
