//! # Mentionbot
//!
//! Entry point for the mention bot process. It initializes logging,
//! loads the configuration from environment variables, constructs the
//! authenticated Twitter session (verifying the credentials), and runs
//! the polling loop until the process is terminated externally.
//!
//! ## Example Usage
//!
//! ```bash
//! # Run with info logging
//! RUST_LOG=info \
//! xapi_access_token=... \
//! TRIGGER_PHRASE="need help now" \
//! REPLY_TEMPLATE="We hear you, help is on the way." \
//! cargo run
//! ```

use log::error;

use mentionbot::{BotConfig, MentionBot, StateStore, TwitterSession};

#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let session = match TwitterSession::connect(&config).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to authenticate with the Twitter API: {}", e);
            std::process::exit(1);
        }
    };

    let store = StateStore::new(&config.state_file);
    let bot = MentionBot::new(
        session,
        store,
        config.trigger_phrase,
        config.reply_template,
    );

    // Runs forever; the process is stopped by external termination only
    bot.run().await;
}
