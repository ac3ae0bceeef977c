//! Configuration module for the mention bot.
//!
//! This module contains the configuration structure and environment
//! variable handling for the Twitter/X API credentials and the bot's
//! behavior settings (trigger phrase, reply template, state file path).

use log::{debug, error, info, warn};
use std::env;

/// Default path of the flat file holding the last processed mention id.
const DEFAULT_STATE_FILE: &str = "last_mention_id.txt";

/// Configuration for the mention bot.
///
/// Holds the credentials required to authenticate with the Twitter/X API
/// v2 endpoints plus the two strings that drive the bot's behavior: the
/// trigger phrase that selects the reply branch and the template used to
/// compose replies.
#[derive(Debug)]
pub struct BotConfig {
    /// The Access Token for OAuth 2.0 User Context authentication (all operations)
    pub access_token: String,
    /// The Refresh Token, held for the authorization step only
    pub refresh_token: Option<String>,
    /// The Client ID for OAuth 2.0 operations
    pub client_id: Option<String>,
    /// The Client Secret for OAuth 2.0 operations
    pub client_secret: Option<String>,
    /// Phrase that, when present in a mention, selects the reply branch
    pub trigger_phrase: String,
    /// Response text used verbatim when composing replies
    pub reply_template: String,
    /// Path of the file persisting the last processed mention id
    pub state_file: String,
}

impl BotConfig {
    /// Creates a new `BotConfig` by loading all settings from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `xapi_access_token`: Twitter API Access Token (OAuth 2.0 User Context)
    /// - `TRIGGER_PHRASE`: The phrase that selects the reply branch
    /// - `REPLY_TEMPLATE`: The response text for triggered mentions
    ///
    /// # Optional Environment Variables
    ///
    /// - `xapi_refresh_token`: Refresh Token (authorization tooling only)
    /// - `xapi_client_id`: Client ID for OAuth 2.0 operations
    /// - `xapi_client_secret`: Client Secret for OAuth 2.0 operations
    /// - `STATE_FILE`: State file path (defaults to `last_mention_id.txt`)
    ///
    /// # Returns
    ///
    /// - `Ok(BotConfig)`: If all required environment variables are present
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If a required variable is missing
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        info!("Loading bot configuration from environment variables");

        let access_token = match env::var("xapi_access_token") {
            Ok(token) => {
                info!(
                    "Found xapi_access_token environment variable with length: {}",
                    token.len()
                );
                debug!("Access token (masked): {}", mask_token(&token));

                if token.is_empty() {
                    error!("Access token is empty");
                    return Err("Access token cannot be empty".into());
                }
                if token.len() < 10 {
                    warn!(
                        "Access token seems unusually short ({} characters)",
                        token.len()
                    );
                }
                token
            }
            Err(e) => {
                error!("Failed to load xapi_access_token from environment: {}", e);
                error!("Make sure xapi_access_token environment variable is set");
                return Err(
                    format!("Missing xapi_access_token environment variable: {}", e).into(),
                );
            }
        };

        let refresh_token = load_optional_credential("xapi_refresh_token");
        let client_id = load_optional_credential("xapi_client_id");
        let client_secret = load_optional_credential("xapi_client_secret");

        let trigger_phrase = env::var("TRIGGER_PHRASE").map_err(|e| {
            error!("Failed to load TRIGGER_PHRASE from environment: {}", e);
            format!("Missing TRIGGER_PHRASE environment variable: {}", e)
        })?;
        if trigger_phrase.trim().is_empty() {
            warn!("TRIGGER_PHRASE is blank - every mention will take the reply branch");
        }

        let reply_template = env::var("REPLY_TEMPLATE").map_err(|e| {
            error!("Failed to load REPLY_TEMPLATE from environment: {}", e);
            format!("Missing REPLY_TEMPLATE environment variable: {}", e)
        })?;

        let state_file = get_state_file_path();

        let config = BotConfig {
            access_token,
            refresh_token,
            client_id,
            client_secret,
            trigger_phrase,
            reply_template,
            state_file,
        };

        info!("Bot configuration loaded successfully");
        info!(
            "Trigger phrase: '{}', state file: '{}'",
            config.trigger_phrase, config.state_file
        );

        Ok(config)
    }
}

/// Loads an optional credential from the environment, logging its presence
/// with the value masked.
fn load_optional_credential(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => {
            info!("Found {} environment variable", name);
            debug!("{} (masked): {}", name, mask_token(&value));
            Some(value)
        }
        Ok(_) => {
            warn!("{} is set but empty, ignoring it", name);
            None
        }
        Err(_) => {
            info!("No {} found in environment variables", name);
            None
        }
    }
}

/// Masks a secret for logging, keeping at most the first and last eight
/// characters visible.
fn mask_token(token: &str) -> String {
    let len = token.len();
    if len > 16 {
        format!("{}...{}", &token[..8], &token[len - 8..])
    } else if len > 8 {
        format!("{}...", &token[..8])
    } else {
        format!("{}...", token)
    }
}

/// Gets the state file path from environment variables or returns the default.
///
/// This function reads the `STATE_FILE` environment variable; if it is not
/// set or is empty, it defaults to `last_mention_id.txt` in the working
/// directory.
///
/// # Returns
///
/// The state file path as a `String`.
///
/// # Example
///
/// ```rust
/// use mentionbot::config::get_state_file_path;
///
/// // With no STATE_FILE set
/// let path = get_state_file_path(); // Returns "last_mention_id.txt"
/// ```
pub fn get_state_file_path() -> String {
    match env::var("STATE_FILE") {
        Ok(path) if !path.is_empty() => path,
        _ => DEFAULT_STATE_FILE.to_string(),
    }
}
