//! # Mentionbot Library
//!
//! A Twitter/X mention bot: it polls the authenticated account's
//! mentions feed, replies to mentions containing a configured trigger
//! phrase, retweets every other mention, and favorites them all. The
//! last processed mention id is persisted to a flat file so restarts
//! never reprocess old mentions.
//!
//! ## Features
//!
//! - Twitter/X API v2 integration with OAuth 2.0 User Context authentication
//! - Trigger phrase classification (whole-word for single words, substring for phrases)
//! - Flat-file cursor persistence across restarts
//! - Uniform backoff on any platform failure (15 minutes, then resume)
//! - Comprehensive test suite with an injectable fake platform
//!
//! ## Configuration
//!
//! The following environment variables are recognized:
//! - `xapi_access_token`: Twitter API Access Token (required)
//! - `xapi_refresh_token`, `xapi_client_id`, `xapi_client_secret`: held for the authorization step (optional)
//! - `TRIGGER_PHRASE`: phrase that selects the reply branch (required)
//! - `REPLY_TEMPLATE`: response text for triggered mentions (required)
//! - `STATE_FILE`: cursor file path (defaults to `last_mention_id.txt`)

pub mod bot;
pub mod config;
pub mod oauth;
pub mod platform;
pub mod state;
pub mod trigger;
pub mod twitter;

// Re-export commonly used types and functions
pub use bot::{BotState, MentionBot};
pub use config::BotConfig;
pub use oauth::build_oauth2_user_context_header;
pub use platform::{Mention, Platform};
pub use state::StateStore;
pub use trigger::contains_trigger;
pub use twitter::TwitterSession;

#[cfg(test)]
mod tests;
