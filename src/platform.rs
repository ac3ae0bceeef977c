//! Platform collaborator abstraction.
//!
//! The bot consumes exactly four capabilities from the social platform:
//! fetching mentions, replying, retweeting, and favoriting. They are
//! expressed as a trait so the poll loop can be exercised in tests with
//! a fake collaborator instead of the live Twitter API.

use async_trait::async_trait;

/// A single entry from the mentions feed.
///
/// Mentions are owned by the platform, never mutated by the bot.
#[derive(Debug, Clone)]
pub struct Mention {
    /// Unique mention (tweet) id
    pub id: String,
    /// The mention text
    pub text: String,
    /// The author's handle, without the leading `@`
    pub author: String,
}

/// The set of platform capabilities the bot consumes.
///
/// Every method reports failure as one undifferentiated boxed error;
/// throttling and other remote failures are not told apart, the caller
/// handles them all with the same backoff.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Fetches mentions newer than `since_id`, newest first as the feed
    /// API returns them. `None` fetches without a lower bound.
    async fn mentions_since(
        &self,
        since_id: Option<&str>,
    ) -> Result<Vec<Mention>, Box<dyn std::error::Error + Send + Sync>>;

    /// Submits `text` as a threaded reply to the given mention.
    async fn reply(
        &self,
        text: &str,
        mention_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Reshares (retweets) the given mention without modification.
    async fn retweet(
        &self,
        mention_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Marks the given mention as favorited.
    async fn favorite(
        &self,
        mention_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
