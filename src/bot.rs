//! Mention processor: the bot's polling loop.
//!
//! This module drives an unbounded loop over the mentions feed. Each
//! cycle reads the persisted cursor, fetches everything newer, acts on
//! the mentions oldest first (reply when the trigger phrase is present,
//! retweet otherwise, favorite always), and advances the cursor after
//! every mention. The loop is modeled as an explicit two-state machine:
//! `Polling` cycles back immediately, any platform failure moves to
//! `Backoff` which pauses before polling resumes.

use log::{error, info};
use std::time::Duration;
use tokio::time::sleep;

use crate::platform::{Mention, Platform};
use crate::state::StateStore;
use crate::trigger::contains_trigger;

/// Pause after each fully processed mention, a crude pacing control
/// against API throttling.
const MENTION_PAUSE: Duration = Duration::from_secs(15);

/// Pause after a platform failure before polling resumes.
const BACKOFF_PAUSE: Duration = Duration::from_secs(15 * 60);

/// The two states of the polling loop.
///
/// `Polling` transitions to `Backoff` on any platform-signaled failure;
/// `Backoff` transitions back to `Polling` unconditionally after the
/// fixed pause. There is no terminal state, the process runs until it is
/// killed externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    /// Fetching and processing mentions
    Polling,
    /// Waiting out the fixed pause after a failure
    Backoff,
}

/// The mention processor.
///
/// Generic over the platform collaborator so the loop can be exercised
/// in tests with a fake that fails on demand. The two pause durations
/// default to the production values and can be overridden for tests.
pub struct MentionBot<P> {
    platform: P,
    store: StateStore,
    trigger_phrase: String,
    reply_template: String,
    mention_pause: Duration,
    backoff_pause: Duration,
}

impl<P: Platform> MentionBot<P> {
    /// Creates a mention processor with the production pause durations
    /// (15 seconds per mention, 15 minutes after a failure).
    pub fn new(
        platform: P,
        store: StateStore,
        trigger_phrase: String,
        reply_template: String,
    ) -> Self {
        MentionBot {
            platform,
            store,
            trigger_phrase,
            reply_template,
            mention_pause: MENTION_PAUSE,
            backoff_pause: BACKOFF_PAUSE,
        }
    }

    /// Overrides the pause durations. Tests pass `Duration::ZERO` so the
    /// loop can be stepped without waiting.
    pub fn with_pauses(mut self, mention_pause: Duration, backoff_pause: Duration) -> Self {
        self.mention_pause = mention_pause;
        self.backoff_pause = backoff_pause;
        self
    }

    /// Runs the polling loop forever.
    ///
    /// Successful cycles chain back to back with no inter-cycle delay;
    /// a failed cycle inserts the backoff pause before the next one.
    /// This function never returns, the process must be terminated
    /// externally to stop the bot.
    pub async fn run(&self) {
        info!("Mention bot activated");
        loop {
            match self.step().await {
                BotState::Polling => {}
                BotState::Backoff => {
                    info!(
                        "Backing off for {} seconds before polling resumes",
                        self.backoff_pause.as_secs()
                    );
                    sleep(self.backoff_pause).await;
                }
            }
        }
    }

    /// Runs one poll cycle and returns the state the loop moves to next.
    ///
    /// Any failure signaled during the cycle - fetching, acting on a
    /// mention, or persisting the cursor - aborts the remainder of the
    /// cycle and yields `Backoff`. Throttling and other remote failures
    /// are deliberately not told apart.
    pub async fn step(&self) -> BotState {
        match self.run_cycle().await {
            Ok(processed) => {
                if processed > 0 {
                    info!("Poll cycle cleared {} mentions", processed);
                }
                BotState::Polling
            }
            Err(e) => {
                error!("Poll cycle failed: {}", e);
                BotState::Backoff
            }
        }
    }

    /// Fetches mentions newer than the persisted cursor and processes
    /// them in chronological order, returning how many were processed.
    async fn run_cycle(&self) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        let last_id = self.store.read()?;
        let since_id = if last_id.is_empty() {
            None
        } else {
            Some(last_id.as_str())
        };

        // The feed returns newest first; process oldest first so the
        // cursor only ever advances.
        let mut mentions = self.platform.mentions_since(since_id).await?;
        mentions.reverse();

        let processed = mentions.len();
        for mention in &mentions {
            self.process_mention(mention).await?;
            sleep(self.mention_pause).await;
        }

        Ok(processed)
    }

    /// Acts on a single mention: reply if the trigger phrase is present,
    /// retweet otherwise, then persist the cursor and favorite.
    ///
    /// The cursor is written immediately after the reply/retweet is
    /// submitted, before the favorite, so a crash loses at most the
    /// in-flight mention's completion status.
    async fn process_mention(
        &self,
        mention: &Mention,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if contains_trigger(&mention.text, &self.trigger_phrase) {
            let reply = format!("@{} {}", mention.author, self.reply_template);
            self.platform.reply(&reply, &mention.id).await?;
        } else {
            self.platform.retweet(&mention.id).await?;
        }

        self.store.write(&mention.id)?;
        self.platform.favorite(&mention.id).await?;

        info!("Mention-id cleared {}", mention.id);
        Ok(())
    }
}
