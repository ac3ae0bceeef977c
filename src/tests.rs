//! # Tests Module
//!
//! This module contains the tests for the mention bot.
//!
//! ## Test Categories
//!
//! ### Unit Tests
//! - Trigger phrase classification (`contains_trigger`)
//! - State store persistence (`StateStore`)
//! - Configuration defaults (`get_state_file_path`)
//!
//! ### Processor Tests
//! - Poll cycle ordering and cursor advancement
//! - Reply/retweet branch selection
//! - Failure handling and the backoff transition
//!
//! ## Test Environment
//!
//! Processor tests inject a fake platform collaborator that records
//! every submitted action and can fail on demand, and run the bot with
//! zero pause durations so no test ever sleeps. State store tests use
//! temporary directories and clean up after execution.

use crate::bot::{BotState, MentionBot};
use crate::config::get_state_file_path;
use crate::platform::{Mention, Platform};
use crate::state::StateStore;
use crate::trigger::contains_trigger;

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A fake platform collaborator for processor tests.
///
/// Serves a fixed batch of mentions (newest first, as the real feed
/// does), records every submitted action in order, and can be told to
/// fail the retweet of one specific mention id.
struct FakePlatform {
    mentions: Vec<Mention>,
    fail_on_retweet_of: Option<String>,
    actions: Arc<Mutex<Vec<String>>>,
    since_ids: Arc<Mutex<Vec<Option<String>>>>,
}

impl FakePlatform {
    fn new(mentions: Vec<Mention>) -> Self {
        FakePlatform {
            mentions,
            fail_on_retweet_of: None,
            actions: Arc::new(Mutex::new(Vec::new())),
            since_ids: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_retweet_failure(mut self, id: &str) -> Self {
        self.fail_on_retweet_of = Some(id.to_string());
        self
    }

    /// Shared handle to the recorded actions, kept by the test after the
    /// fake is moved into the bot.
    fn actions_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.actions)
    }

    fn since_ids_handle(&self) -> Arc<Mutex<Vec<Option<String>>>> {
        Arc::clone(&self.since_ids)
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn mentions_since(
        &self,
        since_id: Option<&str>,
    ) -> Result<Vec<Mention>, Box<dyn std::error::Error + Send + Sync>> {
        self.since_ids
            .lock()
            .unwrap()
            .push(since_id.map(|s| s.to_string()));
        Ok(self.mentions.clone())
    }

    async fn reply(
        &self,
        text: &str,
        mention_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.actions
            .lock()
            .unwrap()
            .push(format!("reply {} {}", mention_id, text));
        Ok(())
    }

    async fn retweet(
        &self,
        mention_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_on_retweet_of.as_deref() == Some(mention_id) {
            return Err("Twitter API error for operation 'retweet_mention' (429)".into());
        }
        self.actions
            .lock()
            .unwrap()
            .push(format!("retweet {}", mention_id));
        Ok(())
    }

    async fn favorite(
        &self,
        mention_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.actions
            .lock()
            .unwrap()
            .push(format!("favorite {}", mention_id));
        Ok(())
    }
}

fn mention(id: &str, text: &str, author: &str) -> Mention {
    Mention {
        id: id.to_string(),
        text: text.to_string(),
        author: author.to_string(),
    }
}

/// Builds a bot over the given fake with zero pauses and a state store
/// in a fresh temporary directory. Returns the bot, the store path's
/// directory guard, and a second store over the same file for
/// assertions.
fn test_bot(
    platform: FakePlatform,
    trigger_phrase: &str,
    reply_template: &str,
) -> (MentionBot<FakePlatform>, tempfile::TempDir, StateStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_mention_id.txt");
    let bot = MentionBot::new(
        platform,
        StateStore::new(&path),
        trigger_phrase.to_string(),
        reply_template.to_string(),
    )
    .with_pauses(Duration::ZERO, Duration::ZERO);
    (bot, dir, StateStore::new(&path))
}

/// Unit test for single-word trigger phrases.
///
/// A single-word phrase must match as a whole word among the
/// whitespace-split tokens of the text, case-insensitively; appearing
/// inside a longer word does not count.
#[test]
fn test_single_word_trigger_whole_word_match() {
    // Case-insensitive whole-word match
    assert!(contains_trigger("please HELP me @bot", "help"));

    // Substring of a longer word is not a match
    assert!(!contains_trigger("helpful bot", "help"));

    // Exact token anywhere in the text
    assert!(contains_trigger("can anyone help", "help"));
    assert!(!contains_trigger("no trigger here", "help"));
}

/// Unit test for multi-word trigger phrases.
///
/// A multi-word phrase matches anywhere as a contiguous substring of the
/// text, case-insensitively.
#[test]
fn test_multi_word_trigger_substring_match() {
    assert!(contains_trigger(
        "I think I NEED HELP NOW please",
        "need help now"
    ));
    assert!(!contains_trigger("I need help later", "need help now"));

    // Word order matters for substring containment
    assert!(!contains_trigger("help need now I do", "need help now"));
}

/// Unit test verifying the classifier has no side effects and gives the
/// same answer on repeated calls with the same inputs.
#[test]
fn test_trigger_classifier_is_pure() {
    let first = contains_trigger("please help me", "help");
    let second = contains_trigger("please help me", "help");
    assert_eq!(first, second);
    assert!(first);
}

/// Unit test for the state store round trip.
///
/// `write(X)` followed by `read()` must return exactly `X`, and the
/// write fully replaces the previous content.
#[test]
fn test_state_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("last_mention_id.txt"));

    store.write("123456789").unwrap();
    assert_eq!(store.read().unwrap(), "123456789");

    // A shorter id fully replaces the longer previous value
    store.write("42").unwrap();
    assert_eq!(store.read().unwrap(), "42");
}

/// Unit test for state store read idempotence: two reads without an
/// intervening write return the same value.
#[test]
fn test_state_store_read_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("last_mention_id.txt"));

    store.write("100").unwrap();
    assert_eq!(store.read().unwrap(), "100");
    assert_eq!(store.read().unwrap(), "100");
}

/// Unit test for first-run behavior.
///
/// Reading a store whose backing file does not exist yet must return an
/// empty string and leave an empty file in place, so a second read also
/// returns an empty string.
#[test]
fn test_state_store_first_run_creates_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_mention_id.txt");
    let store = StateStore::new(&path);

    assert!(!path.exists());
    assert_eq!(store.read().unwrap(), "");
    assert!(path.exists());
    assert_eq!(store.read().unwrap(), "");
}

/// Unit test for the get_state_file_path function.
///
/// This test verifies that the state file path configuration:
/// - Returns the default path when STATE_FILE is not set
/// - Returns the configured path when STATE_FILE is set
/// - Properly cleans up environment variables after testing
#[test]
fn test_get_state_file_path() {
    // Test default path
    std::env::remove_var("STATE_FILE");
    assert_eq!(get_state_file_path(), "last_mention_id.txt");

    // Test custom path
    std::env::set_var("STATE_FILE", "/tmp/bot_cursor.txt");
    assert_eq!(get_state_file_path(), "/tmp/bot_cursor.txt");

    // Clean up
    std::env::remove_var("STATE_FILE");
}

/// Processor test: a newest-first batch is acted on oldest first and the
/// cursor ends on the newest processed id.
///
/// With cursor "100" and a fetched batch [103, 102, 101], the bot must
/// retweet and favorite 101, 102, 103 in that order, pass "100" as the
/// since id, and leave the cursor at "103".
#[tokio::test]
async fn test_batch_processed_oldest_first() {
    let platform = FakePlatform::new(vec![
        mention("103", "third", "carol"),
        mention("102", "second", "bob"),
        mention("101", "first", "alice"),
    ]);
    let actions = platform.actions_handle();
    let since_ids = platform.since_ids_handle();

    let (bot, _dir, store) = test_bot(platform, "help", "On my way!");
    store.write("100").unwrap();

    assert_eq!(bot.step().await, BotState::Polling);

    assert_eq!(
        *actions.lock().unwrap(),
        vec![
            "retweet 101",
            "favorite 101",
            "retweet 102",
            "favorite 102",
            "retweet 103",
            "favorite 103",
        ]
    );
    assert_eq!(*since_ids.lock().unwrap(), vec![Some("100".to_string())]);
    assert_eq!(store.read().unwrap(), "103");
}

/// Processor test: a mention containing the trigger phrase takes the
/// reply branch, addressed to its author with the reply template, and is
/// still favorited; mentions without the trigger are retweeted.
#[tokio::test]
async fn test_trigger_mention_gets_reply() {
    let platform = FakePlatform::new(vec![
        mention("202", "please HELP me @bot", "alice"),
        mention("201", "nice weather today", "bob"),
    ]);
    let actions = platform.actions_handle();

    let (bot, _dir, store) = test_bot(platform, "help", "On my way!");

    assert_eq!(bot.step().await, BotState::Polling);

    assert_eq!(
        *actions.lock().unwrap(),
        vec![
            "retweet 201",
            "favorite 201",
            "reply 202 @alice On my way!",
            "favorite 202",
        ]
    );
    assert_eq!(store.read().unwrap(), "202");
}

/// Processor test: an empty cursor fetches without a lower bound.
#[tokio::test]
async fn test_empty_cursor_fetches_unbounded() {
    let platform = FakePlatform::new(Vec::new());
    let since_ids = platform.since_ids_handle();

    let (bot, _dir, store) = test_bot(platform, "help", "On my way!");

    assert_eq!(bot.step().await, BotState::Polling);

    assert_eq!(*since_ids.lock().unwrap(), vec![None]);
    // An empty batch never touches the cursor
    assert_eq!(store.read().unwrap(), "");
}

/// Processor test: a platform failure mid-batch aborts the cycle and
/// moves the loop to the backoff state, leaving the cursor on the last
/// fully processed mention.
///
/// With a batch [103, 102, 101] and a failure on the retweet of 102
/// after 101 succeeded, the cursor must read "101" and nothing may have
/// been submitted for 102 or 103.
#[tokio::test]
async fn test_failure_mid_batch_leaves_cursor_and_backs_off() {
    let platform = FakePlatform::new(vec![
        mention("103", "third", "carol"),
        mention("102", "second", "bob"),
        mention("101", "first", "alice"),
    ])
    .with_retweet_failure("102");
    let actions = platform.actions_handle();

    let (bot, _dir, store) = test_bot(platform, "help", "On my way!");
    store.write("100").unwrap();

    assert_eq!(bot.step().await, BotState::Backoff);

    assert_eq!(
        *actions.lock().unwrap(),
        vec!["retweet 101", "favorite 101"]
    );
    assert_eq!(store.read().unwrap(), "101");
}

/// Processor test: after a failed cycle, the next step retries from the
/// persisted cursor, reprocessing the failed mention but not the ones
/// that completed.
#[tokio::test]
async fn test_next_cycle_resumes_from_cursor() {
    let platform = FakePlatform::new(vec![
        mention("103", "third", "carol"),
        mention("102", "second", "bob"),
        mention("101", "first", "alice"),
    ])
    .with_retweet_failure("102");
    let since_ids = platform.since_ids_handle();

    let (bot, _dir, store) = test_bot(platform, "help", "On my way!");
    store.write("100").unwrap();

    assert_eq!(bot.step().await, BotState::Backoff);
    assert_eq!(bot.step().await, BotState::Backoff);

    // The second cycle read the advanced cursor, not the original one
    assert_eq!(
        *since_ids.lock().unwrap(),
        vec![Some("100".to_string()), Some("101".to_string())]
    );
}
