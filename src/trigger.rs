//! Trigger phrase classification.
//!
//! This module decides whether a mention's text contains the configured
//! trigger phrase. A positive classification selects the "reply" branch
//! of the bot; a negative one selects the default "retweet" branch.

/// Checks whether a mention's text contains the trigger phrase.
///
/// Both inputs are compared case-insensitively. The matching rule depends
/// on the shape of the phrase:
///
/// - A single-word phrase matches only as a whole word, i.e. as an exact
///   element of the whitespace-split tokens of the text. `"help"` matches
///   `"please HELP me"` but not `"helpful bot"`.
/// - A multi-word phrase matches anywhere as a contiguous substring of
///   the text.
///
/// # Parameters
///
/// - `text`: The mention text to classify
/// - `phrase`: The configured trigger phrase
///
/// # Returns
///
/// `true` if the phrase is present under the rule above, `false` otherwise.
///
/// # Example
///
/// ```rust
/// use mentionbot::contains_trigger;
///
/// assert!(contains_trigger("please HELP me @bot", "help"));
/// assert!(!contains_trigger("helpful bot", "help"));
/// assert!(contains_trigger("I think I NEED HELP NOW please", "need help now"));
/// ```
pub fn contains_trigger(text: &str, phrase: &str) -> bool {
    let phrase_lower = phrase.to_lowercase();
    let text_lower = text.to_lowercase();

    let mut phrase_words = phrase_lower.split_whitespace();
    match (phrase_words.next(), phrase_words.next()) {
        // Single-word phrase: whole-word match against the text tokens
        (Some(word), None) => text_lower.split_whitespace().any(|token| token == word),
        // Multi-word phrase: contiguous substring match
        _ => text_lower.contains(&phrase_lower),
    }
}
