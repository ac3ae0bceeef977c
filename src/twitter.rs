//! Twitter/X API integration module.
//!
//! This module contains the production implementation of the platform
//! collaborator over the Twitter API v2, using OAuth 2.0 User Context
//! authentication. One long-lived authenticated session is constructed
//! at startup and handed to the mention processor; there is no ambient
//! global client.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use crate::config::BotConfig;
use crate::oauth::build_oauth2_user_context_header;
use crate::platform::{Mention, Platform};

/// Base URL of the Twitter API.
const API_BASE_URL: &str = "https://api.x.com";

/// Page size requested from the mentions timeline (the API maximum).
const MENTIONS_PAGE_SIZE: u32 = 100;

/// A user object as returned by the Twitter API v2.
#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    username: String,
}

/// A tweet object as returned by the mentions timeline.
#[derive(Debug, Deserialize)]
struct ApiTweet {
    id: String,
    text: String,
    author_id: Option<String>,
}

/// The `includes` expansion block of a timeline response.
#[derive(Debug, Deserialize, Default)]
struct ApiIncludes {
    #[serde(default)]
    users: Vec<ApiUser>,
}

/// Response shape of `GET /2/users/{id}/mentions`.
#[derive(Debug, Deserialize)]
struct MentionsResponse {
    #[serde(default)]
    data: Vec<ApiTweet>,
    #[serde(default)]
    includes: ApiIncludes,
}

/// Response shape of `GET /2/users/me`.
#[derive(Debug, Deserialize)]
struct MeResponse {
    data: ApiUser,
}

/// A long-lived authenticated session against the Twitter API v2.
///
/// The session owns the HTTP client and the authorization header and
/// knows the authenticated user's id, which the v2 mentions, retweet and
/// like endpoints all require in their paths.
pub struct TwitterSession {
    client: Client,
    auth_header: String,
    user_id: String,
}

impl TwitterSession {
    /// Constructs an authenticated session from the given configuration.
    ///
    /// Construction verifies the credentials by resolving the
    /// authenticated user via `GET /2/users/me`; a session is only
    /// returned if the platform accepted the access token.
    ///
    /// # Parameters
    ///
    /// - `config`: The bot configuration holding the API credentials
    ///
    /// # Returns
    ///
    /// - `Ok(TwitterSession)`: An authenticated session ready for use
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If the
    ///   credential verification request fails
    pub async fn connect(
        config: &BotConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        info!("Verifying Twitter API credentials");

        let session = TwitterSession {
            client: Client::new(),
            auth_header: build_oauth2_user_context_header(&config.access_token),
            user_id: String::new(),
        };

        let url = format!("{}/2/users/me?user.fields=id,username", API_BASE_URL);
        let request_builder = session
            .client
            .get(&url)
            .header("Authorization", &session.auth_header);

        let response_text = session
            .send_api_request(request_builder, "verify_credentials")
            .await?;
        let me: MeResponse = serde_json::from_str(&response_text)?;

        info!(
            "Authenticated as @{} (user id {})",
            me.data.username, me.data.id
        );

        Ok(TwitterSession {
            user_id: me.data.id,
            ..session
        })
    }

    /// Sends a prepared request to the Twitter API and returns the
    /// response body.
    ///
    /// All failures - network errors, throttling, authentication
    /// problems - are reported uniformly as one boxed error carrying the
    /// operation name, the status and the response body. The caller does
    /// not distinguish between them.
    ///
    /// # Parameters
    ///
    /// - `request_builder`: A configured `reqwest::RequestBuilder` ready to send
    /// - `operation_name`: Human-readable name for the operation (for logging)
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The API response body on success
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If the request fails
    async fn send_api_request(
        &self,
        request_builder: reqwest::RequestBuilder,
        operation_name: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        debug!("Sending request for operation: {}", operation_name);

        let response = request_builder.send().await?;
        let status = response.status();
        debug!(
            "Received response with status: {} for operation: {}",
            status, operation_name
        );

        if status.is_success() {
            let response_text = response.text().await?;
            debug!("Response body for '{}': {}", operation_name, response_text);
            return Ok(response_text);
        }

        let error_text = response.text().await?;
        error!(
            "Operation '{}' failed - Status: {}, Response: {}",
            operation_name, status, error_text
        );
        Err(format!(
            "Twitter API error for operation '{}' ({}): {}",
            operation_name, status, error_text
        )
        .into())
    }
}

#[async_trait]
impl Platform for TwitterSession {
    /// Fetches mentions of the authenticated user newer than `since_id`.
    ///
    /// The timeline endpoint returns mentions newest first; that order is
    /// preserved here, the processor reverses it before acting.
    async fn mentions_since(
        &self,
        since_id: Option<&str>,
    ) -> Result<Vec<Mention>, Box<dyn std::error::Error + Send + Sync>> {
        let mut url = format!(
            "{}/2/users/{}/mentions?max_results={}&expansions=author_id&tweet.fields=author_id&user.fields=id,username",
            API_BASE_URL, self.user_id, MENTIONS_PAGE_SIZE
        );
        if let Some(id) = since_id {
            url.push_str(&format!("&since_id={}", urlencoding::encode(id)));
        }

        debug!("Mentions timeline URL: {}", url);

        let request_builder = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header);

        let response_text = self
            .send_api_request(request_builder, "mentions_timeline")
            .await?;
        let timeline: MentionsResponse = serde_json::from_str(&response_text)?;

        // Map author ids to usernames from the expansion block
        let usernames: HashMap<&str, &str> = timeline
            .includes
            .users
            .iter()
            .map(|user| (user.id.as_str(), user.username.as_str()))
            .collect();

        let mentions: Vec<Mention> = timeline
            .data
            .into_iter()
            .map(|tweet| {
                let author = tweet
                    .author_id
                    .as_deref()
                    .and_then(|author_id| usernames.get(author_id).copied())
                    .unwrap_or("unknown");
                if author == "unknown" {
                    warn!("Mention {} has no resolvable author", tweet.id);
                }
                Mention {
                    id: tweet.id,
                    text: tweet.text,
                    author: author.to_string(),
                }
            })
            .collect();

        info!("Fetched {} new mentions from the timeline", mentions.len());
        Ok(mentions)
    }

    /// Submits `text` as a threaded reply to the given mention via
    /// `POST /2/tweets`.
    async fn reply(
        &self,
        text: &str,
        mention_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Replying to mention {} with: '{}'", mention_id, text);

        let url = format!("{}/2/tweets", API_BASE_URL);
        let payload = json!({
            "text": text,
            "reply": {
                "in_reply_to_tweet_id": mention_id
            }
        });

        let request_builder = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .json(&payload);

        self.send_api_request(request_builder, "reply_to_mention")
            .await?;
        Ok(())
    }

    /// Reshares the given mention via `POST /2/users/{id}/retweets`.
    async fn retweet(
        &self,
        mention_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Retweeting mention {}", mention_id);

        let url = format!("{}/2/users/{}/retweets", API_BASE_URL, self.user_id);
        let payload = json!({ "tweet_id": mention_id });

        let request_builder = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .json(&payload);

        self.send_api_request(request_builder, "retweet_mention")
            .await?;
        Ok(())
    }

    /// Marks the given mention as liked via `POST /2/users/{id}/likes`.
    async fn favorite(
        &self,
        mention_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Favoriting mention {}", mention_id);

        let url = format!("{}/2/users/{}/likes", API_BASE_URL, self.user_id);
        let payload = json!({ "tweet_id": mention_id });

        let request_builder = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .json(&payload);

        self.send_api_request(request_builder, "favorite_mention")
            .await?;
        Ok(())
    }
}
