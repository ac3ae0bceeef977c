//! OAuth authentication module for Twitter/X API integration.
//!
//! This module contains the helper for building the OAuth 2.0 User
//! Context authorization header used by all Twitter API v2 requests the
//! bot makes.

/// Builds the Authorization header for OAuth 2.0 User Context authentication.
///
/// This header is required for Twitter API v2 endpoints that perform
/// user-specific operations: reading the mentions timeline, posting
/// replies, retweeting, and liking.
///
/// # Parameters
///
/// - `access_token`: The Access Token obtained through the OAuth 2.0
///   Authorization Code Flow
///
/// # Returns
///
/// A properly formatted Authorization header string.
///
/// # Example
///
/// ```rust
/// use mentionbot::build_oauth2_user_context_header;
///
/// let header = build_oauth2_user_context_header("your_access_token");
/// assert_eq!(header, "Bearer your_access_token");
/// ```
pub fn build_oauth2_user_context_header(access_token: &str) -> String {
    format!("Bearer {}", access_token)
}
