//! Authenticated GitHub events API client.

use std::time::Duration;

use ghlog_core::types::Username;

use crate::error::GitHubError;
use crate::events::RawEvent;
use crate::fetch::EventPages;

const DEFAULT_API_ROOT: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("ghlog/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the `/users/{username}/events` endpoint.
pub struct GitHubClient {
    agent: ureq::Agent,
    token: String,
    api_root: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_root(token, DEFAULT_API_ROOT)
    }

    /// Point the client at a different API root (GitHub Enterprise hosts).
    pub fn with_api_root(token: impl Into<String>, api_root: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            agent,
            token: token.into(),
            api_root: api_root.into(),
        }
    }

    /// Fetch one page of a user's public event feed (newest first).
    pub fn user_events(&self, user: &Username, page: u32) -> Result<Vec<RawEvent>, GitHubError> {
        let url = format!("{}/users/{}/events", self.api_root, user);
        let response = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", ACCEPT_HEADER)
            .set("User-Agent", USER_AGENT)
            .query("page", &page.to_string())
            .call()
            .map_err(Box::new)?;
        Ok(response.into_json()?)
    }
}

impl EventPages for GitHubClient {
    fn page(&self, user: &Username, page: u32) -> Result<Vec<RawEvent>, GitHubError> {
        self.user_events(user, page)
    }
}
