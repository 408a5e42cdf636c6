//! # ghlog-github
//!
//! GitHub events API client, day-window activity fetch, and line formatting.
//!
//! Call [`events_for_date`] with a [`GitHubClient`] (or any [`EventPages`]
//! source) to collect one local calendar day of a user's activity, then
//! [`format_events`] to render the log lines.

pub mod client;
pub mod error;
pub mod events;
pub mod fetch;
pub mod format;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use events::{ActivityEvent, RawEvent};
pub use fetch::{events_for_date, EventPages};
pub use format::format_events;
