//! `ghlog log` — print one day of a user's GitHub activity.

use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, Local, NaiveDate};
use clap::Args;

use ghlog_core::types::Username;
use ghlog_github::{events_for_date, format_events, GitHubClient};

/// Arguments for `ghlog log`.
#[derive(Args, Debug)]
pub struct LogArgs {
    /// GitHub username to fetch activity for.
    #[arg(long, short = 'u')]
    pub user: String,

    /// Date to fetch activity for (YYYY-MM-DD format, defaults to today).
    #[arg(long, short = 'd')]
    pub date: Option<String>,

    /// GitHub API token (can also be set via the GITHUB_TOKEN environment variable).
    #[arg(long, short = 't')]
    pub token: Option<String>,

    /// Emit machine-readable JSON instead of log lines.
    #[arg(long)]
    pub json: bool,
}

impl LogArgs {
    pub fn run(self) -> Result<()> {
        let token = match self.token.or_else(|| std::env::var("GITHUB_TOKEN").ok()) {
            Some(token) if !token.is_empty() => token,
            _ => bail!("no GitHub token: pass --token or set GITHUB_TOKEN"),
        };

        let date = match &self.date {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{raw}' (expected YYYY-MM-DD)"))?,
            None => Local::now().date_naive(),
        };

        // The day window uses the machine's current local offset.
        let tz: FixedOffset = *Local::now().offset();
        let user = Username::from(self.user);
        let client = GitHubClient::new(token);
        let events = events_for_date(&client, &user, date, tz)
            .with_context(|| format!("failed to fetch activity for '{user}' on {date}"))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&events)
                    .context("failed to serialize activity JSON")?
            );
            return Ok(());
        }

        for line in format_events(&events) {
            println!("{line}");
        }
        Ok(())
    }
}
