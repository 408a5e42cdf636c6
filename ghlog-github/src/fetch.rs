//! Day-window activity fetch.
//!
//! The events feed is paginated newest-first, so one backward walk suffices:
//! collect everything inside the local day window and stop as soon as a page
//! contains an event older than the window start (or the feed runs dry).

use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};

use ghlog_core::types::Username;

use crate::error::GitHubError;
use crate::events::{ActivityEvent, RawEvent};

/// Source of event feed pages — implemented by [`crate::GitHubClient`] and by
/// canned fixtures in tests.
pub trait EventPages {
    fn page(&self, user: &Username, page: u32) -> Result<Vec<RawEvent>, GitHubError>;
}

/// Collect `user`'s events for one local calendar day.
///
/// The window is `[local midnight, next local midnight)` in `tz`; event
/// timestamps are shifted into `tz` before the comparison. Only events whose
/// actor login equals `user` are kept. Events come back in feed order
/// (newest first).
pub fn events_for_date(
    pages: &impl EventPages,
    user: &Username,
    date: NaiveDate,
    tz: FixedOffset,
) -> Result<Vec<ActivityEvent>, GitHubError> {
    let start = tz
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .ok_or(GitHubError::AmbiguousDate { date })?;
    let end = start + Duration::days(1);

    let mut collected = Vec::new();
    let mut page = 1;
    loop {
        let batch = pages.page(user, page)?;
        if batch.is_empty() {
            break;
        }
        let mut reached_past = false;
        for raw in batch {
            let local = raw.created_at.with_timezone(&tz);
            if local < start {
                reached_past = true;
            }
            if local >= start && local < end && raw.actor.login == user.0 {
                collected.push(ActivityEvent::localized(raw, tz));
            }
        }
        if reached_past {
            break;
        }
        page += 1;
    }
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;

    /// Canned page source that records which pages were requested.
    struct FakePages {
        pages: Vec<Vec<RawEvent>>,
        requested: RefCell<Vec<u32>>,
    }

    impl FakePages {
        fn new(pages: Vec<Vec<RawEvent>>) -> Self {
            Self {
                pages,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl EventPages for FakePages {
        fn page(&self, _user: &Username, page: u32) -> Result<Vec<RawEvent>, GitHubError> {
            self.requested.borrow_mut().push(page);
            Ok(self
                .pages
                .get(page as usize - 1)
                .cloned()
                .unwrap_or_default())
        }
    }

    fn event(id: &str, actor: &str, created_at: &str) -> RawEvent {
        serde_json::from_value(json!({
            "id": id,
            "type": "PushEvent",
            "actor": { "login": actor },
            "repo": { "name": format!("{actor}/repo") },
            "payload": { "ref": "refs/heads/main", "commits": [] },
            "created_at": created_at
        }))
        .expect("fixture event")
    }

    fn utc_tz() -> FixedOffset {
        FixedOffset::east_opt(0).expect("offset")
    }

    fn target_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).expect("date")
    }

    #[test]
    fn keeps_only_events_inside_the_window() {
        let pages = FakePages::new(vec![vec![
            event("next-day", "octocat", "2026-08-07T00:00:01Z"),
            event("late", "octocat", "2026-08-06T23:59:59Z"),
            event("early", "octocat", "2026-08-06T00:00:00Z"),
            event("before", "octocat", "2026-08-05T23:59:59Z"),
        ]]);
        let got =
            events_for_date(&pages, &Username::from("octocat"), target_date(), utc_tz())
                .expect("fetch");
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].created_at.to_rfc3339(), "2026-08-06T23:59:59+00:00");
        assert_eq!(got[1].created_at.to_rfc3339(), "2026-08-06T00:00:00+00:00");
    }

    #[test]
    fn stops_paging_once_feed_is_older_than_window() {
        let pages = FakePages::new(vec![
            vec![event("in", "octocat", "2026-08-06T12:00:00Z")],
            vec![event("old", "octocat", "2026-08-01T12:00:00Z")],
            vec![event("never-fetched", "octocat", "2026-07-01T12:00:00Z")],
        ]);
        events_for_date(&pages, &Username::from("octocat"), target_date(), utc_tz())
            .expect("fetch");
        assert_eq!(*pages.requested.borrow(), vec![1, 2]);
    }

    #[test]
    fn stops_on_empty_page() {
        let pages = FakePages::new(vec![vec![event(
            "in",
            "octocat",
            "2026-08-06T12:00:00Z",
        )]]);
        let got =
            events_for_date(&pages, &Username::from("octocat"), target_date(), utc_tz())
                .expect("fetch");
        assert_eq!(got.len(), 1);
        assert_eq!(*pages.requested.borrow(), vec![1, 2]);
    }

    #[test]
    fn filters_out_other_actors() {
        let pages = FakePages::new(vec![vec![
            event("mine", "octocat", "2026-08-06T10:00:00Z"),
            event("theirs", "hubot", "2026-08-06T11:00:00Z"),
        ]]);
        let got =
            events_for_date(&pages, &Username::from("octocat"), target_date(), utc_tz())
                .expect("fetch");
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].actor, "octocat");
    }

    #[test]
    fn window_respects_timezone_offset() {
        // 22:30 UTC on Aug 5 is 00:30 local on Aug 6 at UTC+2.
        let pages = FakePages::new(vec![vec![
            event("in-local-window", "octocat", "2026-08-05T22:30:00Z"),
            event("out-local-window", "octocat", "2026-08-06T23:00:00Z"),
        ]]);
        let tz = FixedOffset::east_opt(2 * 3600).expect("offset");
        let got = events_for_date(&pages, &Username::from("octocat"), target_date(), tz)
            .expect("fetch");
        // 23:00 UTC on Aug 6 is 01:00 local on Aug 7 — outside the window.
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].created_at.to_rfc3339(), "2026-08-06T00:30:00+02:00");
    }

    #[test]
    fn empty_feed_yields_no_events() {
        let pages = FakePages::new(vec![]);
        let got =
            events_for_date(&pages, &Username::from("octocat"), target_date(), utc_tz())
                .expect("fetch");
        assert!(got.is_empty());
        assert_eq!(*pages.requested.borrow(), vec![1]);
    }
}
