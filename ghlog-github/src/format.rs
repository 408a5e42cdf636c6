//! Activity log line formatting.
//!
//! Line shape: `<local time> <actor>/<label>\t<owner/repo>[:<branch>] - <detail>`.
//! The detail part varies per event kind; kinds without a dedicated formatter
//! print their raw payload.

use serde_json::Value;

use crate::events::ActivityEvent;

/// Render one log line per activity entry (pushes render one line per commit).
pub fn format_events(events: &[ActivityEvent]) -> Vec<String> {
    let mut lines = Vec::new();
    for event in events {
        format_event(&mut lines, event);
    }
    lines
}

fn format_event(lines: &mut Vec<String>, event: &ActivityEvent) {
    match event.kind.as_str() {
        "PushEvent" => push_lines(lines, event),
        "PullRequestEvent" => lines.push(pull_request_line(event)),
        "CreateEvent" | "DeleteEvent" => lines.push(ref_line(event)),
        "PullRequestReviewEvent" | "PullRequestReviewCommentEvent" => {
            lines.push(on_pull_request_line(event))
        }
        "IssueCommentEvent" => lines.push(issue_comment_line(event)),
        _ => lines.push(format!("{} - {}", prefix(event), event.payload)),
    }
}

/// Short label for an event kind; unknown kinds keep their raw API name.
fn label(kind: &str) -> &str {
    match kind {
        "DeleteEvent" => "Delete",
        "PushEvent" => "Push",
        "PullRequestEvent" => "PR",
        "CreateEvent" => "Create",
        "ForkEvent" => "Fork",
        "ReleaseEvent" => "Release",
        "PullRequestReviewEvent" => "PR Review",
        "PullRequestReviewCommentEvent" => "PR Comment",
        "IssueCommentEvent" => "Issue Comment",
        other => other,
    }
}

/// `<time> <actor>/<label>\t<repo>[:<branch>]`
fn prefix(event: &ActivityEvent) -> String {
    let stamp = event.created_at.format("%Y-%m-%d %H:%M:%S%:z");
    let head = format!(
        "{} {}/{}\t{}",
        stamp,
        event.actor,
        label(&event.kind),
        event.repo
    );
    match branch_of(&event.payload) {
        Some(branch) => format!("{head}:{branch}"),
        None => head,
    }
}

/// Last segment of `payload.ref`, when present and non-empty.
fn branch_of(payload: &Value) -> Option<String> {
    payload
        .get("ref")
        .and_then(Value::as_str)
        .and_then(|r| r.rsplit('/').next())
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
}

fn push_lines(lines: &mut Vec<String>, event: &ActivityEvent) {
    let prefix = prefix(event);
    let commits = event
        .payload
        .get("commits")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for commit in commits {
        let message = commit.get("message").and_then(Value::as_str).unwrap_or("");
        lines.push(format!("{} - {}", prefix, message.replace('\n', ",")));
    }
}

fn pull_request_line(event: &ActivityEvent) -> String {
    let action = event
        .payload
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("");
    format!(
        "{} -{} - {}",
        prefix(event),
        action,
        nested_title(&event.payload, "pull_request")
    )
}

fn ref_line(event: &ActivityEvent) -> String {
    let ref_type = event
        .payload
        .get("ref_type")
        .and_then(Value::as_str)
        .unwrap_or("");
    let created_ref = event
        .payload
        .get("ref")
        .and_then(Value::as_str)
        .unwrap_or("");
    format!("{} - {} {}", prefix(event), ref_type, created_ref)
}

fn on_pull_request_line(event: &ActivityEvent) -> String {
    format!(
        "{} - on PR {}",
        prefix(event),
        nested_title(&event.payload, "pull_request")
    )
}

fn issue_comment_line(event: &ActivityEvent) -> String {
    format!(
        "{} - on Issue {}",
        prefix(event),
        nested_title(&event.payload, "issue")
    )
}

fn nested_title(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(|v| v.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset};
    use serde_json::json;

    use super::*;

    fn activity(kind: &str, payload: Value) -> ActivityEvent {
        let created_at: DateTime<FixedOffset> =
            DateTime::parse_from_rfc3339("2026-08-06T14:23:11+02:00").expect("timestamp");
        ActivityEvent {
            kind: kind.to_owned(),
            actor: "octocat".to_owned(),
            repo: "octocat/hello-world".to_owned(),
            payload,
            created_at,
        }
    }

    #[test]
    fn push_renders_one_line_per_commit_with_flattened_messages() {
        let event = activity(
            "PushEvent",
            json!({
                "ref": "refs/heads/main",
                "commits": [
                    { "message": "fix lint\nround two" },
                    { "message": "bump version" }
                ]
            }),
        );
        let lines = format_events(&[event]);
        assert_eq!(
            lines,
            vec![
                "2026-08-06 14:23:11+02:00 octocat/Push\toctocat/hello-world:main - fix lint,round two",
                "2026-08-06 14:23:11+02:00 octocat/Push\toctocat/hello-world:main - bump version",
            ]
        );
    }

    #[test]
    fn pull_request_line_includes_action_and_title() {
        let event = activity(
            "PullRequestEvent",
            json!({ "action": "opened", "pull_request": { "title": "Add retry" } }),
        );
        let lines = format_events(&[event]);
        assert_eq!(
            lines,
            vec!["2026-08-06 14:23:11+02:00 octocat/PR\toctocat/hello-world -opened - Add retry"]
        );
    }

    #[test]
    fn create_and_delete_share_the_ref_formatter() {
        let create = activity(
            "CreateEvent",
            json!({ "ref": "feature/retry", "ref_type": "branch" }),
        );
        let delete = activity(
            "DeleteEvent",
            json!({ "ref": "feature/retry", "ref_type": "branch" }),
        );
        let lines = format_events(&[create, delete]);
        assert_eq!(
            lines,
            vec![
                "2026-08-06 14:23:11+02:00 octocat/Create\toctocat/hello-world:retry - branch feature/retry",
                "2026-08-06 14:23:11+02:00 octocat/Delete\toctocat/hello-world:retry - branch feature/retry",
            ]
        );
    }

    #[test]
    fn review_and_issue_comments_reference_their_parent() {
        let review = activity(
            "PullRequestReviewEvent",
            json!({ "pull_request": { "title": "Add retry" } }),
        );
        let comment = activity(
            "IssueCommentEvent",
            json!({ "issue": { "title": "Flaky test" } }),
        );
        let lines = format_events(&[review, comment]);
        assert_eq!(
            lines,
            vec![
                "2026-08-06 14:23:11+02:00 octocat/PR Review\toctocat/hello-world - on PR Add retry",
                "2026-08-06 14:23:11+02:00 octocat/Issue Comment\toctocat/hello-world - on Issue Flaky test",
            ]
        );
    }

    #[test]
    fn unknown_kind_prints_raw_payload() {
        let event = activity("WatchEvent", json!({ "action": "started" }));
        let lines = format_events(&[event]);
        assert_eq!(
            lines,
            vec![
                "2026-08-06 14:23:11+02:00 octocat/WatchEvent\toctocat/hello-world - {\"action\":\"started\"}"
            ]
        );
    }

    #[test]
    fn branch_suffix_omitted_without_a_payload_ref() {
        let event = activity("ForkEvent", json!({ "forkee": { "id": 7 } }));
        let lines = format_events(&[event]);
        assert_eq!(
            lines,
            vec![
                "2026-08-06 14:23:11+02:00 octocat/Fork\toctocat/hello-world - {\"forkee\":{\"id\":7}}"
            ]
        );
    }

    #[test]
    fn empty_ref_segment_gets_no_branch_suffix() {
        assert_eq!(branch_of(&json!({ "ref": "refs/heads/" })), None);
        assert_eq!(branch_of(&json!({ "ref": null })), None);
        assert_eq!(
            branch_of(&json!({ "ref": "refs/heads/main" })),
            Some("main".to_owned())
        );
        assert_eq!(branch_of(&json!({ "ref": "gh-pages" })), Some("gh-pages".to_owned()));
    }
}
