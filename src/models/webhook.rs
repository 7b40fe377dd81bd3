use serde::Deserialize;
use serde_json::Value;

/// The parts of a comment webhook (GitHub `issue_comment` shape) the relay reads.
/// Everything else in the payload is ignored.
///
/// `comment` and `issue` stay untyped until they are read, so a payload that is
/// not a trigger is never rejected for the shape of its issue.
#[derive(Debug, Default, Deserialize)]
pub struct IssueCommentPayload {
    #[serde(default)]
    pub comment: Option<Value>,
    #[serde(default)]
    pub issue: Option<Value>,
}

fn string_field<'a>(object: Option<&'a Value>, key: &str) -> Option<&'a str> {
    object?.get(key)?.as_str()
}

impl IssueCommentPayload {
    /// `comment.body` when it is a string.
    pub fn comment_body(&self) -> Option<&str> {
        string_field(self.comment.as_ref(), "body")
    }

    /// Exact match only: no trimming, no case folding.
    pub fn is_trigger(&self, token: &str) -> bool {
        self.comment_body() == Some(token)
    }

    /// Returns `(issue.title, issue.body)`, or the dotted name of the first
    /// field that is missing or not a string.
    pub fn ticket_text(&self) -> Result<(&str, &str), &'static str> {
        let issue = self
            .issue
            .as_ref()
            .filter(|issue| issue.is_object())
            .ok_or("issue")?;
        let title = string_field(Some(issue), "title").ok_or("issue.title")?;
        let body = string_field(Some(issue), "body").ok_or("issue.body")?;
        Ok((title, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> IssueCommentPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_trigger_requires_exact_match() {
        assert!(parse(r#"{"comment":{"body":"/jira"}}"#).is_trigger("/jira"));
        assert!(!parse(r#"{"comment":{"body":"/jira "}}"#).is_trigger("/jira"));
        assert!(!parse(r#"{"comment":{"body":"/JIRA"}}"#).is_trigger("/jira"));
        assert!(!parse(r#"{"comment":{"body":"hello"}}"#).is_trigger("/jira"));
    }

    #[test]
    fn test_absent_comment_is_not_a_trigger() {
        assert!(!parse("{}").is_trigger("/jira"));
        assert!(!parse(r#"{"comment":{}}"#).is_trigger("/jira"));
        assert!(!parse(r#"{"comment":{"body":null}}"#).is_trigger("/jira"));
        assert!(!parse(r#"{"comment":null}"#).is_trigger("/jira"));
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let payload = parse(
            r#"{
                "action": "created",
                "comment": {"id": 1, "body": "/jira", "user": {"login": "octocat"}},
                "issue": {"number": 7, "title": "Crash on start", "body": "Steps..."},
                "repository": {"full_name": "octo/repo"}
            }"#,
        );
        assert!(payload.is_trigger("/jira"));
        assert_eq!(payload.ticket_text(), Ok(("Crash on start", "Steps...")));
    }

    #[test]
    fn test_ticket_text_names_missing_field() {
        assert_eq!(parse(r#"{"comment":{"body":"/jira"}}"#).ticket_text(), Err("issue"));
        assert_eq!(parse(r#"{"issue":{"body":"B"}}"#).ticket_text(), Err("issue.title"));
        assert_eq!(
            parse(r#"{"issue":{"title":"T","body":null}}"#).ticket_text(),
            Err("issue.body")
        );
        assert_eq!(parse(r#"{"issue":{"title":"","body":""}}"#).ticket_text(), Ok(("", "")));
    }

    #[test]
    fn test_wrong_types_are_not_triggers() {
        assert!(!parse(r#"{"comment":{"body":5}}"#).is_trigger("/jira"));
        assert!(!parse(r#"{"comment":"/jira"}"#).is_trigger("/jira"));
        assert!(!parse(r#"{"comment":{"body":"hello"},"issue":{"title":5}}"#).is_trigger("/jira"));
    }

    #[test]
    fn test_wrong_issue_types_name_the_field() {
        assert_eq!(parse(r#"{"issue":"x"}"#).ticket_text(), Err("issue"));
        assert_eq!(parse(r#"{"issue":{"title":5,"body":"B"}}"#).ticket_text(), Err("issue.title"));
        assert_eq!(parse(r#"{"issue":{"title":"T","body":[]}}"#).ticket_text(), Err("issue.body"));
    }

    #[test]
    fn test_non_object_payload_fails_to_parse() {
        assert!(serde_json::from_str::<IssueCommentPayload>(r#""text""#).is_err());
        assert!(serde_json::from_str::<IssueCommentPayload>("42").is_err());
    }
}
