use crate::models::{ticket::CreateIssueRequest, webhook::IssueCommentPayload};
use crate::server::{error::ApiError, state::SharedState};
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Value};
use tracing::{debug, error, info};

/// `POST /createjira`: turns a trigger comment into exactly one Jira create-issue call.
pub async fn create_jira(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload: IssueCommentPayload =
        serde_json::from_slice(&body).map_err(ApiError::InvalidPayload)?;

    if !payload.is_trigger(&state.trigger) {
        debug!(
            event = "comment_ignored",
            has_comment_body = payload.comment_body().is_some(),
            "Comment is not a trigger"
        );
        return Err(ApiError::NotTriggered);
    }

    let (title, summary) = payload.ticket_text().map_err(ApiError::MissingField)?;
    let request =
        CreateIssueRequest::from_issue(&state.project_key, &state.issue_type_id, title, summary);

    let created = state.jira.create_issue(&request).await.map_err(|e| {
        error!(event = "ticket_create_failed", error = %e, "Jira rejected the ticket");
        ApiError::from(e)
    })?;

    let key = created.get("key").and_then(|v| v.as_str()).unwrap_or("<none>");
    info!(event = "ticket_created", key, "Created Jira ticket");

    let rendered = render_sorted_pretty(&created).map_err(ApiError::Render)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], rendered).into_response())
}

/// Recursively sorted keys, four-space indent, `": "` separators.
pub fn render_sorted_pretty(value: &Value) -> serde_json::Result<String> {
    let sorted = sort_keys(value);
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    sorted.serialize(&mut serializer)?;

    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
