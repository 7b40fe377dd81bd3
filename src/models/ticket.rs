use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /rest/api/3/issue`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateIssueRequest {
    pub fields: IssueFields,
    #[serde(default)]
    pub update: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IssueFields {
    pub description: Document,
    pub issuetype: IssueTypeRef,
    pub project: ProjectRef,
    pub summary: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IssueTypeRef {
    pub id: String,
}

/// Atlassian Document Format root node.
#[derive(Debug, Deserialize, Serialize)]
pub struct Document {
    pub content: Vec<Paragraph>,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Paragraph {
    pub content: Vec<TextNode>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TextNode {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Document {
    pub fn paragraph(text: &str) -> Self {
        Self {
            content: vec![Paragraph {
                content: vec![TextNode {
                    text: text.to_string(),
                    kind: "text".to_string(),
                }],
                kind: "paragraph".to_string(),
            }],
            kind: "doc".to_string(),
            version: 1,
        }
    }
}

impl CreateIssueRequest {
    /// The issue title becomes the description and the issue body becomes the
    /// summary. Existing consumers depend on this mapping.
    pub fn from_issue(project_key: &str, issue_type_id: &str, title: &str, body: &str) -> Self {
        Self {
            fields: IssueFields {
                description: Document::paragraph(title),
                issuetype: IssueTypeRef {
                    id: issue_type_id.to_string(),
                },
                project: ProjectRef {
                    key: project_key.to_string(),
                },
                summary: body.to_string(),
            },
            update: Map::new(),
        }
    }
}
