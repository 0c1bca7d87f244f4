use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    Comment, InvalidValue, ListFilter, NewSubmission, SubmissionKind, SubmissionStatus,
    SubmissionSummary,
};

// Request bodies default missing strings to empty so the stores can report
// which field is required instead of a generic decode error.

// -- Submissions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSubmissionRequest {
    /// Client-generated id; a retried request with the same id updates in place.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, alias = "name")]
    pub submitter_name: String,
    #[serde(default, alias = "email")]
    pub submitter_email: Option<String>,
}

impl CreateSubmissionRequest {
    pub fn into_new_submission(self) -> Result<NewSubmission, InvalidValue> {
        let kind = self.kind.trim().parse::<SubmissionKind>()?;
        Ok(NewSubmission {
            id: self.id.filter(|id| !id.trim().is_empty()),
            title: self.title,
            description: self.description,
            kind,
            submitter_name: self.submitter_name,
            submitter_email: self.submitter_email,
        })
    }
}

/// Query string for listing and export. Empty values mean "all".
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub voter: Option<String>,
}

impl ListQuery {
    pub fn into_filter(self) -> Result<ListFilter, InvalidValue> {
        Ok(ListFilter {
            kind: non_empty(self.kind).map(|k| k.parse()).transpose()?,
            status: non_empty(self.status).map(|s| s.parse()).transpose()?,
            sort: non_empty(self.sort)
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or_default(),
            voter_id: non_empty(self.voter),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "all")
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub summary: SubmissionSummary,
    pub comment_list: Vec<Comment>,
}

// -- Votes --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleVoteRequest {
    #[serde(default)]
    pub voter_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleVoteResponse {
    pub voted: bool,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
}

// -- Admin --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn status(&self) -> Result<SubmissionStatus, InvalidValue> {
        self.status.trim().parse()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
