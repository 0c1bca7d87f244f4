use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A wire value that is not part of one of the closed enums below.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be one of: {allowed}")]
pub struct InvalidValue {
    pub field: &'static str,
    pub allowed: &'static str,
}

// -- Submission type --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Enhancement,
    Bug,
}

impl SubmissionKind {
    pub const ALL: [Self; 2] = [Self::Enhancement, Self::Bug];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enhancement => "enhancement",
            Self::Bug => "bug",
        }
    }
}

impl FromStr for SubmissionKind {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or(InvalidValue {
                field: "type",
                allowed: "enhancement, bug",
            })
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- Submission status --

/// Workflow state of a submission. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionStatus {
    #[default]
    UnderReview,
    Planned,
    InProgress,
    Completed,
    Rejected,
}

impl SubmissionStatus {
    pub const ALL: [Self; 5] = [
        Self::UnderReview,
        Self::Planned,
        Self::InProgress,
        Self::Completed,
        Self::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnderReview => "under-review",
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or(InvalidValue {
                field: "status",
                allowed: "under-review, planned, in-progress, completed, rejected",
            })
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- Sorting --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Votes,
    Comments,
}

impl FromStr for SortKey {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "votes" => Ok(Self::Votes),
            "comments" => Ok(Self::Comments),
            _ => Err(InvalidValue {
                field: "sort",
                allowed: "newest, votes, comments",
            }),
        }
    }
}

/// Filter and ordering for the submission listing.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub kind: Option<SubmissionKind>,
    pub status: Option<SubmissionStatus>,
    pub sort: SortKey,
    /// When set, each entry reports whether this voter has a vote on it.
    pub voter_id: Option<String>,
}

// -- Entities --

/// Fields accepted when creating or re-submitting a submission.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub kind: SubmissionKind,
    pub submitter_name: String,
    pub submitter_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: SubmissionKind,
    pub status: SubmissionStatus,
    pub submitter_name: String,
    pub submitter_email: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Human-readable creation date, e.g. "Oct 19, 2026".
    pub date: String,
}

/// A submission annotated with its vote and comment counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    #[serde(flatten)]
    pub submission: Submission,
    pub votes: u64,
    pub comments: u64,
    pub voted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub submission_id: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub date: String,
}

/// Formats a timestamp the way the board displays it.
pub fn display_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}
