//! Database row types. These map directly to SQLite rows and are converted
//! into the `feedback-types` models at the edge of each store.

use chrono::{DateTime, SecondsFormat, Utc};
use feedback_types::{Comment, Submission, SubmissionKind, SubmissionStatus, SubmissionSummary};
use rusqlite::Row;
use tracing::warn;

pub struct SubmissionRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub status: String,
    pub submitter_name: String,
    pub submitter_email: Option<String>,
    pub created_at: String,
    pub display_date: String,
}

pub struct SummaryRow {
    pub submission: SubmissionRow,
    pub votes: i64,
    pub comments: i64,
    pub voted: bool,
}

pub struct CommentRow {
    pub id: String,
    pub submission_id: String,
    pub author: String,
    pub content: String,
    pub created_at: String,
    pub display_date: String,
}

/// Column list matching [`SubmissionRow::from_row`], for tables aliased `s`.
pub(crate) const SUBMISSION_COLUMNS: &str = "s.id, s.title, s.description, s.type, s.status, \
     s.submitter_name, s.submitter_email, s.created_at, s.display_date";

pub(crate) const COMMENT_COLUMNS: &str =
    "id, submission_id, author, content, created_at, display_date";

impl SubmissionRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            kind: row.get(3)?,
            status: row.get(4)?,
            submitter_name: row.get(5)?,
            submitter_email: row.get(6)?,
            created_at: row.get(7)?,
            display_date: row.get(8)?,
        })
    }

    pub fn into_submission(self) -> Submission {
        let kind = self.kind.parse().unwrap_or_else(|e| {
            warn!("Corrupt type '{}' on submission '{}': {}", self.kind, self.id, e);
            SubmissionKind::Enhancement
        });
        let status = self.status.parse().unwrap_or_else(|e| {
            warn!("Corrupt status '{}' on submission '{}': {}", self.status, self.id, e);
            SubmissionStatus::default()
        });
        let created_at = parse_timestamp(&self.created_at, &self.id);

        Submission {
            id: self.id,
            title: self.title,
            description: self.description,
            kind,
            status,
            submitter_name: self.submitter_name,
            submitter_email: self.submitter_email,
            created_at,
            date: self.display_date,
        }
    }
}

impl SummaryRow {
    /// Submission columns followed by vote count, comment count and the voted flag.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            submission: SubmissionRow::from_row(row)?,
            votes: row.get(9)?,
            comments: row.get(10)?,
            voted: row.get(11)?,
        })
    }

    pub fn into_summary(self) -> SubmissionSummary {
        SubmissionSummary {
            submission: self.submission.into_submission(),
            votes: self.votes.max(0) as u64,
            comments: self.comments.max(0) as u64,
            voted: self.voted,
        }
    }
}

impl CommentRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            submission_id: row.get(1)?,
            author: row.get(2)?,
            content: row.get(3)?,
            created_at: row.get(4)?,
            display_date: row.get(5)?,
        })
    }

    pub fn into_comment(self) -> Comment {
        let created_at = parse_timestamp(&self.created_at, &self.id);
        Comment {
            id: self.id,
            submission_id: self.submission_id,
            author: self.author,
            content: self.content,
            created_at,
            date: self.display_date,
        }
    }
}

/// Timestamps are stored as RFC 3339 with millisecond precision so that
/// lexical order in SQL matches chronological order.
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str, owner: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Rows written by SQLite's datetime('now') have no timezone.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on '{}': {}", raw, owner, e);
            DateTime::default()
        })
}
