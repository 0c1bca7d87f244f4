use feedback_types::{ListFilter, SortKey, SubmissionSummary};
use rusqlite::OptionalExtension;

use crate::models::{SUBMISSION_COLUMNS, SummaryRow};
use crate::{Database, StoreResult};

/// Submission columns plus vote count, comment count and whether `?3`
/// (the requesting voter, may be NULL) has voted.
fn summary_select() -> String {
    format!(
        "SELECT {SUBMISSION_COLUMNS},
            (SELECT COUNT(*) FROM votes v WHERE v.submission_id = s.id) AS vote_count,
            (SELECT COUNT(*) FROM comments c WHERE c.submission_id = s.id) AS comment_count,
            EXISTS(SELECT 1 FROM votes v WHERE v.submission_id = s.id AND v.voter_id = ?3) AS voted
         FROM submissions s"
    )
}

/// Ties on counts fall back to newest first, then id, so ordering is total.
/// Voter ids are stored trimmed; a blank one means no voter.
fn normalize_voter(voter_id: Option<&str>) -> Option<&str> {
    voter_id.map(str::trim).filter(|v| !v.is_empty())
}

fn order_clause(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Newest => "s.created_at DESC, s.id DESC",
        SortKey::Votes => "vote_count DESC, s.created_at DESC, s.id DESC",
        SortKey::Comments => "comment_count DESC, s.created_at DESC, s.id DESC",
    }
}

impl Database {
    /// Filtered, sorted, count-annotated view of every submission.
    ///
    /// Returns the full result set; there is no pagination.
    pub fn list_submissions(&self, filter: &ListFilter) -> StoreResult<Vec<SubmissionSummary>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{}
                 WHERE (?1 IS NULL OR s.type = ?1) AND (?2 IS NULL OR s.status = ?2)
                 ORDER BY {}",
                summary_select(),
                order_clause(filter.sort)
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    rusqlite::params![
                        filter.kind.map(|k| k.as_str()),
                        filter.status.map(|s| s.as_str()),
                        normalize_voter(filter.voter_id.as_deref()),
                    ],
                    SummaryRow::from_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows.into_iter().map(SummaryRow::into_summary).collect())
        })
    }

    pub fn get_summary(
        &self,
        id: &str,
        voter_id: Option<&str>,
    ) -> StoreResult<Option<SubmissionSummary>> {
        self.with_conn(|conn| {
            // ?2 is unreferenced; the voter stays at ?3 as in the listing.
            let sql = format!("{} WHERE s.id = ?1", summary_select());
            let row = conn
                .query_row(
                    &sql,
                    rusqlite::params![id, Option::<&str>::None, normalize_voter(voter_id)],
                    SummaryRow::from_row,
                )
                .optional()?;
            Ok(row.map(SummaryRow::into_summary))
        })
    }
}
