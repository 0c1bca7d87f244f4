use feedback_types::models::display_date;
use feedback_types::{NewSubmission, Submission, SubmissionStatus};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, ffi};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{SUBMISSION_COLUMNS, SubmissionRow, format_timestamp};
use crate::{Database, StoreError, StoreResult, now, submission_exists};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 5000;
pub const MAX_NAME_LEN: usize = 100;

impl Database {
    /// Insert a new submission. Status always starts at `under-review`.
    ///
    /// An explicit id that already exists is rejected; use
    /// [`Database::upsert_submission`] to absorb retried requests.
    pub fn create_submission(&self, input: NewSubmission) -> StoreResult<Submission> {
        let input = validate(input)?;
        let id = input
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.with_conn(|conn| {
            let created_at = now();
            let inserted = conn.execute(
                "INSERT INTO submissions
                    (id, title, description, type, status, submitter_name, submitter_email, created_at, display_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    id,
                    input.title,
                    input.description,
                    input.kind.as_str(),
                    SubmissionStatus::UnderReview.as_str(),
                    input.submitter_name,
                    input.submitter_email,
                    format_timestamp(&created_at),
                    display_date(&created_at),
                ],
            );

            match inserted {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
                {
                    return Err(StoreError::validation("a submission with this id already exists"));
                }
                Err(e) => return Err(e.into()),
            }

            info!("Submission {} created ({})", id, input.kind);
            query_submission(conn, &id)?.ok_or_else(|| StoreError::NotFound(id.clone()))
        })
    }

    /// Insert, or update the user-editable fields of an existing submission
    /// with the same id. Status and creation time are left untouched.
    ///
    /// The flag is `true` only when this call inserted the row.
    pub fn upsert_submission(
        &self,
        id: &str,
        input: NewSubmission,
    ) -> StoreResult<(Submission, bool)> {
        let input = validate(input)?;
        let id = id.trim();
        if id.is_empty() {
            return Err(StoreError::validation("id is required"));
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let inserted = !submission_exists(&tx, id)?;

            let created_at = now();
            tx.execute(
                "INSERT INTO submissions
                    (id, title, description, type, status, submitter_name, submitter_email, created_at, display_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    type = excluded.type,
                    submitter_name = excluded.submitter_name,
                    submitter_email = excluded.submitter_email",
                rusqlite::params![
                    id,
                    input.title,
                    input.description,
                    input.kind.as_str(),
                    SubmissionStatus::UnderReview.as_str(),
                    input.submitter_name,
                    input.submitter_email,
                    format_timestamp(&created_at),
                    display_date(&created_at),
                ],
            )?;

            let submission =
                query_submission(&tx, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            tx.commit()?;

            if inserted {
                info!("Submission {} created ({})", id, input.kind);
            } else {
                debug!("Submission {} updated by retry", id);
            }
            Ok((submission, inserted))
        })
    }

    pub fn get_submission(&self, id: &str) -> StoreResult<Option<Submission>> {
        self.with_conn(|conn| query_submission(conn, id))
    }

    /// Set the status unconditionally; there is no transition graph.
    pub fn update_status(&self, id: &str, status: SubmissionStatus) -> StoreResult<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE submissions SET status = ?1 WHERE id = ?2",
                rusqlite::params![status.as_str(), id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(id.to_string()));
            }
            info!("Submission {} moved to {}", id, status);
            Ok(())
        })
    }

    /// Remove a submission together with its votes and comments.
    pub fn delete_submission(&self, id: &str) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let votes = tx.execute("DELETE FROM votes WHERE submission_id = ?1", [id])?;
            let comments = tx.execute("DELETE FROM comments WHERE submission_id = ?1", [id])?;
            let removed = tx.execute("DELETE FROM submissions WHERE id = ?1", [id])?;

            if removed == 0 {
                // Dropping the transaction rolls back.
                return Err(StoreError::NotFound(id.to_string()));
            }

            tx.commit()?;
            info!(
                "Submission {} deleted ({} votes, {} comments)",
                id, votes, comments
            );
            Ok(())
        })
    }
}

fn query_submission(conn: &Connection, id: &str) -> StoreResult<Option<Submission>> {
    let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM submissions s WHERE s.id = ?1");
    let row = conn
        .query_row(&sql, [id], SubmissionRow::from_row)
        .optional()?;
    Ok(row.map(SubmissionRow::into_submission))
}

/// Trim every field and enforce the required/length rules.
fn validate(input: NewSubmission) -> StoreResult<NewSubmission> {
    let title = required(&input.title, "title", MAX_TITLE_LEN)?;
    let description = required(&input.description, "description", MAX_DESCRIPTION_LEN)?;
    let submitter_name = required(&input.submitter_name, "name", MAX_NAME_LEN)?;
    let submitter_email = input
        .submitter_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string);

    if let Some(email) = &submitter_email {
        if !email.contains('@') {
            return Err(StoreError::validation("email is not a valid address"));
        }
    }

    Ok(NewSubmission {
        id: input.id.map(|id| id.trim().to_string()),
        title,
        description,
        kind: input.kind,
        submitter_name,
        submitter_email,
    })
}

pub(crate) fn required(value: &str, field: &str, max_len: usize) -> StoreResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::validation(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(StoreError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}
