use rusqlite::TransactionBehavior;
use tracing::debug;

use crate::models::format_timestamp;
use crate::{Database, StoreError, StoreResult, now, submission_exists};

pub const MAX_VOTER_ID_LEN: usize = 320;

impl Database {
    /// Toggle a vote: inserts if the voter has none on this submission,
    /// removes it otherwise. Returns `true` when the voter now has a vote.
    ///
    /// The voter id is whatever the client sends; it is not authenticated.
    /// UNIQUE(submission_id, voter_id) keeps the pair to at most one row:
    /// when the insert is absorbed by the constraint the existing vote is
    /// deleted instead.
    pub fn toggle_vote(&self, submission_id: &str, voter_id: &str) -> StoreResult<bool> {
        let voter_id = voter_id.trim();
        if voter_id.is_empty() {
            return Err(StoreError::validation("voter_id is required"));
        }
        if voter_id.len() > MAX_VOTER_ID_LEN {
            return Err(StoreError::validation("voter_id is too long"));
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !submission_exists(&tx, submission_id)? {
                return Err(StoreError::NotFound(submission_id.to_string()));
            }

            let inserted = tx.execute(
                "INSERT INTO votes (submission_id, voter_id, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(submission_id, voter_id) DO NOTHING",
                rusqlite::params![submission_id, voter_id, format_timestamp(&now())],
            )?;

            let voted = if inserted == 1 {
                true
            } else {
                tx.execute(
                    "DELETE FROM votes WHERE submission_id = ?1 AND voter_id = ?2",
                    rusqlite::params![submission_id, voter_id],
                )?;
                false
            };

            tx.commit()?;
            debug!("Vote on {} by {}: voted={}", submission_id, voter_id, voted);
            Ok(voted)
        })
    }

    pub fn has_voted(&self, submission_id: &str, voter_id: &str) -> StoreResult<bool> {
        self.with_conn(|conn| {
            let voted: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM votes WHERE submission_id = ?1 AND voter_id = ?2)",
                rusqlite::params![submission_id, voter_id.trim()],
                |row| row.get(0),
            )?;
            Ok(voted)
        })
    }

    pub fn vote_count(&self, submission_id: &str) -> StoreResult<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM votes WHERE submission_id = ?1",
                [submission_id],
                |row| row.get(0),
            )?;
            Ok(count.max(0) as u64)
        })
    }
}
