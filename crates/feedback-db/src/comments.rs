use feedback_types::Comment;
use feedback_types::models::display_date;
use tracing::debug;
use uuid::Uuid;

use crate::models::{COMMENT_COLUMNS, CommentRow, format_timestamp};
use crate::submissions::{MAX_NAME_LEN, required};
use crate::{Database, StoreError, StoreResult, now, submission_exists};

pub const MAX_COMMENT_LEN: usize = 2000;

impl Database {
    /// Append a comment. Author and content are stored trimmed.
    pub fn append_comment(
        &self,
        submission_id: &str,
        author: &str,
        content: &str,
    ) -> StoreResult<Comment> {
        let author = required(author, "author", MAX_NAME_LEN)?;
        let content = required(content, "content", MAX_COMMENT_LEN)?;

        self.with_conn(|conn| {
            if !submission_exists(conn, submission_id)? {
                return Err(StoreError::NotFound(submission_id.to_string()));
            }

            // Timestamp taken under the connection lock so insertion order and
            // created_at order agree.
            let created_at = now();
            let comment = Comment {
                id: Uuid::new_v4().to_string(),
                submission_id: submission_id.to_string(),
                author,
                content,
                created_at,
                date: display_date(&created_at),
            };

            conn.execute(
                "INSERT INTO comments (id, submission_id, author, content, created_at, display_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    comment.id,
                    comment.submission_id,
                    comment.author,
                    comment.content,
                    format_timestamp(&comment.created_at),
                    comment.date,
                ],
            )?;

            debug!("Comment {} added to {}", comment.id, submission_id);
            Ok(comment)
        })
    }

    /// Comments in ascending creation order; empty if there are none.
    pub fn list_comments(&self, submission_id: &str) -> StoreResult<Vec<Comment>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {COMMENT_COLUMNS} FROM comments
                 WHERE submission_id = ?1
                 ORDER BY created_at ASC, rowid ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([submission_id], CommentRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows.into_iter().map(CommentRow::into_comment).collect())
        })
    }
}
