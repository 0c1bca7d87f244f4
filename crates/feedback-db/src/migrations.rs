use rusqlite::Connection;
use tracing::info;

use crate::StoreResult;

pub fn run(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (feedback schema)");
        conn.execute_batch(
            "
            CREATE TABLE submissions (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                description     TEXT NOT NULL,
                type            TEXT NOT NULL
                    CHECK (type IN ('enhancement', 'bug')),
                status          TEXT NOT NULL DEFAULT 'under-review'
                    CHECK (status IN ('under-review', 'planned', 'in-progress', 'completed', 'rejected')),
                submitter_name  TEXT NOT NULL,
                submitter_email TEXT,
                created_at      TEXT NOT NULL,
                display_date    TEXT NOT NULL
            );

            CREATE INDEX idx_submissions_created ON submissions(created_at);

            CREATE TABLE votes (
                submission_id   TEXT NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
                voter_id        TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                UNIQUE(submission_id, voter_id)
            );

            CREATE TABLE comments (
                id              TEXT PRIMARY KEY,
                submission_id   TEXT NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
                author          TEXT NOT NULL,
                content         TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                display_date    TEXT NOT NULL
            );

            CREATE INDEX idx_comments_submission ON comments(submission_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
