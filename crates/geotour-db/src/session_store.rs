//! Operations on the `sessions` table.
//!
//! The cursor is only ever changed by [`CursorStore::advance`], a single
//! conditional `UPDATE` that re-checks both the cursor and the stop under
//! it. Two concurrent requests racing on the same trigger can therefore
//! never both succeed.

use std::time::Duration;

use chrono::{DateTime, Utc};
use geotour_types::{Session, SessionId, StopId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// Operations on the `sessions` table.
pub struct CursorStore<'a> {
    pool: &'a PgPool,
}

impl<'a> CursorStore<'a> {
    /// Create a new cursor store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new session row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails, including on a
    /// duplicate session id.
    pub async fn insert(&self, session: &Session) -> Result<(), DbError> {
        let cursor = i32::try_from(session.cursor).map_err(|_overflow| DbError::InvalidRow {
            table: "sessions",
            reason: format!("cursor {} does not fit INTEGER", session.cursor),
        })?;

        sqlx::query(
            r"INSERT INTO sessions (session_id, stop_cursor, created_at, updated_at)
              VALUES ($1, $2, $3, $4)",
        )
        .bind(session.session_id.into_inner())
        .bind(cursor)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(self.pool)
        .await?;

        tracing::debug!(session_id = %session.session_id, "Inserted session");
        Ok(())
    }

    /// Load a session by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails, or
    /// [`DbError::InvalidRow`] if the stored cursor is negative.
    pub async fn get(&self, id: SessionId) -> Result<Option<Session>, DbError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r"SELECT session_id, stop_cursor, created_at, updated_at
              FROM sessions
              WHERE session_id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        row.map(Session::try_from).transpose()
    }

    /// Compare-and-increment the cursor.
    ///
    /// Moves `stop_cursor` from `expected_cursor` to `expected_cursor + 1`
    /// only if the row still holds `expected_cursor` and the stop at that
    /// position of the ordered catalog is `expected_stop`. Returns whether
    /// a row was updated.
    ///
    /// The `UPDATE` runs in its own transaction under a transaction-local
    /// `statement_timeout`, so a slow statement is aborted and rolled back
    /// by the server rather than abandoned by the client.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails or exceeds
    /// `statement_timeout` (see [`DbError::is_statement_timeout`]). The
    /// cursor is unchanged in both cases.
    pub async fn advance(
        &self,
        id: SessionId,
        expected_cursor: u32,
        expected_stop: &StopId,
        statement_timeout: Duration,
    ) -> Result<bool, DbError> {
        let Ok(cursor) = i32::try_from(expected_cursor) else {
            return Ok(false);
        };

        let mut tx = self.pool.begin().await?;

        // `SET LOCAL` takes no bind parameters; `set_config(.., true)` is
        // its parameterized form.
        sqlx::query("SELECT set_config('statement_timeout', $1, true)")
            .bind(format!("{}ms", statement_timeout.as_millis().max(1)))
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            r"UPDATE sessions
              SET stop_cursor = stop_cursor + 1, updated_at = now()
              WHERE session_id = $1
                AND stop_cursor = $2
                AND $3 = (SELECT id FROM stops ORDER BY sequence, id OFFSET $2 LIMIT 1)",
        )
        .bind(id.into_inner())
        .bind(cursor)
        .bind(expected_stop.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() == 1)
    }
}

/// A row from the `sessions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    /// Session UUID.
    pub session_id: Uuid,
    /// Index into the ordered catalog.
    pub stop_cursor: i32,
    /// When the session was started.
    pub created_at: DateTime<Utc>,
    /// When the cursor last moved.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for Session {
    type Error = DbError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let cursor = u32::try_from(row.stop_cursor).map_err(|_negative| DbError::InvalidRow {
            table: "sessions",
            reason: format!("negative stop_cursor {}", row.stop_cursor),
        })?;
        Ok(Self {
            session_id: SessionId::from(row.session_id),
            cursor,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
