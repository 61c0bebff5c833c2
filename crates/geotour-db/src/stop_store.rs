//! Operations on the `stops` table.

use geotour_types::{Stop, StopId};
use sqlx::PgPool;

use crate::error::DbError;

const LIST_STOPS: &str = r"SELECT id, sequence, title, story, overlay_image, audio_src, lat, lng, radius_meters
  FROM stops
  ORDER BY sequence, id";

const GET_STOP: &str = r"SELECT id, sequence, title, story, overlay_image, audio_src, lat, lng, radius_meters
  FROM stops
  WHERE id = $1";

/// Operations on the `stops` table.
pub struct StopStore<'a> {
    pool: &'a PgPool,
}

impl<'a> StopStore<'a> {
    /// Create a new stop store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All stops in tour order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&self) -> Result<Vec<Stop>, DbError> {
        let rows = sqlx::query_as::<_, StopRow>(LIST_STOPS)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Stop::from).collect())
    }

    /// A single stop by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&self, id: &StopId) -> Result<Option<Stop>, DbError> {
        let row = sqlx::query_as::<_, StopRow>(GET_STOP)
            .bind(id.as_str())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Stop::from))
    }

    /// Replace the whole catalog in one transaction.
    ///
    /// Stops not in `stops` are deleted; the rest are upserted. Sessions
    /// are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any statement fails. Nothing is
    /// changed in that case.
    pub async fn replace_all(&self, stops: &[Stop]) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let ids: Vec<String> = stops.iter().map(|s| s.id.to_string()).collect();
        sqlx::query(r"DELETE FROM stops WHERE NOT (id = ANY($1))")
            .bind(&ids)
            .execute(&mut *tx)
            .await?;

        for stop in stops {
            sqlx::query(
                r"INSERT INTO stops (id, sequence, title, story, overlay_image, audio_src, lat, lng, radius_meters)
                  VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                  ON CONFLICT (id) DO UPDATE SET
                    sequence = EXCLUDED.sequence,
                    title = EXCLUDED.title,
                    story = EXCLUDED.story,
                    overlay_image = EXCLUDED.overlay_image,
                    audio_src = EXCLUDED.audio_src,
                    lat = EXCLUDED.lat,
                    lng = EXCLUDED.lng,
                    radius_meters = EXCLUDED.radius_meters",
            )
            .bind(stop.id.as_str())
            .bind(stop.sequence)
            .bind(&stop.title)
            .bind(&stop.story)
            .bind(stop.overlay_image.as_deref())
            .bind(stop.audio_src.as_deref())
            .bind(stop.lat)
            .bind(stop.lng)
            .bind(stop.radius_meters)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(count = stops.len(), "Replaced stop catalog");
        Ok(())
    }
}

/// A row from the `stops` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StopRow {
    /// Stop identifier.
    pub id: String,
    /// Position key in tour order.
    pub sequence: i32,
    /// Display title.
    pub title: String,
    /// Narrative text.
    pub story: String,
    /// Optional overlay image path.
    pub overlay_image: Option<String>,
    /// Optional audio narration path.
    pub audio_src: Option<String>,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Trigger radius in meters.
    pub radius_meters: f64,
}

impl From<StopRow> for Stop {
    fn from(row: StopRow) -> Self {
        Self {
            id: StopId::from(row.id),
            sequence: row.sequence,
            title: row.title,
            story: row.story,
            overlay_image: row.overlay_image,
            audio_src: row.audio_src,
            lat: row.lat,
            lng: row.lng,
            radius_meters: row.radius_meters,
        }
    }
}
