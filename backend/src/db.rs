//! Read-only access to the community SQLite snapshot.
//!
//! The store is an external collaborator: this module only ever reads. A
//! [`Store`] is opened per operation and closed once the result is produced,
//! so no handle outlives the call that opened it.

use std::path::Path;

use shared::{CanonicalDate, CommunityEvent, NewsItem, PaymentRecord, TenantRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

/// Hard cap on history results. Excess rows are silently truncated, never
/// paginated.
pub const HISTORY_ROW_CAP: u32 = 120;

/// Number of entries served by the home news feed.
pub const NEWS_FEED_LIMIT: u32 = 3;

/// Infrastructure failure: the store could not be opened or read.
/// There is no internal retry; the operation aborts.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// A read-only view of the store, scoped to a single operation.
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open a fresh read-only view of the snapshot at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new().filename(path).read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Release the view. Dropping the store releases it as well; this exists
    /// so callers can close on the happy path without waiting for drop order.
    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Look up the tenant row for an exact (national id, unit number) pair.
    ///
    /// Both fields are structured identifiers and are compared verbatim, with
    /// no text normalization. The pair is treated as unique; should the store
    /// contain duplicates, the lowest-rowid row wins (deterministic tie-break,
    /// documented limitation).
    pub async fn find_tenant(
        &self,
        national_id: &str,
        unit_number: &str,
    ) -> Result<Option<TenantRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT national_id, unit_number, first_name, last_name, birth_date \
             FROM tenants WHERE national_id = ? AND unit_number = ? \
             ORDER BY rowid LIMIT 1",
        )
        .bind(national_id)
        .bind(unit_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| TenantRecord {
            national_id: r.get("national_id"),
            unit_number: r.get("unit_number"),
            first_name: r.get("first_name"),
            last_name: r.get("last_name"),
            birth_date: r.get("birth_date"),
        }))
    }

    /// Whether a payment row exists for the exact (unit, year, month) triple.
    pub async fn payment_exists(
        &self,
        unit_number: &str,
        year: i32,
        month: u32,
    ) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT 1 FROM payments WHERE unit_number = ? AND year = ? AND month = ? LIMIT 1",
        )
        .bind(unit_number)
        .bind(year as i64)
        .bind(month as i64)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    /// Past payments for a unit, newest first, optionally bounded by an
    /// inclusive date window, capped at [`HISTORY_ROW_CAP`] rows.
    pub async fn payment_history(
        &self,
        unit_number: &str,
        from: Option<&CanonicalDate>,
        to: Option<&CanonicalDate>,
    ) -> Result<Vec<PaymentRecord>, StoreError> {
        let mut sql = String::from(
            "SELECT payment_date, year, month, unit_number FROM payments WHERE unit_number = ?",
        );
        if from.is_some() {
            sql.push_str(" AND date(payment_date) >= date(?)");
        }
        if to.is_some() {
            sql.push_str(" AND date(payment_date) <= date(?)");
        }
        sql.push_str(" ORDER BY date(payment_date) DESC LIMIT ?");

        let mut query = sqlx::query(&sql).bind(unit_number);
        if let Some(from) = from {
            query = query.bind(from.as_str().to_string());
        }
        if let Some(to) = to {
            query = query.bind(to.as_str().to_string());
        }
        let rows = query
            .bind(HISTORY_ROW_CAP as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|r| PaymentRecord {
                // Stored dates are ISO; a malformed legacy row falls back to
                // the empty (invalid) canonical value rather than failing the
                // whole query.
                payment_date: CanonicalDate::from_shape(
                    r.get::<String, _>("payment_date").as_str(),
                )
                .unwrap_or_default(),
                year: r.get::<i64, _>("year") as i32,
                month: r.get::<i64, _>("month") as u32,
                unit_number: r.get("unit_number"),
            })
            .collect())
    }

    /// Community events within an inclusive date range, ordered by date then
    /// title so ties on a day resolve deterministically.
    pub async fn events_between(
        &self,
        from: &CanonicalDate,
        to: &CanonicalDate,
    ) -> Result<Vec<CommunityEvent>, StoreError> {
        let rows = sqlx::query(
            "SELECT date, title, description FROM events \
             WHERE date(date) BETWEEN date(?) AND date(?) \
             ORDER BY date(date) ASC, title ASC",
        )
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| CommunityEvent {
                date: CanonicalDate::from_shape(r.get::<String, _>("date").as_str())
                    .unwrap_or_default(),
                title: r.get("title"),
                description: r.get("description"),
            })
            .collect())
    }

    /// The most recent news entries for the home feed, newest first.
    pub async fn latest_news(&self) -> Result<Vec<NewsItem>, StoreError> {
        let rows = sqlx::query("SELECT date, body FROM news ORDER BY date(date) DESC LIMIT ?")
            .bind(NEWS_FEED_LIMIT as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|r| NewsItem {
                date: CanonicalDate::from_shape(r.get::<String, _>("date").as_str())
                    .unwrap_or_default(),
                body: r.get("body"),
            })
            .collect())
    }
}
