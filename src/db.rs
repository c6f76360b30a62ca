use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::models::{Paste, PasteSummary};
use crate::ApiError;

/// Handle to the paste table. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Connect to a database by URL.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the paste table and its indexes if they don't exist yet.
    pub async fn migrate(&self) -> crate::ApiResult<()> {
        let timestamp = match self.pool.any_kind() {
            #[cfg(feature = "postgres")]
            sqlx::any::AnyKind::Postgres => "TIMESTAMPTZ",
            _ => "DATETIME",
        };

        let mut conn = self.pool.acquire().await?;
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS pastes (
                id TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                title TEXT NOT NULL,
                syntax TEXT NOT NULL DEFAULT 'none',
                expires TEXT NOT NULL DEFAULT 'never',
                visibility TEXT NOT NULL DEFAULT 'public',
                created_at {timestamp} NOT NULL
            )"
        ))
        .execute(&mut conn)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS pastes_created_at ON pastes (created_at)")
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    /// Get a paste by id.
    pub async fn get_paste(&self, id: &str) -> crate::ApiResult<Option<Paste>> {
        let mut conn = self.pool.acquire().await?;
        let paste = sqlx::query_as::<_, Paste>(
            "SELECT id, content, title, syntax, expires, visibility, created_at FROM pastes \
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;
        Ok(paste)
    }

    /// Insert a paste. Fails with [`ApiError::Conflict`] if the id is taken.
    pub async fn insert_paste(&self, paste: &Paste) -> crate::ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            "INSERT INTO pastes (id, content, title, syntax, expires, visibility, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (id) DO NOTHING",
        )
        .bind(&paste.id)
        .bind(&paste.content)
        .bind(&paste.title)
        .bind(&paste.syntax)
        .bind(&paste.expires)
        .bind(&paste.visibility)
        .bind(paste.created_at)
        .execute(&mut conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::Conflict);
        }
        Ok(())
    }

    /// Most recently created pastes first.
    pub async fn recent_pastes(&self, limit: u32) -> crate::ApiResult<Vec<PasteSummary>> {
        let mut conn = self.pool.acquire().await?;
        Ok(sqlx::query_as::<_, PasteSummary>(
            "SELECT id, title FROM pastes ORDER BY created_at DESC, id ASC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&mut conn)
        .await?)
    }

    /// Pastes with the longest content first.
    ///
    /// This sorts the whole table on every call.
    pub async fn top_pastes(&self, limit: u32) -> crate::ApiResult<Vec<PasteSummary>> {
        let mut conn = self.pool.acquire().await?;
        Ok(sqlx::query_as::<_, PasteSummary>(
            "SELECT id, title FROM pastes ORDER BY LENGTH(content) DESC, id ASC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&mut conn)
        .await?)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;

    pub(crate) async fn memory_database() -> Database {
        // a single connection so every query sees the same in-memory database
        let database = Database::connect("sqlite::memory:", 1).await.unwrap();
        database.migrate().await.unwrap();
        database
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn paste(id: &str, content: &str, created_at: DateTime<Utc>) -> Paste {
        Paste {
            id: id.to_owned(),
            content: content.to_owned(),
            title: format!("title {id}"),
            syntax: "rust".to_owned(),
            expires: "1d".to_owned(),
            visibility: "private".to_owned(),
            created_at,
        }
    }

    fn ids(summaries: &[PasteSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.id.as_str()).collect()
    }

    #[tokio::test]
    async fn insert_then_fetch() {
        let db = memory_database().await;
        let stored = paste("deadbeef", "fn main() {}", epoch());

        db.insert_paste(&stored).await.unwrap();

        assert_eq!(db.get_paste("deadbeef").await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        let db = memory_database().await;
        assert_eq!(db.get_paste("00000000").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_id_conflicts_and_keeps_original() {
        let db = memory_database().await;
        let original = paste("cafebabe", "first", epoch());
        db.insert_paste(&original).await.unwrap();

        let err = db
            .insert_paste(&paste("cafebabe", "second", epoch() + Duration::seconds(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Conflict));
        assert_eq!(db.get_paste("cafebabe").await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn recent_orders_newest_first_with_id_tiebreak() {
        let db = memory_database().await;
        db.insert_paste(&paste("b", "x", epoch())).await.unwrap();
        db.insert_paste(&paste("a", "x", epoch())).await.unwrap();
        db.insert_paste(&paste("c", "x", epoch() + Duration::milliseconds(1)))
            .await
            .unwrap();
        db.insert_paste(&paste("d", "x", epoch() - Duration::days(1)))
            .await
            .unwrap();

        let recent = db.recent_pastes(10).await.unwrap();
        assert_eq!(ids(&recent), ["c", "a", "b", "d"]);
        assert_eq!(recent[0].title, "title c");

        assert_eq!(ids(&db.recent_pastes(2).await.unwrap()), ["c", "a"]);
    }

    #[tokio::test]
    async fn top_orders_by_content_length() {
        let db = memory_database().await;
        db.insert_paste(&paste("short", "ab", epoch())).await.unwrap();
        db.insert_paste(&paste("long", "abcdef", epoch())).await.unwrap();
        db.insert_paste(&paste("tie-b", "abcd", epoch())).await.unwrap();
        db.insert_paste(&paste("tie-a", "abcd", epoch())).await.unwrap();

        let top = db.top_pastes(10).await.unwrap();
        assert_eq!(ids(&top), ["long", "tie-a", "tie-b", "short"]);

        assert_eq!(ids(&db.top_pastes(1).await.unwrap()), ["long"]);
    }

    #[tokio::test]
    async fn listings_on_empty_table_are_empty() {
        let db = memory_database().await;
        assert!(db.recent_pastes(10).await.unwrap().is_empty());
        assert!(db.top_pastes(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn migrate_is_repeatable() {
        let db = memory_database().await;
        db.insert_paste(&paste("keep", "x", epoch())).await.unwrap();
        db.migrate().await.unwrap();
        assert!(db.get_paste("keep").await.unwrap().is_some());
    }
}
