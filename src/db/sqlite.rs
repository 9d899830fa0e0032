use crate::db::models::{GeneratedPassword, NewPassword, Page};
use crate::db::schema::SQLITE_INIT;
use crate::error::PassforgeError;
use crate::generator::GenerationPolicy;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

/// Cloneable handle over the pooled SQLite connection.
///
/// Every query checks a connection out of the pool and returns it when the
/// future completes or is dropped, error paths included.
#[derive(Clone)]
pub struct PasswordStore {
    pool: SqlitePool,
}

impl PasswordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and ensure the schema.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, PassforgeError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Each in-memory connection is a separate database, so pin to one that never expires.
        let pool_opts = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };
        let pool = pool_opts.connect_with(connect_opts).await?;

        let store = Self::new(pool);
        store.init_schema().await?;
        info!(database_url, "password store ready");
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL. Safe to call repeatedly.
    pub async fn init_schema(&self) -> Result<(), PassforgeError> {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Append a record stamped with the current time. Returns the row id.
    pub async fn insert(&self, new: NewPassword) -> Result<i64, PassforgeError> {
        let policy_json = new
            .policy
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| PassforgeError::Corrupt(format!("policy encode: {e}")))?;
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO passwords (value, created_at, policy, website, username)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.value)
        .bind(created_at)
        .bind(policy_json)
        .bind(new.website)
        .bind(new.username)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "password row inserted");
        Ok(id)
    }

    pub async fn get(&self, id: i64) -> Result<Option<GeneratedPassword>, PassforgeError> {
        let row = sqlx::query(
            r#"SELECT id, value, created_at, policy, website, username
               FROM passwords WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Records newest-first, windowed by `page`.
    pub async fn list_all(&self, page: Page) -> Result<Vec<GeneratedPassword>, PassforgeError> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = page.limit.map(i64::from).unwrap_or(-1);
        let offset = page.offset.map(i64::from).unwrap_or(0);
        let rows = sqlx::query(
            r#"SELECT id, value, created_at, policy, website, username
               FROM passwords ORDER BY id DESC LIMIT ? OFFSET ?"#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn count(&self) -> Result<i64, PassforgeError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM passwords")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    fn row_to_model(row: SqliteRow) -> Result<GeneratedPassword, PassforgeError> {
        let id: i64 = row.try_get("id")?;
        let value: String = row.try_get("value")?;
        let created_at_str: String = row.try_get("created_at")?;
        let policy_json: Option<String> = row.try_get("policy")?;
        let website: Option<String> = row.try_get("website")?;
        let username: Option<String> = row.try_get("username")?;

        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| PassforgeError::Corrupt(format!("row {id} created_at: {e}")))?
            .with_timezone(&Utc);
        let policy: Option<GenerationPolicy> = match policy_json {
            Some(s) => Some(
                serde_json::from_str(&s)
                    .map_err(|e| PassforgeError::Corrupt(format!("row {id} policy: {e}")))?,
            ),
            None => None,
        };

        Ok(GeneratedPassword {
            id,
            value,
            created_at,
            policy,
            website,
            username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> PasswordStore {
        PasswordStore::connect("sqlite::memory:", 1)
            .await
            .expect("open in-memory store")
    }

    #[tokio::test]
    async fn insert_then_list_newest_first() {
        let store = memory_store().await;
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(store.insert(NewPassword::new(format!("pw-{i}"))).await.unwrap());
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let rows = store.list_all(Page::default()).await.unwrap();
        assert_eq!(rows.len(), 5);
        let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, ["pw-4", "pw-3", "pw-2", "pw-1", "pw-0"]);
        assert_eq!(store.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn list_respects_limit_and_offset() {
        let store = memory_store().await;
        for i in 0..6 {
            store.insert(NewPassword::new(format!("pw-{i}"))).await.unwrap();
        }
        let page = Page {
            limit: Some(2),
            offset: Some(1),
        };
        let rows = store.list_all(page).await.unwrap();
        let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, ["pw-4", "pw-3"]);
    }

    #[tokio::test]
    async fn policy_and_labels_round_trip_through_row() {
        let store = memory_store().await;
        let policy = GenerationPolicy::new(10)
            .with_digits()
            .check(Default::default())
            .unwrap();
        let id = store
            .insert(
                NewPassword::new("0123456789")
                    .with_policy(policy)
                    .with_labels(Some(" example.com ".into()), Some("  ".into())),
            )
            .await
            .unwrap();

        let row = store.get(id).await.unwrap().expect("row exists");
        assert_eq!(row.policy, Some(policy));
        assert_eq!(row.website.as_deref(), Some("example.com"));
        assert_eq!(row.username, None);
        assert!(store.get(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let store = memory_store().await;
        store.insert(NewPassword::new("keep-me")).await.unwrap();
        store.init_schema().await.unwrap();
        store.init_schema().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
