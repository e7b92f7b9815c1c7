use async_trait::async_trait;
use sqlx::PgPool;

pub const PROFILE_KEY: &str = "user_profile";
pub const WORKOUTS_KEY: &str = "user_workouts";
pub const MACRO_SPLIT_KEY: &str = "user_macro_split";
pub const PROFILE_SAVED_KEY: &str = "profile_saved";

/// Opaque key-value snapshot store. The engine serializes what it needs and
/// enforces no schema beyond that.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgSessionStore {
    db: PgPool,
}

impl PgSessionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar(r#"SELECT value FROM session_kv WHERE key = $1"#)
                .bind(key)
                .fetch_optional(&self.db)
                .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO session_kv (key, value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
