use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    models::{
        Comment, CommentStatus, DeviceSettingRecord, NewComment, NewDeviceSetting,
        NewStatusRecord, NewUser, StatusRecord, User,
    },
    Store,
};

const STATUS_COLUMNS: &str = "id, device_id, temp, ph, tds, \
     temp_status, ph_status, tds_status, created_at, updated_at";

const SETTING_COLUMNS: &str =
    "id, user_id, setting_name, setting_type, value, created_at, updated_at";

const USER_COLUMNS: &str = "id, account, name, password_hash, avatar_url, phone, gender, \
     birthday, region, created_at, updated_at";

const COMMENT_COLUMNS: &str = "id, user_id, content, status, created_at, updated_at";

/// `Store` backed by the Postgres schema in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_status(&self, r: NewStatusRecord) -> Result<StatusRecord> {
        let record = sqlx::query_as::<_, StatusRecord>(&format!(
            r#"
            INSERT INTO tank_status
                (device_id, temp, ph, tds, temp_status, ph_status, tds_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STATUS_COLUMNS}
            "#
        ))
        .bind(r.device_id)
        .bind(r.temp)
        .bind(r.ph)
        .bind(r.tds)
        .bind(r.temp_status)
        .bind(r.ph_status)
        .bind(r.tds_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn latest_status(&self) -> Result<Option<StatusRecord>> {
        let record = sqlx::query_as::<_, StatusRecord>(&format!(
            r#"
            SELECT {STATUS_COLUMNS}
            FROM tank_status
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_setting(&self, s: NewDeviceSetting) -> Result<DeviceSettingRecord> {
        let record = sqlx::query_as::<_, DeviceSettingRecord>(&format!(
            r#"
            INSERT INTO device_settings (user_id, setting_name, setting_type, value)
            VALUES ($1, $2, $3, $4)
            RETURNING {SETTING_COLUMNS}
            "#
        ))
        .bind(s.user_id)
        .bind(s.setting_name)
        .bind(s.setting_type)
        .bind(s.value)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_settings(&self, user_id: Option<i64>) -> Result<Vec<DeviceSettingRecord>> {
        let rows = sqlx::query_as::<_, DeviceSettingRecord>(&format!(
            r#"
            SELECT {SETTING_COLUMNS}
            FROM device_settings
            WHERE ($1::bigint IS NULL OR user_id = $1)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert_user(&self, u: NewUser) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users
                (account, name, password_hash, avatar_url, phone, gender, birthday, region)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (account) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(u.account)
        .bind(u.name)
        .bind(u.password_hash)
        .bind(u.avatar_url)
        .bind(u.phone)
        .bind(u.gender)
        .bind(u.birthday)
        .bind(u.region)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn find_user_by_account(&self, account: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE account = $1"
        ))
        .bind(account)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_comment(&self, c: NewComment) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (user_id, content)
            VALUES ($1, $2)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(c.user_id)
        .bind(c.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_comments(&self, status: Option<CommentStatus>) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE ($1::comment_status IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn set_comment_status(
        &self,
        id: i64,
        status: CommentStatus,
    ) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }
}

// ---------------------------------------------------------------------------
// Tests (need a live Postgres: DATABASE_URL=... cargo test -- --ignored)
// ---------------------------------------------------------------------------
