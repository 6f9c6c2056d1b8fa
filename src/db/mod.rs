pub mod memory;
pub mod models;
pub mod postgres;
pub mod seed;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use seed::seed_demo_data;

use self::models::{
    Comment, CommentStatus, DeviceSettingRecord, NewComment, NewDeviceSetting, NewStatusRecord,
    NewUser, StatusRecord, User,
};

/// Persistence seam shared by every service.
///
/// Each write is a single append (or, for comment moderation, a single-row
/// update); nothing here spans more than one statement.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_status(&self, record: NewStatusRecord) -> Result<StatusRecord>;

    /// Most recent row by `created_at`, ties going to the larger id.
    async fn latest_status(&self) -> Result<Option<StatusRecord>>;

    async fn insert_setting(&self, setting: NewDeviceSetting) -> Result<DeviceSettingRecord>;

    /// Newest first, optionally restricted to one user.
    async fn list_settings(&self, user_id: Option<i64>) -> Result<Vec<DeviceSettingRecord>>;

    /// Returns `None` when the account is already taken.
    async fn insert_user(&self, user: NewUser) -> Result<Option<User>>;

    async fn find_user(&self, id: i64) -> Result<Option<User>>;

    async fn find_user_by_account(&self, account: &str) -> Result<Option<User>>;

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;

    /// Newest first, optionally restricted to one moderation status.
    async fn list_comments(&self, status: Option<CommentStatus>) -> Result<Vec<Comment>>;

    /// Returns `None` when no comment has this id.
    async fn set_comment_status(&self, id: i64, status: CommentStatus)
        -> Result<Option<Comment>>;
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
