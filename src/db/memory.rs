use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    models::{
        Comment, CommentStatus, DeviceSettingRecord, NewComment, NewDeviceSetting,
        NewStatusRecord, NewUser, StatusRecord, Timestamps, User,
    },
    Store,
};

/// Process-local `Store`, used when no `DATABASE_URL` is configured and by
/// the HTTP tests.
///
/// Wrapped in `Arc` so clones share the same tables. Ids are assigned under
/// the write lock, so within a table they strictly increase in insertion
/// order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    statuses: Vec<StatusRecord>,
    settings: Vec<DeviceSettingRecord>,
    users: Vec<User>,
    comments: Vec<Comment>,
}

fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

/// Newest first: `created_at DESC, id DESC`.
fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_status(&self, r: NewStatusRecord) -> Result<StatusRecord> {
        let mut tables = self.inner.write().await;
        let record = StatusRecord {
            id: next_id(tables.statuses.len()),
            device_id: r.device_id,
            temp: r.temp,
            ph: r.ph,
            tds: r.tds,
            temp_status: r.temp_status,
            ph_status: r.ph_status,
            tds_status: r.tds_status,
            timestamps: Timestamps::now(),
        };
        tables.statuses.push(record.clone());
        Ok(record)
    }

    async fn latest_status(&self) -> Result<Option<StatusRecord>> {
        Ok(self
            .inner
            .read()
            .await
            .statuses
            .iter()
            .max_by_key(|r| (r.timestamps.created_at, r.id))
            .cloned())
    }

    async fn insert_setting(&self, s: NewDeviceSetting) -> Result<DeviceSettingRecord> {
        let mut tables = self.inner.write().await;
        let record = DeviceSettingRecord {
            id: next_id(tables.settings.len()),
            user_id: s.user_id,
            setting_name: s.setting_name,
            setting_type: s.setting_type,
            value: s.value,
            timestamps: Timestamps::now(),
        };
        tables.settings.push(record.clone());
        Ok(record)
    }

    async fn list_settings(&self, user_id: Option<i64>) -> Result<Vec<DeviceSettingRecord>> {
        let mut rows: Vec<_> = self
            .inner
            .read()
            .await
            .settings
            .iter()
            .filter(|s| user_id.is_none() || s.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |s| (s.timestamps.created_at, s.id));
        Ok(rows)
    }

    async fn insert_user(&self, u: NewUser) -> Result<Option<User>> {
        let mut tables = self.inner.write().await;
        if tables.users.iter().any(|existing| existing.account == u.account) {
            return Ok(None);
        }

        let user = User {
            id: next_id(tables.users.len()),
            account: u.account,
            name: u.name,
            password_hash: u.password_hash,
            avatar_url: u.avatar_url,
            phone: u.phone,
            gender: u.gender,
            birthday: u.birthday,
            region: u.region,
            timestamps: Timestamps::now(),
        };
        tables.users.push(user.clone());
        Ok(Some(user))
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_account(&self, account: &str) -> Result<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.account == account)
            .cloned())
    }

    async fn insert_comment(&self, c: NewComment) -> Result<Comment> {
        let mut tables = self.inner.write().await;
        let comment = Comment {
            id: next_id(tables.comments.len()),
            user_id: c.user_id,
            content: c.content,
            status: CommentStatus::default(),
            timestamps: Timestamps::now(),
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, status: Option<CommentStatus>) -> Result<Vec<Comment>> {
        let mut rows: Vec<_> = self
            .inner
            .read()
            .await
            .comments
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        newest_first(&mut rows, |c| (c.timestamps.created_at, c.id));
        Ok(rows)
    }

    async fn set_comment_status(
        &self,
        id: i64,
        status: CommentStatus,
    ) -> Result<Option<Comment>> {
        let mut tables = self.inner.write().await;
        let Some(comment) = tables.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        comment.status = status;
        comment.timestamps.touch();
        Ok(Some(comment.clone()))
    }
}
