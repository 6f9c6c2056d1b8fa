use std::sync::Arc;

use tracing::info;

use crate::{
    db::{
        models::{Comment, CommentStatus, NewComment},
        Store,
    },
    error::{Error, Result},
};

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn Store>,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// New comments always start out `pending`.
    pub async fn create(&self, user_id: Option<i64>, content: Option<String>) -> Result<Comment> {
        let (Some(user_id), Some(content)) = (user_id, content.filter(|c| !c.trim().is_empty()))
        else {
            return Err(Error::validation("user_id and content are required"));
        };

        if self.store.find_user(user_id).await?.is_none() {
            return Err(Error::NotFound("user not found".to_owned()));
        }

        let comment = self.store.insert_comment(NewComment { user_id, content }).await?;
        info!(comment_id = comment.id, user_id, "Comment submitted for moderation");
        Ok(comment)
    }

    pub async fn list(&self, status: Option<CommentStatus>) -> Result<Vec<Comment>> {
        Ok(self.store.list_comments(status).await?)
    }

    pub async fn moderate(&self, id: i64, status: CommentStatus) -> Result<Comment> {
        let comment = self
            .store
            .set_comment_status(id, status)
            .await?
            .ok_or_else(|| Error::NotFound("comment not found".to_owned()))?;

        info!(comment_id = id, status = ?status, "Comment moderated");
        Ok(comment)
    }
}
