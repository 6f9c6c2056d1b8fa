use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use super::{
    models::{CommentStatus, NewComment, NewUser},
    Store,
};
use crate::credentials::CredentialService;

pub const DEMO_ACCOUNT: &str = "demo@aquarium.local";
pub const DEMO_PASSWORD: &str = "123456";

/// Inserts a demo account with one approved and one pending comment.
///
/// Returns `false` without writing anything if the demo account already
/// exists, so it is safe to run on every startup.
pub async fn seed_demo_data(store: &dyn Store, credentials: &CredentialService) -> Result<bool> {
    if store.find_user_by_account(DEMO_ACCOUNT).await?.is_some() {
        return Ok(false);
    }

    let Some(user) = store
        .insert_user(NewUser {
            account: DEMO_ACCOUNT.to_owned(),
            name: "Demo Keeper".to_owned(),
            password_hash: credentials.hash(DEMO_PASSWORD)?,
            avatar_url: Some("/static/avatar/default.png".to_owned()),
            phone: None,
            gender: None,
            birthday: NaiveDate::from_ymd_opt(2004, 11, 30),
            region: None,
        })
        .await?
    else {
        // Lost a race with another instance seeding the same account.
        return Ok(false);
    };

    let praise = store
        .insert_comment(NewComment {
            user_id: user.id,
            content: "This tank looks great!".to_owned(),
        })
        .await?;
    store
        .set_comment_status(praise.id, CommentStatus::Approved)
        .await?;
    store
        .insert_comment(NewComment {
            user_id: user.id,
            content: "Water quality is off, the filter needs checking.".to_owned(),
        })
        .await?;

    info!(user_id = user.id, account = DEMO_ACCOUNT, "Seeded demo data");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn seeds_user_and_moderated_comments_once() {
        let store = MemoryStore::new();
        let credentials = CredentialService::new();

        assert!(seed_demo_data(&store, &credentials).await.unwrap());
        assert!(!seed_demo_data(&store, &credentials).await.unwrap());

        let user = store
            .find_user_by_account(DEMO_ACCOUNT)
            .await
            .unwrap()
            .unwrap();
        assert!(credentials
            .verify(DEMO_PASSWORD, &user.password_hash)
            .unwrap());

        let approved = store
            .list_comments(Some(CommentStatus::Approved))
            .await
            .unwrap();
        let pending = store
            .list_comments(Some(CommentStatus::Pending))
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(pending.len(), 1);
        assert_eq!(store.list_comments(None).await.unwrap().len(), 2);
    }
}
