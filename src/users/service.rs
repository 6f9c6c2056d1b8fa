use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::{
    credentials::CredentialService,
    db::{
        models::{NewUser, User},
        Store,
    },
    error::{Error, Result},
};

/// Registration form; `account`, `password` and `name` must be non-empty.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub account: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    /// `YYYY-MM-DD`
    pub birthday: Option<String>,
    pub region: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Login {
    pub account: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    credentials: CredentialService,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, credentials: CredentialService) -> Self {
        Self { store, credentials }
    }

    pub async fn register(&self, form: Registration) -> Result<User> {
        let (Some(account), Some(password), Some(name)) = (
            non_empty(form.account),
            non_empty(form.password),
            non_empty(form.name),
        ) else {
            return Err(Error::validation("account, password and name are required"));
        };

        if self.store.find_user_by_account(&account).await?.is_some() {
            return Err(Error::Conflict("account already exists".to_owned()));
        }

        let birthday = non_empty(form.birthday)
            .map(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d"))
            .transpose()
            .map_err(|_| Error::validation("birthday format must be YYYY-MM-DD"))?;

        let new_user = NewUser {
            password_hash: self.credentials.hash(&password)?,
            account,
            name,
            avatar_url: form.avatar,
            phone: form.phone,
            gender: form.gender,
            birthday,
            region: form.region,
        };

        // A concurrent registration can still win between the lookup and here.
        let user = self
            .store
            .insert_user(new_user)
            .await?
            .ok_or_else(|| Error::Conflict("account already exists".to_owned()))?;

        info!(user_id = user.id, account = %user.account, "User registered");
        Ok(user)
    }

    pub async fn login(&self, form: Login) -> Result<User> {
        let (Some(account), Some(password)) = (non_empty(form.account), non_empty(form.password))
        else {
            return Err(Error::validation("account and password are required"));
        };

        let user = self
            .store
            .find_user_by_account(&account)
            .await?
            .ok_or_else(|| Error::NotFound("user not found".to_owned()))?;

        if !self.credentials.verify(&password, &user.password_hash)? {
            info!(user_id = user.id, "Login rejected: wrong password");
            return Err(Error::Unauthorized("wrong password".to_owned()));
        }

        info!(user_id = user.id, "User logged in");
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| Error::NotFound("user not found".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()), CredentialService::new())
    }

    fn registration(account: &str) -> Registration {
        Registration {
            account: Some(account.to_owned()),
            password: Some("123456".to_owned()),
            name: Some("Diver".to_owned()),
            ..Default::default()
        }
    }

    fn login(account: &str, password: &str) -> Login {
        Login {
            account: Some(account.to_owned()),
            password: Some(password.to_owned()),
        }
    }

    #[tokio::test]
    async fn register_hashes_password_and_parses_birthday() {
        let users = service();
        let user = users
            .register(Registration {
                birthday: Some("2004-11-30".to_owned()),
                region: Some("CN".to_owned()),
                ..registration("diver@example.com")
            })
            .await
            .unwrap();

        assert!(user.password_hash.starts_with("$argon2"));
        assert_eq!(user.birthday, NaiveDate::from_ymd_opt(2004, 11, 30));
        assert_eq!(users.get(user.id).await.unwrap().region.as_deref(), Some("CN"));
    }

    #[tokio::test]
    async fn register_requires_core_fields() {
        let err = service()
            .register(Registration {
                name: Some(String::new()),
                ..registration("diver@example.com")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(m) if m == "account, password and name are required"));
    }

    #[tokio::test]
    async fn register_rejects_bad_birthday() {
        let err = service()
            .register(Registration {
                birthday: Some("30/11/2004".to_owned()),
                ..registration("diver@example.com")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(m) if m == "birthday format must be YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn register_twice_conflicts() {
        let users = service();
        users.register(registration("diver@example.com")).await.unwrap();
        let err = users.register(registration("diver@example.com")).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn login_outcomes() {
        let users = service();
        let registered = users.register(registration("diver@example.com")).await.unwrap();

        let user = users.login(login("diver@example.com", "123456")).await.unwrap();
        assert_eq!(user.id, registered.id);

        let err = users.login(login("diver@example.com", "nope")).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        let err = users.login(login("ghost@example.com", "123456")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = users.login(Login::default()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn get_unknown_user_is_not_found() {
        assert!(matches!(service().get(9).await.unwrap_err(), Error::NotFound(_)));
    }
}
