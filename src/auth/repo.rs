use crate::{
    auth::repo_types::User,
    id::unique_id,
    storage::{JsonCollection, StorageClient},
};

use super::services::UserError;

/// File-backed user collection.
pub struct UserStore {
    users: JsonCollection<User>,
}

impl UserStore {
    pub async fn load(storage: impl StorageClient + 'static) -> anyhow::Result<Self> {
        Ok(Self {
            users: JsonCollection::load(storage).await?,
        })
    }

    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        self.users
            .read(|users| users.iter().find(|u| u.id == id).cloned())
            .await
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read(|users| users.iter().find(|u| u.username == username).cloned())
            .await
    }

    /// Appends a new user; `password_hash` must already be hashed.
    pub async fn create(
        &self,
        fullname: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, UserError> {
        self.users
            .mutate(|users| {
                if users.iter().any(|u| u.username == username) {
                    return Err(UserError::UsernameTaken);
                }
                let user = User {
                    id: unique_id(|id| users.iter().any(|u| u.id == id)),
                    fullname: fullname.to_string(),
                    username: username.to_string(),
                    password: password_hash.to_string(),
                    is_admin: false,
                };
                users.push(user.clone());
                Ok(user)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::MemoryStorage;

    #[tokio::test]
    async fn create_then_find_and_persist() -> anyhow::Result<()> {
        let storage = MemoryStorage::default();
        let store = UserStore::load(storage.clone()).await?;

        let user = store.create("Puki Ja", "puki", "$argon2id$x").await?;
        assert_eq!(user.id.len(), crate::id::ID_LEN);
        assert_eq!(store.find_by_id(&user.id).await, Some(user.clone()));
        assert_eq!(store.find_by_username("puki").await, Some(user.clone()));
        assert!(store.find_by_username("muki").await.is_none());

        let saved = storage.contents().unwrap();
        assert!(saved.contains("\"username\": \"puki\""));
        assert!(saved.contains("\"isAdmin\": false"));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() -> anyhow::Result<()> {
        let store = UserStore::load(MemoryStorage::default()).await?;
        store.create("Puki Ja", "puki", "h").await?;
        let err = store.create("Other Puki", "puki", "h").await.unwrap_err();
        assert!(matches!(err, UserError::UsernameTaken));
        Ok(())
    }
}
