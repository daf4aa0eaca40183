use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkpost_core::domain::{User, Validate};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{BaseRepository, UserRepository};

/// User store with the same unique constraints as the `users` table.
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    fn conflicting_field(store: &HashMap<Uuid, User>, user: &User) -> Option<&'static str> {
        for existing in store.values().filter(|existing| existing.id != user.id) {
            if existing.email == user.email {
                return Some("email");
            }
            if existing.username == user.username {
                return Some("username");
            }
        }
        None
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        user.validate().map_err(RepoError::Validation)?;

        let mut store = self.store.write().await;
        if store.contains_key(&user.id) {
            return Err(RepoError::Duplicate { field: "id".into() });
        }
        if let Some(field) = Self::conflicting_field(&store, &user) {
            return Err(RepoError::Duplicate {
                field: field.into(),
            });
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        user.validate().map_err(RepoError::Validation)?;

        let mut store = self.store.write().await;
        if !store.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if let Some(field) = Self::conflicting_field(&store, &user) {
            return Err(RepoError::Duplicate {
                field: field.into(),
            });
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|user| user.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }
}
