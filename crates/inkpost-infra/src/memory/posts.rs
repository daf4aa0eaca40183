use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkpost_core::domain::{Post, Validate};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{BaseRepository, PostRepository};
use inkpost_core::query::PostQuery;

/// Post store on a `HashMap` behind an async `RwLock`.
///
/// Uniqueness checks and the write happen under the same guard.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    fn slug_taken(store: &HashMap<Uuid, Post>, post: &Post) -> bool {
        store
            .values()
            .any(|existing| existing.id != post.id && existing.slug == post.slug)
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        post.validate().map_err(RepoError::Validation)?;

        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Duplicate { field: "id".into() });
        }
        if Self::slug_taken(&store, &post) {
            return Err(RepoError::Duplicate {
                field: "slug".into(),
            });
        }

        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        post.validate().map_err(RepoError::Validation)?;

        let mut store = self.store.write().await;
        if !store.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if Self::slug_taken(&store, &post) {
            return Err(RepoError::Duplicate {
                field: "slug".into(),
            });
        }

        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|post| post.slug == slug).cloned())
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let category = query
            .category
            .as_deref()
            .map(|raw| {
                Uuid::parse_str(raw).map_err(|_| RepoError::Cast {
                    field: "category".into(),
                    value: raw.to_string(),
                })
            })
            .transpose()?;

        let mut posts: Vec<Post> = {
            let store = self.store.read().await;
            store
                .values()
                .filter(|post| category.is_none_or(|c| post.category == Some(c)))
                .cloned()
                .collect()
        };
        posts.sort_by(|a, b| query.sort.compare(a, b));

        let skip = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(posts.into_iter().skip(skip).take(take).collect())
    }
}
