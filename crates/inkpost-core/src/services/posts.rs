//! Business rules for the posts resource: identifier checks, required
//! fields, ownership, and author expansion.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewPost, Post, PostChanges, PostView};
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};
use crate::query::PostQuery;
use crate::utils::sanitize_input;

const ENTITY: &str = "Post";

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    pub async fn list(&self, query: &PostQuery) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.list(query).await?;
        self.expand(posts).await
    }

    pub async fn get(&self, raw_id: &str) -> Result<PostView, DomainError> {
        let id = parse_id(raw_id)?;
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity_type: ENTITY })?;
        self.expand_one(post).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<PostView, DomainError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or(DomainError::NotFound { entity_type: ENTITY })?;
        self.expand_one(post).await
    }

    /// Create a post owned by `author`, whatever the payload claimed.
    pub async fn create(&self, author: Uuid, mut fields: NewPost) -> Result<PostView, DomainError> {
        fields.title = sanitize_input(&fields.title);
        if fields.title.is_empty() {
            return Err(DomainError::Validation("Title is required".into()));
        }
        if fields.content.trim().is_empty() {
            return Err(DomainError::Validation("Content is required".into()));
        }

        let post = self.posts.insert(Post::new(author, fields)).await?;
        tracing::info!(post_id = %post.id, author = %author, slug = %post.slug, "Post created");

        self.expand_one(post).await
    }

    pub async fn update(
        &self,
        actor: Uuid,
        raw_id: &str,
        mut changes: PostChanges,
    ) -> Result<PostView, DomainError> {
        let mut post = self.find_owned(actor, raw_id, "update").await?;

        changes.title = changes.title.map(|title| sanitize_input(&title));
        post.apply(changes);

        let post = self.posts.update(post).await?;
        tracing::info!(post_id = %post.id, actor = %actor, "Post updated");

        self.expand_one(post).await
    }

    pub async fn delete(&self, actor: Uuid, raw_id: &str) -> Result<(), DomainError> {
        let post = self.find_owned(actor, raw_id, "delete").await?;
        self.posts.delete(post.id).await?;
        tracing::info!(post_id = %post.id, actor = %actor, "Post deleted");
        Ok(())
    }

    async fn find_owned(&self, actor: Uuid, raw_id: &str, action: &str) -> Result<Post, DomainError> {
        let id = parse_id(raw_id)?;
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity_type: ENTITY })?;

        if !post.is_authored_by(actor) {
            tracing::warn!(post_id = %post.id, actor = %actor, action, "Ownership check failed");
            return Err(DomainError::Forbidden(format!(
                "Not authorized to {action} this post"
            )));
        }
        Ok(post)
    }

    async fn expand_one(&self, post: Post) -> Result<PostView, DomainError> {
        let mut views = self.expand(vec![post]).await?;
        views
            .pop()
            .ok_or(DomainError::NotFound { entity_type: ENTITY })
    }

    /// Attach `{id, username, email}` of each author, one batch lookup.
    async fn expand(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<Uuid, _> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.summary()))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                author: authors.get(&post.author).cloned(),
                post,
            })
            .collect())
    }
}

fn parse_id(raw_id: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw_id).map_err(|_| DomainError::InvalidIdentifier {
        entity_type: ENTITY,
        value: raw_id.to_string(),
    })
}
