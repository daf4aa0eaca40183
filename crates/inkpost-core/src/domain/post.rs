use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Validate;
use crate::error::DomainError;
use crate::utils::generate_slug;

pub const TITLE_MAX_CHARS: usize = 200;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(DomainError::Validation(format!(
                "`{other}` is not a valid status (expected draft or published)"
            ))),
        }
    }
}

/// Post entity - represents a blog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author: Uuid,
    pub category: Option<Uuid>,
    pub status: PostStatus,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a post. The author is never part of it.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    pub category: Option<Uuid>,
    pub status: Option<PostStatus>,
}

/// Fields an author may change on an existing post.
///
/// `category` is `Some(None)` to detach the post from its category.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub category: Option<Option<Uuid>>,
    pub status: Option<PostStatus>,
}

impl Post {
    /// Create a new post owned by `author`.
    ///
    /// The slug is derived from the title unless one was supplied; a supplied
    /// slug goes through the same normalization.
    pub fn new(author: Uuid, fields: NewPost) -> Self {
        let now = Utc::now();
        let slug = match fields.slug.as_deref().map(generate_slug) {
            Some(slug) if !slug.is_empty() => slug,
            _ => generate_slug(&fields.title),
        };

        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            content: fields.content,
            slug,
            author,
            category: fields.category,
            status: fields.status.unwrap_or_default(),
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author == user_id
    }

    /// Merge changes into the post and bump `updated_at`.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(slug) = changes.slug {
            self.slug = generate_slug(&slug);
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

impl Validate for Post {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title is required".to_string());
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.push(format!(
                "Title cannot be more than {TITLE_MAX_CHARS} characters"
            ));
        }
        if self.content.trim().is_empty() {
            errors.push("Content is required".to_string());
        }
        if self.slug.is_empty() {
            errors.push("Slug is required".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Public projection of a post's author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// A post with its author expanded, as returned by every read.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub author: Option<AuthorSummary>,
}
