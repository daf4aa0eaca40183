//! Listing parameters for posts: filter, sort and page window.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::domain::Post;
use crate::error::DomainError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest `page`, `limit` or offset a store is asked for. SQL stores bind
/// these as signed 64-bit integers.
pub const MAX_WINDOW: u64 = i64::MAX as u64;

/// Fields a listing can be ordered by, named as they appear in the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Slug,
    Status,
    Views,
}

impl PostSortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostSortField::CreatedAt => "createdAt",
            PostSortField::UpdatedAt => "updatedAt",
            PostSortField::Title => "title",
            PostSortField::Slug => "slug",
            PostSortField::Status => "status",
            PostSortField::Views => "views",
        }
    }
}

/// `field` or `-field`; a leading `-` means descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostSort {
    pub field: PostSortField,
    pub descending: bool,
}

impl Default for PostSort {
    fn default() -> Self {
        Self {
            field: PostSortField::CreatedAt,
            descending: true,
        }
    }
}

impl FromStr for PostSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let field = match name {
            "createdAt" => PostSortField::CreatedAt,
            "updatedAt" => PostSortField::UpdatedAt,
            "title" => PostSortField::Title,
            "slug" => PostSortField::Slug,
            "status" => PostSortField::Status,
            "views" => PostSortField::Views,
            _ => {
                return Err(DomainError::Validation(format!(
                    "Cannot sort posts by `{name}`"
                )));
            }
        };
        Ok(Self { field, descending })
    }
}

impl PostSort {
    /// Total order over posts; ties on the sort field fall back to the id.
    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        let ordering = match self.field {
            PostSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            PostSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            PostSortField::Title => a.title.cmp(&b.title),
            PostSortField::Slug => a.slug.cmp(&b.slug),
            PostSortField::Status => a.status.as_str().cmp(b.status.as_str()),
            PostSortField::Views => a.views.cmp(&b.views),
        }
        .then_with(|| a.id.cmp(&b.id));

        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    /// Exact-match category filter, still in its raw form; the store decides
    /// whether it is a well-formed identifier.
    pub category: Option<String>,
    pub page: u64,
    pub limit: u64,
    pub sort: PostSort,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            category: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: PostSort::default(),
        }
    }
}

impl PostQuery {
    /// Build a query from optional request parameters, applying defaults.
    ///
    /// `limit` has no practical upper bound; zero values and values above
    /// `MAX_WINDOW` are rejected.
    pub fn from_params(
        category: Option<String>,
        page: Option<u64>,
        limit: Option<u64>,
        sort: Option<&str>,
    ) -> Result<Self, DomainError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        if page == 0 {
            return Err(DomainError::Validation("page must be at least 1".into()));
        }
        if page > MAX_WINDOW {
            return Err(DomainError::Validation(format!(
                "page must be at most {MAX_WINDOW}"
            )));
        }
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(DomainError::Validation("limit must be at least 1".into()));
        }
        if limit > MAX_WINDOW {
            return Err(DomainError::Validation(format!(
                "limit must be at most {MAX_WINDOW}"
            )));
        }
        let sort = match sort.map(str::trim) {
            Some(s) if !s.is_empty() => s.parse()?,
            _ => PostSort::default(),
        };

        Ok(Self {
            category: category.filter(|c| !c.trim().is_empty()),
            page,
            limit,
            sort,
        })
    }

    /// Number of matching posts to skip before this page, capped at
    /// `MAX_WINDOW`.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(MAX_WINDOW)
    }
}
