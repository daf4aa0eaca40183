//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select};
use uuid::Uuid;

use inkpost_core::domain::{Post, User};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{PostRepository, UserRepository};
use inkpost_core::query::{MAX_WINDOW, PostQuery, PostSortField};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = match email.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***@{domain}"),
                _ => format!("***@{domain}"),
            },
            None => "***".to_string(),
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

fn sort_column(field: PostSortField) -> post::Column {
    match field {
        PostSortField::CreatedAt => post::Column::CreatedAt,
        PostSortField::UpdatedAt => post::Column::UpdatedAt,
        PostSortField::Title => post::Column::Title,
        PostSortField::Slug => post::Column::Slug,
        PostSortField::Status => post::Column::Status,
        PostSortField::Views => post::Column::Views,
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let result = list_select(query)?
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Filtered, ordered and windowed select for a post listing.
///
/// Offset and limit are bound as `BIGINT`, so both stay within `MAX_WINDOW`.
pub(crate) fn list_select(query: &PostQuery) -> Result<Select<PostEntity>, RepoError> {
    let mut select = PostEntity::find();

    if let Some(raw) = query.category.as_deref() {
        let category = Uuid::parse_str(raw).map_err(|_| RepoError::Cast {
            field: "category".into(),
            value: raw.to_string(),
        })?;
        select = select.filter(post::Column::Category.eq(category));
    }

    let order = if query.sort.descending {
        Order::Desc
    } else {
        Order::Asc
    };

    Ok(select
        .order_by(sort_column(query.sort.field), order.clone())
        .order_by(post::Column::Id, order)
        .offset(query.offset().min(MAX_WINDOW))
        .limit(query.limit.min(MAX_WINDOW)))
}
