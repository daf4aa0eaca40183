use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, QueryTrait, RuntimeErr, Value};
use uuid::Uuid;

use inkpost_core::domain::{NewPost, Post, PostStatus};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{BaseRepository, PostRepository, UserRepository};
use inkpost_core::query::{MAX_WINDOW, PostQuery};

use crate::database::entity::{post, user};
use crate::database::postgres_base::{map_db_err, unique_field};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository, list_select};

fn post_model(title: &str, slug: &str, author: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        title: title.to_owned(),
        content: "Content".to_owned(),
        slug: slug.to_owned(),
        author,
        category: None,
        status: "published".to_owned(),
        views: 3,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let author = Uuid::new_v4();
    let model = post_model("Test Post", "test-post", author);
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.author, author);
    assert_eq!(post.status, PostStatus::Published);
    assert_eq!(post.views, 3);
}

#[tokio::test]
async fn test_find_post_by_slug_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.find_by_slug("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_posts_maps_rows() {
    let author = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            post_model("Second", "second", author),
            post_model("First", "first", author),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let query = PostQuery::from_params(
        Some(Uuid::new_v4().to_string()),
        Some(2),
        Some(10),
        Some("-createdAt"),
    )
    .unwrap();

    let titles: Vec<String> = repo
        .list(&query)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();

    assert_eq!(titles, vec!["Second", "First"]);
}

#[tokio::test]
async fn test_list_posts_malformed_category_is_cast_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);
    let query = PostQuery {
        category: Some("tech".into()),
        ..Default::default()
    };

    let err = repo.list(&query).await.unwrap_err();

    assert!(matches!(err, RepoError::Cast { field, value } if field == "category" && value == "tech"));
}

/// Every unsigned value bound into a listing must fit a Postgres `BIGINT`.
fn assert_binds_fit_bigint(query: &PostQuery) {
    let statement = list_select(query).unwrap().build(DatabaseBackend::Postgres);
    let values = statement.values.expect("listing binds offset and limit");

    let unsigned: Vec<u64> = values
        .0
        .into_iter()
        .filter_map(|value| match value {
            Value::BigUnsigned(Some(n)) => Some(n),
            _ => None,
        })
        .collect();

    assert!(!unsigned.is_empty());
    assert!(unsigned.iter().all(|n| i64::try_from(*n).is_ok()), "{unsigned:?}");
}

#[test]
fn test_list_window_at_the_edge_fits_bigint() {
    let query = PostQuery::from_params(None, Some(MAX_WINDOW), Some(2), None).unwrap();
    assert_binds_fit_bigint(&query);

    let query = PostQuery::from_params(None, None, Some(MAX_WINDOW), None).unwrap();
    assert_binds_fit_bigint(&query);
}

#[test]
fn test_list_window_built_by_hand_is_clamped() {
    let query = PostQuery {
        page: u64::MAX,
        limit: u64::MAX,
        ..Default::default()
    };
    assert_binds_fit_bigint(&query);
}

#[tokio::test]
async fn test_insert_post_validates_before_writing() {
    // No results appended: reaching the database would fail the test with a mock error.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);

    let post = Post::new(
        Uuid::new_v4(),
        NewPost {
            title: "Untitled".into(),
            content: "   ".into(),
            ..Default::default()
        },
    );

    let err = repo.insert(post).await.unwrap_err();

    assert!(matches!(err, RepoError::Validation(msgs) if msgs == vec!["Content is required"]));
}

#[tokio::test]
async fn test_insert_post_returns_stored_row() {
    let author = Uuid::new_v4();
    let post = Post::new(
        author,
        NewPost {
            title: "Fresh Post".into(),
            content: "Body".into(),
            ..Default::default()
        },
    );
    let row = post::Model {
        id: post.id,
        title: post.title.clone(),
        content: post.content.clone(),
        slug: post.slug.clone(),
        author,
        category: None,
        status: "draft".into(),
        views: 0,
        created_at: post.created_at.into(),
        updated_at: post.updated_at.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let saved = repo.insert(post.clone()).await.unwrap();

    assert_eq!(saved.id, post.id);
    assert_eq!(saved.slug, "fresh-post");
    assert_eq!(saved.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_delete_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_users_by_ids() {
    let now = Utc::now();
    let alice = user::Model {
        id: Uuid::new_v4(),
        username: "alice".into(),
        email: "alice@example.com".into(),
        password_hash: "$argon2id$stub".into(),
        created_at: now.into(),
        updated_at: now.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![alice.clone()]])
        .into_connection();
    let repo = PostgresUserRepository::new(db);

    let users = repo.find_by_ids(&[alice.id]).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "alice");

    // Empty input never touches the database.
    assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
}

#[test]
fn test_unique_field_from_constraint_message() {
    assert_eq!(
        unique_field("duplicate key value violates unique constraint \"posts_slug_key\""),
        "slug"
    );
    assert_eq!(unique_field("Key (email)=(a@b.co) already exists."), "email");
    assert_eq!(unique_field("something else entirely"), "Field");
}

#[test]
fn test_map_db_err() {
    assert!(matches!(map_db_err(DbErr::RecordNotUpdated), RepoError::NotFound));
    assert!(matches!(
        map_db_err(DbErr::Conn(RuntimeErr::Internal("refused".into()))),
        RepoError::Connection(_)
    ));
    assert!(matches!(
        map_db_err(DbErr::Custom("boom".into())),
        RepoError::Query(_)
    ));
}
