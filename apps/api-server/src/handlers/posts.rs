//! Post handlers: public reads, author-only writes.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkpost_core::domain::{NewPost, PostChanges, PostStatus, PostView};
use inkpost_core::error::DomainError;
use inkpost_core::query::PostQuery;
use inkpost_core::utils::{DEFAULT_WORDS_PER_MINUTE, calculate_reading_time};
use inkpost_shared::MessageResponse;
use inkpost_shared::dto::{
    AuthorResponse, CreatePostRequest, ListPostsParams, PostResponse, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<ListPostsParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let query = PostQuery::from_params(
        params.category,
        params.page,
        params.limit,
        params.sort.as_deref(),
    )?;

    let posts = state.posts.list(&query).await?;
    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// GET /api/posts/slug/{slug}
pub async fn get_post_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_slug(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/posts - Protected route
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let fields = NewPost {
        title: req.title.unwrap_or_default(),
        content: req.content.unwrap_or_default(),
        slug: req.slug,
        category: parse_category(req.category)?,
        status: parse_status(req.status)?,
    };

    let post = state.posts.create(identity.user_id, fields).await?;
    Ok(HttpResponse::Created().json(post_response(post)))
}

/// PUT /api/posts/{id} - Protected route
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // `null` or a blank string detaches the post from its category
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        slug: req.slug,
        category: req.category.map(parse_category).transpose()?,
        status: parse_status(req.status)?,
    };

    let post = state
        .posts
        .update(identity.user_id, &path.into_inner(), changes)
        .await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/posts/{id} - Protected route
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.user_id, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

fn parse_category(raw: Option<String>) -> Result<Option<Uuid>, DomainError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| DomainError::InvalidIdentifier {
                entity_type: "Category",
                value: value.to_string(),
            }),
    }
}

fn parse_status(raw: Option<String>) -> Result<Option<PostStatus>, DomainError> {
    raw.map(|status| status.parse()).transpose()
}

fn post_response(view: PostView) -> PostResponse {
    let PostView { post, author } = view;
    let reading_time = calculate_reading_time(&post.content, DEFAULT_WORDS_PER_MINUTE);

    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        slug: post.slug,
        author: author.map(|a| AuthorResponse {
            id: a.id,
            username: a.username,
            email: a.email,
        }),
        category: post.category,
        status: post.status.as_str().to_string(),
        views: post.views,
        reading_time,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}
