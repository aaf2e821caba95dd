/// Post handlers: listing, detail, and creation.
use actix_web::{http::header, web, Either, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::forms::PostForm;
use crate::metrics;
use crate::middleware::CurrentUser;
use crate::models::{PostListResponse, PostResponse};

/// List all posts, newest first. Anonymous access allowed.
#[utoipa::path(
    get,
    path = "/posts/",
    tag = "Posts",
    responses(
        (status = 200, description = "All posts, newest first", body = PostListResponse)
    )
)]
pub async fn list_posts(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let posts = db::posts::list_with_authors(&pool).await?;
    let posts: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();
    let count = posts.len();

    Ok(HttpResponse::Ok().json(PostListResponse { posts, count }))
}

/// Fetch one post by id.
#[utoipa::path(
    get,
    path = "/posts/{id}/",
    tag = "Posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "No post with that ID")
    )
)]
pub async fn get_post(pool: web::Data<PgPool>, path: web::Path<String>) -> Result<HttpResponse> {
    // A segment that is not a UUID cannot name a post.
    let post_id = Uuid::parse_str(&path).map_err(|_| AppError::NotFound("Post"))?;

    match db::posts::find_with_author(&pool, post_id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(PostResponse::from(post))),
        None => Err(AppError::NotFound("Post")),
    }
}

/// Describe the empty creation form. Auth-gated; unauthenticated callers are
/// redirected to login by the session middleware.
#[utoipa::path(
    get,
    path = "/posts/new/",
    tag = "Posts",
    responses(
        (status = 200, description = "Creation form descriptor", body = FormSpec),
        (status = 302, description = "Not authenticated; redirect to login")
    ),
    security(("session_cookie" = []), ("session_token" = []))
)]
pub async fn new_post_form(_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(PostForm::spec())
}

/// Create a post from a valid form and redirect to its detail page. The
/// author is always the session user; nothing in the payload can set it.
#[utoipa::path(
    post,
    path = "/posts/new/",
    tag = "Posts",
    request_body = PostForm,
    responses(
        (status = 302, description = "Created; redirects to the post detail page"),
        (status = 400, description = "Validation failed; field errors in body")
    ),
    security(("session_cookie" = []), ("session_token" = []))
)]
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    form: Either<web::Json<PostForm>, web::Form<PostForm>>,
) -> Result<HttpResponse> {
    let form = match form {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };

    form.validate()?;

    let post =
        db::posts::create_post(&pool, user.user_id, form.title.trim(), form.content.trim()).await?;

    metrics::POSTS_CREATED_TOTAL.inc();
    tracing::info!(post_id = %post.id, user_id = %user.user_id, "post created");

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, format!("/posts/{}/", post.id)))
        .finish())
}
