/// Post database operations
use crate::error::Result;
use crate::models::{Post, PostWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new post. author_id comes from the authenticated session, never
/// from the request payload.
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    title: &str,
    content: &str,
) -> Result<Post> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, author_id, title, content, created_at)
        VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(author_id)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID with its author's username
pub async fn find_with_author(pool: &PgPool, post_id: Uuid) -> Result<Option<PostWithAuthor>> {
    let post = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.author_id, p.title, p.content, u.username AS author_username, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// List all posts with author usernames, newest first
pub async fn list_with_authors(pool: &PgPool) -> Result<Vec<PostWithAuthor>> {
    let posts = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.author_id, p.title, p.content, u.username AS author_username, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Total number of posts
pub async fn count_posts(pool: &PgPool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
