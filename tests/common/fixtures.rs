/// Test fixtures and utilities for integration tests
/// Provides database setup, test data creation, and cleanup
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use blog_service::models::{Post, User};
use blog_service::security::{password, token};

// ============================================
// Database Setup
// ============================================

/// Connect to the database named by DATABASE_URL and run migrations.
/// Returns None when DATABASE_URL is not set so callers can skip.
pub async fn try_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    // Retry briefly to absorb container startup delay in CI
    let mut last_err: Option<anyhow::Error> = None;
    for attempt in 1..=10u32 {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await
        {
            Ok(pool) => {
                if attempt > 1 {
                    eprintln!("[tests] PostgreSQL ready after {} attempts", attempt);
                }
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .expect("Failed to run migrations");
                return Some(pool);
            }
            Err(e) => {
                last_err = Some(anyhow::anyhow!(e));
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }

    panic!(
        "Failed to connect to test database after 10 retries: {}",
        last_err.unwrap()
    );
}

/// Pool that never connects. For routes that reject before touching the
/// database.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgresql://localhost/blog_test_unreachable")
        .expect("Failed to build lazy pool")
}

/// Clean up test data after tests
pub async fn cleanup_test_data(pool: &PgPool) {
    // Delete in order to respect foreign key constraints
    sqlx::query("DELETE FROM comments").execute(pool).await.ok();
    sqlx::query("DELETE FROM posts").execute(pool).await.ok();
    sqlx::query("DELETE FROM sessions").execute(pool).await.ok();
    sqlx::query("DELETE FROM users").execute(pool).await.ok();
}

// ============================================
// Test Data Creation
// ============================================

/// Create a test user with a unique username
pub async fn create_test_user(pool: &PgPool, password_plain: &str) -> User {
    let username = format!(
        "user_{}",
        Uuid::new_v4()
            .to_string()
            .chars()
            .take(8)
            .collect::<String>()
    );
    create_test_user_with_username(pool, &username, password_plain).await
}

/// Create a test user with a specific username
pub async fn create_test_user_with_username(
    pool: &PgPool,
    username: &str,
    password_plain: &str,
) -> User {
    let password_hash = password::hash_password(password_plain).expect("Failed to hash password");

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, password_hash)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(&password_hash)
    .fetch_one(pool)
    .await
    .expect("Failed to create test user")
}

/// Create a test post with default content
pub async fn create_test_post(pool: &PgPool, author_id: Uuid, title: &str) -> Post {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, author_id, title, content)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(author_id)
    .bind(title)
    .bind("Fixture content")
    .fetch_one(pool)
    .await
    .expect("Failed to create test post")
}

/// Open a session for the user and return the raw token for the cookie.
pub async fn open_test_session(pool: &PgPool, user_id: Uuid) -> String {
    let raw_token = token::generate_session_token();
    let token_hash = token::hash_session_token(&raw_token);

    sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, token_hash, expires_at)
        VALUES ($1, $2, $3, NOW() + INTERVAL '14 days')
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&token_hash)
    .execute(pool)
    .await
    .expect("Failed to create test session");

    raw_token
}

/// Open a session that expired yesterday. The raw token is returned so tests
/// can present it and assert it no longer authenticates.
pub async fn open_expired_test_session(pool: &PgPool, user_id: Uuid) -> String {
    let raw_token = token::generate_session_token();
    let token_hash = token::hash_session_token(&raw_token);

    sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, token_hash, expires_at)
        VALUES ($1, $2, $3, NOW() - INTERVAL '1 day')
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&token_hash)
    .execute(pool)
    .await
    .expect("Failed to create test session");

    raw_token
}

pub async fn count_posts(pool: &PgPool) -> i64 {
    blog_service::db::posts::count_posts(pool)
        .await
        .expect("Failed to count posts")
}
