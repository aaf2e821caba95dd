/// Session database operations
use crate::error::Result;
use crate::models::{Session, SessionUser};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new session for a user. Only the token hash is stored.
pub async fn create_session(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: &str,
    ttl_days: i64,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) -> Result<Session> {
    let session_id = Uuid::new_v4();
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(ttl_days);

    let session = sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, user_id, token_hash, expires_at, ip_address, user_agent, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .bind(ip_address)
    .bind(user_agent)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

/// Resolve a token hash to its live session and owning user. Returns `None`
/// for unknown, revoked, or expired sessions alike.
pub async fn find_live_session_user(pool: &PgPool, token_hash: &str) -> Result<Option<SessionUser>> {
    let session_user = sqlx::query_as::<_, SessionUser>(
        r#"
        SELECT s.id AS session_id, s.user_id, u.username
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token_hash = $1 AND s.revoked_at IS NULL AND s.expires_at > NOW()
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(session_user)
}

/// Revoke a session
pub async fn revoke_session(pool: &PgPool, session_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
        .bind(session_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete sessions that can never authenticate again. Run periodically by the
/// sweeper task.
pub async fn delete_dead_sessions(pool: &PgPool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW() OR revoked_at IS NOT NULL")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
