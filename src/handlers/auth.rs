/// Registration, login, and logout handlers.
///
/// Successful registration logs the new account in immediately: a session row
/// is created and the session cookie set on the same 302 that sends the
/// client to the post list.
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{http::header, web, Either, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::config::Config;
use crate::db;
use crate::error::{AppError, Result};
use crate::forms::{LoginForm, RegisterForm};
use crate::metrics;
use crate::middleware::{CurrentUser, SESSION_COOKIE};
use crate::models::User;
use crate::routes::POSTS_PATH;
use crate::security::{password, token};

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Extract client IP, preferring proxy headers over the peer address.
fn extract_ip_address(req: &HttpRequest) -> Option<String> {
    if let Some(forwarded) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        return forwarded.split(',').next().map(|s| s.trim().to_string());
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP").and_then(|h| h.to_str().ok()) {
        return Some(real_ip.to_string());
    }

    req.peer_addr().map(|addr| addr.ip().to_string())
}

/// Only local absolute paths are allowed as post-login redirect targets.
/// Browsers resolve backslashes in a Location header as forward slashes, so
/// the scheme-relative check runs on the normalized form: "/\evil.example.com"
/// reaches the client as "//evil.example.com".
fn is_safe_next(next: &str) -> bool {
    let normalized = next.replace('\\', "/");
    next.starts_with('/') && !normalized.starts_with("//")
}

fn session_cookie(raw_token: &str, config: &Config) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, raw_token.to_string())
        .path("/")
        .http_only(true)
        .secure(config.session.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(config.session.ttl_days))
        .finish()
}

/// Create a session row for the user and build the redirect carrying the
/// session cookie. Shared by registration (auto-login) and login.
async fn open_session(
    pool: &PgPool,
    config: &Config,
    req: &HttpRequest,
    user: &User,
    redirect_to: &str,
) -> Result<HttpResponse> {
    let raw_token = token::generate_session_token();
    let token_hash = token::hash_session_token(&raw_token);
    let ip_address = extract_ip_address(req);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    db::sessions::create_session(
        pool,
        user.id,
        &token_hash,
        config.session.ttl_days,
        ip_address.as_deref(),
        user_agent.as_deref(),
    )
    .await?;

    metrics::SESSIONS_OPENED_TOTAL.inc();

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, redirect_to.to_string()))
        .cookie(session_cookie(&raw_token, config))
        .finish())
}

/// Describe the empty registration form.
#[utoipa::path(
    get,
    path = "/register/",
    tag = "Auth",
    responses((status = 200, description = "Registration form descriptor", body = FormSpec))
)]
pub async fn register_form() -> HttpResponse {
    HttpResponse::Ok().json(RegisterForm::spec())
}

/// Create an account and log it in immediately.
#[utoipa::path(
    post,
    path = "/register/",
    tag = "Auth",
    request_body = RegisterForm,
    responses(
        (status = 302, description = "Account created and logged in; redirects to the post list"),
        (status = 400, description = "Validation failed; field errors in body")
    )
)]
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    http_req: HttpRequest,
    form: Either<web::Json<RegisterForm>, web::Form<RegisterForm>>,
) -> Result<HttpResponse> {
    let form = match form {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };

    form.validate()?;

    if db::users::username_exists(&pool, &form.username).await? {
        return Err(AppError::Validation(RegisterForm::username_taken()));
    }

    let password_hash = password::hash_password(&form.password)?;
    let user = match db::users::create_user(&pool, &form.username, &password_hash).await {
        Ok(user) => user,
        // Lost the uniqueness race to a concurrent registration; report it
        // exactly like the pre-check would have.
        Err(AppError::UsernameTaken) => {
            return Err(AppError::Validation(RegisterForm::username_taken()))
        }
        Err(e) => return Err(e),
    };

    metrics::USERS_REGISTERED_TOTAL.inc();
    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    open_session(&pool, &config, &http_req, &user, POSTS_PATH).await
}

/// Describe the empty login form.
#[utoipa::path(
    get,
    path = "/accounts/login/",
    tag = "Auth",
    responses((status = 200, description = "Login form descriptor", body = FormSpec))
)]
pub async fn login_form() -> HttpResponse {
    HttpResponse::Ok().json(LoginForm::spec())
}

/// Verify credentials and open a session.
#[utoipa::path(
    post,
    path = "/accounts/login/",
    tag = "Auth",
    request_body = LoginForm,
    responses(
        (status = 302, description = "Logged in; redirects to ?next= or the post list"),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    http_req: HttpRequest,
    query: web::Query<LoginQuery>,
    form: Either<web::Json<LoginForm>, web::Form<LoginForm>>,
) -> Result<HttpResponse> {
    let form = match form {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };

    form.validate()?;

    // Same response for unknown username and wrong password.
    let user = db::users::find_by_username(&pool, &form.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&form.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    db::users::record_login(&pool, user.id).await?;
    tracing::info!(user_id = %user.id, "user logged in");

    let redirect_to = query
        .next
        .as_deref()
        .filter(|next| is_safe_next(next))
        .unwrap_or(POSTS_PATH);

    open_session(&pool, &config, &http_req, &user, redirect_to).await
}

/// Revoke the current session and clear the cookie.
#[utoipa::path(
    post,
    path = "/accounts/logout/",
    tag = "Auth",
    responses(
        (status = 302, description = "Logged out; redirects to the post list"),
    ),
    security(("session_cookie" = []), ("session_token" = []))
)]
pub async fn logout(pool: web::Data<PgPool>, user: CurrentUser) -> Result<HttpResponse> {
    db::sessions::revoke_session(&pool, user.session_id).await?;
    tracing::info!(user_id = %user.user_id, "user logged out");

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, POSTS_PATH))
        .cookie(removal)
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_targets() {
        assert!(is_safe_next("/posts/new/"));
        assert!(is_safe_next("/"));
        assert!(!is_safe_next("//evil.example.com/"));
        assert!(!is_safe_next("https://evil.example.com/"));
        assert!(!is_safe_next(""));
    }

    #[test]
    fn test_backslash_next_targets_are_offsite() {
        // Backslashes read as forward slashes once the browser resolves the
        // redirect, so these are all scheme-relative escapes.
        assert!(!is_safe_next("/\\evil.example.com"));
        assert!(!is_safe_next("/\\evil.example.com/"));
        assert!(!is_safe_next("\\\\evil.example.com/"));
        assert!(!is_safe_next("\\evil.example.com/"));
        assert!(!is_safe_next("/\\/evil.example.com/"));
        // A backslash deeper in the path cannot change the host
        assert!(is_safe_next("/posts\\new/"));
    }
}
