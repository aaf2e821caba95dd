/// HTTP middleware for the blog service.
///
/// `SessionAuth` resolves the opaque session token (Bearer header or session
/// cookie) to a database-backed session and stores the resulting
/// `CurrentUser` in request extensions; handlers receive it as an extractor.
/// Unauthenticated requests are answered with a 302 to the login route, the
/// same flow a browser form client expects, never a bare 401.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::metrics;
use crate::security::token;

/// Name of the session cookie set at registration/login.
pub const SESSION_COOKIE: &str = "sessionid";

// =====================================================================
// Session authentication
// =====================================================================

/// Authenticated session context stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub username: String,
    pub session_id: Uuid,
}

/// Actix middleware that validates the session token against the sessions
/// table.
pub struct SessionAuth {
    pool: PgPool,
}

impl SessionAuth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthService {
            service: Rc::new(service),
            pool: self.pool.clone(),
        }))
    }
}

pub struct SessionAuthService<S> {
    service: Rc<S>,
    pool: PgPool,
}

impl<S, B> Service<ServiceRequest> for SessionAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let pool = self.pool.clone();

        Box::pin(async move {
            let next = req.path().to_string();

            let raw_token = match session_token(&req) {
                Some(token) => token,
                None => return Err(AppError::LoginRequired { next }.into()),
            };

            let token_hash = token::hash_session_token(&raw_token);
            match db::sessions::find_live_session_user(&pool, &token_hash).await {
                Ok(Some(session_user)) => {
                    req.extensions_mut().insert(CurrentUser {
                        user_id: session_user.user_id,
                        username: session_user.username,
                        session_id: session_user.session_id,
                    });
                    service.call(req).await
                }
                // Unknown, expired, and revoked sessions all land here
                Ok(None) => Err(AppError::LoginRequired { next }.into()),
                Err(e) => Err(e.into()),
            }
        })
    }
}

/// Pull the raw session token from the Authorization header or the session
/// cookie.
fn session_token(req: &ServiceRequest) -> Option<String> {
    if let Some(token) = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    req.cookie(SESSION_COOKIE).map(|c| c.value().to_string())
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(req.extensions().get::<CurrentUser>().cloned().ok_or_else(|| {
            AppError::LoginRequired {
                next: req.path().to_string(),
            }
            .into()
        }))
    }
}

// =====================================================================
// Request metrics
// =====================================================================

pub struct RequestMetrics;

impl<S, B> Transform<S, ServiceRequest> for RequestMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestMetricsService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestMetricsService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestMetricsService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestMetricsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        // Route pattern, not the raw path, to keep label cardinality bounded.
        let route = req
            .match_pattern()
            .unwrap_or_else(|| "unmatched".to_string());
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();

            let status = match &res {
                Ok(response) => response.status().as_u16(),
                Err(err) => err.as_response_error().status_code().as_u16(),
            };

            metrics::HTTP_REQUESTS_TOTAL
                .with_label_values(&[&method, &route, &status.to_string()])
                .inc();
            metrics::HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&method, &route])
                .observe(elapsed.as_secs_f64());

            tracing::debug!(%method, %route, %status, elapsed_ms = %elapsed.as_millis(), "request completed");
            res
        })
    }
}
