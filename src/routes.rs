//! Route configuration
//!
//! Centralized route setup extracted from main.rs. The `/posts/new/` scope
//! registers before the `/{id}/` route so "new" never parses as a post id.

use actix_web::web;
use sqlx::PgPool;

use crate::handlers;
use crate::middleware::SessionAuth;

/// Where the session middleware sends unauthenticated requests.
pub const LOGIN_PATH: &str = "/accounts/login/";

/// Default redirect target after login, logout, and registration.
pub const POSTS_PATH: &str = "/posts/";

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig, pool: &PgPool) {
    cfg.service(
        web::scope("/posts")
            .route("/", web::get().to(handlers::posts::list_posts))
            .service(
                web::scope("/new")
                    .wrap(SessionAuth::new(pool.clone()))
                    .route("/", web::get().to(handlers::posts::new_post_form))
                    .route("/", web::post().to(handlers::posts::create_post)),
            )
            .route("/{id}/", web::get().to(handlers::posts::get_post)),
    )
    .service(
        web::scope("/register")
            .route("/", web::get().to(handlers::auth::register_form))
            .route("/", web::post().to(handlers::auth::register)),
    )
    .service(
        web::scope("/accounts")
            .route("/login/", web::get().to(handlers::auth::login_form))
            .route("/login/", web::post().to(handlers::auth::login))
            .service(
                web::scope("/logout")
                    .wrap(SessionAuth::new(pool.clone()))
                    .route("/", web::post().to(handlers::auth::logout)),
            ),
    );
}
