/// OpenAPI documentation for the blog service
use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
};
use utoipa::OpenApi;

use crate::forms::{CommentForm, FieldSpec, FormSpec, LoginForm, PostForm, RegisterForm};
use crate::models::{PostListResponse, PostResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog Service API",
        version = "0.1.0",
        description = "Minimal blog service. Anyone can read posts; registered users can write them. Registration logs the new account in immediately.",
        license(
            name = "MIT"
        )
    ),
    paths(
        crate::handlers::posts::list_posts,
        crate::handlers::posts::get_post,
        crate::handlers::posts::new_post_form,
        crate::handlers::posts::create_post,
        crate::handlers::auth::register_form,
        crate::handlers::auth::register,
        crate::handlers::auth::login_form,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::health::health_summary,
        crate::handlers::health::readiness,
        crate::handlers::health::liveness,
    ),
    components(schemas(
        PostResponse,
        PostListResponse,
        FormSpec,
        FieldSpec,
        PostForm,
        CommentForm,
        RegisterForm,
        LoginForm
    )),
    tags(
        (name = "Posts", description = "Post listing, detail, and creation"),
        (name = "Auth", description = "Registration, login, and logout"),
        (name = "Health", description = "Service health checks"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "sessionid",
                    "Session cookie set by login and registration",
                ))),
            );
            components.add_security_scheme(
                "session_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Raw session token as a bearer credential"))
                        .build(),
                ),
            );
        }
    }
}
