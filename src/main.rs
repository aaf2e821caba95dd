use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use blog_service::jobs::SessionSweepJob;
use blog_service::middleware::RequestMetrics;
use blog_service::openapi::ApiDoc;
use blog_service::{db, handlers, metrics, routes, Config};

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

/// Blog Service
///
/// A small blog backend: anyone can read posts, registered users can write
/// them.
///
/// # Routes
///
/// - `/posts/` - Post list, newest first
/// - `/posts/new/` - Create a post (session required)
/// - `/posts/{id}/` - Post detail
/// - `/register/` - Create an account and log it in
/// - `/accounts/login/`, `/accounts/logout/` - Session management
///
/// # Deployment
///
/// Binds to BLOG_SERVICE_HOST:BLOG_SERVICE_PORT (default 0.0.0.0:8080).
/// Migrations run at startup; the only external dependency is PostgreSQL.
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let pool = match db::create_pool(&config.database.url, config.database.max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&pool).await {
        tracing::error!("Database migration failed: {}", e);
        eprintln!("ERROR: Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Database connected, migrations applied");

    SessionSweepJob::new(pool.clone()).spawn();

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let pool_http = pool.clone();

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        let cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(web::Data::new(openapi_doc))
            .app_data(web::Data::new(pool_http.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(RequestMetrics)
            .route("/openapi.json", web::get().to(openapi_json))
            .route("/metrics", web::get().to(metrics::serve_metrics))
            // Health check endpoints
            .route("/health", web::get().to(handlers::health::health_summary))
            .route("/health/ready", web::get().to(handlers::health::readiness))
            .route("/health/live", web::get().to(handlers::health::liveness))
            .configure(|cfg| routes::configure_routes(cfg, &pool_http))
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
