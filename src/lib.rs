/// Blog Service Library
///
/// A small blog backend: anyone can read posts, registered users can write
/// them. Registration logs the new account in immediately; writes are gated
/// by a database-backed session with a redirect to login when absent.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers for posts, auth, and health
/// - `models`: Database rows and response payloads
/// - `forms`: Form payloads, their validation, and form descriptors
/// - `validators`: Field validators and the password policy
/// - `db`: Database access layer and repositories
/// - `security`: Password hashing and session tokens
/// - `middleware`: Session authentication and request metrics
/// - `jobs`: Background maintenance tasks
/// - `routes`: Route configuration and path constants
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
