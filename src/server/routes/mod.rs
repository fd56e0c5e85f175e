//! Per-resource routers and handlers for the `/api` surface.

pub mod blog_posts;
pub mod faculty;
pub mod health;
pub mod lessons;
pub mod modules;
pub mod partners;

use crate::db::Field;
use crate::error::ApiError;
use crate::server::router::AppState;
use crate::urls::normalize_image_url;
use axum::Router;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(faculty::router())
        .merge(blog_posts::router())
        .merge(partners::router())
        .merge(modules::router())
        .merge(lessons::router())
}

/// Rejects absent or blank required string fields before any store access.
fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(message.to_string()))
}

/// Normalizes a patched image URL; a URL that normalizes to nothing clears
/// the column.
fn normalized_url_field(field: Field<String>) -> Field<String> {
    match field {
        Field::Value(u) => normalize_image_url(Some(u)).map_or(Field::Null, Field::Value),
        other => other,
    }
}
