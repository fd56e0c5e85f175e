use crate::db::models::BlogPostRow;
use crate::db::{Field, SparseUpdate};
use crate::error::ApiError;
use crate::server::router::AppState;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::QueryBuilder;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/blog-posts", get(list).post(create))
        .route("/blog-posts/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    published: Option<bool>,
    limit: Option<i64>,
}

async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<BlogPostRow>>, ApiError> {
    let pool = state.db.pool().await?;

    let mut qb = QueryBuilder::new(
        "SELECT id, title, slug, excerpt, content, cover_image_url, published_at, is_published FROM blog_posts",
    );
    if let Some(published) = q.published {
        qb.push(" WHERE is_published = ").push_bind(published);
    }
    qb.push(" ORDER BY published_at DESC NULLS LAST, created_at DESC");
    if let Some(limit) = q.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }

    let rows = qb.build_query_as::<BlogPostRow>().fetch_all(&pool).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBlogPost {
    title: Option<String>,
    slug: Option<String>,
    excerpt: Option<String>,
    content: Option<String>,
    cover_image_url: Option<String>,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    is_published: bool,
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateBlogPost>,
) -> Result<(StatusCode, Json<BlogPostRow>), ApiError> {
    let title = super::required(body.title, "Title is required")?;

    let pool = state.db.pool().await?;
    let now = Utc::now();
    let row: BlogPostRow = sqlx::query_as(
        r"
        INSERT INTO blog_posts (id, title, slug, excerpt, content, cover_image_url, published_at, is_published, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        ",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&title)
    .bind(&body.slug)
    .bind(&body.excerpt)
    .bind(&body.content)
    .bind(&body.cover_image_url)
    .bind(body.published_at)
    .bind(body.is_published)
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await
    .map_err(|e| ApiError::unique_conflict(e, "Slug already exists"))?;

    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBlogPost {
    #[serde(default)]
    title: Field<String>,
    #[serde(default)]
    slug: Field<String>,
    #[serde(default)]
    excerpt: Field<String>,
    #[serde(default)]
    content: Field<String>,
    #[serde(default)]
    cover_image_url: Field<String>,
    #[serde(default)]
    published_at: Field<DateTime<Utc>>,
    #[serde(default)]
    is_published: Field<bool>,
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBlogPost>,
) -> Result<Json<BlogPostRow>, ApiError> {
    let mut update = SparseUpdate::new("blog_posts");
    update
        .set("title", body.title)
        .set("slug", body.slug)
        .set("excerpt", body.excerpt)
        .set("content", body.content)
        .set("cover_image_url", body.cover_image_url)
        .set("published_at", body.published_at)
        .set("is_published", body.is_published);

    if update.is_empty() {
        return Err(ApiError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    let pool = state.db.pool().await?;
    let row: BlogPostRow = update
        .apply(&pool, &id, "Blog post")
        .await
        .map_err(|e| match e {
            ApiError::Conflict(_) => ApiError::Conflict("Slug already exists"),
            other => other,
        })?;
    Ok(Json(row))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pool = state.db.pool().await?;
    let res = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
        .bind(&id)
        .execute(&pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound("Blog post"));
    }
    Ok(StatusCode::NO_CONTENT)
}
