use crate::db::models::FacultyRow;
use crate::db::{Field, SparseUpdate};
use crate::error::ApiError;
use crate::server::router::AppState;
use crate::urls::normalize_image_url;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::QueryBuilder;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/faculty", get(list).post(create))
        .route("/faculty/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    published: Option<bool>,
}

async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<FacultyRow>>, ApiError> {
    let pool = state.db.pool().await?;

    let mut qb = QueryBuilder::new(
        "SELECT id, name, role, bio, photo_url, profile_link, sort_order, is_published FROM faculty",
    );
    if let Some(published) = q.published {
        qb.push(" WHERE is_published = ").push_bind(published);
    }
    qb.push(" ORDER BY sort_order ASC NULLS LAST, created_at ASC");

    let rows = qb.build_query_as::<FacultyRow>().fetch_all(&pool).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFaculty {
    name: Option<String>,
    role: Option<String>,
    bio: Option<String>,
    photo_url: Option<String>,
    profile_link: Option<String>,
    sort_order: Option<i64>,
    #[serde(default)]
    is_published: bool,
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateFaculty>,
) -> Result<(StatusCode, Json<FacultyRow>), ApiError> {
    let name = super::required(body.name, "Name is required")?;
    let photo_url = normalize_image_url(body.photo_url);

    let pool = state.db.pool().await?;
    let now = Utc::now();
    let row: FacultyRow = sqlx::query_as(
        r"
        INSERT INTO faculty (id, name, role, bio, photo_url, profile_link, sort_order, is_published, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        ",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&name)
    .bind(&body.role)
    .bind(&body.bio)
    .bind(&photo_url)
    .bind(&body.profile_link)
    .bind(body.sort_order)
    .bind(body.is_published)
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateFaculty {
    #[serde(default)]
    name: Field<String>,
    #[serde(default)]
    role: Field<String>,
    #[serde(default)]
    bio: Field<String>,
    #[serde(default)]
    photo_url: Field<String>,
    #[serde(default)]
    profile_link: Field<String>,
    #[serde(default)]
    sort_order: Field<i64>,
    #[serde(default)]
    is_published: Field<bool>,
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateFaculty>,
) -> Result<Json<FacultyRow>, ApiError> {
    let photo_url = super::normalized_url_field(body.photo_url);

    let mut update = SparseUpdate::new("faculty");
    update
        .set("name", body.name)
        .set("role", body.role)
        .set("bio", body.bio)
        .set("photo_url", photo_url)
        .set("profile_link", body.profile_link)
        .set("sort_order", body.sort_order)
        .set("is_published", body.is_published);

    if update.is_empty() {
        return Err(ApiError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    let pool = state.db.pool().await?;
    let row: FacultyRow = update.apply(&pool, &id, "Faculty member").await?;
    Ok(Json(row))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pool = state.db.pool().await?;
    let res = sqlx::query("DELETE FROM faculty WHERE id = ?")
        .bind(&id)
        .execute(&pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound("Faculty member"));
    }
    Ok(StatusCode::NO_CONTENT)
}
