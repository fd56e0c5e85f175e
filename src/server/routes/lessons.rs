use crate::db::models::{LessonDetailRow, LessonRow};
use crate::db::{Field, SparseUpdate};
use crate::error::ApiError;
use crate::server::router::AppState;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::QueryBuilder;
use uuid::Uuid;

/// Closed enumeration of lesson statuses, validated on create and update.
const LESSON_STATUSES: &[&str] = &["draft", "confirmed", "completed", "cancelled"];

const LESSON_STATUS_MESSAGE: &str =
    r#"Status must be "draft", "confirmed", "completed", or "cancelled""#;

const DEFAULT_DURATION_MINUTES: i64 = 120;

const LESSON_DETAIL_SELECT: &str = "SELECT l.id, l.title, l.description, l.start_datetime, \
     l.end_datetime, l.duration_minutes, l.location_physical, l.location_remote, \
     l.status, l.notes, l.module_id, m.name AS module_name, \
     l.teacher_id, f.name AS teacher_name, l.created_at, l.updated_at \
     FROM lessons l \
     LEFT JOIN modules m ON l.module_id = m.id \
     LEFT JOIN faculty f ON l.teacher_id = f.id";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lessons", get(list).post(create))
        .route("/lessons/{id}", get(fetch).put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    module_id: Option<String>,
    teacher_id: Option<String>,
    status: Option<String>,
    month: Option<u32>,
    year: Option<i64>,
}

async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<LessonDetailRow>>, ApiError> {
    let pool = state.db.pool().await?;

    let mut qb = QueryBuilder::new(LESSON_DETAIL_SELECT);
    let mut sep = " WHERE ";
    if let Some(module_id) = q.module_id {
        qb.push(sep).push("l.module_id = ").push_bind(module_id);
        sep = " AND ";
    }
    if let Some(teacher_id) = q.teacher_id {
        qb.push(sep).push("l.teacher_id = ").push_bind(teacher_id);
        sep = " AND ";
    }
    if let Some(status) = q.status {
        qb.push(sep).push("l.status = ").push_bind(status);
        sep = " AND ";
    }
    match (q.month, q.year) {
        (Some(month), Some(year)) => {
            qb.push(sep)
                .push("CAST(strftime('%m', l.start_datetime) AS INTEGER) = ")
                .push_bind(i64::from(month));
            qb.push(" AND ")
                .push("CAST(strftime('%Y', l.start_datetime) AS INTEGER) = ")
                .push_bind(year);
        }
        (None, Some(year)) => {
            qb.push(sep)
                .push("CAST(strftime('%Y', l.start_datetime) AS INTEGER) = ")
                .push_bind(year);
        }
        // A month without a year is ignored, as is neither.
        _ => {}
    }
    qb.push(" ORDER BY l.start_datetime ASC");

    let rows = qb
        .build_query_as::<LessonDetailRow>()
        .fetch_all(&pool)
        .await?;
    Ok(Json(rows))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LessonDetailRow>, ApiError> {
    let pool = state.db.pool().await?;
    let row: Option<LessonDetailRow> = sqlx::query_as(&format!("{LESSON_DETAIL_SELECT} WHERE l.id = ?"))
        .bind(&id)
        .fetch_optional(&pool)
        .await?;
    row.map(Json).ok_or(ApiError::NotFound("Lesson"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateLesson {
    title: Option<String>,
    description: Option<String>,
    start_datetime: Option<DateTime<Utc>>,
    end_datetime: Option<DateTime<Utc>>,
    duration_minutes: Option<i64>,
    location_physical: Option<String>,
    location_remote: Option<String>,
    status: Option<String>,
    notes: Option<String>,
    module_id: Option<String>,
    teacher_id: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateLesson>,
) -> Result<(StatusCode, Json<LessonRow>), ApiError> {
    let title = super::required(body.title, "Title is required")?;
    let Some(start_datetime) = body.start_datetime else {
        return Err(ApiError::Validation(
            "Start datetime is required".to_string(),
        ));
    };
    let status = body.status.unwrap_or_else(|| "draft".to_string());
    if !LESSON_STATUSES.contains(&status.as_str()) {
        return Err(ApiError::Validation(LESSON_STATUS_MESSAGE.to_string()));
    }

    let pool = state.db.pool().await?;
    let now = Utc::now();
    let row: LessonRow = sqlx::query_as(
        r"
        INSERT INTO lessons (id, title, description, start_datetime, end_datetime, duration_minutes,
                             location_physical, location_remote, status, notes, module_id, teacher_id,
                             created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        ",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&title)
    .bind(&body.description)
    .bind(start_datetime)
    .bind(body.end_datetime)
    .bind(body.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES))
    .bind(&body.location_physical)
    .bind(&body.location_remote)
    .bind(&status)
    .bind(&body.notes)
    .bind(&body.module_id)
    .bind(&body.teacher_id)
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateLesson {
    #[serde(default)]
    title: Field<String>,
    #[serde(default)]
    description: Field<String>,
    #[serde(default)]
    start_datetime: Field<DateTime<Utc>>,
    #[serde(default)]
    end_datetime: Field<DateTime<Utc>>,
    #[serde(default)]
    duration_minutes: Field<i64>,
    #[serde(default)]
    location_physical: Field<String>,
    #[serde(default)]
    location_remote: Field<String>,
    #[serde(default)]
    status: Field<String>,
    #[serde(default)]
    notes: Field<String>,
    #[serde(default)]
    module_id: Field<String>,
    #[serde(default)]
    teacher_id: Field<String>,
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateLesson>,
) -> Result<Json<LessonRow>, ApiError> {
    // A supplied status must be valid; clearing it is never meaningful.
    let status = match body.status {
        Field::Value(s) if LESSON_STATUSES.contains(&s.as_str()) => Field::Value(s),
        Field::Missing => Field::Missing,
        _ => return Err(ApiError::Validation(LESSON_STATUS_MESSAGE.to_string())),
    };
    // The start is mandatory on every lesson, so a null start is a skip, not
    // a clear.
    let start_datetime = match body.start_datetime {
        Field::Null => Field::Missing,
        other => other,
    };

    let mut update = SparseUpdate::new("lessons");
    update
        .set("title", body.title)
        .set("description", body.description)
        .set("start_datetime", start_datetime)
        .set("end_datetime", body.end_datetime)
        .set("duration_minutes", body.duration_minutes)
        .set("location_physical", body.location_physical)
        .set("location_remote", body.location_remote)
        .set("status", status)
        .set("notes", body.notes)
        .set("module_id", body.module_id)
        .set("teacher_id", body.teacher_id);

    if update.is_empty() {
        return Err(ApiError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    let pool = state.db.pool().await?;
    let row: LessonRow = update.apply(&pool, &id, "Lesson").await?;
    Ok(Json(row))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pool = state.db.pool().await?;
    let res = sqlx::query("DELETE FROM lessons WHERE id = ?")
        .bind(&id)
        .execute(&pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound("Lesson"));
    }
    Ok(StatusCode::NO_CONTENT)
}
