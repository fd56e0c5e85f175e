use crate::db::models::ModuleRow;
use crate::db::{Field, SparseUpdate};
use crate::error::ApiError;
use crate::server::router::AppState;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

const MODULE_COLUMNS: &str = "id, name, description, sort_order, cfu, ssd, period, \
     hours_lectures, hours_lab, hours_study, description_short, contents_main, \
     contents_detailed, learning_objectives, evaluation, bibliography, schedule_info, \
     created_at, updated_at";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/modules", get(list).post(create))
        .route("/modules/{id}", get(fetch).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<ModuleRow>>, ApiError> {
    let pool = state.db.pool().await?;
    let rows: Vec<ModuleRow> = sqlx::query_as(&format!(
        "SELECT {MODULE_COLUMNS} FROM modules ORDER BY sort_order ASC NULLS LAST, created_at ASC"
    ))
    .fetch_all(&pool)
    .await?;
    Ok(Json(rows))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ModuleRow>, ApiError> {
    let pool = state.db.pool().await?;
    let row: Option<ModuleRow> =
        sqlx::query_as(&format!("SELECT {MODULE_COLUMNS} FROM modules WHERE id = ?"))
            .bind(&id)
            .fetch_optional(&pool)
            .await?;
    row.map(Json).ok_or(ApiError::NotFound("Module"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateModule {
    name: Option<String>,
    description: Option<String>,
    sort_order: Option<i64>,
    cfu: Option<i64>,
    ssd: Option<String>,
    period: Option<String>,
    hours_lectures: Option<i64>,
    hours_lab: Option<i64>,
    hours_study: Option<i64>,
    description_short: Option<String>,
    contents_main: Option<String>,
    contents_detailed: Option<String>,
    learning_objectives: Option<String>,
    evaluation: Option<String>,
    bibliography: Option<String>,
    schedule_info: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateModule>,
) -> Result<(StatusCode, Json<ModuleRow>), ApiError> {
    let name = super::required(body.name, "Name is required")?;

    let pool = state.db.pool().await?;
    let now = Utc::now();
    let row: ModuleRow = sqlx::query_as(
        r"
        INSERT INTO modules (
            id, name, description, sort_order,
            cfu, ssd, period,
            hours_lectures, hours_lab, hours_study,
            description_short, contents_main, contents_detailed,
            learning_objectives, evaluation, bibliography, schedule_info,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        ",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&name)
    .bind(&body.description)
    .bind(body.sort_order)
    .bind(body.cfu)
    .bind(&body.ssd)
    .bind(&body.period)
    .bind(body.hours_lectures)
    .bind(body.hours_lab)
    .bind(body.hours_study)
    .bind(&body.description_short)
    .bind(&body.contents_main)
    .bind(&body.contents_detailed)
    .bind(&body.learning_objectives)
    .bind(&body.evaluation)
    .bind(&body.bibliography)
    .bind(&body.schedule_info)
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateModule {
    #[serde(default)]
    name: Field<String>,
    #[serde(default)]
    description: Field<String>,
    #[serde(default)]
    sort_order: Field<i64>,
    #[serde(default)]
    cfu: Field<i64>,
    #[serde(default)]
    ssd: Field<String>,
    #[serde(default)]
    period: Field<String>,
    #[serde(default)]
    hours_lectures: Field<i64>,
    #[serde(default)]
    hours_lab: Field<i64>,
    #[serde(default)]
    hours_study: Field<i64>,
    #[serde(default)]
    description_short: Field<String>,
    #[serde(default)]
    contents_main: Field<String>,
    #[serde(default)]
    contents_detailed: Field<String>,
    #[serde(default)]
    learning_objectives: Field<String>,
    #[serde(default)]
    evaluation: Field<String>,
    #[serde(default)]
    bibliography: Field<String>,
    #[serde(default)]
    schedule_info: Field<String>,
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateModule>,
) -> Result<Json<ModuleRow>, ApiError> {
    let mut update = SparseUpdate::new("modules");
    update
        .set("name", body.name)
        .set("description", body.description)
        .set("sort_order", body.sort_order)
        .set("cfu", body.cfu)
        .set("ssd", body.ssd)
        .set("period", body.period)
        .set("hours_lectures", body.hours_lectures)
        .set("hours_lab", body.hours_lab)
        .set("hours_study", body.hours_study)
        .set("description_short", body.description_short)
        .set("contents_main", body.contents_main)
        .set("contents_detailed", body.contents_detailed)
        .set("learning_objectives", body.learning_objectives)
        .set("evaluation", body.evaluation)
        .set("bibliography", body.bibliography)
        .set("schedule_info", body.schedule_info);

    if update.is_empty() {
        return Err(ApiError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    let pool = state.db.pool().await?;
    let row: ModuleRow = update.apply(&pool, &id, "Module").await?;
    Ok(Json(row))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pool = state.db.pool().await?;
    let res = sqlx::query("DELETE FROM modules WHERE id = ?")
        .bind(&id)
        .execute(&pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound("Module"));
    }
    Ok(StatusCode::NO_CONTENT)
}
