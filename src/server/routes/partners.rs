use crate::db::models::PartnerRow;
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

/// Closed enumeration of partner types, validated on create and update.
const PARTNER_TYPES: &[&str] = &["generale", "patrocinio", "collaborazione"];

const PARTNER_TYPE_MESSAGE: &str =
    r#"Partner type must be "generale", "patrocinio", or "collaborazione""#;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/partners", get(list).post(create))
        .route("/partners/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    published: Option<bool>,
    #[serde(rename = "type")]
    partner_type: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<PartnerRow>>, ApiError> {
    let pool = state.db.pool().await?;

    let mut qb = QueryBuilder::new(
        "SELECT id, name, logo_url, partner_type, description, website_url, sort_order, is_published FROM partners",
    );
    let mut sep = " WHERE ";
    if let Some(published) = q.published {
        qb.push(sep).push("is_published = ").push_bind(published);
        sep = " AND ";
    }
    if let Some(partner_type) = q.partner_type {
        qb.push(sep).push("partner_type = ").push_bind(partner_type);
    }
    qb.push(" ORDER BY sort_order ASC NULLS LAST, created_at ASC");

    let rows = qb.build_query_as::<PartnerRow>().fetch_all(&pool).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePartner {
    name: Option<String>,
    logo_url: Option<String>,
    partner_type: Option<String>,
    description: Option<String>,
    website_url: Option<String>,
    sort_order: Option<i64>,
    #[serde(default)]
    is_published: bool,
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreatePartner>,
) -> Result<(StatusCode, Json<PartnerRow>), ApiError> {
    let name = super::required(body.name, "Name is required")?;
    let partner_type = match body.partner_type {
        Some(t) if PARTNER_TYPES.contains(&t.as_str()) => t,
        _ => return Err(ApiError::Validation(PARTNER_TYPE_MESSAGE.to_string())),
    };
    let logo_url = normalize_image_url(body.logo_url);

    let pool = state.db.pool().await?;
    let now = Utc::now();
    let row: PartnerRow = sqlx::query_as(
        r"
        INSERT INTO partners (id, name, logo_url, partner_type, description, website_url, sort_order, is_published, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        ",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&name)
    .bind(&logo_url)
    .bind(&partner_type)
    .bind(&body.description)
    .bind(&body.website_url)
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
struct UpdatePartner {
    #[serde(default)]
    name: Field<String>,
    #[serde(default)]
    logo_url: Field<String>,
    #[serde(default)]
    partner_type: Field<String>,
    #[serde(default)]
    description: Field<String>,
    #[serde(default)]
    website_url: Field<String>,
    #[serde(default)]
    sort_order: Field<i64>,
    #[serde(default)]
    is_published: Field<bool>,
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePartner>,
) -> Result<Json<PartnerRow>, ApiError> {
    // A supplied type must be valid; clearing it is never meaningful.
    let partner_type = match body.partner_type {
        Field::Value(t) if PARTNER_TYPES.contains(&t.as_str()) => Field::Value(t),
        Field::Missing => Field::Missing,
        _ => return Err(ApiError::Validation(PARTNER_TYPE_MESSAGE.to_string())),
    };
    let logo_url = super::normalized_url_field(body.logo_url);

    let mut update = SparseUpdate::new("partners");
    update
        .set("name", body.name)
        .set("logo_url", logo_url)
        .set("partner_type", partner_type)
        .set("description", body.description)
        .set("website_url", body.website_url)
        .set("sort_order", body.sort_order)
        .set("is_published", body.is_published);

    if update.is_empty() {
        return Err(ApiError::Validation(
            "No fields provided for update".to_string(),
        ));
    }

    let pool = state.db.pool().await?;
    let row: PartnerRow = update.apply(&pool, &id, "Partner").await?;
    Ok(Json(row))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pool = state.db.pool().await?;
    let res = sqlx::query("DELETE FROM partners WHERE id = ?")
        .bind(&id)
        .execute(&pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound("Partner"));
    }
    Ok(StatusCode::NO_CONTENT)
}
