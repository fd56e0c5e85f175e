//! Row projections returned by the API.
//!
//! Columns are snake_case in the store; the external JSON naming is
//! camelCase, so every row type serializes with `rename_all = "camelCase"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FacultyRow {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub profile_link: Option<String>,
    pub sort_order: Option<i64>,
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostRow {
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRow {
    pub id: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub partner_type: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub sort_order: Option<i64>,
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: Option<i64>,
    pub cfu: Option<i64>,
    pub ssd: Option<String>,
    pub period: Option<String>,
    pub hours_lectures: Option<i64>,
    pub hours_lab: Option<i64>,
    pub hours_study: Option<i64>,
    pub description_short: Option<String>,
    pub contents_main: Option<String>,
    pub contents_detailed: Option<String>,
    pub learning_objectives: Option<String>,
    pub evaluation: Option<String>,
    pub bibliography: Option<String>,
    pub schedule_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lesson as stored; returned from create/update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LessonRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub location_physical: Option<String>,
    pub location_remote: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub module_id: Option<String>,
    pub teacher_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lesson joined with its module and teacher names; returned from list/get.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LessonDetailRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub location_physical: Option<String>,
    pub location_remote: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub module_id: Option<String>,
    pub module_name: Option<String>,
    pub teacher_id: Option<String>,
    pub teacher_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
