use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

fn temp_db_url(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "campus-cms-{tag}-{}-{nanos}.sqlite",
        std::process::id()
    ));
    format!("sqlite:{}", path.display())
}

fn test_app(database_url: Option<String>) -> Router {
    let cfg = campus_cms::config::Config {
        database_url,
        ..campus_cms::config::Config::default()
    };
    let state = campus_cms::server::router::AppState::new(&cfg);
    campus_cms::server::router::app_router(state, &cfg.static_root)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .expect("failed to build request"),
        None => builder
            .body(Body::empty())
            .expect("failed to build request"),
    };
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body was not JSON")
    };
    (status, value)
}

#[tokio::test]
async fn module_create_then_fetch_round_trips() {
    let app = test_app(Some(temp_db_url("modules-roundtrip")));

    let (status, created) = send(
        &app,
        "POST",
        "/api/modules",
        Some(json!({
            "name": "Carbon Farming",
            "description": "Pratiche agricole per il sequestro di carbonio",
            "sortOrder": 1,
            "cfu": 6,
            "ssd": "AGR/02",
            "period": "Primo semestre",
            "hoursLectures": 24,
            "hoursLab": 12,
            "hoursStudy": 114,
            "descriptionShort": "Sequestro di carbonio in agricoltura"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("expected an id").to_string();

    let (status, fetched) = send(&app, "GET", &format!("/api/modules/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, "GET", "/api/modules/no-such-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Module not found");
}

#[tokio::test]
async fn module_create_requires_a_name() {
    let app = test_app(Some(temp_db_url("modules-required")));

    let (status, body) = send(&app, "POST", "/api/modules", Some(json!({ "cfu": 6 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Name is required");

    let (_, body) = send(&app, "GET", "/api/modules", None).await;
    assert_eq!(body.as_array().expect("expected an array").len(), 0);
}

#[tokio::test]
async fn module_list_orders_null_sort_last() {
    let app = test_app(Some(temp_db_url("modules-order")));

    for (name, sort_order) in [
        ("Senza Ordine", Value::Null),
        ("Secondo", json!(2)),
        ("Primo", json!(1)),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/modules",
            Some(json!({ "name": name, "sortOrder": sort_order })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/api/modules", None).await;
    let names: Vec<&str> = body
        .as_array()
        .expect("expected an array")
        .iter()
        .map(|r| r["name"].as_str().expect("expected a name"))
        .collect();
    assert_eq!(names, ["Primo", "Secondo", "Senza Ordine"]);
}

#[tokio::test]
async fn module_sparse_update_touches_only_named_columns() {
    let app = test_app(Some(temp_db_url("modules-patch")));

    let (_, created) = send(
        &app,
        "POST",
        "/api/modules",
        Some(json!({ "name": "Originale", "cfu": 6, "period": "Primo semestre" })),
    )
    .await;
    let id = created["id"].as_str().expect("expected an id").to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/modules/{id}"),
        Some(json!({ "cfu": 9, "period": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["cfu"], json!(9));
    assert_eq!(updated["period"], Value::Null);
    assert_eq!(updated["name"], "Originale");
    assert_ne!(updated["updatedAt"], created["updatedAt"]);

    let (status, _) = send(&app, "PUT", &format!("/api/modules/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lesson_create_requires_title_and_start() {
    let app = test_app(Some(temp_db_url("lessons-required")));

    let (status, body) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(json!({ "startDatetime": "2026-03-10T09:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Title is required");

    let (status, body) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(json!({ "title": "Introduzione" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Start datetime is required");

    let (_, body) = send(&app, "GET", "/api/lessons", None).await;
    assert_eq!(body.as_array().expect("expected an array").len(), 0);
}

#[tokio::test]
async fn lesson_defaults_duration_and_status() {
    let app = test_app(Some(temp_db_url("lessons-defaults")));

    let (status, created) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(json!({ "title": "Introduzione", "startDatetime": "2026-03-10T09:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["durationMinutes"], json!(120));
    assert_eq!(created["status"], "draft");
}

#[tokio::test]
async fn lesson_rejects_unknown_status() {
    let app = test_app(Some(temp_db_url("lessons-status")));

    let (status, body) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(json!({
            "title": "Introduzione",
            "startDatetime": "2026-03-10T09:00:00Z",
            "status": "planned"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        r#"Status must be "draft", "confirmed", "completed", or "cancelled""#
    );

    let (_, created) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(json!({
            "title": "Valida",
            "startDatetime": "2026-03-10T09:00:00Z",
            "status": "confirmed"
        })),
    )
    .await;
    let id = created["id"].as_str().expect("expected an id").to_string();

    // Status can change to another member of the set, never to null.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/lessons/{id}"),
        Some(json!({ "status": null })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/lessons/{id}"),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");
}

#[tokio::test]
async fn lesson_detail_joins_module_and_teacher_names() {
    let app = test_app(Some(temp_db_url("lessons-detail")));

    let (_, module) = send(
        &app,
        "POST",
        "/api/modules",
        Some(json!({ "name": "Carbon Farming" })),
    )
    .await;
    let module_id = module["id"].as_str().expect("expected an id").to_string();

    let (_, teacher) = send(
        &app,
        "POST",
        "/api/faculty",
        Some(json!({ "name": "Prof. Relatore" })),
    )
    .await;
    let teacher_id = teacher["id"].as_str().expect("expected an id").to_string();

    let (status, created) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(json!({
            "title": "Lezione 1",
            "startDatetime": "2026-03-10T09:00:00Z",
            "moduleId": module_id,
            "teacherId": teacher_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("expected an id").to_string();

    let (status, fetched) = send(&app, "GET", &format!("/api/lessons/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["moduleName"], "Carbon Farming");
    assert_eq!(fetched["teacherName"], "Prof. Relatore");
}

#[tokio::test]
async fn deleting_a_module_detaches_its_lessons() {
    let app = test_app(Some(temp_db_url("lessons-detach")));

    let (_, module) = send(
        &app,
        "POST",
        "/api/modules",
        Some(json!({ "name": "Effimero" })),
    )
    .await;
    let module_id = module["id"].as_str().expect("expected an id").to_string();

    let (_, lesson) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(json!({
            "title": "Orfana",
            "startDatetime": "2026-03-10T09:00:00Z",
            "moduleId": module_id
        })),
    )
    .await;
    let lesson_id = lesson["id"].as_str().expect("expected an id").to_string();
    assert_eq!(lesson["moduleId"], json!(module_id.clone()));

    let (status, _) = send(&app, "DELETE", &format!("/api/modules/{module_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The lesson survives with its module reference cleared.
    let (status, fetched) = send(&app, "GET", &format!("/api/lessons/{lesson_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["moduleId"], Value::Null);
    assert_eq!(fetched["moduleName"], Value::Null);
    assert_eq!(fetched["title"], "Orfana");
}

#[tokio::test]
async fn lesson_list_filters_by_month_and_year() {
    let app = test_app(Some(temp_db_url("lessons-calendar")));

    for (title, start) in [
        ("Marzo 2026", "2026-03-10T09:00:00Z"),
        ("Aprile 2026", "2026-04-14T09:00:00Z"),
        ("Marzo 2025", "2025-03-11T09:00:00Z"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/lessons",
            Some(json!({ "title": title, "startDatetime": start })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/api/lessons?month=3&year=2026", None).await;
    let rows = body.as_array().expect("expected an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Marzo 2026");

    let (_, body) = send(&app, "GET", "/api/lessons?year=2026", None).await;
    let titles: Vec<&str> = body
        .as_array()
        .expect("expected an array")
        .iter()
        .map(|r| r["title"].as_str().expect("expected a title"))
        .collect();
    // Chronological within the year.
    assert_eq!(titles, ["Marzo 2026", "Aprile 2026"]);

    // A month without a year is not a filter.
    let (_, body) = send(&app, "GET", "/api/lessons?month=3", None).await;
    assert_eq!(body.as_array().expect("expected an array").len(), 3);
}

#[tokio::test]
async fn lesson_update_cannot_clear_the_start() {
    let app = test_app(Some(temp_db_url("lessons-start")));

    let (_, created) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(json!({ "title": "Fissa", "startDatetime": "2026-03-10T09:00:00Z" })),
    )
    .await;
    let id = created["id"].as_str().expect("expected an id").to_string();

    // A null start is ignored rather than applied.
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/lessons/{id}"),
        Some(json!({ "startDatetime": null, "notes": "aula 4" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["startDatetime"], created["startDatetime"]);
    assert_eq!(updated["notes"], "aula 4");

    // A patch carrying only the ignored field has nothing to apply.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/lessons/{id}"),
        Some(json!({ "startDatetime": null })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
