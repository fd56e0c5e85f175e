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
async fn list_starts_with_seeded_members() {
    let app = test_app(Some(temp_db_url("faculty-seed")));

    let (status, body) = send(&app, "GET", "/api/faculty", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("expected an array");
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0]["name"], "Prof. Riccardo Valentini");
    assert!(rows.iter().all(|r| r["isPublished"] == json!(true)));
}

#[tokio::test]
async fn create_requires_a_name_and_writes_nothing_on_failure() {
    let app = test_app(Some(temp_db_url("faculty-required")));

    for payload in [json!({}), json!({ "name": "" }), json!({ "name": "   " })] {
        let (status, body) = send(&app, "POST", "/api/faculty", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Name is required");
    }

    let (_, body) = send(&app, "GET", "/api/faculty", None).await;
    assert_eq!(body.as_array().expect("expected an array").len(), 12);
}

#[tokio::test]
async fn create_normalizes_github_blob_photo_urls() {
    let app = test_app(Some(temp_db_url("faculty-photo")));

    let (status, body) = send(
        &app,
        "POST",
        "/api/faculty",
        Some(json!({
            "name": "Nuova Docente",
            "photoUrl": "https://github.com/acme/assets/blob/main/img/photo.jpg",
            "isPublished": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["photoUrl"],
        "https://raw.githubusercontent.com/acme/assets/main/img/photo.jpg"
    );
}

#[tokio::test]
async fn published_filter_and_null_sort_order_last() {
    let app = test_app(Some(temp_db_url("faculty-order")));

    let (status, trailing) = send(
        &app,
        "POST",
        "/api/faculty",
        Some(json!({ "name": "Senza Ordine", "isPublished": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trailing["sortOrder"], Value::Null);

    let (status, _) = send(
        &app,
        "POST",
        "/api/faculty",
        Some(json!({ "name": "Bozza", "sortOrder": 13, "isPublished": false })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/api/faculty", None).await;
    let rows = body.as_array().expect("expected an array");
    assert_eq!(rows.len(), 14);
    // The member without a sort order sinks to the end of the list.
    assert_eq!(rows[13]["name"], "Senza Ordine");
    assert_eq!(rows[12]["name"], "Bozza");

    let (_, body) = send(&app, "GET", "/api/faculty?published=true", None).await;
    let rows = body.as_array().expect("expected an array");
    assert_eq!(rows.len(), 13);
    assert!(rows.iter().all(|r| r["name"] != "Bozza"));

    let (_, body) = send(&app, "GET", "/api/faculty?published=false", None).await;
    let rows = body.as_array().expect("expected an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Bozza");
}

#[tokio::test]
async fn update_distinguishes_absent_null_and_value() {
    let app = test_app(Some(temp_db_url("faculty-patch")));

    let (status, created) = send(
        &app,
        "POST",
        "/api/faculty",
        Some(json!({ "name": "Prof. Patch", "role": "Docente", "bio": "Una bio" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("expected an id").to_string();

    // Explicit null clears the column.
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/faculty/{id}"),
        Some(json!({ "role": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], Value::Null);
    assert_eq!(updated["bio"], "Una bio");

    // An absent field is left untouched.
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/faculty/{id}"),
        Some(json!({ "bio": "Aggiornata" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["bio"], "Aggiornata");
    assert_eq!(updated["role"], Value::Null);
    assert_eq!(updated["name"], "Prof. Patch");
}

#[tokio::test]
async fn update_with_no_fields_is_rejected_before_any_query() {
    // No database behind the app: an empty patch must still come back 400,
    // not 503, because validation precedes any store access.
    let app = test_app(None);

    let (status, body) = send(&app, "PUT", "/api/faculty/some-id", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No fields provided for update");
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let app = test_app(Some(temp_db_url("faculty-missing")));

    let (status, body) = send(
        &app,
        "PUT",
        "/api/faculty/no-such-id",
        Some(json!({ "name": "Chiunque" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Faculty member not found");
}

#[tokio::test]
async fn delete_removes_and_then_404s() {
    let app = test_app(Some(temp_db_url("faculty-delete")));

    let (_, created) = send(
        &app,
        "POST",
        "/api/faculty",
        Some(json!({ "name": "Da Rimuovere" })),
    )
    .await;
    let id = created["id"].as_str().expect("expected an id").to_string();

    let (status, _) = send(&app, "DELETE", &format!("/api/faculty/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &format!("/api/faculty/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
