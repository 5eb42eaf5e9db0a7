use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use langrec_dal::LanguageStore as _;
use langrec_server::{
    build_memory_state, build_state,
    config::{Parser as _, ServerConfig},
    main_router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt as _;
use tracing_test::traced_test;

fn memory_db_config(extra: &[&str]) -> ServerConfig {
    let mut args = vec!["langrec-server", "--database-url", "sqlite::memory:"];
    args.extend_from_slice(extra);
    ServerConfig::try_parse_from(args).unwrap()
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
#[traced_test]
async fn test_health() {
    let state = build_state(&memory_db_config(&[])).await.unwrap();
    let app = main_router(state);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let body = axum::body::to_bytes(response.into_body(), 100).await.unwrap();
    assert_eq!(b"OK", &body[..]);
}

#[tokio::test]
#[traced_test]
async fn test_seeded_search() {
    let state = build_state(&memory_db_config(&[])).await.unwrap();
    let app = main_router(state);

    let (status, page) = get_json(&app, "/api/languages?search=concurrency").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(1, page["totalItems"]);
    assert_eq!(10, page["items"][0]["id"]);
    assert_eq!("Go", page["items"][0]["name"]);
    assert_eq!(
        "Open-source programming language designed for concurrency and efficiency.",
        page["items"][0]["description"]
    );

    let (status, page) = get_json(&app, "/api/languages?page=2").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(20, page["totalItems"]);
    assert_eq!(2, page["totalPages"]);
    assert_eq!(11, page["items"][0]["id"]);
}

#[tokio::test]
#[traced_test]
async fn test_no_seed_and_page_size() {
    let config = memory_db_config(&["--no-seed", "--default-page-size", "5"]);
    let state = build_state(&config).await.unwrap();
    assert_eq!(0, state.store().count().await.unwrap());
    let app = main_router(state);

    let (status, page) = get_json(&app, "/api/languages").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(0, page["totalItems"]);
    assert_eq!(0, page["totalPages"]);
    assert_eq!(5, page["pageSize"]);
}

#[tokio::test]
#[traced_test]
async fn test_memory_state() {
    let state = build_memory_state(&memory_db_config(&["--in-memory"]))
        .await
        .unwrap();
    let app = main_router(state);

    let (status, rec) = get_json(&app, "/api/languages/20").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("COBOL", rec["name"]);
    let (status, _) = get_json(&app, "/api/languages/21").await;
    assert_eq!(StatusCode::NOT_FOUND, status);
}

#[tokio::test]
#[traced_test]
async fn test_file_database_seeded_once() {
    let data_dir = TempDir::with_prefix("langrec_").unwrap();
    let dir = data_dir.path().join("nested");
    let dir = dir.to_string_lossy().to_string();
    let config = ServerConfig::try_parse_from(["langrec-server", "--data-dir", &dir]).unwrap();

    let state = build_state(&config).await.unwrap();
    assert_eq!(20, state.store().count().await.unwrap());
    state.store().pool().close().await;
    assert!(data_dir.path().join("nested/langrec.db").is_file());

    let state = build_state(&config).await.unwrap();
    assert_eq!(20, state.store().count().await.unwrap());
}

#[cfg(feature = "openapi")]
#[tokio::test]
#[traced_test]
async fn test_openapi_docs() {
    let state = build_memory_state(&memory_db_config(&[])).await.unwrap();
    let app = main_router(state);

    let (status, docs) = get_json(&app, "/api-docs/openapi.json").await;
    assert_eq!(StatusCode::OK, status);
    let paths = docs["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/languages"));
    assert!(paths.contains_key("/api/languages/{id}"));
}

#[tokio::test]
#[traced_test]
async fn test_graceful_shutdown() {
    let config = memory_db_config(&["--port", "0"]);
    let state = build_memory_state(&config).await.unwrap();
    langrec_server::run::run_graceful_with_state(config, state, async {})
        .await
        .unwrap();
}
