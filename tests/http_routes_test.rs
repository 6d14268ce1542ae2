use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use course_catalog::domain::ports::Storage;
use course_catalog::{create_router, AppState, CatalogError, Course, CourseStore, MemoryStorage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Router, AppState) {
    let state = AppState::new(CourseStore::in_memory());
    (create_router(state.clone()), state)
}

/// Storage whose writes start failing once `read_only` is set.
#[derive(Default)]
struct ReadOnlyDisk {
    inner: MemoryStorage,
    read_only: AtomicBool,
}

#[async_trait]
impl Storage for ReadOnlyDisk {
    async fn read_file(&self, path: &str) -> course_catalog::Result<Option<Vec<u8>>> {
        self.inner.read_file(path).await
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> course_catalog::Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(CatalogError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only file system",
            )));
        }
        self.inner.write_file(path, data).await
    }
}

async fn app_on_disk(disk: Arc<ReadOnlyDisk>) -> (Router, AppState) {
    let store = CourseStore::open(disk, "course_catalog.json")
        .await
        .expect("Failed to open catalog");
    let state = AppState::new(store);
    (create_router(state.clone()), state)
}

fn sample_course(code: &str) -> Course {
    Course {
        code: code.to_string(),
        name: "Software Tools".to_string(),
        instructor: "Dr. Rao".to_string(),
        semester: "Fall".to_string(),
        schedule: "Mon 10:00".to_string(),
        classroom: "LH-1".to_string(),
        prerequisites: String::new(),
        grading: "Relative".to_string(),
        description: "Build tooling".to_string(),
    }
}

/// Read response body as UTF-8 text.
async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

fn location(resp: &axum::response::Response) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("Missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn post_form(app: &Router, uri: &str, form: &str) -> axum::response::Response {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

#[tokio::test]
async fn test_index_and_health() {
    let (app, _) = test_app();

    let resp = get(&app, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("course catalog"));

    let resp = get(&app, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, r#"{"status":"ok"}"#);
}

#[tokio::test]
async fn test_add_course_redirects_and_lists() {
    let (app, state) = test_app();

    let resp = post_form(
        &app,
        "/add_course",
        "code=+CS203+&name=Software+Tools&instructor=Dr.+Rao&semester=Fall&schedule=&classroom=LH-1&prerequisites=&grading=&description=",
    )
    .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let target = location(&resp);
    assert!(target.starts_with("/catalog?notice=Course+added+successfully"));

    let stored = state.store.get("CS203").await.unwrap();
    assert_eq!(stored.instructor, "Dr. Rao");
    assert_eq!(stored.schedule, "");

    let resp = get(&app, &target).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains(r#"<div class="notice success">Course added successfully</div>"#));
    assert!(html.contains(r#"<a href="/course/CS203">CS203</a>"#));
}

#[tokio::test]
async fn test_add_course_missing_fields_rerenders_form() {
    let (app, state) = test_app();

    let resp = post_form(&app, "/add_course", "code=CS101&name=&instructor=++&semester=Spring").await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(resp).await;
    assert!(html.contains("The following fields are required and cannot be empty: Name, Instructor."));
    assert!(html.contains(r#"value="Spring""#));
    assert!(state.store.is_empty().await);
    assert_eq!(state.monitor.snapshot().missing_field_errors, 1);
}

#[tokio::test]
async fn test_add_duplicate_code_is_rejected() {
    let (app, state) = test_app();
    state.store.add(sample_course("CS203")).await.unwrap();

    let resp = post_form(&app, "/add_course", "code=CS203&name=Other&instructor=Lee").await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(resp).await;
    assert!(html.contains("Validation error: Code is already in use by another course"));
    assert_eq!(state.store.get("CS203").await.unwrap().name, "Software Tools");
    assert_eq!(state.monitor.snapshot().validation_errors, 1);
}

#[tokio::test]
async fn test_course_details_page() {
    let (app, state) = test_app();
    state.store.add(sample_course("CS203")).await.unwrap();

    let resp = get(&app, "/course/CS203").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("CS203 - Software Tools"));
    assert!(html.contains("<dd>LH-1</dd>"));
}

#[tokio::test]
async fn test_unknown_course_details_redirects_to_catalog() {
    let (app, _) = test_app();

    let resp = get(&app, "/course/NOPE").await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/catalog?notice=Course+with+code+NOPE+not+found.&level=danger"
    );
}

#[tokio::test]
async fn test_delete_course_then_delete_again() {
    let (app, state) = test_app();
    state.store.add(sample_course("CS101")).await.unwrap();
    state.store.add(sample_course("CS102")).await.unwrap();

    let resp = post_form(&app, "/delete_course/CS101", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/catalog?notice=Course+with+code+CS101+deleted+successfully.&level=success"
    );

    let resp = post_form(&app, "/delete_course/CS101", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).ends_with("level=danger"));

    let remaining: Vec<String> = state.store.list().await.into_iter().map(|c| c.code).collect();
    assert_eq!(remaining, vec!["CS102".to_string()]);
    assert_eq!(state.monitor.snapshot().deletion_errors, 1);
}

#[tokio::test]
async fn test_stats_counts_catalog_views() {
    let (app, _) = test_app();

    get(&app, "/catalog").await;
    get(&app, "/catalog").await;

    let resp = get(&app, "/stats").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stats: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(stats["catalog_page_views"], 2);
    assert_eq!(stats["added_courses"], 0);
}

#[tokio::test]
async fn test_storage_failure_on_add_rerenders_form_with_500() {
    let disk = Arc::new(ReadOnlyDisk::default());
    let (app, state) = app_on_disk(disk.clone()).await;
    disk.read_only.store(true, Ordering::SeqCst);

    let resp = post_form(&app, "/add_course", "code=CS203&name=Software+Tools&instructor=Lee").await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(resp).await;
    assert!(html.contains("Failed to save course"));
    assert!(html.contains(r#"value="CS203""#));
    assert!(state.store.is_empty().await);
    let stats = state.monitor.snapshot();
    assert_eq!(stats.storage_errors, 1);
    assert_eq!(stats.added_courses, 0);
}

#[tokio::test]
async fn test_storage_failure_on_delete_keeps_course() {
    let disk = Arc::new(ReadOnlyDisk::default());
    let (app, state) = app_on_disk(disk.clone()).await;
    state.store.add(sample_course("CS101")).await.unwrap();
    disk.read_only.store(true, Ordering::SeqCst);

    let resp = post_form(&app, "/delete_course/CS101", "").await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/catalog?notice=Failed+to+delete+course+with+code+CS101.&level=danger"
    );
    assert!(state.store.get("CS101").await.is_ok());
    let stats = state.monitor.snapshot();
    assert_eq!(stats.storage_errors, 1);
    assert_eq!(stats.deletion_errors, 0);
}

#[tokio::test]
async fn test_unknown_notice_level_still_renders_catalog() {
    let (app, _) = test_app();

    let resp = get(&app, "/catalog?notice=Hi&level=bogus").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains(r#"<div class="notice success">Hi</div>"#));
}
