use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use facelens_backend::config::{AdminSiteConfig, AppConfig};
use facelens_backend::infrastructure::database;
use facelens_backend::models::NewImage;
use facelens_backend::{AppState, create_app};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

async fn setup_state(config: AppConfig) -> AppState {
    let db = database::setup_database("sqlite::memory:").await.unwrap();
    AppState::new(db, config)
}

async fn seed(state: &AppState, name: &str, content_type: &str, data: &[u8]) -> i32 {
    state
        .images
        .create(NewImage {
            name: Some(name.to_string()),
            data: Some(data.to_vec()),
            content_type: Some(content_type.to_string()),
        })
        .await
        .unwrap()
        .id
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

#[tokio::test]
async fn test_index_shows_branding_and_records() {
    let state = setup_state(AppConfig::development()).await;
    seed(&state, "portrait.jpg", "image/jpeg", &[1, 2, 3]).await;
    seed(&state, "face_capture.jpg", "image/jpeg", &[0; 2048]).await;
    let app = create_app(state);

    let (status, headers, body) = get(&app, "/admin").await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );

    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<title>FaceLens Portal</title>"));
    assert!(html.contains("FaceLens Admin"));
    assert!(html.contains("Welcome to FaceLens Dashboard"));
    assert!(html.contains("portrait.jpg"));
    assert!(html.contains("face_capture.jpg"));
    assert!(html.contains("2.0 KiB"));
    assert!(html.contains("2 uploaded images"));

    // Newest first
    let newer = html.find("face_capture.jpg").unwrap();
    let older = html.find("portrait.jpg").unwrap();
    assert!(newer < older);
}

#[tokio::test]
async fn test_index_escapes_names() {
    let state = setup_state(AppConfig::development()).await;
    seed(&state, "<script>alert(1)</script>.jpg", "image/jpeg", b"x").await;
    let app = create_app(state);

    let (status, _, body) = get(&app, "/admin").await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(body).unwrap();
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;.jpg"));
}

#[tokio::test]
async fn test_index_pagination() {
    let config = AppConfig {
        admin_page_size: 2,
        ..AppConfig::development()
    };
    let state = setup_state(config).await;
    for name in ["one.jpg", "two.jpg", "three.jpg"] {
        seed(&state, name, "image/jpeg", b"x").await;
    }
    let app = create_app(state);

    let (_, _, body) = get(&app, "/admin").await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("three.jpg"));
    assert!(html.contains("two.jpg"));
    assert!(!html.contains("one.jpg"));
    assert!(html.contains("page 1 of 2"));

    let (_, _, body) = get(&app, "/admin?p=2").await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("one.jpg"));
    assert!(!html.contains("three.jpg"));
    assert!(html.contains("page 2 of 2"));

    // Out of range pages clamp to the last page
    let (status, _, body) = get(&app, "/admin?p=99").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("one.jpg"));
}

#[tokio::test]
async fn test_detail_and_data() {
    let state = setup_state(AppConfig::development()).await;
    let payload = vec![0xff, 0xd8, 0xff, 0x00, 0x42, 0xff, 0xd9];
    let id = seed(&state, "portrait.jpg", "image/jpeg", &payload).await;
    let app = create_app(state);

    let (status, _, body) = get(&app, &format!("/admin/images/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("portrait.jpg"));
    assert!(html.contains("image/jpeg"));
    assert!(html.contains("7 bytes"));
    assert!(html.contains(&format!("src=\"/admin/images/{}/data\"", id)));

    let (status, headers, body) = get(&app, &format!("/admin/images/{}/data", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "image/jpeg");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(body, payload);
}

#[tokio::test]
async fn test_data_with_unusable_content_type() {
    let state = setup_state(AppConfig::development()).await;
    let id = seed(&state, "odd.bin", "image/jpeg\r\nx-injected: 1", b"abc").await;
    let app = create_app(state);

    let (status, headers, body) = get(&app, &format!("/admin/images/{}/data", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/octet-stream");
    assert!(headers.get("x-injected").is_none());
    assert_eq!(body, b"abc");
}

#[tokio::test]
async fn test_unknown_record_is_not_found() {
    let state = setup_state(AppConfig::development()).await;
    let app = create_app(state);

    for uri in ["/admin/images/404", "/admin/images/404/data"] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri {}", uri);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Uploaded image 404 not found");
    }
}

#[tokio::test]
async fn test_admin_is_read_only() {
    let state = setup_state(AppConfig::development()).await;
    let id = seed(&state, "portrait.jpg", "image/jpeg", b"abc").await;
    let app = create_app(state.clone());

    for method in ["POST", "PUT", "DELETE"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(format!("/admin/images/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    let record = state.images.find(id).await.unwrap().unwrap();
    assert_eq!(record.data, b"abc");
}

#[tokio::test]
async fn test_custom_branding_and_path() {
    let config = AppConfig {
        admin_path: "/backoffice".to_string(),
        admin_site: AdminSiteConfig {
            site_header: "Ops".to_string(),
            site_title: "Ops Portal".to_string(),
            index_title: "Hello Ops".to_string(),
        },
        ..AppConfig::development()
    };
    let state = setup_state(config).await;
    let id = seed(&state, "portrait.jpg", "image/jpeg", b"abc").await;
    let app = create_app(state);

    let (status, _, body) = get(&app, "/backoffice").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<title>Ops Portal</title>"));
    assert!(html.contains("Hello Ops"));
    assert!(html.contains(&format!("href=\"/backoffice/images/{}\"", id)));

    let (status, _, _) = get(&app, "/admin").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
