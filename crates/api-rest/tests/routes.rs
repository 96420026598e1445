use api_rest::{render::Renderer, router, AppState};
use api_shared::ApiKeyAuth;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use contented_core::{CoreConfig, ProjectId, ResultPath};
use http_body_util::BodyExt;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const API_KEY: &str = "test-api-key";
const LOGIN_URL: &str = "/accounts/login/";

const PNG_BYTES: [u8; 24] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
];

fn create_collection(root: &Path) {
    let open = root.join("my_test_project");
    fs::create_dir_all(open.join("my_subfolder")).unwrap();
    fs::write(open.join("README.md"), "# my_test_project\n").unwrap();
    fs::write(open.join("abc.csv"), "abc,123,345").unwrap();
    fs::write(open.join("my_subfolder").join("def.tsv"), "d\te\tf\n").unwrap();
    fs::write(open.join("report.html"), "<h1>Report</h1>").unwrap();
    fs::write(open.join("figure.png"), PNG_BYTES).unwrap();
    fs::write(open.join("plot.svg"), "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();

    let restricted = root.join("my_other_project");
    fs::create_dir_all(&restricted).unwrap();
    fs::write(restricted.join("README.md"), "# my_other_project\n").unwrap();
}

fn app(root: &Path) -> Router {
    let restricted: BTreeSet<ProjectId> = [ProjectId::new("my_other_project").unwrap()]
        .into_iter()
        .collect();
    let cfg = CoreConfig::new(root.to_path_buf(), restricted, LOGIN_URL.into()).unwrap();
    let auth = ApiKeyAuth::new(Some(API_KEY.into()));
    router(AppState::new(Arc::new(cfg), Arc::new(auth)))
}

async fn get(app: Router, uri: &str, authenticated: bool) -> (StatusCode, Option<String>, Vec<u8>) {
    let mut request = Request::builder().uri(uri);
    if authenticated {
        request = request.header("x-api-key", API_KEY);
    }
    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let location_or_type = response
        .headers()
        .get(header::LOCATION)
        .or_else(|| response.headers().get(header::CONTENT_TYPE))
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, location_or_type, body)
}

fn text(body: &[u8]) -> &str {
    std::str::from_utf8(body).unwrap()
}

#[tokio::test]
async fn anonymous_home_lists_only_open_projects() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let (status, _, body) = get(app(temp.path()), "/", false).await;
    assert_eq!(status, StatusCode::OK);
    let html = text(&body);
    assert!(html.contains("<a href=\"/projects/my_test_project\">my_test_project</a>"));
    assert!(!html.contains("my_other_project"));
}

#[tokio::test]
async fn authenticated_home_lists_all_projects() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let (status, _, body) = get(app(temp.path()), "/", true).await;
    assert_eq!(status, StatusCode::OK);
    let html = text(&body);
    assert!(html.contains("<a href=\"/projects/my_test_project\">my_test_project</a>"));
    assert!(html.contains("<a href=\"/projects/my_other_project\">my_other_project</a>"));
}

#[tokio::test]
async fn wrong_api_key_is_anonymous() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let response = app(temp.path())
        .oneshot(
            Request::builder()
                .uri("/projects/my_other_project")
                .header(header::AUTHORIZATION, "Bearer not-the-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn project_page_links_every_result_file() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let (status, _, body) = get(app(temp.path()), "/projects/my_test_project", false).await;
    assert_eq!(status, StatusCode::OK);
    let html = text(&body);
    assert!(html.contains("Data Analysis Results: my_test_project"));
    for file in ["README.md", "abc.csv", "my_subfolder/def.tsv", "figure.png"] {
        let link = format!("<a href=\"/projects/my_test_project/{file}\">{file}</a>");
        assert!(html.contains(&link), "missing link for {file}");
    }
}

#[tokio::test]
async fn csv_file_is_served_as_plain_text() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let (status, content_type, body) =
        get(app(temp.path()), "/projects/my_test_project/abc.csv", false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain"));
    assert_eq!(text(&body), "abc,123,345");
}

#[tokio::test]
async fn nested_file_is_served() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let (status, content_type, body) = get(
        app(temp.path()),
        "/projects/my_test_project/my_subfolder/def.tsv",
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain"));
    assert_eq!(text(&body), "d\te\tf\n");
}

#[tokio::test]
async fn content_types_follow_extensions() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let cases = [
        ("README.md", "text/plain"),
        ("report.html", "text/html"),
        ("figure.png", "image/png"),
        ("plot.svg", "image/svg+xml"),
    ];
    for (file, expected) in cases {
        let uri = format!("/projects/my_test_project/{file}");
        let (status, content_type, _) = get(app(temp.path()), &uri, false).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(content_type.as_deref(), Some(expected), "{uri}");
    }
}

#[tokio::test]
async fn png_is_streamed_byte_for_byte() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let response = app(temp.path())
        .oneshot(
            Request::builder()
                .uri("/projects/my_test_project/figure.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_LENGTH).unwrap(),
        &PNG_BYTES.len().to_string()
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn restricted_project_redirects_anonymous_callers_to_login() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let (status, location, _) = get(app(temp.path()), "/projects/my_other_project", false).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some(LOGIN_URL));

    let (status, _, body) = get(app(temp.path()), "/projects/my_other_project", true).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text(&body).contains("README.md"));
}

#[tokio::test]
async fn restricted_file_redirects_anonymous_callers_to_login() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let (status, location, _) = get(
        app(temp.path()),
        "/projects/my_other_project/README.md",
        false,
    )
    .await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some(LOGIN_URL));

    let (status, _, body) =
        get(app(temp.path()), "/projects/my_other_project/README.md", true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&body), "# my_other_project\n");
}

#[tokio::test]
async fn unknown_project_and_file_are_not_found() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let (status, _, _) = get(app(temp.path()), "/projects/not-a-project", false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(app(temp.path()), "/projects/not-a-project/abc.csv", false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(app(temp.path()), "/projects/my_test_project/nope.csv", false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) =
        get(app(temp.path()), "/projects/my_test_project/my_subfolder", false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn path_through_a_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());
    fs::write(temp.path().join("stray.txt"), "not a project").unwrap();

    let (status, _, _) =
        get(app(temp.path()), "/projects/my_test_project/abc.csv/extra", false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(app(temp.path()), "/projects/stray.txt/x", false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(app(temp.path()), "/projects/stray.txt", false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listed_file_with_url_delimiters_is_reachable() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());
    fs::write(temp.path().join("my_test_project").join("run#1?.csv"), "run,1").unwrap();

    let (status, _, body) = get(app(temp.path()), "/projects/my_test_project", false).await;
    assert_eq!(status, StatusCode::OK);
    let html = text(&body);
    let href = "/projects/my_test_project/run%231%3F.csv";
    assert!(
        html.contains(&format!("<a href=\"{href}\">run#1?.csv</a>")),
        "{html}"
    );

    let (status, content_type, body) = get(app(temp.path()), href, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain"));
    assert_eq!(text(&body), "run,1");
}

#[tokio::test]
async fn encoded_traversal_is_rejected() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let (status, _, _) = get(
        app(temp.path()),
        "/projects/my_test_project/%2E%2E/my_other_project/README.md",
        false,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn json_listing_uses_unauthorized_for_restricted_projects() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let (status, _, body) = get(app(temp.path()), "/api/projects", false).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["projects"], serde_json::json!(["my_test_project"]));

    let (status, _, _) = get(app(temp.path()), "/api/projects/my_other_project", false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = get(app(temp.path()), "/api/projects/my_other_project", true).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["files"], serde_json::json!(["README.md"]));
}

#[tokio::test]
async fn health_and_openapi_document() {
    let temp = TempDir::new().unwrap();

    let (status, _, body) = get(app(temp.path()), "/health", false).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["ok"], true);

    let (status, _, body) = get(app(temp.path()), "/api-docs/openapi.json", false).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["paths"]["/api/projects/{project_id}"].is_object());
}

struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn home(&self, project_ids: &[ProjectId]) -> String {
        project_ids
            .iter()
            .map(ProjectId::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn project(&self, _project_id: &ProjectId, result_files: &[ResultPath]) -> String {
        result_files
            .iter()
            .map(ResultPath::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[tokio::test]
async fn renderer_is_pluggable() {
    let temp = TempDir::new().unwrap();
    create_collection(temp.path());

    let cfg = CoreConfig::new(temp.path().to_path_buf(), BTreeSet::new(), LOGIN_URL.into()).unwrap();
    let state = AppState::new(Arc::new(cfg), Arc::new(ApiKeyAuth::new(None)))
        .with_renderer(Arc::new(PlainRenderer));

    let (status, _, body) = get(router(state), "/", false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&body), "my_other_project\nmy_test_project");
}
