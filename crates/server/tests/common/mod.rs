//! Common test utilities for in-process server tests with mocks.
//!
//! This module provides a test fixture that builds the router with a mock
//! prober and executor injected, so uploads can be exercised end to end
//! without `ffprobe` or `ffmpeg`.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ladderline_core::{
    testing::{MockExecutor, MockProber},
    Config, SourceResolution, TranscodePipeline,
};
use ladderline_server::state::AppState;

/// Re-export fixtures for test convenience
pub use ladderline_core::testing::fixtures;

const BOUNDARY: &str = "ladderline-test-boundary";

/// Test fixture for upload tests with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_upload() {
///     let fixture = TestFixture::new().await;
///     let response = fixture.upload("lecture.mp4", b"...").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock prober - configure the reported source resolution
    pub prober: Arc<MockProber>,
    /// Mock executor - inspect specs, inject failures
    pub executor: Arc<MockExecutor>,
    /// Configuration the router was built with
    pub config: Config,
    /// Temporary directory holding uploads and renditions
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture whose prober reports 1920x1080.
    pub async fn new() -> Self {
        Self::with_source(fixtures::full_hd()).await
    }

    /// Create a test fixture whose prober reports `source`.
    pub async fn with_source(source: SourceResolution) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = Config::default();
        config.storage.uploads_dir = temp_dir.path().join("uploads");
        config.server.public_base_url = Some("http://media.test".to_string());

        let prober = Arc::new(MockProber::returning(source));
        let executor = Arc::new(MockExecutor::new());

        let pipeline = TranscodePipeline::new(
            prober.clone(),
            executor.clone(),
            config.ladder().expect("default ladder is valid"),
            config.layout_config(),
        )
        .with_settings(config.encode_settings())
        .with_base_url(config.artifact_base_url());

        let state = Arc::new(AppState::new(config.clone(), Arc::new(pipeline)));
        let router = ladderline_server::api::create_router(state);

        Self {
            router,
            prober,
            executor,
            config,
            temp_dir,
        }
    }

    /// Root of the per-job rendition directories.
    pub fn output_root(&self) -> PathBuf {
        self.config.output_root()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Upload `contents` as the `file` field with the given file name.
    pub async fn upload(&self, file_name: &str, contents: &[u8]) -> TestResponse {
        self.post_multipart("file", Some(file_name), contents).await
    }

    /// POST a multipart body with a single field.
    pub async fn post_multipart(
        &self,
        field_name: &str,
        file_name: Option<&str>,
        contents: &[u8],
    ) -> TestResponse {
        let mut disposition = format!("form-data; name=\"{}\"", field_name);
        if let Some(file_name) = file_name {
            disposition.push_str(&format!("; filename=\"{}\"", file_name));
        }

        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
