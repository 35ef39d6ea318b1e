use crate::config::AppConfig;
use crate::create_app;
use crate::documents::CommandPdfConverter;
use crate::state::AppState;
use crate::store::InMemoryDocumentStore;
use crate::translation::OllamaTranslator;
use axum::body::{Body, Bytes};
use axum::Router;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Bearer token sent by [`TestFixture::request_builder`]
pub const TEST_TOKEN: &str = "test-access-token";

/// Test fixture for setting up a complete test environment with mocked services.
///
/// The TestFixture starts mock servers for the authorization server and the
/// completion service, configures the application against them, and provides
/// helper methods for making requests.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///
///     // Make the default test token resolve to an active admin
///     fixture
///         .add_introspection_mock(TEST_TOKEN, json!({"active": true, "role": "admin"}), 1)
///         .await;
///
///     let response = fixture.get("/whoami").await;
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub config: AppConfig,
    /// Mock server for the authorization server
    pub auth_mock: MockServer,
    /// Mock server for the completion service
    pub ollama_mock: MockServer,
}

impl TestFixture {
    /// Creates a new test fixture with mock servers for the authorization server and Ollama
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Creates a new test fixture, letting the caller adjust the configuration first
    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        // Initialize test logger
        Self::setup_logger(LevelFilter::Debug);

        // Create mock servers
        let auth_mock = MockServer::start().await;
        let ollama_mock = MockServer::start().await;

        // Create config pointing at the mocks
        let mut config = AppConfig::for_test_with_mocks(&auth_mock, &ollama_mock);
        customize(&mut config);

        // Create app state
        let translator = OllamaTranslator::new(&config.translator)
            .expect("Failed to create translator client");
        let state = AppState::with_components(
            &config,
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(translator),
            Arc::new(CommandPdfConverter::from_config(&config.documents)),
        )
        .expect("Failed to create app state");
        let app = create_app(state);

        Self {
            app,
            config,
            auth_mock,
            ollama_mock,
        }
    }

    /// Initializes the test logger with customized settings.
    ///
    /// Called by [`TestFixture::new`] with `Debug`, later calls are ignored.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Creates a request builder carrying `Authorization: Bearer TEST_TOKEN`
    pub fn request_builder(&self, method: Method, uri: impl AsRef<str>) -> http::request::Builder {
        self.request_builder_as(method, uri, TEST_TOKEN)
    }

    /// Creates a request builder carrying the given bearer token
    pub fn request_builder_as(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: &str,
    ) -> http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri.as_ref())
            .header("Authorization", format!("Bearer {}", token))
    }

    /// Sends an authenticated GET request to the specified URI
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends an authenticated POST request without a body
    pub async fn post_empty(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::POST, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends an authenticated multipart POST request
    pub async fn post_multipart(&self, uri: impl AsRef<str>, form: MultipartForm) -> TestResponse {
        let (content_type, body) = form.finish();
        let request = self
            .request_builder(Method::POST, uri)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    ///
    /// Use this when a request needs headers the convenience methods do not set,
    /// or must go out without credentials.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse {
            status,
            headers,
            body,
            json,
        }
    }

    /// Makes the authorization server answer introspection of `token` with `response_body`.
    ///
    /// # Parameters
    ///
    /// - `token`: The bearer token the mock matches on
    /// - `response_body`: The introspection response to return
    /// - `expected_calls`: Number of expected calls to this mock, checked when the fixture drops
    pub async fn add_introspection_mock(
        &self,
        token: &str,
        response_body: Value,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/connect/introspect"))
            .and(matchers::body_string(format!("token={}", token)))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.auth_mock)
            .await;
    }

    /// Makes the completion service answer every prompt with `response`
    pub async fn add_ollama_mock(&self, response: &str, status_code: StatusCode) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(status_code.as_u16())
                    .set_body_json(serde_json::json!({ "response": response, "done": true })),
            )
            .mount(&self.ollama_mock)
            .await;
    }
}

/// Builder for `multipart/form-data` request bodies
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    const BOUNDARY: &'static str = "translation-server-test-boundary";

    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    /// Adds a plain text field
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                Self::BOUNDARY,
                name,
                value
            )
            .as_bytes(),
        );
        self
    }

    /// Adds a file field
    pub fn file(mut self, name: &str, filename: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                Self::BOUNDARY,
                name,
                filename
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Closes the form, returning the content type header value and the body
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", Self::BOUNDARY).as_bytes());
        (
            format!("multipart/form-data; boundary={}", Self::BOUNDARY),
            self.body,
        )
    }
}

/// Response from a test request that provides convenient access to status and body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Bytes,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// The `detail` message of an error response
    pub fn detail(&self) -> &str {
        self.json["detail"].as_str().unwrap_or_default()
    }

    /// A response header as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
