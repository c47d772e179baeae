use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use stromtarif::config::Config;
use stromtarif::persistence::{Settings, SettingsStore};
use stromtarif::service::StromService;
use stromtarif::web::{AppState, build_router};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state_for(base: &str) -> AppState {
    state_with(base, Config::default())
}

fn state_with(base: &str, config: Config) -> AppState {
    let settings = SettingsStore::in_memory(Settings {
        api_url: base.to_string(),
        api_key: "s3cr3t-token".to_string(),
        ..Settings::default()
    });
    let service = StromService::with_settings(config, settings).unwrap();
    AppState {
        service: Arc::new(service),
    }
}

fn guarded_config() -> Config {
    let mut config = Config::default();
    config.web.admin_token = Some("letmein".to_string());
    config
}

fn settings_post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn mock_tariffs(server: &MockServer, rows: &str) {
    Mock::given(method("GET"))
        .and(path("/electricity/tarifliste"))
        .and(query_param("rows", rows))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"stromanbieter": "A", "tarifname": "T1", "strompreis": "10ct"},
            {"stromanbieter": "B", "tarifname": "T2", "strompreis": "12ct"}
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn health_reports_ok() {
    let router = build_router(state_for("http://127.0.0.1:9"));
    let response = router
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn tariff_shortcode_endpoint_renders_cards() {
    let server = MockServer::start().await;
    mock_tariffs(&server, "2").await;

    let router = build_router(state_for(&server.uri()));
    let response = router
        .oneshot(
            Request::builder()
                .uri("/shortcode/display_strom_tariffs?layout=cards&rows=2&stromanbieter=B")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = body_string(response).await;
    assert_eq!(html.matches("class=\"tarif-card\"").count(), 1);
    assert!(html.contains("<h3>T2</h3>"));
}

#[tokio::test]
async fn invalid_rows_render_error_box_with_ok_status() {
    let router = build_router(state_for("http://127.0.0.1:9"));
    let response = router
        .oneshot(
            Request::builder()
                .uri("/shortcode/display_strom_tariffs?rows=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert_eq!(html, "<div class=\"error-message\">Invalid number of rows</div>");
}

#[tokio::test]
async fn graph_endpoint_falls_back_to_singleday() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/electricity/spotprices/chart/latest"))
        .and(query_param("range", "singleday"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<svg width="800" height="400"></svg>"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let router = build_router(state_for(&server.uri()));
    let response = router
        .oneshot(
            Request::builder()
                .uri("/shortcode/stromgraph?range=week")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains(r#"<svg viewBox="0 0 800 400"></svg>"#));
    assert!(html.contains("stromgraph-container"));
}

#[tokio::test]
async fn render_expands_shortcodes_in_content() {
    let server = MockServer::start().await;
    mock_tariffs(&server, "10").await;

    let router = build_router(state_for(&server.uri()));
    let content = "<p>Intro</p>[display_strom_tariffs]<p>Literal [[stromgraph]]</p>";
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/render")
                .body(Body::from(content))
                .unwrap(),
        )
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.starts_with("<p>Intro</p><div class=\"stromtarife-table-container\">"));
    assert!(html.ends_with("<p>Literal [stromgraph]</p>"));
    assert!(!html.contains("[display_strom_tariffs]"));
}

#[tokio::test]
async fn admin_page_lists_settings() {
    let router = build_router(state_for("https://api.example.com"));
    let response = router
        .oneshot(
            Request::builder()
                .uri("/admin?updated=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("notice-success"));
    assert!(html.contains("value=\"https://api.example.com\""));
    assert!(!html.contains("s3cr3t-token"));
    assert!(html.contains("type=\"password\" name=\"api_key\""));
}

#[tokio::test]
async fn blank_api_key_field_keeps_stored_key() {
    let state = state_for("https://api.example.com");
    let service = state.service.clone();
    let response = build_router(state)
        .oneshot(settings_post(
            "/admin/settings",
            "api_key=&api_url=https%3A%2F%2Fapi.example.com&table_rows=4",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let saved = service.settings().snapshot();
    assert_eq!(saved.api_key, "s3cr3t-token");
    assert_eq!(saved.table_rows, 4);
}

#[tokio::test]
async fn admin_token_is_required_when_configured() {
    let state = state_with("https://api.example.com", guarded_config());
    let service = state.service.clone();
    let router = build_router(state);

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/admin").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .clone()
        .oneshot(settings_post(
            "/admin/settings",
            "api_url=https%3A%2F%2Fevil.example.com",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(service.settings().snapshot().api_url, "https://api.example.com");

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin")
                .header(header::AUTHORIZATION, "Bearer letmein")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/admin?token=letmein").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("action=\"/admin/settings?token=letmein\""));

    let response = router
        .oneshot(settings_post(
            "/admin/settings?token=letmein",
            "api_url=https%3A%2F%2Fother.example.com&table_rows=2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/admin?updated=1&token=letmein"
    );
    assert_eq!(service.settings().snapshot().api_url, "https://other.example.com");
}

#[tokio::test]
async fn cross_origin_settings_post_is_forbidden() {
    let state = state_for("https://api.example.com");
    let service = state.service.clone();
    let router = build_router(state);

    let mut request = settings_post("/admin/settings", "api_url=https%3A%2F%2Fevil.example.com");
    request
        .headers_mut()
        .insert(header::HOST, "127.0.0.1:8089".parse().unwrap());
    request
        .headers_mut()
        .insert(header::ORIGIN, "https://evil.example.com".parse().unwrap());
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(service.settings().snapshot().api_url, "https://api.example.com");

    let mut request = settings_post(
        "/admin/settings",
        "api_url=https%3A%2F%2Fother.example.com",
    );
    request
        .headers_mut()
        .insert(header::HOST, "127.0.0.1:8089".parse().unwrap());
    request
        .headers_mut()
        .insert(header::ORIGIN, "http://127.0.0.1:8089".parse().unwrap());
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn saving_settings_redirects_and_applies() {
    let state = state_for("https://api.example.com");
    let service = state.service.clone();
    let router = build_router(state);

    let response = router
        .oneshot(settings_post(
            "/admin/settings",
            "api_key=abc&api_url=https%3A%2F%2Fother.example.com%2Fapi&table_rows=-5&card_provider=EVN",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin?updated=1");

    let saved = service.settings().snapshot();
    assert_eq!(saved.api_key, "abc");
    assert_eq!(saved.api_url, "https://other.example.com/api");
    assert_eq!(saved.table_rows, 5);
    assert_eq!(saved.card_provider, "EVN");
}

#[tokio::test]
async fn invalid_settings_are_rejected() {
    let state = state_for("https://api.example.com");
    let service = state.service.clone();
    let router = build_router(state);

    let response = router
        .oneshot(settings_post("/admin/settings", "api_url=not+a+url&table_rows=3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_string(response).await;
    assert!(html.contains("class=\"error-message\""));
    assert_eq!(service.settings().snapshot().api_url, "https://api.example.com");
}
