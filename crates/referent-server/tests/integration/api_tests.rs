use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::integration::common::{
    TEST_API_KEY, completion, setup_test_app, setup_test_app_with_auth, setup_unconfigured_app,
};

#[tokio::test]
async fn health_reports_configured_providers() {
    let app = setup_test_app().await;

    let (status, json) = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["providers"]["openai"], true);
    assert_eq!(json["providers"]["perplexity"], true);
    assert_eq!(json["providers"]["openrouter"], false);
    assert_eq!(json["image"], true);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app().await;

    let (status, json) = app
        .send(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/telegram-post"].is_object());
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

#[tokio::test]
async fn parse_extracts_title_date_and_content() {
    let app = setup_test_app().await;
    let text = "a".repeat(120);

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<html><body><h1>Test</h1><time datetime="2024-01-01">Jan 1</time><article>  {text}  </article></body></html>"#
            ),
            "text/html",
        ))
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json(
            "/parse",
            json!({"url": format!("{}/article", app.upstream.uri())}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"date": "2024-01-01", "title": "Test", "content": text}));
}

#[tokio::test]
async fn parse_keeps_null_fields() {
    let app = setup_test_app().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html><body><p>hi</p></body></html>", "text/html"))
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json("/parse", json!({"url": format!("{}/empty", app.upstream.uri())}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"date": null, "title": null, "content": null}));
}

#[tokio::test]
async fn parse_without_url_returns_400() {
    let app = setup_test_app().await;

    let (status, json) = app.post_json("/parse", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "URL is required");
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let app = setup_test_app().await;

    let (status, json) = app
        .send(
            Request::post("/parse")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn wrong_field_type_returns_400() {
    let app = setup_test_app().await;

    let (status, json) = app.post_json("/parse", json!({"url": 5})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn missing_content_type_returns_415() {
    let app = setup_test_app().await;

    let (status, json) = app
        .send(
            Request::post("/translate")
                .body(Body::from(r#"{"content":"Hello"}"#))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn oversized_body_returns_413() {
    let app = setup_test_app().await;
    let content = "a".repeat(3 * 1024 * 1024);

    let (status, json) = app
        .post_json("/translate", json!({"content": content}))
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn parse_mirrors_upstream_status() {
    let app = setup_test_app().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json("/parse", json!({"url": format!("{}/gone", app.upstream.uri())}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Failed to load page: Not Found");
}

// ---------------------------------------------------------------------------
// Text generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn translate_without_key_returns_500() {
    let app = setup_unconfigured_app().await;

    let (status, json) = app
        .post_json("/translate", json!({"content": "Hello world"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Perplexity API key not configured");
}

#[tokio::test]
async fn translate_without_content_returns_400() {
    let app = setup_test_app().await;

    let (status, json) = app.post_json("/translate", json!({"content": ""})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Content to translate is required");
}

#[tokio::test]
async fn translate_uses_requested_provider() {
    let app = setup_test_app().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer openai-key"))
        .and(body_partial_json(json!({"temperature": 0.3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Привет, мир")))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json(
            "/translate",
            json!({"content": "Hello world", "provider": "openai"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["translation"], "Привет, мир");
}

#[tokio::test]
async fn unknown_provider_falls_back_to_default() {
    let app = setup_test_app().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer pplx-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Итог")))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json(
            "/summarize",
            json!({"title": "T", "content": "Body", "provider": "mystery"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"], "Итог");
}

#[tokio::test]
async fn summarize_passes_upstream_rate_limit_through() {
    let app = setup_test_app().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"error": {"message": "rate limited"}})),
        )
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json("/summarize", json!({"content": "Some article"}))
        .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json, json!({"error": "rate limited"}));
}

#[tokio::test]
async fn theses_returns_list() {
    let app = setup_test_app().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Title: Rust 2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("- one\n- two")))
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json(
            "/theses",
            json!({"title": "Rust 2024", "content": "Editions are opt-in."}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["theses"], "- one\n- two");
}

#[tokio::test]
async fn telegram_post_includes_date_in_prompt() {
    let app = setup_test_app().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Date: 2024-05-01"))
        .and(body_partial_json(json!({"temperature": 0.7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("📰 Post")))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json(
            "/telegram-post",
            json!({"title": "News", "date": "2024-05-01", "content": "Body"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["post"], "📰 Post");
}

#[tokio::test]
async fn image_prompt_is_trimmed() {
    let app = setup_test_app().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("  a lighthouse at dusk \n")),
        )
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json("/image-prompt", json!({"content": "Article body"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prompt"], "a lighthouse at dusk");
}

#[tokio::test]
async fn empty_completion_yields_placeholder() {
    let app = setup_test_app().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json("/summarize", json!({"content": "Body"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"], "Could not produce a summary of the article");
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_image_returns_data_uri() {
    let app = setup_test_app().await;

    Mock::given(method("POST"))
        .and(path("/models/org/diffusion"))
        .and(header("authorization", "Bearer hf-key"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"PNG".to_vec(), "image/png"))
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json("/generate-image", json!({"prompt": "a cat"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["image"], "data:image/png;base64,UE5H");
    assert_eq!(json["prompt"], "a cat");
}

#[tokio::test]
async fn generate_image_without_prompt_returns_400() {
    let app = setup_test_app().await;

    let (status, json) = app.post_json("/generate-image", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Prompt is required");
}

#[tokio::test]
async fn generate_image_loading_model_returns_503() {
    let app = setup_test_app().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "loading"})))
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json("/generate-image", json!({"prompt": "a cat"}))
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        json["error"],
        "Model is loading. Try again in a few seconds."
    );
}

#[tokio::test]
async fn generate_image_json_body_returns_500() {
    let app = setup_test_app().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "NSFW content detected"})),
        )
        .mount(&app.upstream)
        .await;

    let (status, json) = app
        .post_json("/generate-image", json!({"prompt": "a cat"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "NSFW content detected");
}

#[tokio::test]
async fn generate_image_without_key_returns_500() {
    let app = setup_unconfigured_app().await;

    let (status, json) = app
        .post_json("/generate-image", json!({"prompt": "a cat"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Hugging Face API key not configured");
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_bearer_returns_401_when_key_configured() {
    let app = setup_test_app_with_auth().await;

    let (status, json) = app
        .post_json("/translate", json!({"content": "Hello"}))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json["error"].as_str().unwrap().contains("Bearer"));
}

#[tokio::test]
async fn wrong_bearer_returns_401() {
    let app = setup_test_app_with_auth().await;

    let (status, _) = app
        .send(
            Request::post("/parse")
                .header("content-type", "application/json")
                .header("authorization", "Bearer wrong-key")
                .body(Body::from(r#"{"url":"https://example.com"}"#))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_bearer_reaches_handler() {
    let app = setup_test_app_with_auth().await;

    let (status, json) = app
        .send(
            Request::post("/parse")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {TEST_API_KEY}"))
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "URL is required");
}

#[tokio::test]
async fn health_stays_open_with_auth() {
    let app = setup_test_app_with_auth().await;

    let (status, _) = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
}
