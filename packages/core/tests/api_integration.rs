//! Integration tests for all API endpoints.
//!
//! Each test boots the full Axum router (same assembly as `main.rs`) using
//! `tower::ServiceExt::oneshot`. The generation API and the mail provider
//! are both wiremock servers, so no live upstream is needed.

use std::collections::HashMap;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use remedi_backend::{
    api::{create_router, AppState},
    config::Config,
    generation::{is_emergency_trigger, EMERGENCY_MARKER},
};

// ---- Helpers ----------------------------------------------------------------

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

const FULL_ALERT: &str = r#"{
    "patient_email": "jane.doe@example.com",
    "hospital_email": "er@cityhospital.example",
    "contact_name": "John Doe",
    "contact_phone": "+1 555 0100",
    "home_address": "12 Elm Street, Springfield",
    "medical_conditions": "Type 1 diabetes"
}"#;

fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// Router wired to wiremock upstreams. `extra` overrides or adds env keys.
fn build_test_app(gemini: &MockServer, mail: &MockServer, extra: &[(&str, &str)]) -> Router {
    let mut env: HashMap<String, String> = HashMap::new();
    env.insert("GEMINI_API_KEY".into(), "test-gemini-key".into());
    env.insert("GEMINI_API_BASE".into(), gemini.uri());
    env.insert("EMAIL_TRANSPORT".into(), "api".into());
    env.insert("EMAIL_API_URL".into(), format!("{}/v3/smtp/email", mail.uri()));
    env.insert("EMAIL_API_KEY".into(), "test-mail-key".into());
    env.insert("EMAIL_SENDER".into(), "alerts@remedi.example".into());
    for (key, value) in extra {
        env.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_lookup(|key| env.get(key).cloned()).expect("test config");
    let state = AppState::from_config(&config).expect("test state");
    create_router(state)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---- GET / and /health ------------------------------------------------------

#[tokio::test]
async fn root_reports_system_online() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    let app = build_test_app(&gemini, &mail, &[]);

    let resp = app.oneshot(get("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "Remedi System Online");
    assert_eq!(json["model"], "models/gemini-2.0-flash");
    assert_eq!(json["email_transport"], "provider_api");
    assert_eq!(json["email_configured"], true);
}

#[tokio::test]
async fn health_returns_ok() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    let app = build_test_app(&gemini, &mail, &[]);

    let resp = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "ok");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    let app = build_test_app(&gemini, &mail, &[]);

    let req = Request::builder()
        .uri("/")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

// ---- POST /chat -------------------------------------------------------------

#[tokio::test]
async fn chat_returns_model_text_verbatim() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-gemini-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(
            "Try resting and drink water.",
        )))
        .expect(1)
        .mount(&gemini)
        .await;
    let app = build_test_app(&gemini, &mail, &[]);

    let resp = app
        .oneshot(post_json("/chat", r#"{"message":"I have a mild headache"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({ "response": "Try resting and drink water." })
    );
}

#[tokio::test]
async fn chat_emergency_marker_survives_round_trip() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    let reply = format!("{}: Call an ambulance now.", EMERGENCY_MARKER);
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(&reply)))
        .mount(&gemini)
        .await;
    let app = build_test_app(&gemini, &mail, &[]);

    let resp = app
        .oneshot(post_json("/chat", r#"{"message":"crushing chest pain"}"#))
        .await
        .unwrap();

    let json = body_json(resp).await;
    let text = json["response"].as_str().unwrap();
    assert!(text.as_bytes().starts_with(&[0xF0, 0x9F, 0x9A, 0xA8]));
    assert!(is_emergency_trigger(text));
}

#[tokio::test]
async fn chat_upstream_failure_returns_500_detail() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&gemini)
        .await;
    let app = build_test_app(&gemini, &mail, &[]);

    let resp = app
        .oneshot(post_json("/chat", r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .contains("Resource has been exhausted"));
}

#[tokio::test]
async fn chat_rejects_invalid_body_without_upstream_call() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("unused")))
        .expect(0)
        .mount(&gemini)
        .await;
    let app = build_test_app(&gemini, &mail, &[]);

    let resp = app.oneshot(post_json("/chat", "not json")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(resp).await["detail"].is_string());
}

// ---- POST /summarize --------------------------------------------------------

#[tokio::test]
async fn summarize_sends_history_and_word_cap() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    let note = "Cough for 3 days. No meds. Mild.";
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(note)))
        .expect(1)
        .mount(&gemini)
        .await;
    let app = build_test_app(&gemini, &mail, &[]);

    let resp = app
        .oneshot(post_json(
            "/summarize",
            r#"{"history":"Patient: I have had a cough for 3 days.\nRemedi: Any fever?"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let text = body_json(resp).await["response"].as_str().unwrap().to_string();
    assert_eq!(text, note);
    assert!(text.split_whitespace().count() <= 50);

    let requests = gemini.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("under 50 words"));
    assert!(prompt.contains("I have had a cough for 3 days."));
    assert!(prompt.ends_with("Doctor Note:"));
}

#[tokio::test]
async fn summarize_honours_configured_word_limit() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Short note.")))
        .mount(&gemini)
        .await;
    let app = build_test_app(&gemini, &mail, &[("SUMMARY_WORD_LIMIT", "30")]);

    app.oneshot(post_json("/summarize", r#"{"history":"Patient: sore throat"}"#))
        .await
        .unwrap();

    let requests = gemini.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("under 30 words"));
}

// ---- POST /emergency-email --------------------------------------------------

#[tokio::test]
async fn emergency_email_is_sent_through_provider() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .and(path("/v3/smtp/email"))
        .and(header("api-key", "test-mail-key"))
        .and(body_partial_json(json!({
            "to": [{ "email": "er@cityhospital.example" }],
            "subject": "URGENT: Medical Emergency Alert for jane.doe@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "messageId": "<abc@relay>" })))
        .expect(1)
        .mount(&mail)
        .await;
    let app = build_test_app(&gemini, &mail, &[]);

    let resp = app
        .oneshot(post_json("/emergency-email", FULL_ALERT))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "success");
    assert!(!json["message"].as_str().unwrap().is_empty());

    let requests = mail.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let text = sent["textContent"].as_str().unwrap();
    for field in [
        "jane.doe@example.com",
        "John Doe",
        "+1 555 0100",
        "12 Elm Street, Springfield",
        "Type 1 diabetes",
    ] {
        assert!(text.contains(field), "plain body missing {}", field);
    }
}

#[tokio::test]
async fn emergency_email_without_credentials_makes_no_network_call() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mail)
        .await;
    let app = build_test_app(&gemini, &mail, &[("EMAIL_API_KEY", "")]);

    let resp = app
        .oneshot(post_json("/emergency-email", FULL_ALERT))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert!(json["detail"].as_str().unwrap().contains("EMAIL_API_KEY"));
}

#[tokio::test]
async fn emergency_email_provider_rejection_returns_500() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .and(path("/v3/smtp/email"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&mail)
        .await;
    let app = build_test_app(&gemini, &mail, &[]);

    let resp = app
        .oneshot(post_json("/emergency-email", FULL_ALERT))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert!(json["detail"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn smtp_transport_without_credentials_reports_unconfigured() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    let app = build_test_app(&gemini, &mail, &[("EMAIL_TRANSPORT", "smtp")]);

    let resp = app.clone().oneshot(get("/")).await.unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["email_transport"], "smtp");
    assert_eq!(json["email_configured"], false);

    let resp = app
        .oneshot(post_json("/emergency-email", FULL_ALERT))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ---- GET /metrics -----------------------------------------------------------

#[tokio::test]
async fn metrics_count_generation_outcomes() {
    let (gemini, mail) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Rest up.")))
        .mount(&gemini)
        .await;
    let app = build_test_app(&gemini, &mail, &[]);

    app.clone()
        .oneshot(post_json("/chat", r#"{"message":"tired"}"#))
        .await
        .unwrap();

    let resp = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let text = body_text(resp).await;
    assert!(text.contains("generation_requests_total"));
    assert!(text.contains(r#"endpoint="chat""#));
    assert!(text.contains("http_requests_total"));
}
