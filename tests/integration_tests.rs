use apipedia::prelude::*;
use axum::extract::{Json, Multipart};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

async fn echo_multipart(mut multipart: Multipart) -> Json<Value> {
    let mut fields = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap();
        let value = match file_name {
            Some(file_name) => json!({ "file_name": file_name, "len": data.len() }),
            None => json!(String::from_utf8_lossy(&data)),
        };
        fields.insert(name, value);
    }
    Json(json!({ "status": true, "fields": fields }))
}

async fn echo_json(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "status": true, "received": body }))
}

async fn chat(Json(body): Json<Value>) -> impl IntoResponse {
    if body["agent_id"] == "agent-1" {
        (StatusCode::OK, Json(json!({ "data": "Hello" })))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": false, "message": "agent not found" })),
        )
    }
}

async fn unauthorized() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "status": false, "message": "invalid authkey" })),
    )
}

async fn unavailable() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "<html>maintenance</html>")
}

async fn plain_status() -> &'static str {
    "delivered"
}

/// Serve a fake API on a random loopback port and return its base URL.
async fn spawn_api() -> String {
    let app = Router::new()
        .route("/api/create-message", post(echo_multipart))
        .route("/api/telegram/send_buttons", post(echo_multipart))
        .route("/api/bulk-messagev2", post(echo_json))
        .route("/api/sms/send-reguler", post(echo_json))
        .route("/api/chat-ai/send-message", post(chat))
        .route("/api/bulk-messagev1", post(unauthorized))
        .route("/api/profile/raw", get(unavailable))
        .route("/api/status/last", get(plain_status));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn client(base_url: &str) -> Apipedia<ReqwestTransport> {
    Apipedia::new("app-key", "auth-key").with_base_url(base_url)
}

#[tokio::test]
async fn whatsapp_sends_multipart_fields() {
    let api = client(&spawn_api().await);
    let res = api.whatsapp("628111", "hello", None).await.unwrap();

    assert_eq!(res.status, 200);
    assert_eq!(res.body["fields"]["appkey"], "app-key");
    assert_eq!(res.body["fields"]["authkey"], "auth-key");
    assert_eq!(res.body["fields"]["to"], "628111");
    assert_eq!(res.body["fields"]["message"], "hello");
    assert!(res.body["fields"].get("file").is_none());
}

#[tokio::test]
async fn whatsapp_uploads_local_file() {
    let api = client(&spawn_api().await);
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
    let res = api
        .whatsapp("628111", "manifest", Some(Media::infer(path)))
        .await
        .unwrap();

    assert_eq!(res.body["fields"]["file"]["file_name"], "Cargo.toml");
    assert!(res.body["fields"]["file"]["len"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn whatsapp_passes_url_media_as_text() {
    let api = client(&spawn_api().await);
    let res = api
        .whatsapp(
            "628111",
            "pic",
            Some(Media::infer("https://example.com/a.jpg")),
        )
        .await
        .unwrap();
    assert_eq!(res.body["fields"]["file"], "https://example.com/a.jpg");
}

#[tokio::test]
async fn whatsapp_uploads_in_memory_bytes() {
    let api = client(&spawn_api().await);
    let media = Media::bytes(b"hello world".to_vec(), Some("note.txt".into()));
    let res = api.whatsapp("628111", "note", Some(media)).await.unwrap();
    assert_eq!(res.body["fields"]["file"]["file_name"], "note.txt");
    assert_eq!(res.body["fields"]["file"]["len"], 11);
}

#[tokio::test]
async fn missing_file_fails_before_sending() {
    let api = client("http://127.0.0.1:1/api");
    let err = api
        .whatsapp("628111", "x", Some(Media::infer("/nope/missing.png")))
        .await
        .unwrap_err();
    assert!(matches!(err, ApipediaError::Validation(_)));
    assert_eq!(err.to_string(), "File does not exist: /nope/missing.png");
}

#[tokio::test]
async fn telegram_buttons_reach_the_server_flattened() {
    let api = client(&spawn_api().await);
    let rows = vec![vec![
        Button::new("Yes").callback("yes"),
        Button::new("Site").url("https://example.com"),
    ]];
    let res = api
        .telegram_send_buttons("1001", "Continue?", &rows)
        .await
        .unwrap();
    let fields = &res.body["fields"];
    assert_eq!(fields["buttons[0][0][text]"], "Yes");
    assert_eq!(fields["buttons[0][0][callback_data]"], "yes");
    assert!(fields.get("buttons[0][0][url]").is_none());
    assert_eq!(fields["buttons[0][1][url]"], "https://example.com");
}

#[tokio::test]
async fn bulk_v2_joins_both_lists() {
    let api = client(&spawn_api().await);
    let res = api
        .bulk_v2(vec!["111", "222"], vec!["hi", "hello"])
        .await
        .unwrap();
    assert_eq!(res.body["received"]["to"], "111|222");
    assert_eq!(res.body["received"]["message"], "hi|hello");
    assert_eq!(res.body["received"]["appkey"], "app-key");
}

#[tokio::test]
async fn remote_error_uses_server_message() {
    let api = client(&spawn_api().await);
    let err = api.bulk_v1(["111", "222"], "hi").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "API Error: 401 - invalid authkey");
}

#[tokio::test]
async fn remote_error_falls_back_to_status_text() {
    let api = client(&spawn_api().await);
    let err = api.get_profile().await.unwrap_err();
    assert_eq!(err.to_string(), "API Error: 503 - Service Unavailable");
}

#[tokio::test]
async fn plain_text_body_is_kept_as_string() {
    let api = client(&spawn_api().await);
    let res = api.get_last_status("msg-1").await.unwrap();
    assert_eq!(res.body, json!("delivered"));
    assert_eq!(res.text(), "delivered");
}

#[tokio::test]
async fn closed_port_is_a_network_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{}/api", addr));
    let err = api.sms_regular("0811", "x").await.unwrap_err();
    assert!(matches!(err, ApipediaError::Network { .. }));
    assert_eq!(err.status(), None);
    assert_eq!(err.to_string(), "Network Error: No response received from API");
}

#[tokio::test]
async fn ai_reply_relayed_to_whatsapp() {
    let api = client(&spawn_api().await);
    let reply = api
        .ai_chat("Say hello", "agent-1", ChatFormat::Text)
        .await
        .unwrap();
    assert_eq!(reply.text(), "Hello");

    let sent = api.to_whatsapp(&reply, "628111", "Bot: ").await.unwrap();
    assert_eq!(sent.body["fields"]["message"], "Bot: Hello");
    assert_eq!(sent.body["fields"]["to"], "628111");
}

#[tokio::test]
async fn session_chains_across_channels() {
    let api = client(&spawn_api().await);
    let mut session = api.session();
    session
        .record(
            api.ai_chat("Say hello", "agent-1", ChatFormat::Text)
                .await
                .unwrap(),
        )
        .to_sms("0811", "AI: ")
        .await
        .unwrap();

    let last = session.result().unwrap();
    assert_eq!(last.body["received"]["msg"], "AI: Hello");
}

#[tokio::test]
async fn unknown_agent_is_a_remote_error() {
    let api = client(&spawn_api().await);
    let err = api
        .ai_chat("hi", "agent-404", ChatFormat::Json)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "API Error: 404 - agent not found");
}

#[tokio::test]
async fn concurrent_calls_on_cloned_clients() {
    use futures::future;

    let api = client(&spawn_api().await);
    let calls = (0..10).map(|i| {
        let api = api.clone();
        async move { api.sms_regular(&format!("08{}", i), "ping").await }
    });

    let results = future::join_all(calls).await;
    assert_eq!(results.len(), 10);
    for (i, res) in results.into_iter().enumerate() {
        let res = res.unwrap();
        assert_eq!(res.body["received"]["to"], format!("08{}", i));
    }
}
