//! Gateway client tests against a local mock HTTP server.

use std::time::{Duration, Instant};

use mockito::Matcher;
use serde_json::json;
use whatsapp_gateway::{GatewayClient, GatewayConfig};

const INSTANCE: &str = "loja-azul";
const TOKEN: &str = "test-token";

fn client() -> GatewayClient {
    GatewayClient::new(Duration::from_secs(5)).unwrap()
}

fn endpoint(server: &mockito::ServerGuard) -> GatewayConfig {
    GatewayConfig::new(format!("{}/manager", server.url()), TOKEN, INSTANCE)
}

#[tokio::test]
async fn send_text_first_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/message/sendText/loja-azul")
        .match_header("apikey", TOKEN)
        .match_body(Matcher::Json(json!({"number": "5511999999999", "text": "Olá"})))
        .with_status(201)
        .with_body(r#"{"key": {"id": "1"}}"#)
        .expect(1)
        .create_async()
        .await;

    let sent = client().send_text(&endpoint(&server), "11999999999", "Olá").await;

    assert!(sent);
    mock.assert_async().await;
}

#[tokio::test]
async fn send_text_retries_with_jid_suffix() {
    let mut server = mockito::Server::new_async().await;
    let rejected = server
        .mock("POST", "/message/sendText/loja-azul")
        .match_body(Matcher::PartialJson(json!({"number": "5511999999999"})))
        .with_status(400)
        .with_body(r#"{"message": "invalid number"}"#)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("POST", "/message/sendText/loja-azul")
        .match_body(Matcher::PartialJson(
            json!({"number": "5511999999999@s.whatsapp.net"}),
        ))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    let national = server
        .mock("POST", "/message/sendText/loja-azul")
        .match_body(Matcher::PartialJson(json!({"number": "11999999999"})))
        .with_status(201)
        .expect(0)
        .create_async()
        .await;

    let sent = client().send_text(&endpoint(&server), "5511999999999", "Oi").await;

    assert!(sent);
    rejected.assert_async().await;
    accepted.assert_async().await;
    national.assert_async().await;
}

#[tokio::test]
async fn send_text_falls_back_to_national_number() {
    let mut server = mockito::Server::new_async().await;
    let rejected = server
        .mock("POST", "/message/sendText/loja-azul")
        .match_body(Matcher::AnyOf(vec![
            Matcher::PartialJson(json!({"number": "5511999999999"})),
            Matcher::PartialJson(json!({"number": "5511999999999@s.whatsapp.net"})),
        ]))
        .with_status(400)
        .expect(2)
        .create_async()
        .await;
    let national = server
        .mock("POST", "/message/sendText/loja-azul")
        .match_body(Matcher::PartialJson(json!({"number": "11999999999"})))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let sent = client().send_text(&endpoint(&server), "11999999999", "Oi").await;

    assert!(sent);
    rejected.assert_async().await;
    national.assert_async().await;
}

#[tokio::test]
async fn send_text_gives_up_after_alternates() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/message/sendText/loja-azul")
        .with_status(400)
        .expect(3)
        .create_async()
        .await;

    let sent = client().send_text(&endpoint(&server), "5511999999999", "Oi").await;

    assert!(!sent);
    mock.assert_async().await;
}

#[tokio::test]
async fn send_text_does_not_retry_other_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/message/sendText/loja-azul")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let sent = client().send_text(&endpoint(&server), "5511999999999", "Oi").await;

    assert!(!sent);
    mock.assert_async().await;
}

#[tokio::test]
async fn send_text_unreachable_gateway() {
    let endpoint = GatewayConfig::new("http://127.0.0.1:1", TOKEN, INSTANCE);
    let sent = client().send_text(&endpoint, "5511999999999", "Oi").await;
    assert!(!sent);
}

#[tokio::test]
async fn send_text_gives_up_when_gateway_hangs() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _hold = tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });

    let client = GatewayClient::new(Duration::from_millis(300)).unwrap();
    let endpoint = GatewayConfig::new(format!("http://{}", addr), TOKEN, INSTANCE);

    let start = Instant::now();
    let sent = client.send_text(&endpoint, "5511999999999", "Oi").await;

    assert!(!sent);
    assert!(start.elapsed() >= Duration::from_millis(300));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn send_image_single_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/message/sendMedia/loja-azul")
        .match_header("apikey", TOKEN)
        .match_body(Matcher::Json(json!({
            "number": "5511999999999",
            "mediatype": "image",
            "media": "https://cdn.example.com/plans.png",
            "caption": "Planos"
        })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let sent = client()
        .send_image(
            &endpoint(&server),
            "5511999999999",
            "Planos",
            "https://cdn.example.com/plans.png",
        )
        .await;

    assert!(sent);
    mock.assert_async().await;
}

#[tokio::test]
async fn send_image_rejection_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/message/sendMedia/loja-azul")
        .with_status(400)
        .expect(1)
        .create_async()
        .await;

    let sent = client()
        .send_image(&endpoint(&server), "5511999999999", "x", "https://cdn/x.png")
        .await;

    assert!(!sent);
    mock.assert_async().await;
}

#[tokio::test]
async fn typing_presence_sent_then_waits() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/sendPresence/loja-azul")
        .match_body(Matcher::Json(
            json!({"number": "5511999999999", "presence": "composing", "delay": 100}),
        ))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let start = Instant::now();
    let ok = client()
        .simulate_typing(&endpoint(&server), "11999999999", Duration::from_millis(100))
        .await;

    assert!(ok);
    assert!(start.elapsed() >= Duration::from_millis(100));
    mock.assert_async().await;
}

#[tokio::test]
async fn typing_failure_still_waits() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/sendPresence/loja-azul")
        .with_status(500)
        .create_async()
        .await;

    let start = Instant::now();
    let ok = client()
        .simulate_typing(&endpoint(&server), "11999999999", Duration::from_millis(80))
        .await;

    assert!(!ok);
    assert!(start.elapsed() >= Duration::from_millis(80));
}
