use super::send::{recipient, split_message, TextMessage};
use super::CloudApiChannel;
use httpmock::prelude::*;
use nostra_core::{config::WhatsAppConfig, error::NostraError, traits::DeliveryChannel};

fn channel_for(base: String) -> CloudApiChannel {
    CloudApiChannel::new(WhatsAppConfig {
        enabled: true,
        api_base: base,
        phone_number_id: "1055".into(),
        access_token: "tok".into(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[test]
fn test_split_short_message() {
    let chunks = split_message("hello", 4096);
    assert_eq!(chunks, vec!["hello"]);
}

#[test]
fn test_split_long_message() {
    let text = "a\n".repeat(3000);
    let chunks = split_message(&text, 4096);
    assert!(chunks.len() >= 2);
    for chunk in &chunks {
        assert!(chunk.len() <= 4096);
    }
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_split_respects_char_boundaries() {
    // Emoji are 4 bytes; a 10-byte limit must not cut one in half.
    let text = "👋".repeat(10);
    let chunks = split_message(&text, 10);
    assert!(chunks.iter().all(|c| c.chars().all(|ch| ch == '👋')));
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_recipient_strips_plus() {
    assert_eq!(recipient("+56912345678"), "56912345678");
    assert_eq!(recipient("56912345678"), "56912345678");
}

#[test]
fn test_payload_shape() {
    let json = serde_json::to_value(TextMessage::new("56912345678", "hola")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "messaging_product": "whatsapp",
            "to": "56912345678",
            "type": "text",
            "text": { "body": "hola" }
        })
    );
}

#[tokio::test]
async fn test_send_posts_to_cloud_api() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/1055/messages")
                .header("authorization", "Bearer tok")
                .json_body(serde_json::json!({
                    "messaging_product": "whatsapp",
                    "to": "56912345678",
                    "type": "text",
                    "text": { "body": "Hola Ana" }
                }));
            then.status(200)
                .json_body(serde_json::json!({"messages": [{"id": "wamid.1"}]}));
        })
        .await;

    let ch = channel_for(server.base_url());
    assert!(ch.is_available().await);
    ch.send("+56912345678", "Hola Ana").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_reports_api_error() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/1055/messages");
            then.status(401).body("invalid token");
        })
        .await;

    let ch = channel_for(server.base_url());
    let err = ch.send("+56912345678", "x").await.unwrap_err();
    match err {
        NostraError::Delivery(msg) => {
            assert!(msg.contains("401"), "{msg}");
            assert!(msg.contains("invalid token"), "{msg}");
        }
        other => panic!("expected delivery error, got {other:?}"),
    }
    // Exactly one attempt: no retries.
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_unreachable_api_is_delivery_error() {
    let ch = channel_for("http://127.0.0.1:9".into());
    assert!(matches!(
        ch.send("+56912345678", "x").await,
        Err(NostraError::Delivery(_))
    ));
}

#[tokio::test]
async fn test_missing_credentials_unavailable() {
    let ch = CloudApiChannel::new(WhatsAppConfig::default()).unwrap();
    assert!(!ch.is_available().await);
}
