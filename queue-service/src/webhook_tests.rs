use super::*;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ID: &str = "UC1234567890123456789012";

fn channel() -> ChannelId {
    ChannelId::parse(ID).unwrap()
}

#[tokio::test]
async fn test_notify_posts_channel_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/queue"))
        .and(body_json(serde_json::json!({ "channel_id": ID })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier =
        WebhookNotifier::new(format!("{}/webhook/queue", server.uri()), Duration::from_secs(5))
            .unwrap();
    let ack = notifier.notify(&channel()).await.unwrap();

    assert_eq!(ack.status, 200);
    assert_eq!(ack.message, "OK");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("workflow crashed"))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = notifier.notify(&channel()).await.unwrap_err();

    assert_eq!(err.to_string(), "Request failed with status code 500");
    assert_eq!(err.code(), "ERR_BAD_RESPONSE");
    match err {
        WebhookError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "workflow crashed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_client_error_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = notifier.notify(&channel()).await.unwrap_err();
    let failure = WebhookFailure::from(&err);

    assert_eq!(failure.code, "ERR_BAD_REQUEST");
    assert_eq!(failure.error, "Request failed with status code 404");
}

#[tokio::test]
async fn test_slow_webhook_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(server.uri(), Duration::from_millis(100)).unwrap();
    let err = notifier.notify(&channel()).await.unwrap_err();

    assert_eq!(err.code(), "ETIMEDOUT");
}
