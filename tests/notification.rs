//! Integration tests for alert delivery through the push sink.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use mockito::Matcher;
use pricewatch::{
    config::{HttpRetryConfig, PushConfig},
    http_client::create_retryable_http_client,
    models::AlertEvent,
    notification::{Notifier, PushedClient},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

fn push_client(server_url: &str) -> PushedClient {
    let config = PushConfig {
        url: Url::parse(&format!("{server_url}/1/push")).unwrap(),
        app_key: Some("key".to_string()),
        app_secret: Some("secret".to_string()),
    };
    let retry = HttpRetryConfig { max_retries: 0, ..Default::default() };
    PushedClient::new(config, create_retryable_http_client(&retry, reqwest::Client::new()))
        .unwrap()
}

fn alert(drop_amount: f64) -> AlertEvent {
    AlertEvent { drop_amount, current_price: 41850.0, window_minutes: 60, at: Utc::now() }
}

async fn wait_until_matched(mock: &mockito::Mock) {
    for _ in 0..100 {
        if mock.matched_async().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn alert_is_delivered_as_a_form_encoded_push() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/1/push")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("app_key".into(), "key".into()),
            Matcher::UrlEncoded("target_type".into(), "app".into()),
            Matcher::UrlEncoded(
                "content".into(),
                "🔥 BTCUSDT dropped by 150.00 to 41850 in the past 60 minute(s)! 🔥".into(),
            ),
        ]))
        .with_status(200)
        .create_async()
        .await;

    let notifier = Notifier::new(Arc::new(push_client(&server.url())), "BTCUSDT");
    let (alerts_tx, alerts_rx) = mpsc::channel(8);
    let handle = tokio::spawn(notifier.run(alerts_rx, CancellationToken::new()));

    alerts_tx.send(alert(150.0)).await.unwrap();

    wait_until_matched(&mock).await;
    mock.assert_async().await;

    drop(alerts_tx);
    handle.await.unwrap();
}

#[tokio::test]
async fn delivery_failure_does_not_stop_the_notifier() {
    let mut server = mockito::Server::new_async().await;
    // The first delivery fails at the sink, the second succeeds.
    let failing = server
        .mock("POST", "/1/push")
        .match_body(Matcher::UrlEncoded("content".into(),
            "🔥 BTCUSDT dropped by 150.00 to 41850 in the past 60 minute(s)! 🔥".into()))
        .with_status(500)
        .create_async()
        .await;
    let succeeding = server
        .mock("POST", "/1/push")
        .match_body(Matcher::UrlEncoded("content".into(),
            "🔥 BTCUSDT dropped by 175.00 to 41850 in the past 60 minute(s)! 🔥".into()))
        .with_status(200)
        .create_async()
        .await;

    let notifier = Notifier::new(Arc::new(push_client(&server.url())), "BTCUSDT");
    let (alerts_tx, alerts_rx) = mpsc::channel(8);
    let handle = tokio::spawn(notifier.run(alerts_rx, CancellationToken::new()));

    alerts_tx.send(alert(150.0)).await.unwrap();
    wait_until_matched(&failing).await;

    alerts_tx.send(alert(175.0)).await.unwrap();
    wait_until_matched(&succeeding).await;

    failing.assert_async().await;
    succeeding.assert_async().await;

    drop(alerts_tx);
    handle.await.unwrap();
}
