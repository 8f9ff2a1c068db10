//! End-to-end tests of the sampler → detector → notifier pipeline.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use pricewatch::{
    config::{AppConfig, PushConfig, ServerConfig},
    engine::{DropDetector, PriceSampler},
    models::{AlertEvent, PriceSample},
    notification::{NotificationError, Notifier, PushSink},
    persistence::{ThresholdFile, ThresholdStore},
    providers::{QuoteSource, QuoteSourceError},
    supervisor::Supervisor,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Serves a scripted price sequence, then repeats the last price forever.
struct ScriptedQuoteSource {
    prices: Mutex<VecDeque<f64>>,
    last: Mutex<f64>,
}

impl ScriptedQuoteSource {
    fn new(prices: impl IntoIterator<Item = f64>) -> Self {
        Self { prices: Mutex::new(prices.into_iter().collect()), last: Mutex::new(0.0) }
    }
}

#[async_trait]
impl QuoteSource for ScriptedQuoteSource {
    async fn latest_price(&self, _symbol: &str) -> Result<f64, QuoteSourceError> {
        let next = self.prices.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(price) = next {
            *last = price;
        }
        Ok(*last)
    }
}

/// Forwards every delivered message to the test.
struct RecordingPushSink {
    messages: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl PushSink for RecordingPushSink {
    async fn push(&self, message: &str) -> Result<(), NotificationError> {
        let _ = self.messages.send(message.to_string());
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn declining_prices_raise_exactly_one_debounced_alert() {
    let source = Arc::new(ScriptedQuoteSource::new([100.0, 101.0, 100.0, 89.0]));
    let (messages_tx, mut messages_rx) = mpsc::unbounded_channel();
    let sink = Arc::new(RecordingPushSink { messages: messages_tx });
    let threshold = Arc::new(ThresholdStore::new(10.0));
    let token = CancellationToken::new();

    let (samples_tx, samples_rx) = mpsc::channel::<PriceSample>(1);
    let (alerts_tx, alerts_rx) = mpsc::channel::<AlertEvent>(8);

    let sampler = PriceSampler::new(
        source,
        "BTCUSDT",
        Duration::from_secs(20),
        Duration::from_secs(5),
        samples_tx,
        token.clone(),
    );
    let detector = DropDetector::new(
        Duration::from_secs(60),
        Duration::from_secs(20),
        Duration::from_secs(3600),
        Arc::clone(&threshold),
    );
    let notifier = Notifier::new(sink, "BTCUSDT");

    let sampler_handle = tokio::spawn(sampler.run());
    let detector_handle = tokio::spawn(detector.run(samples_rx, alerts_tx, token.clone()));
    let notifier_handle = tokio::spawn(notifier.run(alerts_rx, token.clone()));

    // The drop to 89 is measured against the in-window top of 101.
    let message = messages_rx.recv().await.unwrap();
    assert_eq!(message, "🔥 BTCUSDT dropped by 12.00 to 89 in the past 1 minute(s)! 🔥");

    // The price stays at 89; further drops are below the threshold and the
    // original alert is cooling down, so nothing else is delivered.
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(messages_rx.try_recv().is_err());

    token.cancel();
    sampler_handle.await.unwrap();
    detector_handle.await.unwrap();
    notifier_handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn supervisor_wires_the_whole_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let threshold_path = dir.path().join("threshold.txt");

    let config = AppConfig {
        symbol: "BTCUSDT".to_string(),
        quote_url: Url::parse("https://api.example.com").unwrap(),
        sample_interval_secs: Duration::from_secs(20),
        window_duration_secs: Duration::from_secs(60),
        cooldown_secs: None,
        fetch_timeout_secs: Duration::from_secs(5),
        default_threshold: 130.0,
        threshold_path: threshold_path.clone(),
        alert_channel_capacity: 8,
        shutdown_timeout_secs: Duration::from_secs(5),
        push: PushConfig {
            url: Url::parse("https://push.example.com/1/push").unwrap(),
            app_key: Some("key".to_string()),
            app_secret: Some("secret".to_string()),
        },
        http_retry: Default::default(),
        server: ServerConfig { enabled: false, listen_address: "127.0.0.1:0".to_string() },
    };

    let (messages_tx, mut messages_rx) = mpsc::unbounded_channel();
    let threshold = Arc::new(ThresholdStore::new(10.0));

    let supervisor = Supervisor::builder()
        .config(config)
        .threshold_store(Arc::clone(&threshold))
        .threshold_file(ThresholdFile::new(&threshold_path))
        .quote_source(Arc::new(ScriptedQuoteSource::new([100.0, 101.0, 100.0, 89.0])))
        .push_sink(Arc::new(RecordingPushSink { messages: messages_tx }))
        .build()
        .unwrap();

    let supervisor_handle = tokio::spawn(supervisor.run());

    let message = messages_rx.recv().await.unwrap();
    assert_eq!(message, "🔥 BTCUSDT dropped by 12.00 to 89 in the past 1 minute(s)! 🔥");

    supervisor_handle.abort();
}
