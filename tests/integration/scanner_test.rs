//! Integration tests for the poll loop

use async_trait::async_trait;
use poly_spike::config::{Config, ScannerConfig};
use poly_spike::engine::{Scanner, SpikeEngine};
use poly_spike::market::{MarketSnapshot, SnapshotSource};
use poly_spike::notify::{BotStatus, Notifier};
use poly_spike::signal::{AlertCategory, AlertEvent};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Status(BotStatus),
    Alert(String, AlertCategory),
    Health(usize),
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_alert(&self, alert: &AlertEvent) {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Alert(alert.market.id.clone(), alert.category));
    }

    async fn send_status(&self, status: BotStatus) {
        self.sent.lock().unwrap().push(Sent::Status(status));
    }

    async fn send_health_check(&self, markets_scanned: usize) {
        self.sent.lock().unwrap().push(Sent::Health(markets_scanned));
    }
}

/// Replays one price per call and requests shutdown once it runs out
struct ScriptedSource {
    prices: Vec<Decimal>,
    calls: AtomicUsize,
    done: Arc<Notify>,
}

impl ScriptedSource {
    fn new(prices: Vec<Decimal>, done: Arc<Notify>) -> Self {
        Self {
            prices,
            calls: AtomicUsize::new(0),
            done,
        }
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch_snapshots(&self) -> anyhow::Result<Vec<MarketSnapshot>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(price) = self.prices.get(call).copied() else {
            self.done.notify_one();
            // Hold the fetch open so shutdown wins the race
            std::future::pending::<()>().await;
            return Ok(vec![]);
        };

        Ok(vec![
            MarketSnapshot {
                id: "m1".to_string(),
                question: "Will the treaty be signed?".to_string(),
                slug: Some("treaty".to_string()),
                price: Some(price),
                volume: dec!(0),
                liquidity: Some(dec!(20000)),
                tags: vec![],
            },
            MarketSnapshot {
                id: "sports".to_string(),
                question: "Who wins the final?".to_string(),
                slug: None,
                price: Some(Decimal::ONE - price),
                volume: dec!(0),
                liquidity: Some(dec!(20000)),
                tags: vec![poly_spike::market::Tag::Plain("Soccer".to_string())],
            },
        ])
    }
}

struct FailingSource;

#[async_trait]
impl SnapshotSource for FailingSource {
    async fn fetch_snapshots(&self) -> anyhow::Result<Vec<MarketSnapshot>> {
        anyhow::bail!("listing source exploded")
    }
}

fn scanner_config(health_check_interval_secs: u64) -> ScannerConfig {
    ScannerConfig {
        poll_interval_secs: 0,
        health_check_interval_secs,
    }
}

#[tokio::test]
async fn test_scanner_alerts_then_shuts_down() {
    let done = Arc::new(Notify::new());
    let source = Arc::new(ScriptedSource::new(
        vec![dec!(0.40), dec!(0.55), dec!(0.56)],
        done.clone(),
    ));
    let notifier = Arc::new(RecordingNotifier::default());

    let mut scanner = Scanner::new(
        SpikeEngine::new(&Config::default()),
        source.clone(),
        notifier.clone(),
        &scanner_config(600),
    );

    let shutdown = async move { done.notified().await };
    tokio::time::timeout(Duration::from_secs(5), scanner.run(shutdown))
        .await
        .expect("scanner did not stop");

    assert_eq!(
        notifier.sent(),
        vec![
            Sent::Status(BotStatus::Online),
            Sent::Alert("m1".to_string(), AlertCategory::Flip),
            Sent::Status(BotStatus::Offline),
        ]
    );
    assert_eq!(scanner.engine().history().sample_count("m1"), 3);
    assert!(scanner.engine().history().window("sports").is_none());
}

#[tokio::test]
async fn test_scanner_sends_health_check_with_fetched_count() {
    let done = Arc::new(Notify::new());
    let source = Arc::new(ScriptedSource::new(vec![dec!(0.30)], done.clone()));
    let notifier = Arc::new(RecordingNotifier::default());

    let mut scanner = Scanner::new(
        SpikeEngine::new(&Config::default()),
        source,
        notifier.clone(),
        &scanner_config(0),
    );

    let shutdown = async move { done.notified().await };
    tokio::time::timeout(Duration::from_secs(5), scanner.run(shutdown))
        .await
        .expect("scanner did not stop");

    let sent = notifier.sent();
    assert_eq!(sent.first(), Some(&Sent::Status(BotStatus::Online)));
    assert!(sent.contains(&Sent::Health(2)));
    assert_eq!(sent.last(), Some(&Sent::Status(BotStatus::Offline)));
}

#[tokio::test]
async fn test_scanner_source_error_takes_shutdown_path() {
    let notifier = Arc::new(RecordingNotifier::default());

    let mut scanner = Scanner::new(
        SpikeEngine::new(&Config::default()),
        Arc::new(FailingSource),
        notifier.clone(),
        &scanner_config(600),
    );

    tokio::time::timeout(
        Duration::from_secs(5),
        scanner.run(std::future::pending::<()>()),
    )
    .await
    .expect("scanner did not stop");

    assert_eq!(
        notifier.sent(),
        vec![
            Sent::Status(BotStatus::Online),
            Sent::Status(BotStatus::Offline),
        ]
    );
}

#[tokio::test]
async fn test_scanner_immediate_shutdown() {
    let done = Arc::new(Notify::new());
    done.notify_one();
    let source = Arc::new(ScriptedSource::new(vec![dec!(0.5)], done.clone()));
    let notifier = Arc::new(RecordingNotifier::default());

    let mut scanner = Scanner::new(
        SpikeEngine::new(&Config::default()),
        source,
        notifier.clone(),
        &scanner_config(600),
    );

    let shutdown = async move { done.notified().await };
    scanner.run(shutdown).await;

    let sent = notifier.sent();
    assert_eq!(sent.first(), Some(&Sent::Status(BotStatus::Online)));
    assert_eq!(sent.last(), Some(&Sent::Status(BotStatus::Offline)));
    assert!(!sent.iter().any(|s| matches!(s, Sent::Alert(..))));
}
