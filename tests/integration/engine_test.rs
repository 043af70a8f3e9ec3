//! End-to-end engine behavior over several poll cycles

use chrono::{Duration, Utc};
use poly_spike::config::Config;
use poly_spike::engine::SpikeEngine;
use poly_spike::market::{MarketSnapshot, Tag};
use poly_spike::signal::AlertCategory;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn market(id: &str, price: Decimal, volume: Decimal, liquidity: Decimal) -> MarketSnapshot {
    MarketSnapshot {
        id: id.to_string(),
        question: format!("Will event {} happen?", id),
        slug: None,
        price: Some(price),
        volume,
        liquidity: Some(liquidity),
        tags: vec![Tag::Labeled {
            label: "Politics".to_string(),
        }],
    }
}

#[test]
fn test_documented_scenarios() {
    let mut engine = SpikeEngine::new(&Config::default());
    let t0 = Utc::now();

    engine.process(
        &[
            market("flip", dec!(0.40), dec!(0), dec!(9000)),
            market("resolve", dec!(0.97), dec!(500), dec!(9000)),
            market("whale", dec!(0.25), dec!(1000), dec!(9000)),
            market("thin", dec!(0.10), dec!(0), dec!(4999)),
        ],
        t0,
    );

    let report = engine.process(
        &[
            market("flip", dec!(0.55), dec!(0), dec!(9000)),
            market("resolve", dec!(0.99), dec!(500), dec!(9000)),
            market("whale", dec!(0.25), dec!(60000), dec!(9000)),
            market("thin", dec!(0.90), dec!(0), dec!(4999)),
        ],
        t0 + Duration::seconds(60),
    );

    let fired: Vec<(&str, AlertCategory)> = report
        .alerts
        .iter()
        .map(|a| (a.market.id.as_str(), a.category))
        .collect();
    assert_eq!(
        fired,
        vec![
            ("flip", AlertCategory::Flip),
            ("resolve", AlertCategory::Resolve),
            ("whale", AlertCategory::Whale),
        ]
    );

    let flip = &report.alerts[0];
    assert!(flip.triggers.spike && flip.triggers.flip);

    let resolve = &report.alerts[1];
    assert!(!resolve.triggers.spike);

    let whale = &report.alerts[2];
    assert_eq!(whale.volume_delta, dec!(59000));

    assert!(engine.history().window("thin").is_none());
    assert_eq!(engine.history().len(), 3);
}

#[test]
fn test_cooldown_scenario() {
    let mut engine = SpikeEngine::new(&Config::default());
    let t0 = Utc::now();

    engine.process(&[market("m", dec!(0.60), dec!(0), dec!(9000))], t0);

    let first = engine.process(
        &[market("m", dec!(0.75), dec!(0), dec!(9000))],
        t0 + Duration::seconds(30),
    );
    assert_eq!(first.alerts.len(), 1);

    let blocked = engine.process(
        &[market("m", dec!(0.85), dec!(0), dec!(9000))],
        t0 + Duration::seconds(150),
    );
    assert!(blocked.alerts.is_empty());
    assert_eq!(blocked.suppressed, 1);

    let released = engine.process(
        &[market("m", dec!(0.85), dec!(0), dec!(9000))],
        t0 + Duration::seconds(331),
    );
    assert_eq!(released.alerts.len(), 1);
    assert_eq!(released.alerts[0].reference.price, dec!(0.60));
}

#[test]
fn test_window_invariant_holds_across_cycles() {
    let config = Config::default();
    let mut engine = SpikeEngine::new(&config);
    let t0 = Utc::now();
    let span = Duration::seconds(config.history.window_secs as i64);

    for cycle in 0..40i64 {
        let now = t0 + Duration::seconds(cycle * 45);
        let price = dec!(0.30) + Decimal::from(cycle % 7) / dec!(100);
        engine.process(&[market("m", price, dec!(0), dec!(9000))], now);

        let window = engine.history().window("m").unwrap();
        assert!(window.front().unwrap().timestamp >= now - span);
        assert_eq!(window.back().unwrap().timestamp, now);

        let stamps: Vec<_> = window.iter().map(|s| s.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_same_snapshot_twice_is_idempotent() {
    let mut engine = SpikeEngine::new(&Config::default());
    let now = Utc::now();
    let snapshots = vec![
        market("a", dec!(0.45), dec!(70000), dec!(9000)),
        market("b", dec!(0.995), dec!(10), dec!(9000)),
    ];

    assert!(engine.process(&snapshots, now).alerts.is_empty());
    assert!(engine
        .process(&snapshots, now + Duration::seconds(1))
        .alerts
        .is_empty());
}
