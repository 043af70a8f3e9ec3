//! Integration tests for configuration loading

use poly_spike::config::{Config, LogFormat, MAX_SPAN_SECS, WEBHOOK_ENV_VAR};
use rust_decimal_macros::dec;

#[test]
fn test_config_example_parses() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.scanner.poll_interval_secs, 60);
    assert_eq!(config.history.window_secs, 600);
    assert_eq!(config.detection.price_change_threshold, dec!(0.10));
    assert_eq!(config.detection.whale_volume_threshold, dec!(50000));
    assert_eq!(config.filter.min_liquidity, dec!(5000));
    assert!(config.filter.excluded_tags.iter().any(|t| t == "formula 1"));
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = Config::default();
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();

    assert_eq!(parsed.detection.cooldown_secs, config.detection.cooldown_secs);
    assert_eq!(parsed.filter.excluded_tags, config.filter.excluded_tags);
    assert_eq!(parsed.source.base_url, config.source.base_url);
}

#[test]
fn test_env_file_supplies_webhook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(
        &path,
        format!("{}=https://discord.com/api/webhooks/9/from-env-file\n", WEBHOOK_ENV_VAR),
    )
    .unwrap();

    assert!(Config::load_env_file(&path).unwrap());

    let config = Config::default().with_env_overrides();
    assert_eq!(
        config.notifier.webhook_url.as_deref(),
        Some("https://discord.com/api/webhooks/9/from-env-file")
    );
}

#[test]
fn test_missing_env_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!Config::load_env_file(dir.path().join(".env")).unwrap());
}

#[test]
fn test_validate_bounds_window_and_cooldown() {
    let mut config = Config::default();
    config.history.window_secs = MAX_SPAN_SECS;
    config.detection.cooldown_secs = MAX_SPAN_SECS;
    assert!(config.validate().is_ok());

    for window_secs in [MAX_SPAN_SECS + 1, 10_000_000_000_000, u64::MAX] {
        let mut config = Config::default();
        config.history.window_secs = window_secs;
        assert!(config.validate().is_err());
    }

    for cooldown_secs in [MAX_SPAN_SECS + 1, u64::MAX] {
        let mut config = Config::default();
        config.detection.cooldown_secs = cooldown_secs;
        assert!(config.validate().is_err());
    }
}
