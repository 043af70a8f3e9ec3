//! poly-spike: momentum alert daemon for Polymarket prediction markets
//!
//! This library provides the core components for:
//! - Market listing via the Gamma API
//! - Liquidity and tag filtering
//! - Rolling per-market price/volume history
//! - Spike, flip, resolve and whale detection
//! - Per-market alert cooldowns
//! - Discord webhook notifications
//! - Logging and Prometheus metrics

pub mod alert;
pub mod cli;
pub mod config;
pub mod engine;
pub mod history;
pub mod market;
pub mod notify;
pub mod signal;
pub mod telemetry;
