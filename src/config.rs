// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact gateway.
//!
//! Throttle values are fixed policy rather than deployment configuration:
//! the binary always runs with the defaults below. The struct exists so
//! tests can tighten the window.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the contact gateway service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Submission throttle policy
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Outbound mail configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Submission throttle policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Maximum submissions per client identity per window (default: 2)
    #[serde(default = "default_max_submissions")]
    pub max_submissions: u32,

    /// Window length in seconds (default: 3600)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval between sweeps of expired records in seconds (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Outbound mail (SMTP submission) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host (default: 127.0.0.1)
    #[serde(default = "default_relay_host")]
    pub relay_host: String,

    /// SMTP relay port (default: 587)
    #[serde(default = "default_relay_port")]
    pub relay_port: u16,

    /// Name presented in EHLO (default: localhost)
    #[serde(default = "default_helo_name")]
    pub helo_name: String,

    /// Site owner's mailbox; destination of every submission
    #[serde(default)]
    pub owner_mailbox: String,

    /// Account identity for AUTH PLAIN; empty disables AUTH
    #[serde(default)]
    pub account: String,

    /// Application credential for AUTH PLAIN
    #[serde(default)]
    pub credential: String,

    /// Per-attempt delivery timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_submissions() -> u32 {
    2
}

fn default_window_secs() -> u64 {
    3600 // one rolling hour
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_relay_host() -> String {
    "127.0.0.1".to_string()
}

fn default_relay_port() -> u16 {
    587
}

fn default_helo_name() -> String {
    "localhost".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            throttle: ThrottleConfig::default(),
            mail: MailConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_host: default_relay_host(),
            relay_port: default_relay_port(),
            helo_name: default_helo_name(),
            owner_mailbox: String::new(),
            account: String::new(),
            credential: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl ThrottleConfig {
    /// Get the window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the sweep interval
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl MailConfig {
    /// Get the per-attempt delivery timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Relay address in host:port form
    pub fn relay_addr(&self) -> String {
        format!("{}:{}", self.relay_host, self.relay_port)
    }
}
