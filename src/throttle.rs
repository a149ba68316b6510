// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window submission throttle.
//!
//! Each client identity carries a count/window pair. The count resets to 1
//! whenever the elapsed time since the window began exceeds the window
//! length; within the window, a submission past the cap is rejected
//! without mutating state. There is no "blocked until" state, only the
//! pair.

use crate::config::ThrottleConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a throttle check.
#[derive(Debug, Clone)]
pub enum ThrottleDecision {
    /// Submission admitted
    Admitted {
        /// Submissions left in the current window after this one
        remaining: u32,
    },
    /// Submission rejected
    Rejected {
        /// Time until the client's window ends
        retry_after: Duration,
    },
}

impl ThrottleDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

/// Per-client bookkeeping.
#[derive(Debug)]
struct ClientRecord {
    /// Submissions counted in the current window
    count: u32,
    /// When the current window began
    window_start: Instant,
}

/// Thread-safe submission throttle.
pub struct SubmissionThrottle {
    config: ThrottleConfig,
    records: Arc<RwLock<HashMap<String, ClientRecord>>>,
}

impl SubmissionThrottle {
    /// Create a new throttle with the given policy.
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check a submission from `identity` against the policy.
    pub async fn check(&self, identity: &str) -> ThrottleDecision {
        self.check_at(identity, Instant::now()).await
    }

    /// Check at a supplied clock reading.
    ///
    /// The whole read-modify-write runs under one write guard, so two
    /// requests racing at the cap cannot both be admitted.
    pub async fn check_at(&self, identity: &str, now: Instant) -> ThrottleDecision {
        let window = self.config.window_duration();
        let mut records = self.records.write().await;

        match records.get_mut(identity) {
            None => {
                records.insert(
                    identity.to_string(),
                    ClientRecord {
                        count: 1,
                        window_start: now,
                    },
                );
                debug!(identity, "first submission in window");
                ThrottleDecision::Admitted {
                    remaining: self.config.max_submissions.saturating_sub(1),
                }
            }
            Some(record) => {
                let elapsed = now.saturating_duration_since(record.window_start);
                if elapsed > window {
                    // Window elapsed: reset regardless of prior count.
                    record.count = 1;
                    record.window_start = now;
                    debug!(identity, "window elapsed, count reset");
                    ThrottleDecision::Admitted {
                        remaining: self.config.max_submissions.saturating_sub(1),
                    }
                } else if record.count >= self.config.max_submissions {
                    let retry_after = window.saturating_sub(elapsed);
                    debug!(
                        identity,
                        retry_after_secs = retry_after.as_secs(),
                        "submission cap reached"
                    );
                    ThrottleDecision::Rejected { retry_after }
                } else {
                    record.count += 1;
                    ThrottleDecision::Admitted {
                        remaining: self.config.max_submissions - record.count,
                    }
                }
            }
        }
    }

    /// Drop records whose window has elapsed (should be called
    /// periodically). An evicted record and a window reset produce the
    /// same next decision.
    pub async fn sweep(&self) {
        self.sweep_at(Instant::now()).await
    }

    /// Sweep at a supplied clock reading.
    pub async fn sweep_at(&self, now: Instant) {
        let window = self.config.window_duration();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| now.saturating_duration_since(record.window_start) <= window);
        let dropped = before - records.len();
        if dropped > 0 {
            debug!(dropped, "swept expired throttle records");
        }
    }

    /// Number of identities currently tracked.
    pub async fn tracked(&self) -> usize {
        self.records.read().await.len()
    }
}
