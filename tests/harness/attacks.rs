// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Flood patterns for throttle simulation.

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct FloodConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Number of unique client identities to simulate; 0 means every
    /// request arrives without a forwarded-for address
    pub unique_identities: usize,
}

/// Predefined flood patterns.
impl FloodConfig {
    /// Single identity hammering the endpoint.
    pub fn single_identity_flood() -> Self {
        Self {
            total_requests: 200,
            unique_identities: 1,
        }
    }

    /// Many identities, a few submissions each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 300,
            unique_identities: 100,
        }
    }

    /// Requests with no determinable address: all share one bucket.
    pub fn anonymous_flood() -> Self {
        Self {
            total_requests: 50,
            unique_identities: 0,
        }
    }
}
