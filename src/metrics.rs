// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the contact gateway.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};
use tracing::error;

lazy_static! {
    pub static ref SUBMISSIONS_RECEIVED: IntCounter = register_int_counter!(
        "contact_submissions_received_total",
        "Contact submissions received"
    )
    .unwrap();
    pub static ref SUBMISSIONS_ADMITTED: IntCounter = register_int_counter!(
        "contact_submissions_admitted_total",
        "Submissions admitted by the throttle"
    )
    .unwrap();
    pub static ref SUBMISSIONS_REJECTED: IntCounter = register_int_counter!(
        "contact_submissions_rejected_total",
        "Submissions rejected by the throttle"
    )
    .unwrap();
    pub static ref SUBMISSIONS_DELIVERED: IntCounter = register_int_counter!(
        "contact_submissions_delivered_total",
        "Submissions delivered to the relay"
    )
    .unwrap();
    pub static ref DELIVERY_FAILURES: IntCounter = register_int_counter!(
        "contact_delivery_failures_total",
        "Delivery attempts that failed"
    )
    .unwrap();
}

/// Prometheus text-format endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&families, &mut buffer) {
        error!(error = %err, "failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, String::new());
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
