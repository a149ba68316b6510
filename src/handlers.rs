// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact gateway.
//!
//! A submission is throttled before its body is read. Everything that
//! goes wrong after admission (an undecodable body, a relay failure, a
//! timeout) produces the same generic failure response; the cause is
//! only logged.

use crate::config::Config;
use crate::mailer::{Mailer, SubmissionPayload};
use crate::metrics;
use crate::throttle::{SubmissionThrottle, ThrottleDecision};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared application state.
pub struct AppState {
    pub throttle: SubmissionThrottle,
    pub mailer: Mailer,
    pub config: Config,
}

/// Every outcome is a single user-facing message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Soft-denial wording: reads as "already received", not as a block.
pub const REJECTED_BODY: &str =
    "We have already received your message, we will be in touch soon.";
pub const SENT_BODY: &str = "Email sent successfully!";
pub const FAILED_BODY: &str = "Failed to send email. Please try again.";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-gateway",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Derive the throttle identity from the forwarded-for header: the first
/// comma-separated entry when present. Requests without a determinable
/// address all share the `"unknown-ip"` bucket.
pub fn client_identity(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .unwrap_or("unknown-ip")
        .to_string()
}

/// Contact form submission endpoint.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    metrics::SUBMISSIONS_RECEIVED.inc();
    let identity = client_identity(&headers);

    match state.throttle.check(&identity).await {
        ThrottleDecision::Rejected { retry_after } => {
            metrics::SUBMISSIONS_REJECTED.inc();
            info!(
                identity = %identity,
                retry_after_secs = retry_after.as_secs(),
                "submission rejected by throttle"
            );
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [("Retry-After", retry_after.as_secs().to_string())],
                Json(MessageResponse {
                    message: REJECTED_BODY,
                }),
            )
                .into_response();
        }
        ThrottleDecision::Admitted { remaining } => {
            metrics::SUBMISSIONS_ADMITTED.inc();
            debug!(identity = %identity, remaining, "submission admitted");
        }
    }

    let payload: SubmissionPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(identity = %identity, error = %err, "undecodable submission body");
            return failure_response();
        }
    };

    match state.mailer.dispatch(&payload).await {
        Ok(()) => {
            metrics::SUBMISSIONS_DELIVERED.inc();
            info!(identity = %identity, "submission delivered");
            (
                StatusCode::OK,
                Json(MessageResponse { message: SENT_BODY }),
            )
                .into_response()
        }
        Err(err) => {
            metrics::DELIVERY_FAILURES.inc();
            error!(identity = %identity, error = %err, "delivery failed");
            failure_response()
        }
    }
}

fn failure_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse {
            message: FAILED_BODY,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_xff(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_identity_from_single_entry() {
        assert_eq!(client_identity(&headers_with_xff("1.2.3.4")), "1.2.3.4");
    }

    #[test]
    fn test_identity_takes_first_entry() {
        let headers = headers_with_xff("203.0.113.7, 10.0.0.1, 172.16.0.9");
        assert_eq!(client_identity(&headers), "203.0.113.7");
    }

    #[test]
    fn test_identity_trims_whitespace() {
        let headers = headers_with_xff("  203.0.113.7 , 10.0.0.1");
        assert_eq!(client_identity(&headers), "203.0.113.7");
    }

    #[test]
    fn test_missing_header_falls_back_to_sentinel() {
        assert_eq!(client_identity(&HeaderMap::new()), "unknown-ip");
    }

    #[test]
    fn test_empty_header_falls_back_to_sentinel() {
        assert_eq!(client_identity(&headers_with_xff("")), "unknown-ip");
        assert_eq!(client_identity(&headers_with_xff("  ,1.2.3.4")), "unknown-ip");
    }
}
