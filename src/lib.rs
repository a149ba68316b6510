// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Submission Gateway
//!
//! This crate provides the contact-form endpoint of a personal portfolio
//! site: it throttles repeated submissions per originating client and
//! relays admitted submissions to the site owner's mailbox over SMTP.
//!
//! - Per-client submission throttling (2 per rolling hour)
//! - Fixed-window counters, one atomic check-and-update per request
//! - Single delivery attempt per submission, bounded by a timeout
//! - Uniform failure response; causes are logged, never surfaced
//! - Shared `"unknown-ip"` bucket for clients without a forwarded-for
//!   address

pub mod config;
pub mod handlers;
pub mod mailer;
pub mod metrics;
pub mod throttle;

pub use config::Config;
pub use mailer::{Mailer, SubmissionPayload};
pub use throttle::{SubmissionThrottle, ThrottleDecision};
