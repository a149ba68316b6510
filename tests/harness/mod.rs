// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for contact gateway flood simulation.
//!
//! Provides generators, flood patterns, and outcome tallies for
//! validating the submission throttle under abusive traffic.

pub mod attacks;
pub mod generators;
pub mod metrics;
