// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for flood simulation.

use std::collections::HashMap;

/// Possible outcomes for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Admitted,
    Rejected,
}

/// Collects outcomes during a flood run.
#[derive(Debug, Default)]
pub struct FloodMetrics {
    outcomes: HashMap<Outcome, usize>,
    per_identity: HashMap<String, usize>,
}

impl FloodMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission outcome.
    pub fn record(&mut self, outcome: Outcome, identity: &str) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.per_identity.entry(identity.to_string()).or_insert(0) += 1;
    }

    /// Total submissions recorded.
    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Number of unique identities that submitted.
    pub fn unique_identities(&self) -> usize {
        self.per_identity.len()
    }

    /// Ratio of rejected to total.
    pub fn block_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(Outcome::Rejected) as f64 / total as f64
    }
}

impl std::fmt::Display for FloodMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Flood Report ===")?;
        writeln!(f, "Total:      {}", self.total())?;
        writeln!(f, "Admitted:   {}", self.count(Outcome::Admitted))?;
        writeln!(f, "Rejected:   {}", self.count(Outcome::Rejected))?;
        writeln!(f, "Block rate: {:.1}%", self.block_rate() * 100.0)?;
        writeln!(f, "Identities: {}", self.unique_identities())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_and_block_rate() {
        let mut metrics = FloodMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Admitted, "10.0.0.1");
        }
        for _ in 0..7 {
            metrics.record(Outcome::Rejected, "10.0.0.1");
        }

        assert_eq!(metrics.total(), 10);
        assert_eq!(metrics.count(Outcome::Admitted), 3);
        assert_eq!(metrics.unique_identities(), 1);
        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
    }
}
