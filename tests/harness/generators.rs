// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for flood simulation.

/// Generate a pool of client identities in dotted-quad form.
pub fn generate_identities(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use the 10.x.x.x private range
            let a = (i >> 16) & 0xFF;
            let b = (i >> 8) & 0xFF;
            let c = i & 0xFF;
            format!("10.{}.{}.{}", a, b, c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_identities_unique() {
        let identities = generate_identities(256);
        assert_eq!(identities.len(), 256);
        let unique: std::collections::HashSet<_> = identities.iter().collect();
        assert_eq!(unique.len(), 256);
    }
}
