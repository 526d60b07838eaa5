//! Refetch Generation
//!
//! A monotonically increasing revision per resource. Anything that needs a
//! consistent view bumps it; fetchers subscribe to it and re-load.

use std::fmt;

/// Invalidation revision of a resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn new() -> Self {
        Self(0)
    }

    /// The revision after this one
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Advance in place
    pub fn bump(&mut self) {
        *self = self.next();
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_is_monotonic() {
        let mut generation = Generation::new();
        let before = generation;
        generation.bump();
        generation.bump();
        assert!(generation > before);
        assert_eq!(generation.value(), 2);
        assert_eq!(generation.to_string(), "gen#2");
    }
}
