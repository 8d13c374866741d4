//! Engine API version values.

use crate::error::{EngineError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted API version such as `1.24`.
///
/// Versions compare component by component; a missing trailing component
/// counts as zero, so `1.10` and `1.10.0` are equal.
#[derive(Debug, Clone)]
pub struct ApiVersion(Vec<u64>);

impl ApiVersion {
    /// Parses a dotted version.
    ///
    /// A pre-release suffix after `-` is ignored. At least two components
    /// are required and every component must be a base-10 integer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidVersion`] if `input` is malformed.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: String| EngineError::InvalidVersion {
            input: input.to_string(),
            reason,
        };

        let release = input.split('-').next().unwrap_or_default();
        if !release.contains('.') {
            return Err(invalid("expected dotted components".to_string()));
        }

        release
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid(format!("{part:?} is not an integer")));
                }
                part.parse::<u64>()
                    .map_err(|e| invalid(format!("{part:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// Returns the parsed components.
    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for ApiVersion {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| {
                let left = self.0.get(i).copied().unwrap_or(0);
                let right = other.0.get(i).copied().unwrap_or(0);
                left.cmp(&right)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for ApiVersion {}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.0.iter();
        if let Some(first) = parts.next() {
            write!(f, "{first}")?;
        }
        for part in parts {
            write!(f, ".{part}")?;
        }
        Ok(())
    }
}
