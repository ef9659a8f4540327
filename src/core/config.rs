//! Behaviour switches for range construction

/// How single-position ranges are tagged when read from flat arrays
///
/// A range such as `[5, 5]` has no direction of its own. Once tagged, the
/// direction travels with the range through coalescing and composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingletonPolicy {
    /// Tag singletons as forward, like any range with `start <= end`
    #[default]
    Explicit,
    /// Tag singletons with the direction of the preceding range
    /// - Matches legacy readers where `[7, 6], [5, 5]` stays on the reverse strand
    /// - The first range of a list is still tagged forward
    InheritPrevious,
}

impl SingletonPolicy {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "explicit" | "forward" | "default" => Some(SingletonPolicy::Explicit),
            "inherit" | "inherit-previous" | "legacy" => Some(SingletonPolicy::InheritPrevious),
            _ => None,
        }
    }

    /// Check if singletons inherit their predecessor's direction
    pub fn inherits(&self) -> bool {
        matches!(self, SingletonPolicy::InheritPrevious)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_policy_from_str() {
        assert_eq!(SingletonPolicy::from_str("explicit"), Some(SingletonPolicy::Explicit));
        assert_eq!(SingletonPolicy::from_str("LEGACY"), Some(SingletonPolicy::InheritPrevious));
        assert_eq!(SingletonPolicy::from_str("inherit"), Some(SingletonPolicy::InheritPrevious));
        assert_eq!(SingletonPolicy::from_str("sideways"), None);
    }

    #[test]
    fn test_singleton_policy_default() {
        assert_eq!(SingletonPolicy::default(), SingletonPolicy::Explicit);
        assert!(!SingletonPolicy::default().inherits());
        assert!(SingletonPolicy::InheritPrevious.inherits());
    }
}
