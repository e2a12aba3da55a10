use serde::{Deserialize, Serialize};
use std::fmt;

/// How much confirmation a proposed action needs before it runs.
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `Low < Medium < High`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Map the free-form risk text reported by the model onto the closed enum.
    ///
    /// Empty (or whitespace-only) text means the model said nothing and maps to
    /// `Low`. Anything non-empty that is not one of the three known words maps
    /// to `Medium`, never to `Low`.
    pub fn from_reported(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "" | "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Upper-case label used in terminal output
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// Whether this level needs an explicit answer from the user
    pub fn requires_confirmation(&self) -> bool {
        *self >= RiskLevel::Medium
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert_eq!(RiskLevel::Low.max(RiskLevel::High), RiskLevel::High);
    }

    #[test]
    fn test_from_reported_known_values() {
        assert_eq!(RiskLevel::from_reported("low"), RiskLevel::Low);
        assert_eq!(RiskLevel::from_reported("MEDIUM"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_reported("  High "), RiskLevel::High);
    }

    #[test]
    fn test_from_reported_empty_is_low() {
        assert_eq!(RiskLevel::from_reported(""), RiskLevel::Low);
        assert_eq!(RiskLevel::from_reported("   "), RiskLevel::Low);
    }

    #[test]
    fn test_from_reported_unknown_is_medium() {
        assert_eq!(RiskLevel::from_reported("critical"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_reported("none"), RiskLevel::Medium);
    }

    #[test]
    fn test_requires_confirmation() {
        assert!(!RiskLevel::Low.requires_confirmation());
        assert!(RiskLevel::Medium.requires_confirmation());
        assert!(RiskLevel::High.requires_confirmation());
    }
}
