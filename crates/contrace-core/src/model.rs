//! Value types shared by the contact graph and the analyses.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::GraphError;

/// Infection-exposure severity attached to every person.
///
/// The numeric value is significant: propagation compares and decays levels
/// as integers, and `Infected` is the ceiling.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum RiskLevel {
    #[default]
    Low = 0,
    Medium = 1,
    MediumHigh = 2,
    High = 3,
    VeryHigh = 4,
    Infected = 5,
}

impl RiskLevel {
    /// All levels, lowest first.
    pub const ALL: [Self; 6] = [
        Self::Low,
        Self::Medium,
        Self::MediumHigh,
        Self::High,
        Self::VeryHigh,
        Self::Infected,
    ];

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::MediumHigh => "medium-high",
            Self::High => "high",
            Self::VeryHigh => "very-high",
            Self::Infected => "infected",
        }
    }

    /// Lower this level by `steps`, flooring at [`RiskLevel::Low`].
    #[must_use]
    pub const fn saturating_lower(self, steps: u8) -> Self {
        match self.as_u8().saturating_sub(steps) {
            0 => Self::Low,
            1 => Self::Medium,
            2 => Self::MediumHigh,
            3 => Self::High,
            4 => Self::VeryHigh,
            _ => Self::Infected,
        }
    }
}

impl TryFrom<u8> for RiskLevel {
    type Error = GraphError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(GraphError::InvalidRiskLevel { value })
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a string names no known enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl FromStr for RiskLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "low" | "0" => Ok(Self::Low),
            "medium" | "1" => Ok(Self::Medium),
            "medium-high" | "mediumhigh" | "2" => Ok(Self::MediumHigh),
            "high" | "3" => Ok(Self::High),
            "very-high" | "veryhigh" | "4" => Ok(Self::VeryHigh),
            "infected" | "5" => Ok(Self::Infected),
            _ => Err(ParseEnumError {
                expected: "risk level",
                got: s.to_string(),
            }),
        }
    }
}

/// Weekly contact frequency between two people, always within `1..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Frequency(u8);

impl Frequency {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    /// Validate a raw weekly count.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidWeight`] when `value` is outside `1..=7`.
    pub fn new(value: i64) -> Result<Self, GraphError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(GraphError::InvalidWeight { value })
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person in the contact graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique key, usually an email address.
    pub key: String,
    /// Display name. Fixed once the person is registered.
    pub name: String,
    pub risk: RiskLevel,
}

/// One `name,email` token from a contact list line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDescriptor {
    pub name: String,
    pub key: String,
}

impl PersonDescriptor {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// A parsed contact: two people and how often they meet each week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: PersonDescriptor,
    pub b: PersonDescriptor,
    pub frequency: Frequency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::VeryHigh < RiskLevel::Infected);
        assert_eq!(RiskLevel::Infected.as_u8(), 5);
    }

    #[test]
    fn risk_level_try_from_rejects_six() {
        assert_eq!(RiskLevel::try_from(3), Ok(RiskLevel::High));
        assert_eq!(
            RiskLevel::try_from(6),
            Err(GraphError::InvalidRiskLevel { value: 6 })
        );
    }

    #[test]
    fn saturating_lower_floors_at_low() {
        assert_eq!(RiskLevel::High.saturating_lower(1), RiskLevel::MediumHigh);
        assert_eq!(RiskLevel::Medium.saturating_lower(2), RiskLevel::Low);
        assert_eq!(RiskLevel::Low.saturating_lower(0), RiskLevel::Low);
    }

    #[test]
    fn risk_level_parses_labels_and_digits() {
        assert_eq!("medium-high".parse(), Ok(RiskLevel::MediumHigh));
        assert_eq!(" Very_High ".parse(), Ok(RiskLevel::VeryHigh));
        assert_eq!("5".parse(), Ok(RiskLevel::Infected));
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn risk_level_serializes_as_label() {
        let json = serde_json::to_string(&RiskLevel::MediumHigh).expect("serialize");
        assert_eq!(json, "\"medium-high\"");
        let back: RiskLevel = serde_json::from_str("\"very-high\"").expect("deserialize");
        assert_eq!(back, RiskLevel::VeryHigh);
    }

    #[test]
    fn frequency_accepts_weekly_range_only() {
        assert_eq!(Frequency::new(1).map(Frequency::get), Ok(1));
        assert_eq!(Frequency::new(7).map(Frequency::get), Ok(7));
        assert_eq!(Frequency::new(0), Err(GraphError::InvalidWeight { value: 0 }));
        assert_eq!(Frequency::new(8), Err(GraphError::InvalidWeight { value: 8 }));
        assert_eq!(
            Frequency::new(-3),
            Err(GraphError::InvalidWeight { value: -3 })
        );
    }

    #[test]
    fn frequency_deserialize_validates() {
        assert!(serde_json::from_str::<Frequency>("4").is_ok());
        assert!(serde_json::from_str::<Frequency>("9").is_err());
    }
}
