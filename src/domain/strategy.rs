//! Ranking strategy selector.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The ranking rule applied to the task collection.
///
/// Wire names match the dashboard service's `prioritize` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Combined urgency + effort + dependency + importance score, descending
    #[default]
    SmartBalance,
    /// Lowest estimated hours first
    FastestWins,
    /// Highest importance first
    HighImpact,
    /// Earliest due date first, undated tasks last
    DeadlineDriven,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    /// Wire name of this strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
        }
    }

    /// Parse a wire name; anything unrecognized selects the default
    pub fn parse(raw: &str) -> Strategy {
        match raw.trim() {
            "fastest_wins" => Strategy::FastestWins,
            "high_impact" => Strategy::HighImpact,
            "deadline_driven" => Strategy::DeadlineDriven,
            _ => Strategy::SmartBalance,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_smart_balance() {
        assert_eq!(Strategy::default(), Strategy::SmartBalance);
    }

    #[test]
    fn test_wire_names_roundtrip() {
        for strategy in Strategy::ALL {
            assert_eq!(Strategy::parse(strategy.as_str()), strategy);
        }
    }

    #[test]
    fn test_unknown_name_maps_to_default() {
        assert_eq!(Strategy::parse("alphabetical"), Strategy::SmartBalance);
        assert_eq!(Strategy::parse(""), Strategy::SmartBalance);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(Strategy::parse(" high_impact "), Strategy::HighImpact);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Strategy::DeadlineDriven).unwrap();
        assert_eq!(json, "\"deadline_driven\"");
        let back: Strategy = serde_json::from_str("\"fastest_wins\"").unwrap();
        assert_eq!(back, Strategy::FastestWins);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Strategy::HighImpact.to_string(), "high_impact");
    }
}
