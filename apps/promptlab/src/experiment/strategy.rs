//! The four prompt-construction strategies under comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A prompt strategy. Each variant is bound to one template in
/// `experiment::prompts` and one scoring mode in `experiment::scoring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    ZeroShot,
    FewShot,
    ChainOfThought,
    Structured,
}

impl Strategy {
    /// All strategies in run order.
    pub const ALL: [Strategy; 4] = [
        Strategy::ZeroShot,
        Strategy::FewShot,
        Strategy::ChainOfThought,
        Strategy::Structured,
    ];

    /// Stable name used in the results artifact and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ZeroShot => "zero_shot",
            Strategy::FewShot => "few_shot",
            Strategy::ChainOfThought => "chain_of_thought",
            Strategy::Structured => "structured",
        }
    }

    /// Human-readable label for reports and charts.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::ZeroShot => "Zero-Shot",
            Strategy::FewShot => "Few-Shot",
            Strategy::ChainOfThought => "Chain-of-Thought",
            Strategy::Structured => "Structured (XML)",
        }
    }

    /// Structured responses are judged on XML tags, everything else on free text.
    pub fn expects_xml(&self) -> bool {
        matches!(self, Strategy::Structured)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown strategy '{0}' (expected zero_shot, few_shot, chain_of_thought or structured)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "zero_shot" => Ok(Strategy::ZeroShot),
            "few_shot" => Ok(Strategy::FewShot),
            "chain_of_thought" | "cot" => Ok(Strategy::ChainOfThought),
            "structured" => Ok(Strategy::Structured),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_artifact_keys() {
        for strategy in Strategy::ALL {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy.as_str()));
            let back: Strategy = serde_json::from_str(&json).unwrap();
            assert_eq!(back, strategy);
        }
    }

    #[test]
    fn test_run_order() {
        assert_eq!(Strategy::ALL[0], Strategy::ZeroShot);
        assert_eq!(Strategy::ALL[3], Strategy::Structured);
    }

    #[test]
    fn test_from_str_accepts_dashes_and_alias() {
        assert_eq!("zero-shot".parse::<Strategy>().unwrap(), Strategy::ZeroShot);
        assert_eq!("COT".parse::<Strategy>().unwrap(), Strategy::ChainOfThought);
        assert!("json".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_only_structured_expects_xml() {
        assert!(Strategy::Structured.expects_xml());
        assert!(!Strategy::FewShot.expects_xml());
    }
}
