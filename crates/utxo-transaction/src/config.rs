//! Builder configuration.
//!
//! Every field has a default, so a partial JSON document such as
//! `{"dust_policy": "fold_into_fee"}` is a complete configuration.

use serde::{Deserialize, Serialize};

use crate::input::DEFAULT_SEQUENCE_NUMBER;

/// What to do with change that would be below the dust threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DustPolicy {
    /// Fail with `ChangeBelowDust`.
    #[default]
    Reject,
    /// Drop the change output and let the miner keep it.
    FoldIntoFee,
}

/// Input and output ordering of the assembled transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOrdering {
    /// Inputs in selection order; destination output first, change second.
    #[default]
    AsSelected,
    /// BIP69: inputs by displayed txid then index, outputs by value then script.
    Bip69,
}

/// How `UtxoSet::reserve` walks the available outputs.
///
/// Every strategy keeps adding inputs while the change would be non-zero
/// but below the dust threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    #[default]
    InsertionOrder,
    LargestFirst,
    /// Bounded search for the fewest inputs, then the least change; falls
    /// back to largest-first when the search finds nothing.
    BranchAndBound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Transaction version; `None` uses the network's default.
    pub version: Option<u32>,
    pub lock_time: u32,
    /// Sequence number written on every input.
    pub sequence: u32,
    pub dust_policy: DustPolicy,
    pub ordering: InputOrdering,
    pub selection: SelectionStrategy,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            version: None,
            lock_time: 0,
            sequence: DEFAULT_SEQUENCE_NUMBER,
            dust_policy: DustPolicy::Reject,
            ordering: InputOrdering::AsSelected,
            selection: SelectionStrategy::InsertionOrder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Missing fields fall back to the defaults.
    #[test]
    fn test_partial_json() {
        let config: BuilderConfig =
            serde_json::from_str(r#"{"dust_policy":"fold_into_fee","ordering":"bip69"}"#).unwrap();
        assert_eq!(config.dust_policy, DustPolicy::FoldIntoFee);
        assert_eq!(config.ordering, InputOrdering::Bip69);
        assert_eq!(config.sequence, 0xffff_ffff);
        assert_eq!(config.version, None);
        assert_eq!(config.selection, SelectionStrategy::InsertionOrder);
    }

    /// An empty document is the default configuration.
    #[test]
    fn test_empty_json_is_default() {
        let config: BuilderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BuilderConfig::default());
    }

    /// Configurations survive a serialize/deserialize cycle.
    #[test]
    fn test_config_json_roundtrip() {
        let config = BuilderConfig {
            version: Some(2),
            lock_time: 800_000,
            sequence: 0xffff_fffd,
            dust_policy: DustPolicy::Reject,
            ordering: InputOrdering::AsSelected,
            selection: SelectionStrategy::LargestFirst,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"largest_first\""));
        assert_eq!(serde_json::from_str::<BuilderConfig>(&json).unwrap(), config);
    }

    #[test]
    fn test_branch_and_bound_from_json() {
        let config: BuilderConfig = serde_json::from_str(r#"{"selection":"branch_and_bound"}"#).unwrap();
        assert_eq!(config.selection, SelectionStrategy::BranchAndBound);
    }
}
