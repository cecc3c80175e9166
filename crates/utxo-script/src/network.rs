//! Per-chain consensus parameters and the registry that holds them.
//!
//! Adding a chain is a data change: either a new entry in
//! [`NetworkRegistry::default`] or a JSON entry passed to
//! [`NetworkRegistry::from_json`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::script_type::{PubKeyScheme, ScriptType};
use crate::ScriptError;

/// Textual address family a chain accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFamily {
    Base58Check,
    SegwitV0,
    Taproot,
    CashAddr,
    Kaspa,
}

/// Wire format of the chain's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionFormat {
    #[default]
    Bitcoin,
    Kaspa,
}

/// Immutable constants for one chain.
///
/// The first entry of each version list is the one used when encoding.
/// `cashaddr_prefix` doubles as the Kaspa address prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParameters {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub p2pkh_versions: Vec<u8>,
    #[serde(default)]
    pub p2sh_versions: Vec<u8>,
    #[serde(default)]
    pub bech32_hrp: Option<String>,
    #[serde(default)]
    pub cashaddr_prefix: Option<String>,
    pub families: Vec<AddressFamily>,
    pub script_types: Vec<ScriptType>,
    pub dust_threshold: u64,
    #[serde(default = "default_tx_version")]
    pub default_tx_version: u32,
    /// Replay-protection fork id; chains with one sign with BIP143 + FORKID.
    #[serde(default)]
    pub fork_id: Option<u32>,
    #[serde(default)]
    pub transaction_format: TransactionFormat,
}

fn default_tx_version() -> u32 {
    1
}

const BITCOIN_SCRIPT_TYPES: [ScriptType; 5] = [
    ScriptType::P2pkh,
    ScriptType::P2sh,
    ScriptType::P2wpkh,
    ScriptType::P2wsh,
    ScriptType::P2tr,
];

impl NetworkParameters {
    pub fn supports_family(&self, family: AddressFamily) -> bool {
        self.families.contains(&family)
    }

    pub fn supports_script_type(&self, script_type: ScriptType) -> bool {
        self.script_types.contains(&script_type)
    }

    pub fn is_kaspa(&self) -> bool {
        self.transaction_format == TransactionFormat::Kaspa
    }

    pub fn bitcoin() -> Self {
        Self {
            id: "bitcoin".into(),
            name: "Bitcoin".into(),
            p2pkh_versions: vec![0x00],
            p2sh_versions: vec![0x05],
            bech32_hrp: Some("bc".into()),
            cashaddr_prefix: None,
            families: vec![AddressFamily::Base58Check, AddressFamily::SegwitV0, AddressFamily::Taproot],
            script_types: BITCOIN_SCRIPT_TYPES.to_vec(),
            dust_threshold: 546,
            default_tx_version: 1,
            fork_id: None,
            transaction_format: TransactionFormat::Bitcoin,
        }
    }

    pub fn bitcoin_testnet() -> Self {
        Self {
            id: "bitcoin-testnet".into(),
            name: "Bitcoin Testnet".into(),
            p2pkh_versions: vec![0x6f],
            p2sh_versions: vec![0xc4],
            bech32_hrp: Some("tb".into()),
            ..Self::bitcoin()
        }
    }

    pub fn litecoin() -> Self {
        Self {
            id: "litecoin".into(),
            name: "Litecoin".into(),
            p2pkh_versions: vec![0x30],
            p2sh_versions: vec![0x32, 0x05],
            bech32_hrp: Some("ltc".into()),
            families: vec![AddressFamily::Base58Check, AddressFamily::SegwitV0],
            script_types: vec![ScriptType::P2pkh, ScriptType::P2sh, ScriptType::P2wpkh, ScriptType::P2wsh],
            dust_threshold: 5_460,
            ..Self::bitcoin()
        }
    }

    /// Base58Check-only chain sharing Bitcoin's legacy transaction format.
    fn legacy_only(id: &str, name: &str, p2pkh: u8, p2sh: u8, dust_threshold: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            p2pkh_versions: vec![p2pkh],
            p2sh_versions: vec![p2sh],
            bech32_hrp: None,
            families: vec![AddressFamily::Base58Check],
            script_types: vec![ScriptType::P2pkh, ScriptType::P2sh],
            dust_threshold,
            ..Self::bitcoin()
        }
    }

    pub fn dogecoin() -> Self {
        Self::legacy_only("dogecoin", "Dogecoin", 0x1e, 0x16, 1_000_000)
    }

    pub fn dash() -> Self {
        Self::legacy_only("dash", "Dash", 0x4c, 0x10, 546)
    }

    pub fn ravencoin() -> Self {
        Self::legacy_only("ravencoin", "Ravencoin", 0x3c, 0x7a, 546)
    }

    pub fn bitcoin_cash() -> Self {
        Self {
            id: "bitcoincash".into(),
            name: "Bitcoin Cash".into(),
            cashaddr_prefix: Some("bitcoincash".into()),
            families: vec![AddressFamily::CashAddr, AddressFamily::Base58Check],
            default_tx_version: 2,
            fork_id: Some(0),
            ..Self::legacy_only("", "", 0x00, 0x05, 546)
        }
    }

    pub fn bitcoin_cash_testnet() -> Self {
        Self {
            id: "bitcoincash-testnet".into(),
            name: "Bitcoin Cash Testnet".into(),
            p2pkh_versions: vec![0x6f],
            p2sh_versions: vec![0xc4],
            cashaddr_prefix: Some("bchtest".into()),
            ..Self::bitcoin_cash()
        }
    }

    pub fn kaspa() -> Self {
        Self {
            id: "kaspa".into(),
            name: "Kaspa".into(),
            p2pkh_versions: Vec::new(),
            p2sh_versions: Vec::new(),
            bech32_hrp: None,
            cashaddr_prefix: Some("kaspa".into()),
            families: vec![AddressFamily::Kaspa],
            script_types: vec![
                ScriptType::P2pk(PubKeyScheme::Schnorr),
                ScriptType::P2pk(PubKeyScheme::Ecdsa),
                ScriptType::P2sh,
            ],
            dust_threshold: 20_000_000,
            default_tx_version: 0,
            fork_id: None,
            transaction_format: TransactionFormat::Kaspa,
        }
    }
}

/// Chain parameters keyed by id.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: BTreeMap<String, NetworkParameters>,
}

impl NetworkRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self { networks: BTreeMap::new() }
    }

    /// Built-in chains plus the entries of a JSON array.
    ///
    /// An entry whose `id` matches a built-in chain replaces it.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let entries: Vec<NetworkParameters> = serde_json::from_str(json)?;
        let mut registry = Self::default();
        for params in entries {
            validate(&params)?;
            tracing::debug!(network = %params.id, "loaded network parameters");
            registry.insert(params);
        }
        Ok(registry)
    }

    /// Add or replace a chain, returning the entry it replaced.
    pub fn insert(&mut self, params: NetworkParameters) -> Option<NetworkParameters> {
        self.networks.insert(params.id.clone(), params)
    }

    pub fn get(&self, id: &str) -> Option<&NetworkParameters> {
        self.networks.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkParameters> {
        self.networks.values()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for params in [
            NetworkParameters::bitcoin(),
            NetworkParameters::bitcoin_testnet(),
            NetworkParameters::litecoin(),
            NetworkParameters::dogecoin(),
            NetworkParameters::dash(),
            NetworkParameters::ravencoin(),
            NetworkParameters::bitcoin_cash(),
            NetworkParameters::bitcoin_cash_testnet(),
            NetworkParameters::kaspa(),
        ] {
            registry.insert(params);
        }
        registry
    }
}

/// Reject entries whose enabled families lack the constants they need.
fn validate(params: &NetworkParameters) -> Result<(), ScriptError> {
    let missing = |what: &str| {
        Err(ScriptError::InvalidConfiguration(format!(
            "{}: {} required by its address families",
            params.id, what
        )))
    };
    for family in &params.families {
        match family {
            AddressFamily::Base58Check if params.p2pkh_versions.is_empty() && params.p2sh_versions.is_empty() => {
                return missing("a version byte");
            }
            AddressFamily::SegwitV0 | AddressFamily::Taproot if params.bech32_hrp.is_none() => {
                return missing("bech32_hrp");
            }
            AddressFamily::CashAddr | AddressFamily::Kaspa if params.cashaddr_prefix.is_none() => {
                return missing("cashaddr_prefix");
            }
            _ => {}
        }
    }
    Ok(())
}
