//! Address decoding and encoding against a chain's parameters.
//!
//! Decoding first classifies the string by its surface syntax, then runs
//! only the family decoder that syntax belongs to. An address whose syntax
//! belongs to a family the chain does not enable fails with
//! `UnsupportedAddressFamily` before any checksum is looked at.

mod base58check;
mod cashaddr;
mod kaspa;
mod segwit;

use utxo_primitives::bech32::CHARSET;
use utxo_primitives::PrimitivesError;

use crate::network::{AddressFamily, NetworkParameters};
use crate::script_type::ScriptType;
use crate::AddressError;

pub(crate) use kaspa::SCRIPT_HASH_LEN as KASPA_SCRIPT_HASH_LEN;

/// A checksum-verified address, tied to the network it was decoded for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAddress<'a> {
    /// Hash, witness program or public key carried by the address.
    pub payload: Vec<u8>,
    pub script_type: ScriptType,
    pub family: AddressFamily,
    pub network: &'a NetworkParameters,
}

/// Surface syntax of an address string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `prefix:payload` (CashAddr or Kaspa).
    Prefixed,
    /// `hrp1data` in a single case.
    Bech32,
    /// Prefix-less base32 in a single case, as CashAddr allows.
    Base32,
    Base58,
}

fn is_base32_char(c: u8) -> bool {
    CHARSET.contains(&c.to_ascii_lowercase())
}

fn is_single_case(s: &str) -> bool {
    !(s.bytes().any(|b| b.is_ascii_lowercase()) && s.bytes().any(|b| b.is_ascii_uppercase()))
}

fn shape_of(address: &str) -> Option<Shape> {
    if address.contains(':') {
        return Some(Shape::Prefixed);
    }
    if is_single_case(address) {
        if let Some(sep) = address.rfind('1') {
            if sep > 0 && address.bytes().skip(sep + 1).all(is_base32_char) {
                return Some(Shape::Bech32);
            }
        } else if address.bytes().all(is_base32_char) {
            return Some(Shape::Base32);
        }
    }
    if bs58_alphabet_only(address) {
        return Some(Shape::Base58);
    }
    None
}

fn bs58_alphabet_only(s: &str) -> bool {
    const ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
    s.bytes().all(|b| ALPHABET.contains(&b))
}

/// Checksum failures keep their identity; everything else is bad text.
pub(crate) fn primitives_error(e: PrimitivesError) -> AddressError {
    match e {
        PrimitivesError::ChecksumMismatch => AddressError::ChecksumMismatch,
        other => AddressError::InvalidEncoding(other.to_string()),
    }
}

fn family_not_enabled(family: &str, network: &NetworkParameters) -> AddressError {
    AddressError::UnsupportedAddressFamily(format!(
        "{} addresses are not enabled on {}",
        family, network.id
    ))
}

/// Stateless decoder for every address family.
pub struct AddressDecoder;

impl AddressDecoder {
    /// Decode `address` against `network`.
    ///
    /// # Returns
    /// The payload and script type, or the `AddressError` of the one family
    /// whose syntax the string matches.
    pub fn decode<'a>(
        address: &str,
        network: &'a NetworkParameters,
    ) -> Result<DecodedAddress<'a>, AddressError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AddressError::InvalidEncoding("empty address".to_string()));
        }
        let shape = shape_of(address)
            .ok_or_else(|| AddressError::InvalidEncoding(format!("unrecognized address '{}'", address)))?;

        let (family, (script_type, payload)) = match shape {
            Shape::Prefixed | Shape::Base32 if network.supports_family(AddressFamily::Kaspa) => {
                (AddressFamily::Kaspa, kaspa::decode(address, network)?)
            }
            Shape::Prefixed | Shape::Base32 if network.supports_family(AddressFamily::CashAddr) => {
                (AddressFamily::CashAddr, cashaddr::decode(address, network)?)
            }
            Shape::Prefixed => return Err(family_not_enabled("prefixed base32", network)),
            Shape::Bech32 => {
                if network.supports_family(AddressFamily::SegwitV0)
                    || network.supports_family(AddressFamily::Taproot)
                {
                    let decoded = segwit::decode(address, network)?;
                    let family = if decoded.0 == ScriptType::P2tr {
                        AddressFamily::Taproot
                    } else {
                        AddressFamily::SegwitV0
                    };
                    (family, decoded)
                } else if network.supports_family(AddressFamily::Base58Check) && bs58_alphabet_only(address) {
                    (AddressFamily::Base58Check, base58check::decode(address, network)?)
                } else {
                    return Err(family_not_enabled("bech32", network));
                }
            }
            Shape::Base32 => {
                // Prefix-less CashAddr. A single-case Base58Check string can
                // look the same, so that reading still gets a chance.
                let legacy = if network.supports_family(AddressFamily::Base58Check) && bs58_alphabet_only(address) {
                    Some(base58check::decode(address, network))
                } else {
                    None
                };
                match legacy {
                    Some(Ok(decoded)) => (AddressFamily::Base58Check, decoded),
                    Some(Err(e)) if !matches!(e, AddressError::ChecksumMismatch | AddressError::InvalidEncoding(_)) => {
                        return Err(e)
                    }
                    _ => return Err(family_not_enabled("cashaddr", network)),
                }
            }
            Shape::Base58 => {
                if !network.supports_family(AddressFamily::Base58Check) {
                    return Err(family_not_enabled("base58check", network));
                }
                (AddressFamily::Base58Check, base58check::decode(address, network)?)
            }
        };

        tracing::debug!(
            network = %network.id,
            family = ?family,
            script_type = %script_type,
            "decoded address"
        );
        Ok(DecodedAddress {
            payload,
            script_type,
            family,
            network,
        })
    }

    /// Encode a payload as an address of `network`.
    ///
    /// P2PKH and P2SH prefer CashAddr where the chain enables it; the
    /// result always carries the prefix.
    pub fn encode(
        script_type: ScriptType,
        payload: &[u8],
        network: &NetworkParameters,
    ) -> Result<String, AddressError> {
        let prefix = network.cashaddr_prefix.as_deref();
        match script_type {
            _ if network.supports_family(AddressFamily::Kaspa) => {
                let prefix = prefix.ok_or_else(|| family_not_enabled("kaspa", network))?;
                kaspa::encode(script_type, payload, prefix)
            }
            ScriptType::P2pkh | ScriptType::P2sh => {
                check_len(script_type, payload)?;
                match prefix {
                    Some(prefix) if network.supports_family(AddressFamily::CashAddr) => {
                        cashaddr::encode(script_type, payload, prefix)
                    }
                    _ if network.supports_family(AddressFamily::Base58Check) => {
                        base58check::encode(script_type, payload, network)
                    }
                    _ => Err(family_not_enabled("base58check", network)),
                }
            }
            ScriptType::P2wpkh | ScriptType::P2wsh | ScriptType::P2tr => {
                check_len(script_type, payload)?;
                segwit::encode(script_type, payload, network)
            }
            ScriptType::P2pk(_) => Err(AddressError::UnsupportedAddressFamily(format!(
                "{} has no address form on {}",
                script_type, network.id
            ))),
        }
    }
}

fn check_len(script_type: ScriptType, payload: &[u8]) -> Result<(), AddressError> {
    if payload.len() != script_type.payload_len() {
        return Err(AddressError::InvalidEncoding(format!(
            "{} payload must be {} bytes, got {}",
            script_type,
            script_type.payload_len(),
            payload.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script_type::PubKeyScheme;

    fn decode_hex(address: &str, network: &NetworkParameters) -> (ScriptType, String) {
        let decoded = AddressDecoder::decode(address, network).unwrap();
        (decoded.script_type, hex::encode(decoded.payload))
    }

    // -----------------------------------------------------------------------
    // Base58Check
    // -----------------------------------------------------------------------

    #[test]
    fn test_dogecoin_p2pkh() {
        let doge = NetworkParameters::dogecoin();
        assert_eq!(
            decode_hex("D6UCu5YJ2PvokfvgnBZP1kG1Cb43m7yhyp", &doge),
            (ScriptType::P2pkh, "0e955656f1913005257fb0a8a8828bd90f2dd986".to_string())
        );
        assert_eq!(
            decode_hex("9smP2D9zLxDoDCozaptq8k5iAYzWAP9xn5", &doge),
            (ScriptType::P2sh, "0e955656f1913005257fb0a8a8828bd90f2dd986".to_string())
        );
    }

    /// Litecoin accepts both its own 0x32 and the legacy 0x05 P2SH version.
    #[test]
    fn test_litecoin_versions() {
        let ltc = NetworkParameters::litecoin();
        assert_eq!(
            decode_hex("LMbRCidgQLz1kNA77gnUpLuiv2UL6Bc4Q2", &ltc),
            (ScriptType::P2pkh, "19ff79957fbff933e6457ce6799464f6a59c7ea6".to_string())
        );
        assert_eq!(
            decode_hex("MPmoY6RX3Y3HFjGEnFxyuLPCQdjvHwMEny", &ltc),
            (ScriptType::P2sh, "ae1dd33b07b22e155ae87a1f2884c77a1dbcc229".to_string())
        );
        assert_eq!(decode_hex("3328HN66GtLuJqSXAhEQtcTLTycU6DbHTa", &ltc).0, ScriptType::P2sh);
    }

    #[test]
    fn test_dash_and_ravencoin() {
        assert_eq!(
            decode_hex("XwrhJMJKUpP21KShxqv6YcaTQZfiZXdREQ", &NetworkParameters::dash()),
            (ScriptType::P2pkh, "e837ada1d524a71b978cb475db592af5b578c603".to_string())
        );
        assert_eq!(
            decode_hex("RAcJSLUwKoq6Hg7HWmYwZWRc5inM9k95JY", &NetworkParameters::ravencoin()).0,
            ScriptType::P2pkh
        );
    }

    #[test]
    fn test_base58_checksum_mismatch() {
        let btc = NetworkParameters::bitcoin();
        assert_eq!(
            AddressDecoder::decode("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN3", &btc),
            Err(AddressError::ChecksumMismatch)
        );
    }

    /// A valid Dogecoin address is a foreign version byte on Bitcoin.
    #[test]
    fn test_base58_foreign_version_byte() {
        let btc = NetworkParameters::bitcoin();
        assert_eq!(
            AddressDecoder::decode("D6UCu5YJ2PvokfvgnBZP1kG1Cb43m7yhyp", &btc),
            Err(AddressError::UnsupportedVersionByte(0x1e))
        );
    }

    #[test]
    fn test_garbage_is_invalid_encoding() {
        let btc = NetworkParameters::bitcoin();
        assert!(matches!(
            AddressDecoder::decode("not an address!", &btc),
            Err(AddressError::InvalidEncoding(_))
        ));
        assert!(matches!(
            AddressDecoder::decode("", &btc),
            Err(AddressError::InvalidEncoding(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Segwit
    // -----------------------------------------------------------------------

    #[test]
    fn test_segwit_v0_and_taproot() {
        let btc = NetworkParameters::bitcoin();
        assert_eq!(
            decode_hex("bc1q34aq5drpuwy3wgl9lhup9892qp6svr8ldzyy7c", &btc),
            (ScriptType::P2wpkh, "8d7a0a3461e3891723e5fdf8129caa0075060cff".to_string())
        );
        assert_eq!(
            decode_hex("bc1pxwww0ct9ue7e8tdnlmug5m2tamfn7q06sahstg39ys4c9f3340qqxrdu9k", &btc),
            (
                ScriptType::P2tr,
                "339ce7e165e67d93adb3fef88a6d4beed33f01fa876f05a225242b82a631abc0".to_string()
            )
        );
        let decoded = AddressDecoder::decode(
            "bc1q67dmfccnax59247kshfkxcq6qr53wmwqfa4s28cupktj2amf5jus2j6qvt",
            &btc,
        )
        .unwrap();
        assert_eq!(decoded.script_type, ScriptType::P2wsh);
        assert_eq!(decoded.family, AddressFamily::SegwitV0);
    }

    /// Uppercase Bech32 is valid; mixed case is not.
    #[test]
    fn test_segwit_case_rules() {
        let testnet = NetworkParameters::bitcoin_testnet();
        assert_eq!(
            decode_hex("TB1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KXPJZSX", &testnet),
            (ScriptType::P2wpkh, "751e76e8199196d454941c45d1b3a323f1433bd6".to_string())
        );
        assert!(AddressDecoder::decode("tb1qW508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx", &testnet).is_err());
    }

    #[test]
    fn test_segwit_errors() {
        let btc = NetworkParameters::bitcoin();
        let cases = [
            ("bc1q2ddhp55sq2l4xnqhpdv9xazg02v9dr7uu8c2p2", AddressError::InvalidChecksum),
            // v0 program under the Bech32m constant
            ("bc1q34aq5drpuwy3wgl9lhup9892qp6svr8lc75gm6", AddressError::InvalidChecksum),
            // v1 program under the Bech32 constant
            (
                "bc1pqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq5us4ke",
                AddressError::InvalidChecksum,
            ),
            ("bc1z34aq5drpuwy3wgl9lhup9892qp6svr8lwtn7pv", AddressError::UnsupportedWitnessVersion(2)),
            (
                "bc1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqzmcn54",
                AddressError::InvalidProgramLength { version: 0, length: 25 },
            ),
            (
                "bc1p34aq5drpuwy3wgl9lhup9892qp6svr8lnqrrk3",
                AddressError::InvalidProgramLength { version: 1, length: 20 },
            ),
            (
                "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx",
                AddressError::WrongHrp { expected: "bc".to_string(), found: "tb".to_string() },
            ),
        ];
        for (address, expected) in cases {
            assert_eq!(AddressDecoder::decode(address, &btc), Err(expected), "{}", address);
        }
    }

    /// Litecoin enables segwit v0 but not taproot.
    #[test]
    fn test_litecoin_segwit() {
        let ltc = NetworkParameters::litecoin();
        assert_eq!(
            decode_hex("ltc1q5wmm9vrz55war9c0rgw26tv9un5fxnn7slyjpy", &ltc),
            (ScriptType::P2wpkh, "a3b7b2b062a51dd1970f1a1cad2d85e4e8934e7e".to_string())
        );
        assert_eq!(
            decode_hex("ltc1qqqqsyqcyq5rqwzqfpg9scrgwpugpzysnzs23v9ccrydpk8qarc0sp89z3m", &ltc).0,
            ScriptType::P2wsh
        );
    }

    #[test]
    fn test_bech32_on_legacy_chain() {
        let doge = NetworkParameters::dogecoin();
        assert!(matches!(
            AddressDecoder::decode("bc1q34aq5drpuwy3wgl9lhup9892qp6svr8ldzyy7c", &doge),
            Err(AddressError::UnsupportedAddressFamily(_))
        ));
    }

    // -----------------------------------------------------------------------
    // CashAddr
    // -----------------------------------------------------------------------

    #[test]
    fn test_cashaddr_with_and_without_prefix() {
        let bch = NetworkParameters::bitcoin_cash();
        let expected = (ScriptType::P2pkh, "fa3df88dbcffc2411894add3f30596dc7e485a7d".to_string());
        assert_eq!(decode_hex("bitcoincash:qrarm7ydhnluysgcjjka8uc9jmw8ujz605f4uwhl8d", &bch), expected);
        assert_eq!(decode_hex("qrarm7ydhnluysgcjjka8uc9jmw8ujz605f4uwhl8d", &bch), expected);
        assert_eq!(
            decode_hex("bitcoincash:ppm2qsznhks23z7629mms6s4cwef74vcwvn0h829pq", &bch),
            (ScriptType::P2sh, "76a04053bda0a88bda5177b86a15c3b29f559873".to_string())
        );
    }

    /// Bitcoin Cash still accepts legacy Base58Check addresses.
    #[test]
    fn test_cashaddr_chain_accepts_legacy() {
        let bch = NetworkParameters::bitcoin_cash();
        assert_eq!(
            decode_hex("12L7Mpbeiz2XDfk63bZpTz6QKTKkT9Ef1o", &bch),
            (ScriptType::P2pkh, "0e955656f1913005257fb0a8a8828bd90f2dd986".to_string())
        );
    }

    #[test]
    fn test_cashaddr_testnet() {
        let testnet = NetworkParameters::bitcoin_cash_testnet();
        assert_eq!(
            decode_hex("bchtest:qrpgfcqrnqvp33vsex0clktvae2pqjfxnyzjtuac9y", &testnet),
            (ScriptType::P2pkh, "c284e003981818c590c99f8fd96cee5410492699".to_string())
        );
        assert_eq!(
            decode_hex("bchtest:pr6m7j9njldwwzlg9v7v53unlr4jkmx6eyvwc0uz5t", &testnet).0,
            ScriptType::P2sh
        );
    }

    #[test]
    fn test_cashaddr_errors() {
        let bch = NetworkParameters::bitcoin_cash();
        assert_eq!(
            AddressDecoder::decode("bitcoincash:qrarm7ydhnluysgcjjka8uc9jmw8ujz605f4uwhl8e", &bch),
            Err(AddressError::ChecksumMismatch)
        );
        assert_eq!(
            AddressDecoder::decode("bchtest:qrpgfcqrnqvp33vsex0clktvae2pqjfxnyzjtuac9y", &bch),
            Err(AddressError::WrongHrp {
                expected: "bitcoincash".to_string(),
                found: "bchtest".to_string()
            })
        );
        assert_eq!(
            AddressDecoder::decode("bitcoincash:zzxh5z35v83cj9eruh7lsy5u4gq82psvlukyap3ny0", &bch),
            Err(AddressError::UnsupportedVersionByte(0x10))
        );
        assert!(AddressDecoder::decode("bitcoincash:QRARM7ydhnluysgcjjka8uc9jmw8ujz605f4uwhl8d", &bch).is_err());
    }

    /// A correctly checksummed 256-bit hash has no p2sh script on this chain.
    #[test]
    fn test_cashaddr_large_hash() {
        let testnet = NetworkParameters::bitcoin_cash_testnet();
        assert_eq!(
            AddressDecoder::decode(
                "bchtest:pvch8mmxy0rtfrlarg7ucrxxfzds5pamg73h7370aa87d80gyhqxq7fqng6m6",
                &testnet
            ),
            Err(AddressError::UnsupportedHashSize(256))
        );
    }

    #[test]
    fn test_cashaddr_on_bitcoin() {
        let btc = NetworkParameters::bitcoin();
        assert!(matches!(
            AddressDecoder::decode("bitcoincash:qrarm7ydhnluysgcjjka8uc9jmw8ujz605f4uwhl8d", &btc),
            Err(AddressError::UnsupportedAddressFamily(_))
        ));
    }

    /// Without its prefix a CashAddr is still recognized as one and refused
    /// on chains that do not enable the family.
    #[test]
    fn test_prefixless_cashaddr_on_legacy_chains() {
        for network in [NetworkParameters::bitcoin(), NetworkParameters::dogecoin()] {
            for address in [
                "qrarm7ydhnluysgcjjka8uc9jmw8ujz605f4uwhl8d",
                "QRARM7YDHNLUYSGCJJKA8UC9JMW8UJZ605F4UWHL8D",
            ] {
                match AddressDecoder::decode(address, &network) {
                    Err(AddressError::UnsupportedAddressFamily(msg)) => assert!(msg.contains("cashaddr"), "{}", msg),
                    other => panic!("{} on {}: {:?}", address, network.id, other),
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Kaspa
    // -----------------------------------------------------------------------

    #[test]
    fn test_kaspa_versions() {
        let kaspa = NetworkParameters::kaspa();
        assert_eq!(
            decode_hex("kaspa:qpsqw2aamda868dlgqczeczd28d5nc3rlrj3t87vu9q58l2tugpjs2psdm4fv", &kaspa),
            (
                ScriptType::P2pk(PubKeyScheme::Schnorr),
                "60072bbddb7a7d1dbf40302ce04d51db49e223f8e5159fcce14143fd4be20328".to_string()
            )
        );
        assert_eq!(
            decode_hex("kaspa:qyp4scvsxvkrjxyq98gd4xedhgrqtmf78l7wl8p8p4j0mjuvpwjg5cqhy97n472", &kaspa),
            (
                ScriptType::P2pk(PubKeyScheme::Ecdsa),
                "03586190332c39188029d0da9b2dba0605ed3e3ffcef9c270d64fdcb8c0ba48a60".to_string()
            )
        );
        assert_eq!(
            decode_hex("kaspa:pqurku73qluhxrmvyj799yeyptpmsflpnc8pha80z6zjh6efwg3v2rrepjm5r", &kaspa),
            (
                ScriptType::P2sh,
                "383b73d107f9730f6c24bc5293240ac3b827e19e0e1bf4ef16852beb297222c5".to_string()
            )
        );
    }

    #[test]
    fn test_kaspa_rejects_foreign_addresses() {
        let kaspa = NetworkParameters::kaspa();
        assert!(matches!(
            AddressDecoder::decode("bitcoincash:qrarm7ydhnluysgcjjka8uc9jmw8ujz605f4uwhl8d", &kaspa),
            Err(AddressError::WrongHrp { .. })
        ));
        assert!(matches!(
            AddressDecoder::decode("bc1q34aq5drpuwy3wgl9lhup9892qp6svr8ldzyy7c", &kaspa),
            Err(AddressError::UnsupportedAddressFamily(_))
        ));
        assert!(matches!(
            AddressDecoder::decode("kaspa:qpsqw2aamda868dlgqczeczd28d5nc3rlrj3t87vu9q58l2tugpjs2psdm4fw", &kaspa),
            Err(AddressError::ChecksumMismatch)
        ));
    }

    // -----------------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------------

    #[test]
    fn test_encode_known_addresses() {
        let hash = hex::decode("0e955656f1913005257fb0a8a8828bd90f2dd986").unwrap();
        assert_eq!(
            AddressDecoder::encode(ScriptType::P2pkh, &hash, &NetworkParameters::dogecoin()).unwrap(),
            "D6UCu5YJ2PvokfvgnBZP1kG1Cb43m7yhyp"
        );
        let program = hex::decode("8d7a0a3461e3891723e5fdf8129caa0075060cff").unwrap();
        assert_eq!(
            AddressDecoder::encode(ScriptType::P2wpkh, &program, &NetworkParameters::bitcoin()).unwrap(),
            "bc1q34aq5drpuwy3wgl9lhup9892qp6svr8ldzyy7c"
        );
        let output_key =
            hex::decode("339ce7e165e67d93adb3fef88a6d4beed33f01fa876f05a225242b82a631abc0").unwrap();
        assert_eq!(
            AddressDecoder::encode(ScriptType::P2tr, &output_key, &NetworkParameters::bitcoin()).unwrap(),
            "bc1pxwww0ct9ue7e8tdnlmug5m2tamfn7q06sahstg39ys4c9f3340qqxrdu9k"
        );
        let bch_hash = hex::decode("fa3df88dbcffc2411894add3f30596dc7e485a7d").unwrap();
        assert_eq!(
            AddressDecoder::encode(ScriptType::P2pkh, &bch_hash, &NetworkParameters::bitcoin_cash()).unwrap(),
            "bitcoincash:qrarm7ydhnluysgcjjka8uc9jmw8ujz605f4uwhl8d"
        );
        let key = hex::decode("03586190332c39188029d0da9b2dba0605ed3e3ffcef9c270d64fdcb8c0ba48a60").unwrap();
        assert_eq!(
            AddressDecoder::encode(ScriptType::P2pk(PubKeyScheme::Ecdsa), &key, &NetworkParameters::kaspa())
                .unwrap(),
            "kaspa:qyp4scvsxvkrjxyq98gd4xedhgrqtmf78l7wl8p8p4j0mjuvpwjg5cqhy97n472"
        );
    }

    #[test]
    fn test_encode_rejections() {
        let doge = NetworkParameters::dogecoin();
        assert!(matches!(
            AddressDecoder::encode(ScriptType::P2wpkh, &[0u8; 20], &doge),
            Err(AddressError::UnsupportedAddressFamily(_))
        ));
        assert!(matches!(
            AddressDecoder::encode(ScriptType::P2pkh, &[0u8; 19], &doge),
            Err(AddressError::InvalidEncoding(_))
        ));
        assert!(matches!(
            AddressDecoder::encode(ScriptType::P2tr, &[0u8; 32], &NetworkParameters::litecoin()),
            Err(AddressError::UnsupportedAddressFamily(_))
        ));
        assert!(matches!(
            AddressDecoder::encode(ScriptType::P2pk(PubKeyScheme::Ecdsa), &[2u8; 33], &NetworkParameters::bitcoin()),
            Err(AddressError::UnsupportedAddressFamily(_))
        ));
    }
}
