//! Locking script construction and recognition.
//!
//! Every consensus template lives in [`LockingScriptBuilder::from_payload`];
//! decoding, key derivation and change outputs all funnel through it.

use utxo_primitives::ec::PublicKey;
use utxo_primitives::hash::{hash160, sha256};

use crate::address::{DecodedAddress, KASPA_SCRIPT_HASH_LEN};
use crate::chunk::ScriptChunk;
use crate::network::NetworkParameters;
use crate::opcodes::*;
use crate::script::Script;
use crate::script_type::{PubKeyScheme, ScriptType};
use crate::ScriptError;

/// Script bytes together with the template they follow.
///
/// Only constructed by the builder or by [`LockingScript::classify`], so
/// the bytes always match `script_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockingScript {
    script: Script,
    script_type: ScriptType,
}

impl LockingScript {
    /// Recognise the template an existing script follows.
    ///
    /// Push lengths must be the minimal direct pushes the templates use;
    /// anything else is `UnrecognizedScript`.
    pub fn classify(script: &Script) -> Result<Self, ScriptError> {
        let chunks = script.chunks().map_err(|_| ScriptError::UnrecognizedScript)?;
        let script_type = match chunks.as_slice() {
            [a, b, hash, c, d]
                if is_op(a, OP_DUP)
                    && is_op(b, OP_HASH160)
                    && is_push(hash, 20)
                    && is_op(c, OP_EQUALVERIFY)
                    && is_op(d, OP_CHECKSIG) =>
            {
                ScriptType::P2pkh
            }
            [a, hash, b] if is_op(a, OP_HASH160) && is_push(hash, 20) && is_op(b, OP_EQUAL) => {
                ScriptType::P2sh
            }
            [a, hash, b]
                if is_op(a, OP_BLAKE2B) && is_push(hash, KASPA_SCRIPT_HASH_LEN) && is_op(b, OP_EQUAL) =>
            {
                ScriptType::P2sh
            }
            [v, program] if is_op(v, OP_0) && is_push(program, 20) => ScriptType::P2wpkh,
            [v, program] if is_op(v, OP_0) && is_push(program, 32) => ScriptType::P2wsh,
            [v, program] if is_op(v, OP_1) && is_push(program, 32) => ScriptType::P2tr,
            [key, c] if is_push(key, 32) && is_op(c, OP_CHECKSIG) => ScriptType::P2pk(PubKeyScheme::Schnorr),
            [key, c]
                if (is_push(key, 33) || is_push(key, 65))
                    && (is_op(c, OP_CHECKSIG) || is_op(c, OP_CHECKSIGECDSA)) =>
            {
                ScriptType::P2pk(PubKeyScheme::Ecdsa)
            }
            _ => return Err(ScriptError::UnrecognizedScript),
        };
        Ok(Self {
            script: script.clone(),
            script_type,
        })
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn script_type(&self) -> ScriptType {
        self.script_type
    }

    pub fn into_script(self) -> Script {
        self.script
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.script.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    /// The hash, witness program or key the script commits to.
    pub fn payload(&self) -> &[u8] {
        let bytes = self.script.as_bytes();
        let range = match self.script_type {
            ScriptType::P2pkh => 3..bytes.len() - 2,
            ScriptType::P2sh | ScriptType::P2wpkh | ScriptType::P2wsh | ScriptType::P2tr => {
                2..bytes.len() - usize::from(self.script_type == ScriptType::P2sh)
            }
            ScriptType::P2pk(_) => 1..bytes.len() - 1,
        };
        &bytes[range]
    }
}

fn is_op(chunk: &ScriptChunk, op: u8) -> bool {
    chunk.op == op && chunk.data.is_none()
}

fn is_push(chunk: &ScriptChunk, len: usize) -> bool {
    usize::from(chunk.op) == len && chunk.is_push_of(len)
}

/// Stateless builder from payloads, addresses and keys to locking scripts.
pub struct LockingScriptBuilder;

impl LockingScriptBuilder {
    /// Build the locking script an address pays to.
    pub fn build(address: &DecodedAddress<'_>) -> Result<LockingScript, ScriptError> {
        Self::from_payload(address.script_type, &address.payload, address.network)
    }

    /// Build the `script_type` template around `payload` for `network`.
    ///
    /// # Arguments
    /// * `script_type` - Template to use; must be enabled on the network.
    /// * `payload` - Hash, witness program or public key, sized for the template.
    /// * `network` - Chain whose consensus rules pick the opcodes.
    ///
    /// # Returns
    /// The locking script, `UnsupportedScriptType` when the chain does not
    /// enable the template, or `InvalidPayloadLength`.
    pub fn from_payload(
        script_type: ScriptType,
        payload: &[u8],
        network: &NetworkParameters,
    ) -> Result<LockingScript, ScriptError> {
        if !network.supports_script_type(script_type) {
            return Err(ScriptError::UnsupportedScriptType {
                script_type,
                chain: network.id.clone(),
            });
        }

        let kaspa = network.is_kaspa();
        let expected = match script_type {
            ScriptType::P2sh if kaspa => KASPA_SCRIPT_HASH_LEN,
            ScriptType::P2pk(PubKeyScheme::Ecdsa) if !kaspa && payload.len() == 65 => 65,
            other => other.payload_len(),
        };
        if payload.len() != expected {
            return Err(ScriptError::InvalidPayloadLength {
                script_type,
                expected,
                got: payload.len(),
            });
        }

        let mut script = Script::new();
        match script_type {
            ScriptType::P2pkh => {
                script.append_opcodes(&[OP_DUP, OP_HASH160])?;
                script.append_push_data(payload)?;
                script.append_opcodes(&[OP_EQUALVERIFY, OP_CHECKSIG])?;
            }
            ScriptType::P2sh => {
                script.append_opcodes(&[if kaspa { OP_BLAKE2B } else { OP_HASH160 }])?;
                script.append_push_data(payload)?;
                script.append_opcodes(&[OP_EQUAL])?;
            }
            ScriptType::P2wpkh | ScriptType::P2wsh => {
                script.append_opcodes(&[OP_0])?;
                script.append_push_data(payload)?;
            }
            ScriptType::P2tr => {
                script.append_opcodes(&[OP_1])?;
                script.append_push_data(payload)?;
            }
            ScriptType::P2pk(PubKeyScheme::Schnorr) => {
                script.append_push_data(payload)?;
                script.append_opcodes(&[OP_CHECKSIG])?;
            }
            ScriptType::P2pk(PubKeyScheme::Ecdsa) => {
                script.append_push_data(payload)?;
                script.append_opcodes(&[if kaspa { OP_CHECKSIGECDSA } else { OP_CHECKSIG }])?;
            }
        }

        tracing::trace!(
            network = %network.id,
            script_type = %script_type,
            asm = %script.to_asm(),
            "built locking script"
        );
        Ok(LockingScript { script, script_type })
    }

    /// Re-derive the script a public key owns under `script_type`.
    ///
    /// P2SH and P2WSH commit to the single-key redeem script from
    /// [`single_key_redeem_script`]. Taproot uses the BIP86 key-path tweak.
    pub fn for_public_key(
        key: &PublicKey,
        script_type: ScriptType,
        network: &NetworkParameters,
    ) -> Result<LockingScript, ScriptError> {
        let payload = match script_type {
            ScriptType::P2pkh | ScriptType::P2wpkh => key.hash160().to_vec(),
            ScriptType::P2sh if network.is_kaspa() => {
                return Err(ScriptError::UnsupportedScriptType {
                    script_type,
                    chain: network.id.clone(),
                })
            }
            ScriptType::P2sh => hash160(single_key_redeem_script(key).as_bytes()).to_vec(),
            ScriptType::P2wsh => sha256(single_key_redeem_script(key).as_bytes()).to_vec(),
            ScriptType::P2tr => key.taproot_output_key()?.to_vec(),
            ScriptType::P2pk(PubKeyScheme::Schnorr) => key.x_only().to_vec(),
            ScriptType::P2pk(PubKeyScheme::Ecdsa) => key.to_compressed().to_vec(),
        };
        Self::from_payload(script_type, &payload, network)
    }
}

/// `<compressed key> OP_CHECKSIG`, the redeem or witness script behind
/// single-key P2SH and P2WSH outputs.
pub fn single_key_redeem_script(key: &PublicKey) -> Script {
    let mut bytes = Vec::with_capacity(35);
    bytes.push(OP_DATA_33);
    bytes.extend_from_slice(&key.to_compressed());
    bytes.push(OP_CHECKSIG);
    Script::from(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressDecoder;

    const UNCOMPRESSED: &str = "046DB397495FA03FE263EE4021B77C49496E5C7DB8266E6E33A03D5B3A370C3D6D744A863B14DE2457D82BEE322416523E336530760C4533AEE980F4A4CDB9A98D";

    fn script_for(address: &str, network: &NetworkParameters) -> LockingScript {
        let decoded = AddressDecoder::decode(address, network).unwrap();
        LockingScriptBuilder::build(&decoded).unwrap()
    }

    // -----------------------------------------------------------------------
    // Address to script
    // -----------------------------------------------------------------------

    #[test]
    fn test_dogecoin_p2pkh_script() {
        let script = script_for("D6UCu5YJ2PvokfvgnBZP1kG1Cb43m7yhyp", &NetworkParameters::dogecoin());
        assert_eq!(script.script().to_hex(), "76a9140e955656f1913005257fb0a8a8828bd90f2dd98688ac");
        assert_eq!(script.script_type(), ScriptType::P2pkh);
    }

    #[test]
    fn test_cashaddr_p2pkh_script() {
        let script = script_for(
            "bitcoincash:qrarm7ydhnluysgcjjka8uc9jmw8ujz605f4uwhl8d",
            &NetworkParameters::bitcoin_cash(),
        );
        assert_eq!(script.script().to_hex(), "76a914fa3df88dbcffc2411894add3f30596dc7e485a7d88ac");
        assert_eq!(script.script_type(), ScriptType::P2pkh);
    }

    #[test]
    fn test_segwit_scripts() {
        let btc = NetworkParameters::bitcoin();
        let wpkh = script_for("bc1q34aq5drpuwy3wgl9lhup9892qp6svr8ldzyy7c", &btc);
        assert_eq!(wpkh.script().to_hex(), "00148d7a0a3461e3891723e5fdf8129caa0075060cff");
        assert_eq!(wpkh.script_type(), ScriptType::P2wpkh);

        let tr = script_for("bc1pxwww0ct9ue7e8tdnlmug5m2tamfn7q06sahstg39ys4c9f3340qqxrdu9k", &btc);
        assert_eq!(
            tr.script().to_hex(),
            "5120339ce7e165e67d93adb3fef88a6d4beed33f01fa876f05a225242b82a631abc0"
        );
        assert_eq!(tr.script_type(), ScriptType::P2tr);

        let wsh = script_for("bc1q67dmfccnax59247kshfkxcq6qr53wmwqfa4s28cupktj2amf5jus2j6qvt", &btc);
        assert_eq!(wsh.len(), 34);
        assert!(wsh.script().to_hex().starts_with("0020d79bb4e3"));
    }

    #[test]
    fn test_p2sh_script() {
        let script = script_for("MPmoY6RX3Y3HFjGEnFxyuLPCQdjvHwMEny", &NetworkParameters::litecoin());
        assert_eq!(script.script().to_hex(), "a914ae1dd33b07b22e155ae87a1f2884c77a1dbcc22987");
        assert_eq!(script.len(), 23);
    }

    /// Kaspa uses its own opcodes for ECDSA keys and script hashes.
    #[test]
    fn test_kaspa_scripts() {
        let kaspa = NetworkParameters::kaspa();
        let schnorr = script_for("kaspa:qpsqw2aamda868dlgqczeczd28d5nc3rlrj3t87vu9q58l2tugpjs2psdm4fv", &kaspa);
        assert_eq!(
            schnorr.script().to_hex(),
            "2060072bbddb7a7d1dbf40302ce04d51db49e223f8e5159fcce14143fd4be20328ac"
        );
        let ecdsa = script_for("kaspa:qyp4scvsxvkrjxyq98gd4xedhgrqtmf78l7wl8p8p4j0mjuvpwjg5cqhy97n472", &kaspa);
        assert_eq!(
            ecdsa.script().to_hex(),
            "2103586190332c39188029d0da9b2dba0605ed3e3ffcef9c270d64fdcb8c0ba48a60ab"
        );
        let p2sh = script_for("kaspa:pqurku73qluhxrmvyj799yeyptpmsflpnc8pha80z6zjh6efwg3v2rrepjm5r", &kaspa);
        assert_eq!(
            p2sh.script().to_hex(),
            "aa20383b73d107f9730f6c24bc5293240ac3b827e19e0e1bf4ef16852beb297222c587"
        );
        assert_eq!(p2sh.script().to_asm().split(' ').next(), Some("OP_HASH256"));
    }

    // -----------------------------------------------------------------------
    // Payload validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_unsupported_script_type() {
        let err = LockingScriptBuilder::from_payload(ScriptType::P2tr, &[0u8; 32], &NetworkParameters::litecoin())
            .unwrap_err();
        match err {
            ScriptError::UnsupportedScriptType { script_type, chain } => {
                assert_eq!(script_type, ScriptType::P2tr);
                assert_eq!(chain, "litecoin");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_payload_length() {
        assert!(matches!(
            LockingScriptBuilder::from_payload(ScriptType::P2wsh, &[0u8; 20], &NetworkParameters::bitcoin()),
            Err(ScriptError::InvalidPayloadLength { expected: 32, got: 20, .. })
        ));
        assert!(matches!(
            LockingScriptBuilder::from_payload(ScriptType::P2sh, &[0u8; 20], &NetworkParameters::kaspa()),
            Err(ScriptError::InvalidPayloadLength { expected: 32, got: 20, .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Keys to scripts
    // -----------------------------------------------------------------------

    #[test]
    fn test_for_public_key() {
        let key = PublicKey::from_hex(UNCOMPRESSED).unwrap();
        let btc = NetworkParameters::bitcoin();
        let wpkh = LockingScriptBuilder::for_public_key(&key, ScriptType::P2wpkh, &btc).unwrap();
        assert_eq!(wpkh.script().to_hex(), "0014309a0c6efa0da7966d5c42dc5a928f6baf0e47ef");

        let p2sh = LockingScriptBuilder::for_public_key(&key, ScriptType::P2sh, &btc).unwrap();
        assert_eq!(hex::encode(p2sh.payload()), "7fa4a409afb1d71b3496be4572bec62ffb922770");

        let wsh = LockingScriptBuilder::for_public_key(&key, ScriptType::P2wsh, &btc).unwrap();
        assert_eq!(
            hex::encode(wsh.payload()),
            "d13a6d7cdb45767d92b1d0efe2b787232bf0f1a527464402cc9f5ce33e597a09"
        );
        assert_eq!(
            single_key_redeem_script(&key).to_hex(),
            "21036db397495fa03fe263ee4021b77c49496e5c7db8266e6e33a03d5b3a370c3d6dac"
        );
    }

    /// BIP86 test vector: first receiving key of the reference mnemonic.
    #[test]
    fn test_for_public_key_taproot() {
        let key = PublicKey::from_hex("03cc8a4bc64d897bddc5fbc2f670f7a8ba0b386779106cf1223c6fc5d7cd6fc115").unwrap();
        let btc = NetworkParameters::bitcoin();
        let tr = LockingScriptBuilder::for_public_key(&key, ScriptType::P2tr, &btc).unwrap();
        assert_eq!(
            tr.script().to_hex(),
            "5120a60869f0dbcf1dc659c9cecbaf8050135ea9e8cdc487053f1dc6880949dc684c"
        );
    }

    #[test]
    fn test_for_public_key_kaspa_p2sh_unsupported() {
        let key = PublicKey::from_hex(UNCOMPRESSED).unwrap();
        assert!(matches!(
            LockingScriptBuilder::for_public_key(&key, ScriptType::P2sh, &NetworkParameters::kaspa()),
            Err(ScriptError::UnsupportedScriptType { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    #[test]
    fn test_classify_templates() {
        let cases = [
            ("76a9140e955656f1913005257fb0a8a8828bd90f2dd98688ac", ScriptType::P2pkh),
            ("a914ae1dd33b07b22e155ae87a1f2884c77a1dbcc22987", ScriptType::P2sh),
            ("aa20383b73d107f9730f6c24bc5293240ac3b827e19e0e1bf4ef16852beb297222c587", ScriptType::P2sh),
            ("00148d7a0a3461e3891723e5fdf8129caa0075060cff", ScriptType::P2wpkh),
            (
                "0020d13a6d7cdb45767d92b1d0efe2b787232bf0f1a527464402cc9f5ce33e597a09",
                ScriptType::P2wsh,
            ),
            (
                "5120339ce7e165e67d93adb3fef88a6d4beed33f01fa876f05a225242b82a631abc0",
                ScriptType::P2tr,
            ),
            (
                "2060072bbddb7a7d1dbf40302ce04d51db49e223f8e5159fcce14143fd4be20328ac",
                ScriptType::P2pk(PubKeyScheme::Schnorr),
            ),
            (
                "21036db397495fa03fe263ee4021b77c49496e5c7db8266e6e33a03d5b3a370c3d6dac",
                ScriptType::P2pk(PubKeyScheme::Ecdsa),
            ),
        ];
        for (hex_str, expected) in cases {
            let script = Script::from_hex(hex_str).unwrap();
            let classified = LockingScript::classify(&script).unwrap();
            assert_eq!(classified.script_type(), expected, "{}", hex_str);
            assert_eq!(classified.script(), &script);
        }
    }

    /// OP_RETURN data and non-minimal pushes match no template.
    #[test]
    fn test_classify_rejects_other_scripts() {
        for hex_str in [
            "6a0b68656c6c6f20776f726c64",
            "76a94c140e955656f1913005257fb0a8a8828bd90f2dd98688ac",
            "0014309a0c6e",
            "",
        ] {
            let script = Script::from_hex(hex_str).unwrap();
            assert!(
                matches!(LockingScript::classify(&script), Err(ScriptError::UnrecognizedScript)),
                "{}",
                hex_str
            );
        }
    }

    #[test]
    fn test_payload_extraction() {
        let script = Script::from_hex("76a9140e955656f1913005257fb0a8a8828bd90f2dd98688ac").unwrap();
        let locking = LockingScript::classify(&script).unwrap();
        assert_eq!(hex::encode(locking.payload()), "0e955656f1913005257fb0a8a8828bd90f2dd986");
        let p2sh = LockingScript::classify(&Script::from_hex("a914ae1dd33b07b22e155ae87a1f2884c77a1dbcc22987").unwrap())
            .unwrap();
        assert_eq!(hex::encode(p2sh.payload()), "ae1dd33b07b22e155ae87a1f2884c77a1dbcc229");
    }
}
