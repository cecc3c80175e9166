use proptest::prelude::*;

use utxo_primitives::base58;
use utxo_primitives::bech32::{self, Variant};
use utxo_primitives::cashaddr;
use utxo_primitives::txid::Txid;
use utxo_primitives::util::{ByteReader, ByteWriter, VarInt};

const BECH32_CHARS: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn varint_written_then_read(value in any::<u64>()) {
        let mut w = ByteWriter::new();
        w.write_varint(VarInt(value));
        prop_assert_eq!(w.len(), VarInt(value).length());
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        prop_assert_eq!(r.read_varint().unwrap().value(), value);
        prop_assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn txid_display_parses_back(bytes in prop::array::uniform32(any::<u8>())) {
        let txid = Txid::from_wire_bytes(bytes);
        let parsed = Txid::from_hex(&txid.to_string()).unwrap();
        prop_assert_eq!(parsed, txid);
    }

    /// Replacing any data character of a Bech32m string with a different
    /// alphabet character must break the checksum.
    #[test]
    fn bech32_single_substitution_detected(
        program in prop::collection::vec(any::<u8>(), 32),
        pos_seed in any::<usize>(),
        replacement in 0usize..32,
    ) {
        let mut data = vec![1u8];
        data.extend(bech32::convert_bits(&program, 8, 5, true).unwrap());
        let encoded = bech32::encode("bc", &data, Variant::Bech32m).unwrap();

        let data_start = 3;
        let pos = data_start + pos_seed % (encoded.len() - data_start);
        let mut chars = encoded.clone().into_bytes();
        prop_assume!(chars[pos] != BECH32_CHARS[replacement]);
        chars[pos] = BECH32_CHARS[replacement];
        let mutated = String::from_utf8(chars).unwrap();
        prop_assert!(bech32::decode(&mutated).is_err());
    }

    #[test]
    fn cashaddr_single_substitution_detected(
        hash in prop::collection::vec(any::<u8>(), 20),
        pos_seed in any::<usize>(),
        replacement in 0usize..32,
    ) {
        let mut payload = vec![0u8];
        payload.extend(&hash);
        let encoded = cashaddr::encode("bitcoincash", &payload).unwrap();
        let data_start = "bitcoincash:".len();
        let pos = data_start + pos_seed % (encoded.len() - data_start);
        let mut chars = encoded.into_bytes();
        prop_assume!(chars[pos] != BECH32_CHARS[replacement]);
        chars[pos] = BECH32_CHARS[replacement];
        let mutated = String::from_utf8(chars).unwrap();
        prop_assert!(cashaddr::decode(&mutated, "bitcoincash").is_err());
    }

    #[test]
    fn base58check_decode_is_deterministic(version in any::<u8>(), payload in prop::collection::vec(any::<u8>(), 20)) {
        let encoded = base58::check_encode(version, &payload);
        let first = base58::check_decode(&encoded).unwrap();
        let second = base58::check_decode(&encoded).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, (version, payload));
    }
}
