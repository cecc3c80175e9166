/// secp256k1 keys and ECDSA signatures.
///
/// Private keys never enter this workspace; these types cover what a
/// transaction assembler needs from the signer's side: the public key that
/// owns the inputs and the signatures it returns.

pub mod public_key;
pub mod signature;

pub use public_key::PublicKey;
pub use signature::Signature;
