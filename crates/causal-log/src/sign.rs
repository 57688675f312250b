#![allow(clippy::indexing_slicing)] // fixed-size scalar buffers with statically known bounds

//! ECDSA over secp256k1: keygen, sign, verify, recover, with low-s
//! canonicalization (component C).
//!
//! Grounded on the only real secp256k1/ECDSA pattern present in the
//! reference corpus: a process-wide `Secp256k1<All>` context behind
//! `once_cell::sync::Lazy`, native crate types at the API boundary, and
//! wire conversion only at the edge.

use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId, Signature as EcdsaSignature};
use secp256k1::{All, Message, Secp256k1};

use causal_types::{CausalLogError, Digest32, Signature64};

static CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// secp256k1 group order `n`, big-endian.
const ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// `n / 2`, big-endian — the BIP-62 low-s threshold.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

fn is_zero(bytes: &[u8; 32]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

/// A private scalar in `[1, n-1]`.
#[derive(Clone)]
pub struct PrivateKey(secp256k1::SecretKey);

/// An uncompressed public curve point.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(secp256k1::PublicKey);

impl PrivateKey {
    /// Generates a new private key from a cryptographically secure random
    /// source. Never falls back to a weaker source — fails instead (spec
    /// sections 4.C, 5, 7).
    pub fn generate() -> Result<Self, CausalLogError> {
        // A uniformly random 32-byte string is a valid secp256k1 scalar
        // with overwhelming probability; retry a few times for the
        // astronomically unlikely case that it lands outside [1, n-1].
        for _ in 0..8 {
            let mut bytes = [0u8; 32];
            OsRng
                .try_fill_bytes(&mut bytes)
                .map_err(|e| CausalLogError::SecureRandomUnavailable(e.to_string()))?;
            if let Ok(sk) = secp256k1::SecretKey::from_slice(&bytes) {
                return Ok(Self(sk));
            }
        }
        Err(CausalLogError::SecureRandomUnavailable(
            "failed to derive a valid secp256k1 scalar after repeated attempts".to_string(),
        ))
    }

    /// Derives the corresponding public key (scalar multiply the
    /// generator).
    pub fn public_key(&self) -> PublicKey {
        PublicKey(secp256k1::PublicKey::from_secret_key(&CONTEXT, &self.0))
    }

    /// Hex-encodes the 32-byte scalar as `0x<64-hex>`.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.secret_bytes()))
    }

    /// Parses a `0x<64-hex>` private key.
    pub fn from_hex(s: &str) -> Option<Self> {
        let stripped = s.strip_prefix("0x")?;
        let bytes = hex::decode(stripped).ok()?;
        secp256k1::SecretKey::from_slice(&bytes).ok().map(Self)
    }
}

impl PublicKey {
    /// Hex-encodes the uncompressed point `0x04 || X || Y` as
    /// `0x<130-hex>`.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.serialize_uncompressed()))
    }

    /// Parses a `0x04`-prefixed uncompressed public key. Returns `None` on
    /// any parse failure rather than propagating an error (spec section
    /// 4.C: "catchable failures in parsing inputs return false/null").
    pub fn from_hex(s: &str) -> Option<Self> {
        let stripped = s.strip_prefix("0x")?;
        let bytes = hex::decode(stripped).ok()?;
        secp256k1::PublicKey::from_slice(&bytes).ok().map(Self)
    }
}

/// Signs a 32-byte message digest, returning `0x || r || s` with `s`
/// normalized to the lower half of the curve order (spec section 4.C).
/// Nonce derivation is deterministic (RFC 6979), matching the "deterministic
/// derivation permitted and preferred" guidance.
pub fn sign(message_hash: &Digest32, priv_key: &PrivateKey) -> Result<Signature64, CausalLogError> {
    let message = Message::from_digest(*message_hash.as_bytes());
    // libsecp256k1 always produces a low-s signature and internally retries
    // the nonce on the (astronomically unlikely) r == 0 / s == 0 cases.
    let signature = CONTEXT.sign_ecdsa(&message, &priv_key.0);
    Ok(Signature64::new(signature.serialize_compact()))
}

/// Verifies a signature against a message digest and public key.
///
/// Rejects (returns `false`, never panics or throws) if either scalar is
/// outside `(0, n)`, if `s` is not in low-s form (BIP-62 malleability), or
/// if the signature does not verify (spec section 4.C).
pub fn verify(message_hash: &Digest32, sig: &Signature64, pub_key: &PublicKey) -> bool {
    let bytes = sig.as_bytes();
    let r: [u8; 32] = match bytes[0..32].try_into() {
        Ok(r) => r,
        Err(_) => return false,
    };
    let s: [u8; 32] = match bytes[32..64].try_into() {
        Ok(s) => s,
        Err(_) => return false,
    };
    if is_zero(&r) || is_zero(&s) || r >= ORDER || s >= ORDER {
        return false;
    }
    if s > HALF_ORDER {
        return false;
    }

    let Ok(signature) = EcdsaSignature::from_compact(bytes) else {
        return false;
    };
    let message = Message::from_digest(*message_hash.as_bytes());
    CONTEXT.verify_ecdsa(&message, &signature, &pub_key.0).is_ok()
}

/// Recovers the public key that produced `sig` over `message_hash`, given
/// the recovery bit. Returns `None` for any parse failure or if the
/// recovered point is not on-curve (spec section 4.C).
pub fn recover_public_key(
    message_hash: &Digest32,
    sig: &Signature64,
    recovery_id: u8,
) -> Option<PublicKey> {
    let recovery_id = RecoveryId::from_i32(recovery_id as i32).ok()?;
    let recoverable = RecoverableSignature::from_compact(sig.as_bytes(), recovery_id).ok()?;
    let message = Message::from_digest(*message_hash.as_bytes());
    CONTEXT
        .recover_ecdsa(&message, &recoverable)
        .ok()
        .map(PublicKey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha3;

    #[test]
    fn sign_then_verify_round_trips() {
        let priv_key = PrivateKey::generate().expect("OS RNG available in test environment");
        let pub_key = priv_key.public_key();
        let digest = sha3("hello");
        let sig = sign(&digest, &priv_key).expect("signing with a valid key cannot fail");
        assert!(verify(&digest, &sig, &pub_key));
    }

    #[test]
    fn high_s_signature_is_rejected() {
        let priv_key = PrivateKey::generate().expect("OS RNG available in test environment");
        let pub_key = priv_key.public_key();
        let digest = sha3("hello");
        let sig = sign(&digest, &priv_key).expect("signing with a valid key cannot fail");

        let mut bytes = *sig.as_bytes();
        let s: [u8; 32] = bytes[32..64].try_into().expect("slice is 32 bytes");
        let flipped = subtract_from_order(s);
        bytes[32..64].copy_from_slice(&flipped);
        let tampered = Signature64::new(bytes);

        assert!(!verify(&digest, &tampered, &pub_key));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let priv_key = PrivateKey::generate().expect("OS RNG available in test environment");
        let other = PrivateKey::generate().expect("OS RNG available in test environment");
        let digest = sha3("hello");
        let sig = sign(&digest, &priv_key).expect("signing with a valid key cannot fail");
        assert!(!verify(&digest, &sig, &other.public_key()));
    }

    #[test]
    fn public_key_hex_round_trips() {
        let priv_key = PrivateKey::generate().expect("OS RNG available in test environment");
        let pub_key = priv_key.public_key();
        let hex = pub_key.to_hex();
        assert!(hex.starts_with("0x04"));
        let parsed = PublicKey::from_hex(&hex).expect("round trip of a valid key must parse");
        assert!(parsed == pub_key);
    }

    /// Computes `n - s` for test purposes, producing the high-s sibling of
    /// a low-s signature.
    fn subtract_from_order(s: [u8; 32]) -> [u8; 32] {
        let mut borrow: i16 = 0;
        let mut out = [0u8; 32];
        for i in (0..32).rev() {
            let mut diff = ORDER[i] as i16 - s[i] as i16 - borrow;
            if diff < 0 {
                diff += 256;
                borrow = 1;
            } else {
                borrow = 0;
            }
            out[i] = diff as u8;
        }
        out
    }
}
