//! SHA3-256 hashing primitives (component A).
//!
//! `sha3_concat`'s byte-stream recipe is a compatibility contract: any
//! reimplementation must reproduce it exactly so digests computed elsewhere
//! validate here and vice versa (spec section 4.A).

use sha3::{Digest as _, Sha3_256};

use causal_types::{ActionType, Digest32, PredecessorRef};

/// The two-byte separator appended after every part, including the last.
const SEPARATOR: &[u8] = b"||";

/// The four-byte literal used in place of an absent value.
const NULL_LITERAL: &[u8] = b"null";

/// One input to [`sha3_concat`]: a UTF-8 string, raw bytes, or an explicit
/// absence (which hashes as the literal string `null`, never as zero
/// bytes — spec section 9).
#[derive(Debug, Clone, Copy)]
pub enum HashPart<'a> {
    Str(&'a str),
    Bytes(&'a [u8]),
    Absent,
}

impl<'a> HashPart<'a> {
    fn as_bytes(&self) -> &[u8] {
        match self {
            HashPart::Str(s) => s.as_bytes(),
            HashPart::Bytes(b) => b,
            HashPart::Absent => NULL_LITERAL,
        }
    }
}

impl<'a> From<&'a str> for HashPart<'a> {
    fn from(s: &'a str) -> Self {
        HashPart::Str(s)
    }
}

impl<'a> From<&'a [u8]> for HashPart<'a> {
    fn from(b: &'a [u8]) -> Self {
        HashPart::Bytes(b)
    }
}

/// Raw 32-byte SHA3-256 digest of `input`.
pub fn sha3_raw(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// SHA3-256 of `input`, hex-encoded with a leading `0x`.
///
/// Test vectors (spec section 4.A):
/// `sha3("") == 0xa7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a`,
/// `sha3("abc") == 0x3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532`.
pub fn sha3(input: impl AsRef<[u8]>) -> Digest32 {
    Digest32::new(sha3_raw(input.as_ref()))
}

/// `sha3(join(parts, "||"))`, with the separator appended after every part
/// including the last (spec section 4.A).
pub fn sha3_concat(parts: &[HashPart<'_>]) -> Digest32 {
    let mut buf = Vec::new();
    for part in parts {
        buf.extend_from_slice(part.as_bytes());
        buf.extend_from_slice(SEPARATOR);
    }
    sha3(&buf)
}

/// The canonical event encoding from spec section 6:
/// `agentId || "||" || actionType || "||" || payloadHash || "||" ||
/// (predecessor or "null") || "||" || decimal(timestamp) || "||"`.
///
/// Shared between the registry (which computes it at insertion, I3) and
/// the verifier (which recomputes it to check content integrity).
pub fn event_digest(
    agent_id: &str,
    action_type: ActionType,
    payload_hash: &Digest32,
    predecessor: &PredecessorRef,
    timestamp: i64,
) -> Digest32 {
    let payload_hex = payload_hash.to_string();
    let predecessor_part = predecessor.as_ref().map(|d| d.to_string());
    let timestamp_str = timestamp.to_string();
    sha3_concat(&[
        HashPart::Str(agent_id),
        HashPart::Str(action_type.as_str()),
        HashPart::Str(&payload_hex),
        match &predecessor_part {
            Some(hex) => HashPart::Str(hex),
            None => HashPart::Absent,
        },
        HashPart::Str(&timestamp_str),
    ])
}
