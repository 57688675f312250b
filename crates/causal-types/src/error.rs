//! Error taxonomy for the causal behavioral verification log.
//!
//! Construction errors are represented here and are expected to be
//! propagated with `?`; proof-verification failures are *not* represented
//! as `CausalLogError` variants because an invalid proof is an ordinary
//! outcome, not a caller bug — those accumulate as plain `String` messages
//! in a verification report instead (see `causal-log`'s `verify` module).

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error,
/// independent of the human-readable `Display` message.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised while constructing or mutating the append-only log and its
/// causal registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CausalLogError {
    /// The agent identifier supplied to a registry was empty.
    #[error("agent identifier must not be empty")]
    EmptyAgentId,

    /// A Merkle leaf index was requested that is negative / out of range.
    #[error("leaf index {index} is out of range for a log of {len} leaves")]
    MerkleIndexOutOfRange {
        /// The requested index.
        index: i64,
        /// The number of leaves currently in the log.
        len: usize,
    },

    /// An event was registered with an `agentId` that does not match the
    /// registry's bound identifier.
    #[error("agent ID mismatch: expected {expected}, got {got}")]
    AgentMismatch {
        /// The registry's bound agent identifier.
        expected: String,
        /// The agent identifier supplied on the event.
        got: String,
    },

    /// An event's predecessor digest does not match any event already in
    /// this registry.
    #[error("unknown predecessor digest: {0}")]
    UnknownPredecessor(String),

    /// An event identifier collided with one already present in the
    /// registry (invariant I7). Astronomically unlikely with a correctly
    /// generated identifier, but checked rather than assumed.
    #[error("duplicate causal event id: {0}")]
    DuplicateEventId(String),

    /// A proof was requested for a causal identifier not present in the
    /// registry.
    #[error("unknown causal event id: {0}")]
    UnknownEvent(String),

    /// Decoding a transport header into a `Proof` failed: malformed base64,
    /// malformed JSON, or a schema mismatch. All three collapse into this
    /// single wrapped condition per spec section 7.
    #[error("failed to decode causal proof: {0}")]
    DecodeFailed(String),

    /// A cryptographically secure random source was unavailable when one
    /// was required (private key or identifier generation).
    #[error("secure random source unavailable: {0}")]
    SecureRandomUnavailable(String),
}

impl ErrorCode for CausalLogError {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptyAgentId => "CAUSAL_EMPTY_AGENT_ID",
            Self::MerkleIndexOutOfRange { .. } => "CAUSAL_MERKLE_INDEX_OUT_OF_RANGE",
            Self::AgentMismatch { .. } => "CAUSAL_AGENT_MISMATCH",
            Self::UnknownPredecessor(_) => "CAUSAL_UNKNOWN_PREDECESSOR",
            Self::DuplicateEventId(_) => "CAUSAL_DUPLICATE_EVENT_ID",
            Self::UnknownEvent(_) => "CAUSAL_UNKNOWN_EVENT",
            Self::DecodeFailed(_) => "CAUSAL_DECODE_FAILED",
            Self::SecureRandomUnavailable(_) => "CAUSAL_SECURE_RANDOM_UNAVAILABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_a_stable_code() {
        let err = CausalLogError::AgentMismatch {
            expected: "0xA".into(),
            got: "0xB".into(),
        };
        assert_eq!(err.code(), "CAUSAL_AGENT_MISMATCH");
        assert_eq!(
            err.to_string(),
            "agent ID mismatch: expected 0xA, got 0xB"
        );
    }
}
