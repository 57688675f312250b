//! The event data model: what a caller submits, and what the registry
//! stores after augmenting it (spec section 3).

use serde::{Deserialize, Serialize};

use crate::hex_digest::HexDigest;

/// A 32-byte digest, hex-encoded on the wire as `0x<64-hex>`.
pub type Digest32 = HexDigest<32>;

/// A 64-byte ECDSA signature (`r || s`), hex-encoded on the wire as
/// `0x<128-hex>`.
pub type Signature64 = HexDigest<64>;

/// An optional predecessor digest. `None` is the "explicit absent marker"
/// from spec section 3 and hashes as the literal four-byte string `null`
/// (see `causal_log::hash::sha3_concat`), never as a language-level nullity
/// that could be confused with zero bytes.
pub type PredecessorRef = Option<Digest32>;

/// The closed set of action types an event may carry (spec section 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Request,
    Response,
    Error,
    StateTransition,
}

impl ActionType {
    /// The wire string for this action type, as used in the canonical hash
    /// preimage (spec section 6) and the JSON proof format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
            Self::Error => "error",
            Self::StateTransition => "state_transition",
        }
    }
}

/// What a caller submits to `register_event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    /// Opaque agent identifier; must equal the registry's bound identifier.
    pub agent_id: String,
    /// Drawn from the closed action-type set.
    pub action_type: ActionType,
    /// 32-byte digest of the (unrecorded) payload.
    pub payload_hash: Digest32,
    /// Digest of the causal predecessor event, if any.
    pub predecessor: PredecessorRef,
    /// Client-supplied, untrusted, integer milliseconds since the epoch.
    pub timestamp: i64,
}

/// An event after registration: the input augmented with everything the
/// registry and its Merkle log computed (spec section 3, invariants
/// I1-I7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    /// Time-ordered 128-bit identifier, canonical 8-4-4-4-12 hex form.
    pub causal_event_id: String,
    pub agent_id: String,
    pub action_type: ActionType,
    pub payload_hash: Digest32,
    pub predecessor_hash: PredecessorRef,
    pub timestamp: i64,
    /// `SHA3-256(canonicalEncode(agentId, actionType, payloadHash,
    /// predecessor, timestamp))`, exactly (invariant I3).
    pub event_hash: Digest32,
    /// 0-based position in the log at insertion time (invariant I4).
    pub position_in_tree: usize,
    /// The log root immediately after this event's insertion (invariant
    /// I5).
    pub tree_root_hash: Digest32,
}
