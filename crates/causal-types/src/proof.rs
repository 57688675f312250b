//! The transport forms: a full cryptographic [`Proof`] and the cheap
//! [`LightProof`] summary used for sub-millisecond admission decisions
//! (spec sections 4.F, 4.I, 6).

use serde::{Deserialize, Serialize};

use crate::event::{ActionType, Digest32, PredecessorRef, Signature64, StoredEvent};

/// Where a Merkle proof step's sibling sits relative to the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Right,
}

/// One level of an inclusion path (spec section 4.D).
///
/// A self-pair sentinel (`sibling_hash == event_hash`, `position ==
/// Right`) marks a level where the node was promoted with no sibling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofPathStep {
    pub event_hash: Digest32,
    pub sibling_hash: Digest32,
    pub position: Position,
}

/// One event in a causal chain, as carried inside a [`Proof`] (spec
/// section 4.F/4.G).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalChainElement {
    pub event_hash: Digest32,
    pub action_type: ActionType,
    pub timestamp: i64,
    pub predecessor_hash: PredecessorRef,
}

/// A self-contained proof: inclusion path + causal chain + signature over
/// the current root (spec section 4.F).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub target_event: StoredEvent,
    pub proof_path: Vec<ProofPathStep>,
    pub causal_chain: Vec<CausalChainElement>,
    pub tree_root_hash: Digest32,
    pub agent_signature: Signature64,
}

/// One entry of a [`LightProof`]'s chain summary: no signature, no
/// inclusion path, just enough to run the fast admission check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightChainElement {
    pub event_hash: Digest32,
    pub timestamp: i64,
}

/// The non-cryptographic summary used for sub-ms admission decisions
/// (spec section 4.I).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightProof {
    pub agent_id: String,
    pub target_event_hash: Digest32,
    pub chain: Vec<LightChainElement>,
    /// Generation timestamp, integer milliseconds since the epoch.
    pub timestamp: i64,
}
