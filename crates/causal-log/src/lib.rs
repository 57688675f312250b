//! # Causal behavioral verification log
//!
//! Cryptographic evidence that a named agent produced a sequence of actions
//! in a specific order, without trusting any centralized validator. See the
//! crate-level modules for each subsystem:
//!
//! - [`hash`] — SHA3-256 primitives (component A)
//! - [`id`] — time-ordered identifiers (component B)
//! - [`sign`] — secp256k1 ECDSA (component C)
//! - [`merkle`] — the append-only Merkle commitment (component D)
//! - [`registry`] — the causal event registry (component E)
//! - [`proof`] — the proof generator (component F)
//! - [`verify`] — the stateless verifier (component G)
//! - [`rules`] — the semantic rules engine (component H)
//! - [`light`] — light proofs and the progressive verifier (component I)
//! - [`codec`] — the header codec (component J)
//!
//! Shared data types and the error taxonomy live in the sibling
//! `causal-types` crate and are re-exported here for convenience.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

pub mod codec;
pub mod hash;
pub mod id;
pub mod light;
pub mod merkle;
pub mod proof;
pub mod registry;
pub mod rules;
pub mod sign;
pub mod telemetry;
pub mod verify;

pub use causal_types::{
    ActionType, CausalChainElement, CausalLogError, Digest32, ErrorCode, EventInput,
    LightChainElement, LightProof, Position, PredecessorRef, Proof as CausalProof,
    ProofPathStep, Signature64, StoredEvent,
};
