//! Core data structures and error types for the causal behavioral
//! verification log.
//!
//! This crate carries the wire-level data model only: it has no
//! cryptographic or storage dependencies, so that callers can parse and
//! inspect proofs without pulling in `secp256k1`/`sha3`. Everything that
//! *computes* over these types lives in `causal-log`.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

pub mod error;
pub mod event;
pub mod hex_digest;
pub mod proof;

pub use error::{CausalLogError, ErrorCode};
pub use event::{ActionType, Digest32, EventInput, PredecessorRef, Signature64, StoredEvent};
pub use hex_digest::HexDigest;
pub use proof::{
    CausalChainElement, LightChainElement, LightProof, Position, Proof, ProofPathStep,
};
