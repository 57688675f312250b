#![allow(clippy::indexing_slicing)] // windows(2) pairs are never empty

//! Stateless verifier: an independent re-check of a proof against an
//! expected agent identifier and public key (component G).

use causal_types::Proof as CausalProof;
use tracing::warn;

use crate::hash::event_digest;
use crate::merkle::MerkleLog;
use crate::sign::{self, PublicKey};

/// Age, in ms, past which a verified proof's trust contribution from
/// recency decays to zero (spec section 4.G: `trust_score` formula).
const TRUST_AGE_HORIZON_MS: i64 = 300_000;

/// Chain length at which the trust score's length contribution saturates.
const TRUST_LENGTH_SATURATION: usize = 10;

/// The outcome of [`verify_proof`]. `is_valid` holds iff `errors` is
/// empty; every check below contributes independently rather than
/// short-circuiting, so a proof failing multiple ways reports all of them
/// (spec section 4.G).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub verified_actions: usize,
    pub trust_score: f64,
}

/// Runs the five independent checks of spec section 4.G against `proof`:
/// identity, Merkle inclusion, signature, content integrity, and causal
/// chain integrity.
pub fn verify_proof(
    proof: &CausalProof,
    expected_agent_id: &str,
    expected_public_key: &PublicKey,
) -> VerificationReport {
    let mut errors = Vec::new();

    // 1. Identity.
    if proof.target_event.agent_id != expected_agent_id {
        errors.push(format!(
            "Agent ID mismatch: expected {expected_agent_id}, got {}",
            proof.target_event.agent_id
        ));
    }

    // 2. Inclusion.
    let root_hex = proof.tree_root_hash.to_string();
    if !MerkleLog::verify_path(proof.target_event.event_hash, &proof.proof_path, &root_hex) {
        errors.push("Merkle inclusion proof verification failed".to_string());
    }

    // 3. Signature.
    if !sign::verify(&proof.tree_root_hash, &proof.agent_signature, expected_public_key) {
        errors.push("Signature verification failed".to_string());
    }

    // 4. Content integrity.
    let recomputed = event_digest(
        &proof.target_event.agent_id,
        proof.target_event.action_type,
        &proof.target_event.payload_hash,
        &proof.target_event.predecessor_hash,
        proof.target_event.timestamp,
    );
    if recomputed != proof.target_event.event_hash {
        errors.push(
            "Content integrity check failed: recomputed event hash does not match".to_string(),
        );
    }

    // 5. Chain integrity.
    let chain_ok = check_chain_integrity(proof, &mut errors);

    let verified_actions = if chain_ok { proof.causal_chain.len() } else { 0 };
    let is_valid = errors.is_empty();
    let trust_score = if is_valid {
        trust_score(proof.causal_chain.len(), proof.target_event.timestamp)
    } else {
        0.0
    };

    if !is_valid {
        warn!(errors = ?errors, "causal proof failed verification");
    }

    VerificationReport {
        is_valid,
        errors,
        verified_actions,
        trust_score,
    }
}

fn check_chain_integrity(proof: &CausalProof, errors: &mut Vec<String>) -> bool {
    let mut ok = true;

    match proof.causal_chain.last() {
        Some(last) if last.event_hash == proof.target_event.event_hash => {}
        _ => {
            errors.push("Causal chain final hash does not match target event".to_string());
            ok = false;
        }
    }

    for window in proof.causal_chain.windows(2) {
        let (previous, current) = (&window[0], &window[1]);
        if current.predecessor_hash != Some(previous.event_hash) {
            errors.push(
                "Causal chain has a gap: predecessor does not match previous element".to_string(),
            );
            ok = false;
        }
        if current.timestamp < previous.timestamp {
            errors.push(
                "Causal chain has a temporal anomaly: timestamps are not non-decreasing"
                    .to_string(),
            );
            ok = false;
        }
    }

    ok
}

/// `0.2 + 0.4*min(len/10, 1) + 0.4*max(0, 1 - age/300000)` where `age = now
/// - targetEvent.timestamp` in ms (spec section 4.G).
fn trust_score(chain_len: usize, target_timestamp: i64) -> f64 {
    let now = crate::id::current_millis() as i64;
    let age = (now - target_timestamp).max(0) as f64;
    let length_component = (chain_len as f64 / TRUST_LENGTH_SATURATION as f64).min(1.0);
    let recency_component = (1.0 - age / TRUST_AGE_HORIZON_MS as f64).max(0.0);
    0.2 + 0.4 * length_component + 0.4 * recency_component
}
