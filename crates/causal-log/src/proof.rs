//! Proof generator: assembles an inclusion path, causal chain, and
//! signature over the current root (component F).

use causal_types::{CausalChainElement, CausalLogError, Proof as CausalProof};

use crate::registry::CausalRegistry;
use crate::sign::{self, PrivateKey};

/// Default causal-chain depth when the caller does not specify one.
pub const DEFAULT_CHAIN_DEPTH: usize = 10;

/// Generates a proof for the event named `target_id`.
///
/// Note that the signed root is the registry's **current** root at proof
/// generation time, not the root at the time the target event was
/// inserted — a verifier presented with this proof after further events
/// have been registered will still succeed. This is an explicit design
/// choice (spec section 4.F): the proof attests "the agent, whose log
/// presently has root R, is the one that produced the target event and
/// the chain that reached it."
pub fn generate_proof(
    registry: &CausalRegistry,
    target_id: &str,
    priv_key: &PrivateKey,
    depth: usize,
) -> Result<CausalProof, CausalLogError> {
    let target_event = registry
        .get_by_id(target_id)
        .cloned()
        .ok_or_else(|| CausalLogError::UnknownEvent(target_id.to_string()))?;

    let proof_path = registry.proof_path(target_event.position_in_tree as i64)?;

    let causal_chain = registry
        .causal_chain(target_id, depth)
        .into_iter()
        .map(|event| CausalChainElement {
            event_hash: event.event_hash,
            action_type: event.action_type,
            timestamp: event.timestamp,
            predecessor_hash: event.predecessor_hash,
        })
        .collect();

    // Sign the registry's *current* root, not the root captured on
    // `target_event` at insertion time (spec section 4.F / 9).
    let current_root = registry.root_digest().unwrap_or(target_event.tree_root_hash);
    let agent_signature = sign::sign(&current_root, priv_key)?;

    Ok(CausalProof {
        target_event,
        proof_path,
        causal_chain,
        tree_root_hash: current_root,
        agent_signature,
    })
}

/// Generates a proof for each identifier in `target_ids`, in order. Any
/// single failure aborts the batch (spec section 4.F: "Batch form applies
/// `generate` over a list").
pub fn generate_proofs(
    registry: &CausalRegistry,
    target_ids: &[String],
    priv_key: &PrivateKey,
    depth: usize,
) -> Result<Vec<CausalProof>, CausalLogError> {
    target_ids
        .iter()
        .map(|id| generate_proof(registry, id, priv_key, depth))
        .collect()
}
