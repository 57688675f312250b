#![allow(clippy::indexing_slicing)] // windows(2) pairs are never empty

//! Light proofs and the progressive (two-phase) trust pipeline: a
//! synchronous sub-millisecond admission check, with an optional deferred
//! full cryptographic verification (component I).

use tokio::task::JoinHandle;

use causal_types::{LightProof, Proof as CausalProof};

use crate::sign::PublicKey;
use crate::verify::{verify_proof, VerificationReport};

/// Options for [`check_light_proof`]. Defaults match spec section 4.I.
#[derive(Debug, Clone, Copy)]
pub struct LightCheckOptions {
    pub min_depth: usize,
    pub max_age_ms: i64,
}

impl Default for LightCheckOptions {
    fn default() -> Self {
        Self {
            min_depth: 3,
            max_age_ms: 300_000,
        }
    }
}

/// The fast, non-cryptographic admission check (spec section 4.I). Runs in
/// single-digit milliseconds: no hashing, no signature verification.
pub fn check_light_proof(
    proof: &LightProof,
    expected_agent_id: &str,
    options: &LightCheckOptions,
    now_ms: i64,
) -> bool {
    if proof.agent_id != expected_agent_id {
        return false;
    }
    if now_ms - proof.timestamp > options.max_age_ms {
        return false;
    }
    if proof.chain.len() < options.min_depth {
        return false;
    }
    let Some(last) = proof.chain.last() else {
        return false;
    };
    if last.event_hash != proof.target_event_hash {
        return false;
    }
    if !proof.chain.iter().any(|e| e.event_hash == proof.target_event_hash) {
        return false;
    }
    proof
        .chain
        .windows(2)
        .all(|window| window[1].timestamp >= window[0].timestamp)
}

/// Options for the progressive verifier. Defaults match spec section 4.I.
#[derive(Debug, Clone, Copy)]
pub struct ProgressiveOptions {
    pub auto_verify_full: bool,
    pub is_high_value: bool,
    pub min_depth: usize,
    pub max_age_ms: i64,
}

impl Default for ProgressiveOptions {
    fn default() -> Self {
        Self {
            auto_verify_full: true,
            is_high_value: false,
            min_depth: 3,
            max_age_ms: 300_000,
        }
    }
}

/// What the progressive verifier needs to know about the expected party.
#[derive(Debug, Clone)]
pub struct VerificationContext {
    pub agent_id: String,
    pub public_key: Option<PublicKey>,
}

/// Refusal reason when `isHighValue` forces a full check before any
/// decision is made.
pub const REASON_HIGH_VALUE: &str = "high_value_requires_full_verification";

/// Refusal reason when the light check itself failed.
pub const REASON_LIGHT_FAILED: &str = "light_verification_failed";

/// Immediate trust value granted when the light check passes, pending any
/// deferred full verification.
const IMMEDIATE_TRUST_ON_LIGHT_PASS: f64 = 0.7;

/// The outcome of [`evaluate`]. `deferred` is `Some` only when a full
/// verification was actually scheduled (spec section 4.I: "schedules
/// `verifyProof(full, ...)` on a later scheduler tick").
pub struct ProgressiveOutcome {
    pub can_proceed: bool,
    pub reason: Option<&'static str>,
    pub immediate_trust: f64,
    pub deferred: Option<JoinHandle<VerificationReport>>,
}

/// Runs the light check synchronously and, if conditions allow, schedules
/// a deferred full verification (spec section 4.I).
///
/// `full` and `context.public_key` must both be present, and
/// `options.auto_verify_full` must be set, for a deferred check to be
/// scheduled; otherwise `deferred` is `None` even when `can_proceed` is
/// `true`. Requires a `tokio` runtime to be active (the caller is inside
/// one, or polling the returned handle is never attempted).
pub fn evaluate(
    light: &LightProof,
    full: Option<CausalProof>,
    context: &VerificationContext,
    options: &ProgressiveOptions,
    now_ms: i64,
) -> ProgressiveOutcome {
    let light_options = LightCheckOptions {
        min_depth: options.min_depth,
        max_age_ms: options.max_age_ms,
    };
    let light_passed = check_light_proof(light, &context.agent_id, &light_options, now_ms);
    let immediate_trust = if light_passed { IMMEDIATE_TRUST_ON_LIGHT_PASS } else { 0.0 };

    if options.is_high_value {
        return ProgressiveOutcome {
            can_proceed: false,
            reason: Some(REASON_HIGH_VALUE),
            immediate_trust,
            deferred: None,
        };
    }

    if !light_passed {
        return ProgressiveOutcome {
            can_proceed: false,
            reason: Some(REASON_LIGHT_FAILED),
            immediate_trust,
            deferred: None,
        };
    }

    let deferred = match (options.auto_verify_full, full, context.public_key) {
        (true, Some(full_proof), Some(public_key)) => {
            let agent_id = context.agent_id.clone();
            Some(tokio::spawn(async move {
                verify_proof(&full_proof, &agent_id, &public_key)
            }))
        }
        _ => None,
    };

    ProgressiveOutcome {
        can_proceed: true,
        reason: None,
        immediate_trust,
        deferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causal_types::LightChainElement;

    fn sample_light_proof(timestamp: i64) -> LightProof {
        let e1 = crate::hash::sha3("e1");
        let e2 = crate::hash::sha3("e2");
        let e3 = crate::hash::sha3("e3");
        LightProof {
            agent_id: "0xA".to_string(),
            target_event_hash: e3,
            chain: vec![
                LightChainElement { event_hash: e1, timestamp: 1_000 },
                LightChainElement { event_hash: e2, timestamp: 1_200 },
                LightChainElement { event_hash: e3, timestamp: 1_500 },
            ],
            timestamp,
        }
    }

    #[test]
    fn light_check_accepts_fresh_well_formed_chain() {
        let proof = sample_light_proof(1_000_000);
        let options = LightCheckOptions::default();
        assert!(check_light_proof(&proof, "0xA", &options, 1_000_100));
    }

    #[test]
    fn light_check_rejects_non_monotonic_timestamps() {
        let mut proof = sample_light_proof(1_000_000);
        proof.chain[1].timestamp = 900;
        let options = LightCheckOptions::default();
        assert!(!check_light_proof(&proof, "0xA", &options, 1_000_100));
    }

    #[test]
    fn stale_light_proof_fails_and_blocks_proceeding() {
        let now = 2_000_000;
        let proof = sample_light_proof(now - 1_000_000);
        let context = VerificationContext { agent_id: "0xA".to_string(), public_key: None };
        let outcome = evaluate(&proof, None, &context, &ProgressiveOptions::default(), now);
        assert!(!outcome.can_proceed);
        assert_eq!(outcome.reason, Some(REASON_LIGHT_FAILED));
    }

    #[test]
    fn high_value_always_refuses_even_with_fresh_light_proof() {
        let now = 2_000_000;
        let proof = sample_light_proof(now - 1_000);
        let context = VerificationContext { agent_id: "0xA".to_string(), public_key: None };
        let options = ProgressiveOptions { is_high_value: true, ..Default::default() };
        let outcome = evaluate(&proof, None, &context, &options, now);
        assert!(!outcome.can_proceed);
        assert_eq!(outcome.reason, Some(REASON_HIGH_VALUE));
    }

    #[tokio::test]
    async fn fresh_light_proof_with_full_and_key_schedules_deferred_verification() {
        let mut registry = crate::registry::CausalRegistry::new("0xA")
            .expect("\"0xA\" is a non-empty agent id");
        let request = registry
            .register_event(causal_types::EventInput {
                agent_id: "0xA".to_string(),
                action_type: causal_types::ActionType::Request,
                payload_hash: crate::hash::sha3("p"),
                predecessor: None,
                timestamp: 1_000,
            })
            .expect("well-formed event must register");
        let priv_key =
            crate::sign::PrivateKey::generate().expect("OS RNG available in test environment");
        let pub_key = priv_key.public_key();
        let full = crate::proof::generate_proof(&registry, &request.causal_event_id, &priv_key, 10)
            .expect("target id is registered");

        let now = crate::id::current_millis() as i64;
        let light = LightProof {
            agent_id: "0xA".to_string(),
            target_event_hash: request.event_hash,
            chain: vec![LightChainElement { event_hash: request.event_hash, timestamp: 1_000 }],
            timestamp: now,
        };
        let options = ProgressiveOptions { min_depth: 1, ..Default::default() };
        let context = VerificationContext {
            agent_id: "0xA".to_string(),
            public_key: Some(pub_key),
        };

        let outcome = evaluate(&light, Some(full), &context, &options, now);
        assert!(outcome.can_proceed);
        assert_eq!(outcome.immediate_trust, IMMEDIATE_TRUST_ON_LIGHT_PASS);
        let handle = outcome
            .deferred
            .expect("auto_verify_full with key and full proof schedules a deferred check");
        let report = handle.await.expect("deferred task must not panic");
        assert!(report.is_valid);
    }
}
