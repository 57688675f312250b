#![allow(clippy::indexing_slicing)] // windows(2) pairs are never empty

//! Semantic rules engine: declarative checks over a causal chain
//! (component H).

use std::collections::HashSet;

use causal_types::{ActionType, CausalChainElement};

/// A declarative rule set evaluated over a causal chain. `None` fields
/// are simply not checked.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub request_must_precede_response: bool,
    pub max_time_gap_ms: Option<i64>,
    pub required_action_types: Vec<ActionType>,
    pub forbidden_action_types: Vec<ActionType>,
    pub require_direct_causality: bool,
    pub min_verification_depth: Option<usize>,
}

/// The result of [`RuleSet::validate`]: `valid` holds iff `violations` is
/// empty, and each violation carries a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleValidation {
    pub valid: bool,
    pub violations: Vec<String>,
}

impl RuleSet {
    /// Evaluates every configured rule against `chain`. An empty chain is
    /// always valid, regardless of which rules are configured (spec
    /// section 4.H).
    pub fn validate(&self, chain: &[CausalChainElement]) -> RuleValidation {
        if chain.is_empty() {
            return RuleValidation {
                valid: true,
                violations: Vec::new(),
            };
        }

        let mut violations = Vec::new();

        if self.request_must_precede_response {
            self.check_request_precedes_response(chain, &mut violations);
        }
        if let Some(max_gap) = self.max_time_gap_ms {
            self.check_max_time_gap(chain, max_gap, &mut violations);
        }
        if !self.required_action_types.is_empty() {
            self.check_required_action_types(chain, &mut violations);
        }
        if !self.forbidden_action_types.is_empty() {
            self.check_forbidden_action_types(chain, &mut violations);
        }
        if self.require_direct_causality {
            self.check_direct_causality(chain, &mut violations);
        }
        if let Some(min_depth) = self.min_verification_depth {
            if chain.len() < min_depth {
                violations.push(format!(
                    "chain length {} is below the required minimum verification depth {min_depth}",
                    chain.len()
                ));
            }
        }

        RuleValidation {
            valid: violations.is_empty(),
            violations,
        }
    }

    fn check_request_precedes_response(
        &self,
        chain: &[CausalChainElement],
        violations: &mut Vec<String>,
    ) {
        let mut seen_request = false;
        for (i, element) in chain.iter().enumerate() {
            match element.action_type {
                ActionType::Request => seen_request = true,
                ActionType::Response if !seen_request => {
                    violations.push(format!(
                        "response at chain position {i} has no preceding request"
                    ));
                }
                _ => {}
            }
        }
    }

    fn check_max_time_gap(
        &self,
        chain: &[CausalChainElement],
        max_gap: i64,
        violations: &mut Vec<String>,
    ) {
        for window in chain.windows(2) {
            let gap = window[1].timestamp - window[0].timestamp;
            if gap.abs() > max_gap {
                violations.push(format!(
                    "time gap of {gap}ms between chain positions exceeds the maximum of {max_gap}ms"
                ));
            }
        }
    }

    fn check_required_action_types(
        &self,
        chain: &[CausalChainElement],
        violations: &mut Vec<String>,
    ) {
        let present: HashSet<ActionType> = chain.iter().map(|e| e.action_type).collect();
        for required in &self.required_action_types {
            if !present.contains(required) {
                violations.push(format!(
                    "required action type \"{}\" does not appear in the chain",
                    required.as_str()
                ));
            }
        }
    }

    fn check_forbidden_action_types(
        &self,
        chain: &[CausalChainElement],
        violations: &mut Vec<String>,
    ) {
        let present: HashSet<ActionType> = chain.iter().map(|e| e.action_type).collect();
        for forbidden in &self.forbidden_action_types {
            if present.contains(forbidden) {
                violations.push(format!(
                    "forbidden action type \"{}\" appears in the chain",
                    forbidden.as_str()
                ));
            }
        }
    }

    fn check_direct_causality(&self, chain: &[CausalChainElement], violations: &mut Vec<String>) {
        for (i, window) in chain.windows(2).enumerate() {
            if window[1].predecessor_hash != Some(window[0].event_hash) {
                violations.push(format!(
                    "chain position {} is not a direct causal successor of position {}",
                    i + 1,
                    i
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causal_types::Digest32;

    fn element(
        action: ActionType,
        ts: i64,
        predecessor: Option<Digest32>,
        tag: &str,
    ) -> CausalChainElement {
        CausalChainElement {
            event_hash: crate::hash::sha3(tag),
            action_type: action,
            timestamp: ts,
            predecessor_hash: predecessor,
        }
    }

    #[test]
    fn empty_chain_is_always_valid() {
        let rules = RuleSet {
            min_verification_depth: Some(5),
            ..Default::default()
        };
        let result = rules.validate(&[]);
        assert!(result.valid);
    }

    #[test]
    fn response_without_preceding_request_is_flagged() {
        let rules = RuleSet {
            request_must_precede_response: true,
            ..Default::default()
        };
        let chain = vec![element(ActionType::Response, 1_000, None, "a")];
        let result = rules.validate(&chain);
        assert!(!result.valid);
        assert_eq!(result.violations.len(), 1);
    }

    #[test]
    fn forbidden_action_type_is_flagged() {
        let rules = RuleSet {
            forbidden_action_types: vec![ActionType::Error],
            ..Default::default()
        };
        let chain = vec![element(ActionType::Error, 1_000, None, "a")];
        let result = rules.validate(&chain);
        assert!(!result.valid);
    }

    #[test]
    fn direct_causality_gap_is_flagged() {
        let rules = RuleSet {
            require_direct_causality: true,
            ..Default::default()
        };
        let first = element(ActionType::Request, 1_000, None, "a");
        let second = element(ActionType::Response, 1_500, None, "b");
        let result = rules.validate(&[first, second]);
        assert!(!result.valid);
    }

    #[test]
    fn well_formed_chain_passes_all_rules() {
        let rules = RuleSet {
            request_must_precede_response: true,
            max_time_gap_ms: Some(1_000),
            required_action_types: vec![ActionType::Request, ActionType::Response],
            forbidden_action_types: vec![ActionType::Error],
            require_direct_causality: true,
            min_verification_depth: Some(2),
        };
        let first = element(ActionType::Request, 1_000, None, "a");
        let second_hash = first.event_hash;
        let second = element(ActionType::Response, 1_500, Some(second_hash), "b");
        let result = rules.validate(&[first, second]);
        assert!(result.valid, "violations: {:?}", result.violations);
    }
}
