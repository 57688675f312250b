//! Header codec: canonical text encoding of a proof for transport
//! (component J).

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use causal_types::{CausalLogError, Proof as CausalProof};

/// Transport header name for the encoded proof (spec section 6).
pub const PROOF_HEADER_NAME: &str = "X-Causal-Proof";

/// Transport header name for the schema version tag.
pub const SCHEMA_HEADER_NAME: &str = "X-Causal-Proof-Schema";

/// The schema version value carried in [`SCHEMA_HEADER_NAME`].
pub const SCHEMA_VERSION: &str = "causal-v1";

/// `base64(utf8(canonical_json(proof)))` (spec section 4.J).
pub fn encode(proof: &CausalProof) -> Result<String, CausalLogError> {
    let json = serde_json::to_string(proof)
        .map_err(|e| CausalLogError::DecodeFailed(e.to_string()))?;
    Ok(STANDARD.encode(json))
}

/// Reverses [`encode`] and re-validates the parsed object against the
/// proof shape. Malformed base64, malformed JSON, and a schema mismatch
/// all collapse into a single [`CausalLogError::DecodeFailed`] condition
/// (spec sections 4.J, 7) — `serde`'s strongly-typed deserialization
/// itself enforces "required string fields present and correct types,
/// arrays where arrays are required".
pub fn decode(text: &str) -> Result<CausalProof, CausalLogError> {
    let bytes = STANDARD
        .decode(text)
        .map_err(|e| CausalLogError::DecodeFailed(format!("invalid base64: {e}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| CausalLogError::DecodeFailed(format!("invalid utf-8: {e}")))?;
    serde_json::from_str(&json)
        .map_err(|e| CausalLogError::DecodeFailed(format!("schema mismatch: {e}")))
}
