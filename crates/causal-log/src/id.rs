#![allow(clippy::indexing_slicing)] // fixed-size byte arrays with statically known bounds

//! Time-ordered 128-bit identifiers with the version-7 layout of RFC 9562
//! (component B).
//!
//! The crate does not use `uuid::Uuid::now_v7()` to build these: the exact
//! bit placement (timestamp high, fixed version/variant nibbles, random
//! fill) is a compatibility contract per spec section 4.B, so the bytes are
//! assembled by hand and only then wrapped in a `Uuid` for formatting and
//! parsing.

use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use causal_types::CausalLogError;

/// Generates a new version-7 identifier using the current system time and a
/// cryptographically secure random source.
///
/// Fails rather than degrading to a weaker source if the OS RNG is
/// unavailable (spec section 5 / 7).
pub fn generate() -> Result<Uuid, CausalLogError> {
    generate_at(current_millis())
}

/// Generates a version-7 identifier for an explicit millisecond timestamp.
/// Exposed for deterministic testing; [`generate`] is the normal entry
/// point.
pub fn generate_at(millis: u64) -> Result<Uuid, CausalLogError> {
    let mut random = [0u8; 10];
    OsRng
        .try_fill_bytes(&mut random)
        .map_err(|e| CausalLogError::SecureRandomUnavailable(e.to_string()))?;

    let mut bytes = [0u8; 16];
    let ts = millis.to_be_bytes();
    bytes[0..6].copy_from_slice(&ts[2..8]);
    bytes[6] = 0x70 | (random[0] & 0x0F); // version nibble 0111
    bytes[7] = random[1];
    bytes[8] = 0x80 | (random[2] & 0x3F); // variant bits 10
    bytes[9..16].copy_from_slice(&random[3..10]);

    Ok(Uuid::from_bytes(bytes))
}

pub(crate) fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Compares two identifiers by their lexicographic hex form, which equals
/// temporal order because the timestamp occupies the high 48 bits.
/// Equivalent to (and implemented as) `Uuid`'s own byte-array `Ord`.
pub fn compare(a: &Uuid, b: &Uuid) -> Ordering {
    a.cmp(b)
}

/// Extracts the millisecond timestamp from the first 12 hex nibbles (48
/// bits) of an identifier.
pub fn extract_timestamp(id: &Uuid) -> u64 {
    let bytes = id.as_bytes();
    let mut ts = [0u8; 8];
    ts[2..8].copy_from_slice(&bytes[0..6]);
    u64::from_be_bytes(ts)
}

/// Validates the exact version-7 shape from spec section 4.B:
/// `^[0-9a-f]{8}-[0-9a-f]{4}-7[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$`
/// case-insensitively. Implemented as direct character inspection rather
/// than a `regex` dependency (see `SPEC_FULL.md` section 4.B).
pub fn validate_format(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    let hyphens = [8, 13, 18, 23];
    for (i, &b) in bytes.iter().enumerate() {
        if hyphens.contains(&i) {
            if b != b'-' {
                return false;
            }
            continue;
        }
        if !b.is_ascii_hexdigit() {
            return false;
        }
    }
    bytes[14] == b'7' && matches!(bytes[19], b'8' | b'9' | b'a' | b'A' | b'b' | b'B')
}
