//! Task ID generation.
//!
//! IDs have the form `<prefix>-<xxx>` where `xxx` is three characters drawn
//! uniformly from base36 lowercase (0-9, a-z). 36^3 = 46,656 suffixes per
//! prefix, so the retry bound is a soft guard against a crowded prefix.

use rand::Rng;

use crate::error::{Result, TicketlogError};

/// Symbols used for the random suffix.
pub const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix.
pub const SUFFIX_LEN: usize = 3;

/// Candidates tried before giving up.
pub const MAX_ATTEMPTS: usize = 10;

/// Generate an ID under `prefix` that `exists` does not claim.
///
/// # Errors
///
/// Returns `Exhausted` if every candidate collided.
pub fn next_id<F>(prefix: &str, exists: F) -> Result<String>
where
    F: Fn(&str) -> bool,
{
    next_id_with_rng(prefix, exists, &mut rand::rng())
}

/// Same as [`next_id`] with a caller-supplied random source.
///
/// # Errors
///
/// Returns `Exhausted` if every candidate collided.
pub fn next_id_with_rng<F, R>(prefix: &str, exists: F, rng: &mut R) -> Result<String>
where
    F: Fn(&str) -> bool,
    R: Rng + ?Sized,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let candidate = format!("{prefix}-{}", random_suffix(rng));
        if !exists(&candidate) {
            return Ok(candidate);
        }
        tracing::debug!(%candidate, attempt, "ID collision, retrying");
    }

    Err(TicketlogError::Exhausted {
        prefix: prefix.to_string(),
        attempts: MAX_ATTEMPTS,
    })
}

fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}
