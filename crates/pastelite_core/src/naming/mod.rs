//! Paste identifier generation.

use crate::constants::{PASTE_ID_LEN, PASTE_KEY_PREFIX};
use rand::Rng;

/// URL-safe alphabet used for identifiers (64 symbols).
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Generate a random paste identifier.
///
/// Collisions are not checked; at 72 bits of entropy they are treated as
/// negligible.
///
/// # Returns
/// A [`PASTE_ID_LEN`]-character string drawn from `A-Za-z0-9_-`.
pub fn generate_id() -> String {
    generate_id_with(&mut rand::thread_rng())
}

/// Generate an identifier from a caller-provided RNG.
///
/// # Returns
/// A [`PASTE_ID_LEN`]-character URL-safe identifier.
pub fn generate_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..PASTE_ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Record store key for a paste id.
pub fn paste_key(id: &str) -> String {
    format!("{}{}", PASTE_KEY_PREFIX, id)
}
