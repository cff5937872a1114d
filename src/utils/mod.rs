pub mod url_validator;

use crate::constants::MAX_SLUG_INPUT_LENGTH;

/// Alphabet used for generated slugs: 62 alphanumeric symbols.
const SLUG_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random slug of the given length.
///
/// Stateless and with no uniqueness guarantee of its own: uniqueness is
/// enforced by the store's unique constraint plus the registry's retry
/// loop. Uses the thread-local RNG, so concurrent callers never share a
/// fixed seed.
pub fn generate_slug(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| SLUG_ALPHABET[rand::random_range(0..SLUG_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Syntax check for slugs arriving on the lookup path.
///
/// Accepts a superset of what the generator emits (underscore and hyphen
/// included) so that rows imported from other tools still resolve.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_INPUT_LENGTH
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
