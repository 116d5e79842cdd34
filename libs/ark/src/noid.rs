//! Noid generation and the NOID check digit algorithm.
//!
//! See: <https://metacpan.org/dist/Noid/view/noid#NOID-CHECK-DIGIT-ALGORITHM>

use rand::Rng;

/// The betanumeric alphabet: digits plus consonants, excluding vowels and
/// easily-confused letters. 29 characters, ordered.
pub const BETANUMERIC: &str = "0123456789bcdfghjkmnpqrstvwxz";

/// Computes the single-character check digit for an ARK string.
///
/// Each character is scored as `position * alphabet_index`, 1-indexed.
/// Characters outside the alphabet contribute nothing, and so does `0`
/// (alphabet index 0). The index-0 case is a quirk of the original weighting
/// scheme and is kept for check-digit compatibility with existing ARKs.
///
/// The remainder is always `0..29`, so indexing back into the alphabet
/// cannot fail.
pub fn noid_check_digit(noid: &str) -> char {
    let mut total = 0usize;
    for (pos, ch) in noid.chars().enumerate() {
        if let Some(score) = BETANUMERIC.find(ch) {
            total += (pos + 1) * score;
        }
    }
    let remainder = total % BETANUMERIC.len();
    BETANUMERIC.as_bytes()[remainder] as char
}

/// Generates a uniformly random betanumeric string of the given length.
///
/// Uses the thread-local CSPRNG; noids must be unguessable so that minted
/// identifiers cannot be enumerated.
pub fn generate_noid(length: usize) -> String {
    let mut rng = rand::rng();
    let alphabet = BETANUMERIC.as_bytes();
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}
