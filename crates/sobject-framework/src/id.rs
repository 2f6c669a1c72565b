//! # Record Identifiers
//!
//! The remote store hands out identifiers in two encodings: a 15-character,
//! case-sensitive short form (shown in browser URLs and copied into
//! configuration by hand) and an 18-character canonical form (returned by the
//! API). Both name the same record. The 3-character suffix of the long form
//! encodes, block by block, which of the first 15 characters are uppercase.
//!
//! Only the canonical form is ever stored as prior state. [`ids_equivalent`]
//! lets the resolver compare a short-form configuration value against the
//! stored long form without reporting a change.

const SHORT_ID_LEN: usize = 15;
const BLOCK_LEN: usize = 5;
const SUFFIX_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ012345";

/// Converts a 15-character identifier into its 18-character canonical form.
///
/// Any input that is not exactly 15 bytes long is returned unchanged. That
/// covers empty strings, identifiers that are already canonical and malformed
/// input alike; the remote store reports the malformed ones.
pub fn normalize_id(id: &str) -> String {
    if id.len() != SHORT_ID_LEN {
        return id.to_string();
    }

    let bytes = id.as_bytes();
    let mut normalized = String::with_capacity(SHORT_ID_LEN + 3);
    normalized.push_str(id);
    for block in bytes.chunks(BLOCK_LEN) {
        let mut flags = 0usize;
        for (position, ch) in block.iter().enumerate() {
            if ch.is_ascii_uppercase() {
                flags |= 1 << position;
            }
        }
        normalized.push(SUFFIX_ALPHABET[flags] as char);
    }
    normalized
}

/// Returns true when both identifiers name the same record, whichever
/// encoding each one uses. Comparison is case-sensitive.
pub fn ids_equivalent(a: &str, b: &str) -> bool {
    normalize_id(a) == normalize_id(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_short_ids_pass_through() {
        for id in ["", "001", "0015g00000ABCDEAAA", "0015g00000ABCDEAAAX", "00000000000000"] {
            assert_eq!(normalize_id(id), id);
        }
    }

    #[test]
    fn test_suffix_without_uppercase() {
        assert_eq!(normalize_id("000000000000001"), "000000000000001AAA");
    }

    #[test]
    fn test_suffix_all_uppercase() {
        assert_eq!(normalize_id("ABCDEABCDEABCDE"), "ABCDEABCDEABCDE555");
    }

    #[test]
    fn test_suffix_bit_positions() {
        // Block 1: position 0 uppercase -> 1 -> 'B'
        // Block 2: position 4 uppercase -> 16 -> 'Q'
        // Block 3: positions 1 and 2 uppercase -> 6 -> 'G'
        assert_eq!(normalize_id("A0000a000Z0XY00"), "A0000a000Z0XY00BQG");
    }

    #[test]
    fn test_lowercase_letters_do_not_count() {
        assert_eq!(normalize_id("abcdeabcdeabcde"), "abcdeabcdeabcdeAAA");
    }

    #[test]
    fn test_canonical_output_is_stable() {
        let canonical = normalize_id("0015g00000AbCdE");
        assert_eq!(canonical.len(), 18);
        assert_eq!(normalize_id(&canonical), canonical);
    }

    #[test]
    fn test_equivalence_across_encodings() {
        assert!(ids_equivalent("000000000000001", "000000000000001AAA"));
        assert!(ids_equivalent("000000000000001AAA", "000000000000001"));
        assert!(!ids_equivalent("000000000000001", "000000000000002AAA"));
    }

    #[test]
    fn test_equivalence_is_case_sensitive() {
        assert!(!ids_equivalent("0015g00000abcde", "0015g00000ABCDE"));
    }
}
