//! Deterministic seed derivation for content selection.
//!
//! Every fragment choice in the composer is driven by a seed derived from the
//! page's canonical identity with 64-bit FNV-1a. The hash function is part of
//! the contract: it is fixed, non-cryptographic, and carries no runtime
//! state, so independent processes (and independent reimplementations) derive
//! identical seeds — and therefore identical content — for the same identity.
//!
//! Seeds are layered:
//!
//! 1. `section_seed(identity, section)` — one independent seed per section,
//!    so section choices never correlate with each other.
//! 2. `slot_seed(seed, index)` — one sub-seed per slot within a section, so
//!    a section composed of K slots draws from the product of its per-slot
//!    pool sizes rather than from a single pool.

use crate::canonical::CanonicalIdentity;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x100_0000_01b3;

/// Separator byte between hash inputs.
///
/// Prevents concatenation ambiguity: ("ab", "c") and ("a", "bc") must not
/// hash to the same seed. US (unit separator) never appears in canonical
/// identities or section names.
const SEP: u8 = 0x1f;

/// 64-bit FNV-1a over a byte slice.
#[must_use]
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Derive the seed for one section of one page.
///
/// Hashes `identity US section` so each section of the same page gets an
/// independent seed and the same section of different pages never shares one.
#[must_use]
pub fn section_seed(identity: &CanonicalIdentity, section: &str) -> u64 {
    let mut input = Vec::with_capacity(identity.as_str().len() + section.len() + 1);
    input.extend_from_slice(identity.as_str().as_bytes());
    input.push(SEP);
    input.extend_from_slice(section.as_bytes());
    fnv1a64(&input)
}

/// Derive a sub-seed for one slot within a section.
///
/// Re-hashes the section seed's little-endian bytes followed by the slot
/// index, so slots within a section are mutually independent.
#[must_use]
pub fn slot_seed(seed: u64, slot_index: u32) -> u64 {
    let mut input = [0u8; 13];
    input[..8].copy_from_slice(&seed.to_le_bytes());
    input[8] = SEP;
    input[9..].copy_from_slice(&slot_index.to_le_bytes());
    fnv1a64(&input)
}

/// Map a seed to an index into a pool of `len` items.
///
/// Callers must guarantee `len > 0`; the pool registry enforces non-empty
/// pools at load time.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn pick(seed: u64, len: usize) -> usize {
    debug_assert!(len > 0, "pick called with an empty pool");
    (seed % len as u64) as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Published FNV-1a 64 test vectors.
    #[test]
    fn test_fnv1a64_known_vectors() {
        assert_eq!(fnv1a64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a64(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a64(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_section_seed_is_stable() {
        let identity = CanonicalIdentity::from_normalized(
            "https://example.com/services/ai-consulting/dallas-tx/",
        );
        let a = section_seed(&identity, "intro");
        let b = section_seed(&identity, "intro");
        assert_eq!(a, b);
    }

    #[test]
    fn test_section_seed_varies_by_section() {
        let identity = CanonicalIdentity::from_normalized(
            "https://example.com/services/ai-consulting/dallas-tx/",
        );
        assert_ne!(
            section_seed(&identity, "intro"),
            section_seed(&identity, "cta")
        );
    }

    #[test]
    fn test_section_seed_varies_by_identity() {
        let dallas = CanonicalIdentity::from_normalized(
            "https://example.com/services/ai-consulting/dallas-tx/",
        );
        let phoenix = CanonicalIdentity::from_normalized(
            "https://example.com/services/ai-consulting/phoenix-az/",
        );
        assert_ne!(
            section_seed(&dallas, "intro"),
            section_seed(&phoenix, "intro")
        );
    }

    #[test]
    fn test_separator_prevents_concatenation_ambiguity() {
        let ab = CanonicalIdentity::from_normalized("https://example.com/ab");
        let a = CanonicalIdentity::from_normalized("https://example.com/a");
        assert_ne!(section_seed(&ab, "c"), section_seed(&a, "bc"));
    }

    #[test]
    fn test_slot_seeds_are_independent() {
        let seed = fnv1a64(b"some-section-seed");
        let slots: Vec<u64> = (0..8).map(|i| slot_seed(seed, i)).collect();
        for i in 0..slots.len() {
            for j in (i + 1)..slots.len() {
                assert_ne!(slots[i], slots[j], "slots {i} and {j} collided");
            }
        }
    }

    #[test]
    fn test_pick_stays_in_bounds() {
        for seed in [0u64, 1, u64::MAX, 0xdead_beef] {
            for len in 1..=17 {
                assert!(pick(seed, len) < len);
            }
        }
    }
}
