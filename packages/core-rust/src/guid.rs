//! Pseudo-GUID generation for new records.
//!
//! Identifiers are built from random 4-hex-digit groups joined in the fixed
//! `8-4-4-4-12` layout. They are practically unique within one application
//! but carry no version bits and are not cryptographically strong.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

/// Number of 4-hex-digit groups that make up one identifier.
const GROUP_COUNT: usize = 8;

/// Group indices after which a dash is emitted (8-4-4-4-12 layout).
const DASH_AFTER: [usize; 4] = [1, 2, 3, 4];

/// Total length of a generated identifier: 32 hex digits plus 4 dashes.
pub const GUID_LEN: usize = 36;

static GUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .unwrap_or_else(|e| unreachable!("static guid pattern is valid: {e}"))
});

/// Generates a pseudo-GUID such as `3f2a9c01-7b4e-0d12-a9f0-5c6e7d8a9b0c`.
///
/// # Examples
///
/// ```
/// use localsync_core::guid::{guid, is_guid};
///
/// let id = guid();
/// assert!(is_guid(&id));
/// ```
#[must_use]
pub fn guid() -> String {
    guid_with(&mut rand::rng())
}

/// Generates a pseudo-GUID drawing its groups from `rng`.
///
/// A seeded `rng` yields a reproducible identifier.
#[must_use]
pub fn guid_with<R: Rng>(rng: &mut R) -> String {
    let mut out = String::with_capacity(GUID_LEN);
    for group in 0..GROUP_COUNT {
        let bits: u16 = rng.random();
        // Writing into a String cannot fail.
        let _ = write!(out, "{bits:04x}");
        if DASH_AFTER.contains(&group) {
            out.push('-');
        }
    }
    out
}

/// Returns `true` if `candidate` has the lowercase `8-4-4-4-12` hex layout.
#[must_use]
pub fn is_guid(candidate: &str) -> bool {
    GUID_PATTERN.is_match(candidate)
}

/// Source of identifiers for records created without one.
///
/// A `Store` holds one of these as `Arc<dyn IdGenerator>`; the default is
/// [`GuidGenerator`].
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh identifier.
    fn generate(&self) -> String;
}

/// Random [`guid()`]-based generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuidGenerator;

impl IdGenerator for GuidGenerator {
    fn generate(&self) -> String {
        guid()
    }
}

/// Deterministic generator yielding `{prefix}-1`, `{prefix}-2`, ...
///
/// Useful in tests and tooling where stable identifiers matter more than
/// uniqueness across processes.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    /// Creates a generator whose first identifier is `{prefix}-1`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn guid_has_fixed_layout() {
        let id = guid();
        assert_eq!(id.len(), GUID_LEN);
        let groups: Vec<usize> = id.split('-').map(str::len).collect();
        assert_eq!(groups, vec![8, 4, 4, 4, 12]);
        assert!(is_guid(&id), "{id} should match the guid pattern");
    }

    #[test]
    fn guid_is_lowercase_hex() {
        for _ in 0..100 {
            let id = guid();
            assert!(id
                .chars()
                .all(|c| c == '-' || c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn ten_thousand_guids_do_not_collide() {
        let ids: HashSet<String> = (0..10_000).map(|_| guid()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn is_guid_rejects_malformed() {
        assert!(!is_guid(""));
        assert!(!is_guid("3f2a9c01-7b4e-0d12-a9f0-5c6e7d8a9b0"));
        assert!(!is_guid("3f2a9c01-7b4e-0d12-a9f0-5c6e7d8a9b0cd"));
        assert!(!is_guid("3F2A9C01-7B4E-0D12-A9F0-5C6E7D8A9B0C"));
        assert!(!is_guid("3f2a9c017b4e0d12a9f05c6e7d8a9b0c"));
        assert!(!is_guid("3f2a9c01-7b4e-0d12-a9f0-5c6e7d8a9b0g"));
        assert!(is_guid("3f2a9c01-7b4e-0d12-a9f0-5c6e7d8a9b0c"));
    }

    #[test]
    fn guid_generator_delegates_to_guid() {
        let id = GuidGenerator.generate();
        assert!(is_guid(&id));
    }

    #[test]
    fn sequential_ids_count_from_one() {
        let ids = SequentialIds::new("todo");
        assert_eq!(ids.generate(), "todo-1");
        assert_eq!(ids.generate(), "todo-2");
        assert_eq!(ids.generate(), "todo-3");
    }

    proptest::proptest! {
        #[test]
        fn seeded_guid_matches_pattern_and_repeats(seed in proptest::num::u64::ANY) {
            let first = guid_with(&mut StdRng::seed_from_u64(seed));
            let second = guid_with(&mut StdRng::seed_from_u64(seed));
            proptest::prop_assert!(is_guid(&first), "malformed guid {}", first);
            proptest::prop_assert_eq!(first, second);
        }

        #[test]
        fn sequential_ids_keep_prefix(prefix in "[a-z][a-z0-9]{0,8}", count in 1usize..20) {
            let ids = SequentialIds::new(prefix.clone());
            for n in 1..=count {
                proptest::prop_assert_eq!(ids.generate(), format!("{prefix}-{n}"));
            }
        }
    }
}
