//! Plugin version grammar
//!
//! `MAJOR.MINOR.PATCH` with numeric components, where the patch component
//! may carry a lowercase alphanumeric suffix (`1.2.3rc`, `1.2.3beta`).

use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+\.[0-9][a-z0-9]*$").expect("version pattern compiles")
});

/// Check a version string against the install grammar
#[must_use]
pub fn is_valid_version(version: &str) -> bool {
    VERSION_RE.is_match(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn version_table() {
        let cases = [
            ("1.2.3", true),
            ("1.2.3rc", true),
            ("1.2.3beta", true),
            ("10.20.30", true),
            ("1.1.1rc1", true),
            ("1", false),
            ("1.2", false),
            ("1.2.x", false),
            ("x.2.3", false),
            ("1.x.3", false),
            ("1.2.3-rc", false),
            ("1.2.3RC", false),
            ("v1.2.3", false),
            (" 1.2.3", false),
            ("", false),
        ];

        for (input, expected) in cases {
            assert_eq!(is_valid_version(input), expected, "version {input:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_numeric_triples_accepted(
            major in 0u32..1000,
            minor in 0u32..1000,
            patch in 0u32..1000,
            suffix in "[a-z0-9]{0,6}",
        ) {
            let version = format!("{major}.{minor}.{patch}{suffix}");
            prop_assert!(is_valid_version(&version));
        }

        #[test]
        fn prop_uppercase_rejected(
            major in 0u32..100,
            suffix in "[A-Z]{1,4}",
        ) {
            let version = format!("{major}.0.0{suffix}");
            prop_assert!(!is_valid_version(&version));
        }
    }
}
