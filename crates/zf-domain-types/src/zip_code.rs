// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! US ZIP code shape checks

/// True for `12345` and `12345-6789`.
pub fn is_well_formed(zip: &str) -> bool {
    let (base, extension) = match zip.split_once('-') {
        Some((base, extension)) => (base, Some(extension)),
        None => (zip, None),
    };
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    digits(base, 5) && extension.map_or(true, |ext| digits(ext, 4))
}

/// The five-digit part of a ZIP code, if present.
pub fn base(zip: &str) -> &str {
    zip.split_once('-').map_or(zip, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_extended_codes() {
        assert!(is_well_formed("90210"));
        assert!(is_well_formed("90210-1234"));
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(!is_well_formed("9021"));
        assert!(!is_well_formed("90210-12"));
        assert!(!is_well_formed("9021O"));
        assert!(!is_well_formed("90210-"));
        assert!(!is_well_formed(""));
    }

    #[test]
    fn base_strips_extension() {
        assert_eq!(base("90210-1234"), "90210");
        assert_eq!(base("90210"), "90210");
    }
}
