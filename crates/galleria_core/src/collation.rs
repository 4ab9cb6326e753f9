//! Snapshot ordering.
//!
//! Galleries are shown in reverse alphabetical order ("Z to A"). Names are
//! compared the way a locale-aware, case-insensitive collator would:
//!
//! 1. Primary: compatibility-decomposed, accent-stripped, lower-cased text,
//!    with whitespace and punctuation ordered before digits and digits
//!    before letters.
//! 2. Secondary: lower-cased text with accents kept.
//! 3. Tertiary: the raw name, so the order is total.
//!
//! Digits are compared one character at a time; `img10` sorts before `img9`
//! ascending. This is lexicographic, not natural, ordering.

use crate::ImageRecord;
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Character class weight: separators and punctuation, then digits, then letters.
fn class_of(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

fn primary_weights(name: &str) -> Vec<(u8, char)> {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| (class_of(c), c))
        .collect()
}

/// Ascending collation of two file names.
///
/// ```
/// use galleria_core::compare_names;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_names("apple.png", "Banana.png"), Ordering::Less);
/// assert_eq!(compare_names("Zebra.jpg", "zebra.jpg").is_ne(), true);
/// ```
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_weights(a)
        .cmp(&primary_weights(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Sort records into descending collation order by name.
pub fn sort_records(records: &mut [ImageRecord]) {
    records.sort_by(|a, b| compare_names(b.name(), a.name()));
}

/// Whether each name collates at or after the one that follows it.
pub fn is_sorted_descending(records: &[ImageRecord]) -> bool {
    records
        .windows(2)
        .all(|pair| compare_names(pair[0].name(), pair[1].name()) != Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_does_not_dominate() {
        // Plain byte order would put every uppercase name first.
        assert_eq!(compare_names("Zoo.png", "apple.png"), Ordering::Greater);
        assert_eq!(compare_names("zoo.png", "Apple.png"), Ordering::Greater);
    }

    #[test]
    fn test_accents_are_secondary() {
        assert_eq!(compare_names("été.jpg", "ete.jpg"), Ordering::Greater);
        assert_eq!(compare_names("été.jpg", "etf.jpg"), Ordering::Less);
    }

    #[test]
    fn test_punctuation_before_digits_before_letters() {
        assert_eq!(compare_names("photo_large.jpg", "photo1.jpg"), Ordering::Less);
        assert_eq!(compare_names("photo1.jpg", "photoa.jpg"), Ordering::Less);
    }

    #[test]
    fn test_not_natural_order() {
        assert_eq!(compare_names("img10.jpg", "img9.jpg"), Ordering::Less);
    }
}
