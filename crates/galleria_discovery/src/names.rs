//! Candidate file names for brute probing.

use std::collections::HashSet;

const DEFAULT_PREFIXES: &[&str] = &[
    "photo",
    "image",
    "picture",
    "img",
    "pic",
    "snap",
    "shot",
    "photo1",
    "photo2",
    "photo3",
    "image1",
    "image2",
    "img1",
    "img2",
    "cat",
    "dog",
    "nature",
    "landscape",
    "portrait",
    "art",
    "design",
    "screenshot",
    "screen",
    "wallpaper",
    "background",
    "cover",
    "zebra",
    "yogurt",
    "xray",
    "whale",
    "violet",
    "ultra",
    "tiger",
    "sample",
    "test",
    "demo",
    "example",
    "illustration",
];

const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Prefixes combined with every extension and suffix.
const PREFIX_WINDOW: usize = 20;

/// Highest number in the bare numeric series.
const NUMERIC_MAX: u32 = 50;

/// Deterministic generator of plausible image file names.
///
/// Output order is fixed: the first prefixes combined with each extension and
/// the suffixes `""`, `1`, `2`, `_large`, `_small`, followed by numeric names
/// (`7.png`, `img7.png`, `photo7.png`, `picture7.png`). Duplicates keep their
/// first position.
///
/// ```
/// use galleria_discovery::NameGenerator;
///
/// let names = NameGenerator::default().generate(3);
/// assert_eq!(names, vec!["photo.jpg", "photo1.jpg", "photo2.jpg"]);
/// ```
#[derive(Debug, Clone)]
pub struct NameGenerator {
    prefixes: Vec<String>,
    extensions: Vec<String>,
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NameGenerator {
    /// Generator over a custom vocabulary.
    pub fn new(prefixes: Vec<String>, extensions: Vec<String>) -> Self {
        Self {
            prefixes,
            extensions,
        }
    }

    /// Up to `limit` distinct names.
    pub fn generate(&self, limit: usize) -> Vec<String> {
        self.iter(limit).collect()
    }

    /// Lazily yield up to `limit` distinct names.
    pub fn iter(&self, limit: usize) -> impl Iterator<Item = String> + '_ {
        let mut seen = HashSet::new();
        self.raw_candidates()
            .filter(move |name| seen.insert(name.clone()))
            .take(limit)
    }

    fn raw_candidates(&self) -> impl Iterator<Item = String> + '_ {
        let prefixed = self
            .prefixes
            .iter()
            .take(PREFIX_WINDOW)
            .flat_map(move |prefix| {
                self.extensions.iter().flat_map(move |ext| {
                    [
                        format!("{prefix}.{ext}"),
                        format!("{prefix}1.{ext}"),
                        format!("{prefix}2.{ext}"),
                        format!("{prefix}_large.{ext}"),
                        format!("{prefix}_small.{ext}"),
                    ]
                })
            });

        let numeric = (1..=NUMERIC_MAX).flat_map(move |i| {
            self.extensions.iter().flat_map(move |ext| {
                [
                    format!("{i}.{ext}"),
                    format!("img{i}.{ext}"),
                    format!("photo{i}.{ext}"),
                    format!("picture{i}.{ext}"),
                ]
            })
        });

        prefixed.chain(numeric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let generator = NameGenerator::default();
        assert_eq!(generator.generate(500), generator.generate(500));
    }

    #[test]
    fn test_respects_limit_and_uniqueness() {
        let names = NameGenerator::default().generate(500);
        assert_eq!(names.len(), 500);
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let names = NameGenerator::default().generate(2_000);
        // "photo1.jpg" comes from the "photo" prefix before the "photo1" prefix.
        assert_eq!(names[1], "photo1.jpg");
        assert_eq!(names.iter().filter(|n| *n == "photo1.jpg").count(), 1);
    }

    #[test]
    fn test_numeric_series_follows_prefixes() {
        let generator = NameGenerator::new(vec!["cat".into()], vec!["png".into()]);
        let names = generator.generate(9);
        assert_eq!(
            names,
            vec![
                "cat.png",
                "cat1.png",
                "cat2.png",
                "cat_large.png",
                "cat_small.png",
                "1.png",
                "img1.png",
                "photo1.png",
                "picture1.png",
            ]
        );
    }
}
