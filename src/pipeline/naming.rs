//! Output naming: folder name → safe PDF file name.

use crate::config::NameCollision;
use std::collections::HashSet;

/// Punctuation kept in file stems alongside alphanumerics and spaces.
const ALLOWED_PUNCTUATION: &str = " _-()[]{}.";

/// Stem used when sanitising leaves nothing.
pub const FALLBACK_STEM: &str = "folder";

/// Keep alphanumerics, spaces and `_-()[]{}.`; fall back to [`FALLBACK_STEM`].
pub fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || ALLOWED_PUNCTUATION.contains(*c))
        .collect();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// Hands out PDF file names for one run, applying a [`NameCollision`] policy.
///
/// A name only counts as used once [`commit`](Self::commit) is called for it,
/// so a folder that produces no PDF does not push later folders to ` (2)`.
#[derive(Debug)]
pub struct OutputNamer {
    policy: NameCollision,
    used: HashSet<String>,
}

impl OutputNamer {
    pub fn new(policy: NameCollision) -> Self {
        Self {
            policy,
            used: HashSet::new(),
        }
    }

    /// The `.pdf` file name a folder called `folder_name` would get now.
    ///
    /// Collisions are detected case-insensitively so the result is the same on
    /// every file system.
    pub fn candidate(&self, folder_name: &str) -> String {
        let stem = sanitize_file_stem(folder_name);
        match self.policy {
            NameCollision::Overwrite => format!("{stem}.pdf"),
            NameCollision::Disambiguate => {
                let mut name = format!("{stem}.pdf");
                let mut n = 2;
                while self.used.contains(&name.to_lowercase()) {
                    name = format!("{stem} ({n}).pdf");
                    n += 1;
                }
                name
            }
        }
    }

    /// Mark `file_name` as taken for the rest of the run.
    pub fn commit(&mut self, file_name: &str) {
        self.used.insert(file_name.to_lowercase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_allowed_characters() {
        assert_eq!(
            sanitize_file_stem("Vol. 1 (draft) [v2] {x}_a-b"),
            "Vol. 1 (draft) [v2] {x}_a-b"
        );
        assert_eq!(sanitize_file_stem("Über Straße 3"), "Über Straße 3");
    }

    #[test]
    fn drops_unsafe_characters() {
        assert_eq!(sanitize_file_stem("a/b:c*d?\"e<f>|g"), "abcdefg");
    }

    #[test]
    fn empty_result_uses_fallback() {
        assert_eq!(sanitize_file_stem("???"), "folder");
        assert_eq!(sanitize_file_stem(""), "folder");
    }

    fn assign(namer: &mut OutputNamer, folder: &str) -> String {
        let name = namer.candidate(folder);
        namer.commit(&name);
        name
    }

    #[test]
    fn disambiguates_collisions() {
        let mut namer = OutputNamer::new(NameCollision::Disambiguate);
        assert_eq!(assign(&mut namer, "Scans?"), "Scans.pdf");
        assert_eq!(assign(&mut namer, "Scans*"), "Scans (2).pdf");
        assert_eq!(assign(&mut namer, "scans"), "scans (3).pdf");
        assert_eq!(assign(&mut namer, "Other"), "Other.pdf");
    }

    #[test]
    fn disambiguated_name_does_not_shadow_a_real_folder() {
        let mut namer = OutputNamer::new(NameCollision::Disambiguate);
        assert_eq!(assign(&mut namer, "A"), "A.pdf");
        assert_eq!(assign(&mut namer, "A (2)"), "A (2).pdf");
        assert_eq!(assign(&mut namer, "A?"), "A (3).pdf");
    }

    #[test]
    fn uncommitted_candidate_stays_free() {
        let mut namer = OutputNamer::new(NameCollision::Disambiguate);
        assert_eq!(namer.candidate("Book!"), "Book.pdf");
        assert_eq!(namer.candidate("Book#"), "Book.pdf");
        namer.commit("Book.pdf");
        assert_eq!(namer.candidate("book"), "book (2).pdf");
    }

    #[test]
    fn overwrite_policy_reuses_names() {
        let mut namer = OutputNamer::new(NameCollision::Overwrite);
        assert_eq!(assign(&mut namer, "x:"), "x.pdf");
        assert_eq!(assign(&mut namer, "x?"), "x.pdf");
    }
}
