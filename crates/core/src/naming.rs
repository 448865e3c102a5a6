//! Random object name generation.
//!
//! Stored objects are named `<token><extension>`, where the token is drawn
//! from the 62-character alphanumeric alphabet. Names are never checked for
//! collisions: two uploads that draw the same token overwrite each other.

use rand::{Rng, distr::Alphanumeric};

/// Length of the random token in generated object names.
pub const NAME_TOKEN_LENGTH: usize = 8;

/// Generate a random alphanumeric token of exactly `length` characters.
///
/// Each character is drawn independently and uniformly from `[A-Za-z0-9]`.
/// Not suitable for secrets.
#[must_use]
pub fn random_token(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Extension of `filename` including its leading dot, or `""` if none.
///
/// Trailing slashes are ignored, then only the last path component is
/// considered; both `/` and `\` separate components. A dot that starts the
/// component is part of the name (`.bashrc` has no extension, nor has `..`)
/// and a trailing dot yields `"."`.
#[must_use]
pub fn file_extension(filename: &str) -> &str {
    let trimmed = filename.trim_end_matches('/');
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    match base.rfind('.') {
        Some(idx) if idx > 0 && base != ".." => &base[idx..],
        _ => "",
    }
}

/// Build a fresh object name for an upload of `original_filename`.
#[must_use]
pub fn object_name(original_filename: &str) -> String {
    let mut name = random_token(NAME_TOKEN_LENGTH);
    name.push_str(file_extension(original_filename));
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.png", ".png")]
    #[case("archive.tar.gz", ".gz")]
    #[case("Report.DOCX", ".DOCX")]
    #[case("noext", "")]
    #[case(".bashrc", "")]
    #[case("..", "")]
    #[case("...", ".")]
    #[case("..a", ".a")]
    #[case("a.png/", ".png")]
    #[case("a.png//", ".png")]
    #[case("/", "")]
    #[case("C:\\Users\\me\\scan.pdf", ".pdf")]
    #[case("dir.d\\file", "")]
    #[case("trailing.", ".")]
    #[case("dir.d/file", "")]
    #[case("dir/.hidden.pdf", ".pdf")]
    #[case("", "")]
    fn test_file_extension(#[case] filename: &str, #[case] expected: &str) {
        assert_eq!(file_extension(filename), expected);
    }

    #[test]
    fn test_object_name_shape() {
        let name = object_name("holiday.jpeg");
        assert_eq!(name.len(), NAME_TOKEN_LENGTH + ".jpeg".len());
        assert!(name.ends_with(".jpeg"));
        assert!(name[..NAME_TOKEN_LENGTH].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_object_name_without_extension() {
        let name = object_name("README");
        assert_eq!(name.len(), NAME_TOKEN_LENGTH);
    }

    #[test]
    fn test_random_token_zero_length() {
        assert_eq!(random_token(0), "");
    }

    #[test]
    fn test_consecutive_names_differ() {
        // 62^8 possibilities; a repeat here means the generator is broken.
        assert_ne!(object_name("a.png"), object_name("a.png"));
    }

    proptest! {
        #[test]
        fn prop_token_length_and_alphabet(length in 0usize..256) {
            let token = random_token(length);
            prop_assert_eq!(token.len(), length);
            prop_assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        }

        #[test]
        fn prop_extension_is_suffix(filename in ".*") {
            let ext = file_extension(&filename);
            prop_assert!(filename.trim_end_matches('/').ends_with(ext));
            prop_assert!(ext.is_empty() || ext.starts_with('.'));
            prop_assert!(!ext.contains(['/', '\\']));
        }
    }
}
