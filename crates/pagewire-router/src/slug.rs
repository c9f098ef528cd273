//! Slug and key normalization
//!
//! Page titles become URL-safe hash fragments, registry names become
//! case-normalized map keys. Both functions are pure.

/// Turns a title into a hash fragment.
///
/// Lowercases the input, keeps letters and digits, and collapses every run of
/// other characters into a single `-`. Never emits a leading or trailing `-`.
///
/// # Examples
///
/// ```
/// use pagewire_router::slug::slugify;
///
/// assert_eq!(slugify("My Page!! Title"), "my-page-title");
/// assert_eq!(slugify("  Contact us  "), "contact-us");
/// assert_eq!(slugify(&slugify("Über uns")), "über-uns");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Case-normalizes a registry key.
///
/// Keys compare equal when they only differ in case.
///
/// ```
/// use pagewire_router::slug::normalize_key;
///
/// assert_eq!(normalize_key("Home"), normalize_key("HOME"));
/// ```
pub fn normalize_key(key: &str) -> String {
    key.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("My Page!! Title"), "my-page-title");
        assert_eq!(slugify("a  --  b"), "a-b");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("!!Hello!!"), "hello");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_keeps_digits_and_unicode_letters() {
        assert_eq!(slugify("Chapter 42"), "chapter-42");
        assert_eq!(slugify("Café Olé"), "café-olé");
    }

    #[test]
    fn test_normalize_key_is_case_insensitive() {
        assert_eq!(normalize_key("about"), "ABOUT");
        assert_eq!(normalize_key("AbOuT"), normalize_key("about"));
    }

    proptest! {
        #[test]
        fn slugify_is_idempotent(input in "[a-zA-Z0-9 !?._/éÜ-]{0,48}") {
            let once = slugify(&input);
            prop_assert_eq!(slugify(&once), once.clone());
        }

        #[test]
        fn slugify_output_has_no_edge_or_double_dashes(input in "[a-zA-Z0-9 !?._/-]{0,48}") {
            let slug = slugify(&input);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
