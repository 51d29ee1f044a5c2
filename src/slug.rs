//! Slug generation and validation for public content URLs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lowercase letters, numbers, and single hyphens between them.
static SLUG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid"));

/// Turn a title into a URL-safe slug.
///
/// Every run of characters outside `[a-z0-9]` (after lowercasing) collapses
/// into a single hyphen, and hyphens at either end are dropped. Returns an
/// empty string when the title has no ASCII alphanumerics at all.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Web Development"), "web-development");
        assert_eq!(slugify("UI/UX Design"), "ui-ux-design");
    }

    #[test]
    fn test_slugify_collapses_and_trims_separators() {
        assert_eq!(slugify("  --Hello,   World!!  "), "hello-world");
        assert_eq!(slugify("a -- b"), "a-b");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Branding 2024"), "caf-branding-2024");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_slugify_output_is_valid() {
        for title in ["Mobile Apps", "SEO & Growth", "E-commerce: The Guide (v2)"] {
            assert!(is_valid_slug(&slugify(title)), "{title}");
        }
    }

    #[test]
    fn test_is_valid_slug_rejects_bad_input() {
        assert!(is_valid_slug("my-post-1"));
        assert!(!is_valid_slug("My-Post"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("../etc"));
    }
}
