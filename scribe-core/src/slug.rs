//! Slug derivation.
//!
//! A slug is derived once from a post title at creation time. Derivation is
//! pure and deterministic; uniqueness is enforced by the storage backend.

/// Derive a slug from a title.
///
/// Lowercases every character, turns every non-alphanumeric character into a
/// hyphen, collapses runs of hyphens and trims hyphens from both ends. A title
/// without any alphanumeric character derives to the empty string.
///
/// ```
/// assert_eq!(scribe_core::slug::derive("Hello, World!"), "hello-world");
/// assert_eq!(scribe_core::slug::derive("Hello   World"), "hello-world");
/// assert_eq!(scribe_core::slug::derive("!!!"), "");
/// ```
#[must_use]
pub fn derive(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    // Leading hyphens are never pushed; only a trailing one can remain.
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_basic() {
        assert_eq!(derive("Hello, World!"), "hello-world");
        assert_eq!(derive("A Minimal Real-Time Pipeline"), "a-minimal-real-time-pipeline");
    }

    #[test]
    fn test_derive_collapses_and_trims() {
        assert_eq!(derive("  --Rust   & Go--  "), "rust-go");
        assert_eq!(derive("a---b"), "a-b");
    }

    #[test]
    fn test_derive_no_alphanumerics() {
        assert_eq!(derive(""), "");
        assert_eq!(derive("   "), "");
        assert_eq!(derive("?!-_"), "");
    }

    #[test]
    fn test_derive_keeps_unicode_alphanumerics() {
        assert_eq!(derive("Café Ünïcode 42"), "café-ünïcode-42");
        assert_eq!(derive("ÀB"), "àb");
    }

    #[test]
    fn test_derive_is_deterministic() {
        for title in ["Hello, World!", "x", "Ünïcode -- Test", "%%%"] {
            assert_eq!(derive(title), derive(title));
        }
    }

    #[test]
    fn test_colliding_titles_share_slug() {
        assert_eq!(derive("Hello, World!"), derive("Hello   World"));
    }
}
