//! Slug normalization for content file names

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `YYYY-MM-DD-` prefix left on a name after normalization
    static ref DATE_PREFIX: Regex = Regex::new(r"^(?:\d{4}-\d{2}-\d{2}-)+").unwrap();
}

/// Normalize a file name (without extension) into a URL-safe slug
///
/// Lower-cases, collapses every run of non-alphanumerics into one hyphen,
/// trims hyphens from both ends and drops leading publication-date prefixes,
/// so `2024-01-15_Hello, World!` becomes `hello-world`.
pub fn slugify(name: &str) -> String {
    let normalized = ::slug::slugify(name);
    DATE_PREFIX.replace(&normalized, "").into_owned()
}

/// Slug for a markdown file name such as `2024-01-15-hello.md`
pub fn slug_from_filename(filename: &str) -> String {
    let stem = filename.strip_suffix(".md").unwrap_or(filename);
    slugify(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  --Rust & WASM!!  "), "rust-wasm");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
    }

    #[test]
    fn test_strips_date_prefix() {
        assert_eq!(slugify("2024-01-15-hello-world"), "hello-world");
        assert_eq!(slugify("2024-01-15_Hello World"), "hello-world");
        assert_eq!(slugify("2023-01-10-2023-01-11-twice"), "twice");
    }

    #[test]
    fn test_bare_date_is_kept() {
        assert_eq!(slugify("2024-01-15"), "2024-01-15");
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "Hello World",
            "2024-01-15-Intro to Rust",
            "2023-01-10-2023-01-11-x",
            "---",
            "Ünïcödé Tîtle",
            "2024-01-15",
            "a__b--c",
        ] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_slug_from_filename() {
        assert_eq!(slug_from_filename("2024-02-01-my-post.md"), "my-post");
        assert_eq!(slug_from_filename("Notes.md"), "notes");
        assert_eq!(slug_from_filename("plain"), "plain");
    }
}
