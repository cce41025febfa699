//! Slug derivation for posts and validation of caller-supplied slugs.
//!
//! Generated post slugs are the lowercased title with everything outside
//! `[a-z0-9_-]` removed and whitespace runs turned into single hyphens,
//! followed by a short random token (`hello-world-k3x9a`). The character
//! filter is a `[^\w\s-]` strip, so `_` survives and `'` vanishes
//! (`don't` becomes `dont`, not `don-t`). The token keeps
//! collisions unlikely; the unique index on `posts.slug` remains the real
//! enforcement point.

use rand::Rng;

use crate::domain::error::DomainError;

pub const POST_SLUG_MAX_LEN: usize = 200;
pub const CATEGORY_SLUG_MAX_LEN: usize = 100;

const SUFFIX_LEN: usize = 5;
const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const FALLBACK_BASE: &str = "post";

/// Reduce a title to its slug base without the random suffix.
///
/// Returns an empty string when the title has no representable characters.
pub fn slug_base(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let mut output = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
            continue;
        }
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            continue;
        }
        if pending_hyphen && !output.is_empty() {
            output.push('-');
        }
        pending_hyphen = false;
        output.push(ch);
    }

    output
}

/// Generate a post slug from `title` using the thread-local RNG.
pub fn generate_post_slug(title: &str) -> String {
    generate_post_slug_with(title, &mut rand::thread_rng())
}

/// Generate a post slug from `title`, drawing the suffix from `rng`.
pub fn generate_post_slug_with<R: Rng + ?Sized>(title: &str, rng: &mut R) -> String {
    let mut base = slug_base(title);
    if base.is_empty() {
        base.push_str(FALLBACK_BASE);
    }

    // Leave room for `-` plus the suffix inside the column limit.
    let budget = POST_SLUG_MAX_LEN - SUFFIX_LEN - 1;
    if base.len() > budget {
        base.truncate(budget);
        while base.ends_with('-') {
            base.pop();
        }
    }

    format!("{base}-{}", random_suffix(rng))
}

fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

/// Validate a caller-supplied slug, returning its trimmed form.
pub fn validate_slug(
    input: &str,
    field: &'static str,
    max_len: usize,
) -> Result<String, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::missing(field));
    }
    if trimmed.chars().count() > max_len {
        return Err(DomainError::validation(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    if !trimmed.chars().all(is_slug_char) {
        return Err(DomainError::validation(
            field,
            "must contain only lowercase letters, digits, `-` or `_`",
        ));
    }
    Ok(trimmed.to_string())
}

pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(is_slug_char)
}

fn is_slug_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn slug_base_lowercases_and_hyphenates() {
        assert_eq!(slug_base("Hello World"), "hello-world");
        assert_eq!(slug_base("  Rust:   The Good Parts! "), "rust-the-good-parts");
    }

    #[test]
    fn slug_base_strips_punctuation_without_splitting_words() {
        assert_eq!(slug_base("Don't panic"), "dont-panic");
        assert_eq!(slug_base("snake_case stays"), "snake_case-stays");
        assert_eq!(slug_base("C++ -- a tour"), "c-a-tour");
    }

    #[test]
    fn slug_base_drops_non_ascii() {
        assert_eq!(slug_base("Café au lait"), "caf-au-lait");
        assert_eq!(slug_base("日本語"), "");
    }

    #[test]
    fn generated_slug_has_base_and_five_char_suffix() {
        let mut rng = StdRng::seed_from_u64(7);
        let slug = generate_post_slug_with("Hello World", &mut rng);

        let (base, suffix) = slug.rsplit_once('-').expect("suffix separator");
        assert_eq!(base, "hello-world");
        assert_eq!(suffix.len(), 5);
        assert!(is_url_safe(&slug));
    }

    #[test]
    fn unrepresentable_title_falls_back_to_post() {
        let mut rng = StdRng::seed_from_u64(1);
        let slug = generate_post_slug_with("!!!", &mut rng);
        assert!(slug.starts_with("post-"));
    }

    #[test]
    fn long_titles_fit_the_column() {
        let title = "word ".repeat(80);
        let slug = generate_post_slug(&title);
        assert!(slug.len() <= POST_SLUG_MAX_LEN);
        assert!(!slug.contains("--"));
    }

    #[test]
    fn repeated_generation_differs() {
        let first = generate_post_slug("Same Title");
        let second = generate_post_slug("Same Title");
        assert_ne!(first, second);
    }

    #[test]
    fn validate_slug_rejects_unsafe_input() {
        assert_eq!(
            validate_slug("  ", "slug", 10),
            Err(DomainError::missing("slug"))
        );
        assert!(validate_slug("Has Space", "slug", 100).is_err());
        assert!(validate_slug("abcdefghijk", "slug", 10).is_err());
        assert_eq!(
            validate_slug(" tech-news ", "slug", 100).as_deref(),
            Ok("tech-news")
        );
    }
}
