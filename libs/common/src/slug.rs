//! Slug and unique-name derivation
//!
//! Uniqueness here is a best-effort pre-check against names that were read
//! from the database; the unique constraints in the schema stay authoritative.

use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Longest slug the schema stores
pub const MAX_SLUG_LENGTH: usize = 255;

/// Kept free for a `-N` collision suffix
const SUFFIX_ROOM: usize = 10;

/// Turn a display name into a URL-safe slug.
///
/// Text is NFKD-decomposed so accented letters keep their base letter.
/// ASCII letters and digits are kept (lower-cased), runs of whitespace, `-`
/// and `_` become a single `-`, everything else is dropped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.nfkd() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}

/// Shorten a slug so that it plus a collision suffix fits in `max` bytes.
///
/// The cut falls on a `-` when there is one to fall back to.
pub fn truncate(slug: &str, max: usize) -> String {
    let limit = max.saturating_sub(SUFFIX_ROOM);
    if slug.len() <= limit {
        return slug.to_string();
    }

    let cut = &slug[..limit];
    let cut = if slug.as_bytes()[limit] == b'-' {
        cut
    } else {
        match cut.rfind('-') {
            Some(idx) if idx > 0 => &cut[..idx],
            _ => cut,
        }
    };

    cut.trim_end_matches('-').to_string()
}

/// First candidate built from `base` that is not in `taken`.
///
/// Tries `base`, then `base{sep}1`, `base{sep}2`, ... .
pub fn first_available(base: &str, separator: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }

    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{}{}{}", base, separator, counter);
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Username base for an email: the local part, lower-cased.
pub fn username_base(email: &str) -> String {
    email
        .split('@')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn slugify_normalises_text() {
        assert_eq!(slugify("Home & Garden"), "home-garden");
        assert_eq!(slugify("  Trail   Running_Shoes  "), "trail-running-shoes");
        assert_eq!(slugify("--Already-a-slug--"), "already-a-slug");
        assert_eq!(slugify("4K TV's"), "4k-tvs");
        assert_eq!(slugify("Café"), "cafe");
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("ﬁne Ｗine"), "fine-wine");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn long_slugs_leave_room_for_a_suffix() {
        let long = ["word"; 80].join("-");
        assert!(long.len() > MAX_SLUG_LENGTH);

        let short = truncate(&long, MAX_SLUG_LENGTH);
        assert!(short.len() + SUFFIX_ROOM <= MAX_SLUG_LENGTH);
        assert!(short.ends_with("word"));
        assert!(long.starts_with(&short));

        let suffixed = first_available(&short, "-", &taken(&[&short]));
        assert!(suffixed.len() <= MAX_SLUG_LENGTH);
    }

    #[test]
    fn unbroken_slugs_are_cut_hard() {
        let long = "a".repeat(400);
        assert_eq!(truncate(&long, MAX_SLUG_LENGTH).len(), MAX_SLUG_LENGTH - SUFFIX_ROOM);
        assert_eq!(truncate("short-slug", MAX_SLUG_LENGTH), "short-slug");
    }

    #[test]
    fn free_base_is_used_as_is() {
        assert_eq!(first_available("shoes", "-", &taken(&["boots"])), "shoes");
    }

    #[test]
    fn collisions_get_the_first_free_suffix() {
        let existing = taken(&["shoes", "shoes-1", "shoes-2"]);
        assert_eq!(first_available("shoes", "-", &existing), "shoes-3");

        let with_gap = taken(&["shoes", "shoes-2"]);
        assert_eq!(first_available("shoes", "-", &with_gap), "shoes-1");
    }

    #[test]
    fn username_suffix_counts_existing_local_parts() {
        // local part already present N times -> suffix N
        let existing = taken(&["alice", "alice1", "alice2"]);
        let base = username_base("Alice@Example.com");
        assert_eq!(base, "alice");
        assert_eq!(first_available(&base, "", &existing), "alice3");
    }

    #[test]
    fn sequential_derivation_never_repeats() {
        let mut existing = HashSet::new();
        for _ in 0..25 {
            let next = first_available("mug", "-", &existing);
            assert!(existing.insert(next));
        }
        assert_eq!(existing.len(), 25);
        assert!(existing.contains("mug-24"));
    }
}
