//! URL slugs for event types.

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 60;

/// Fallback when a name contains no usable characters.
pub const FALLBACK_SLUG: &str = "meeting";

/// Derive a slug from a display name.
///
/// Lowercases, drops everything except ASCII letters, digits, whitespace and `-`,
/// turns whitespace runs into a single `-`, collapses repeated dashes, trims
/// dashes at both ends, then truncates. Truncation may leave a trailing `-`.
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    slug
}

/// Pick a slug for `name` that `is_taken` does not reject, appending `-2`, `-3`, …
pub fn unique_slug(name: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let base = match slugify(name) {
        s if s.is_empty() => FALLBACK_SLUG.to_string(),
        s => s,
    };

    let mut candidate = base.clone();
    let mut suffix = 2u32;
    while is_taken(&candidate) {
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    candidate
}
