//! URL slug derivation for category names.

/// Maximum stored slug length (matches the `project_categories.slug` column).
pub const MAX_SLUG_LENGTH: usize = 120;

/// Derive a URL slug from a display name.
///
/// ASCII letters and digits are kept (lower-cased); every other run of
/// characters collapses into a single `-`. Leading and trailing dashes are
/// dropped.
///
/// ```
/// use coffer_core::slug::slugify;
///
/// assert_eq!(slugify("Living Room"), "living-room");
/// assert_eq!(slugify("  Loft / Attic  "), "loft-attic");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '_' || ch == '-' || ch.is_whitespace() || ch.is_ascii_punctuation() {
            pending_dash = true;
        }
    }

    slug.truncate(MAX_SLUG_LENGTH);
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_categories() {
        assert_eq!(slugify("Basement"), "basement");
        assert_eq!(slugify("Extension"), "extension");
        assert_eq!(slugify("Outbuilding"), "outbuilding");
        assert_eq!(slugify("Refurbishment"), "refurbishment");
    }

    #[test]
    fn collapses_separators() {
        assert_eq!(slugify("Kitchen -- & Dining"), "kitchen-dining");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(slugify("Café Über"), "caf-ber");
    }

    #[test]
    fn empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn truncates_long_names() {
        let long = "a".repeat(300);
        assert_eq!(slugify(&long).len(), MAX_SLUG_LENGTH);
    }
}
