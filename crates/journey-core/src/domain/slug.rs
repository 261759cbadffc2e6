/// Turn free text into a URL slug.
///
/// Keeps ASCII alphanumerics (lowercased), collapses whitespace, hyphens and
/// underscores into single hyphens and drops everything else.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
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

/// Whether `slug` is usable as a URL path segment: ASCII letters, digits,
/// hyphens and underscores only.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::{is_valid_slug, slugify};

    #[test]
    fn collapses_separators() {
        assert_eq!(slugify("  Who's  afraid -- of_Rust? "), "whos-afraid-of-rust");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(slugify("Café Ünïcode"), "caf-ncode");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugs_stay_within_one_path_segment() {
        assert!(is_valid_slug("rust-tips_2"));
        assert!(is_valid_slug(&slugify("Who's afraid of Rust?")));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("new post"));
        assert!(!is_valid_slug("café"));
    }
}
