//! Label and facet name conventions.

/// Facet assigned at query time to labels the vocabulary doesn't know about.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Prefix of the legacy alternate spelling of a facet key in the vocabulary
/// document (`"#Genre"` holds more raw labels for `"Genre"`).
pub const ALIAS_PREFIX: char = '#';

/// Labels are always compared trimmed and lower-cased.
pub fn fold(label: impl AsRef<str>) -> String {
    label.as_ref().trim().to_lowercase()
}

/// Resolves a vocabulary key to the facet it belongs to, stripping the
/// legacy alias prefix.
pub fn facet_of_key(key: &str) -> &str {
    key.strip_prefix(ALIAS_PREFIX).unwrap_or(key)
}

/// The legacy alias key for a facet.
pub fn alias_key(facet: &str) -> String {
    format!("{ALIAS_PREFIX}{facet}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Fantasy", "fantasy")]
    #[case("  Epic Fantasy\t", "epic fantasy")]
    #[case("", "")]
    #[case("   ", "")]
    #[case("ÉPOQUE", "époque")]
    fn test_fold(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(fold(input), expected);
    }

    #[rstest]
    #[case("Genre", "Genre")]
    #[case("#Genre", "Genre")]
    #[case("##Genre", "#Genre")]
    fn test_facet_of_key(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(facet_of_key(key), expected);
    }

    #[test]
    fn test_alias_key() {
        assert_eq!(alias_key("Reading Mood"), "#Reading Mood");
    }
}
