//! Replacement text resolution
//!
//! The presentation layer may ask for the substitution text of a span
//! classified as a replacement: typographic substitutions, numeric
//! character references, and named character references. Name lookup is
//! an injected collaborator; without one, named references resolve to
//! `None` and the caller falls back to the literal source text. An
//! unresolved replacement is not an error: the span stays classified.

/// Injected name-to-codepoint lookup for named character references
pub type NameResolver = dyn Fn(&str) -> Option<char>;

/// Resolve the substitution text for a matched replacement.
///
/// Returns `None` when the matched text is no known replacement, when a
/// numeric reference encodes no valid codepoint, or when a named
/// reference is unknown to the resolver (or no resolver is given).
pub fn resolve_replacement(matched: &str, resolver: Option<&NameResolver>) -> Option<String> {
    if let Some(typographic) = resolve_typographic(matched) {
        return Some(typographic.to_string());
    }
    if let Some(digits) = matched
        .strip_prefix("&#x")
        .or_else(|| matched.strip_prefix("&#X"))
        .and_then(|rest| rest.strip_suffix(';'))
    {
        return u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(digits) = matched
        .strip_prefix("&#")
        .and_then(|rest| rest.strip_suffix(';'))
    {
        return digits
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(name) = matched
        .strip_prefix('&')
        .and_then(|rest| rest.strip_suffix(';'))
    {
        return resolver.and_then(|resolve| resolve(name)).map(String::from);
    }
    None
}

/// Fixed typographic substitution table
fn resolve_typographic(matched: &str) -> Option<char> {
    match matched {
        "(C)" => Some('\u{00A9}'),
        "(R)" => Some('\u{00AE}'),
        "(TM)" => Some('\u{2122}'),
        "--" => Some('\u{2014}'),
        "..." => Some('\u{2026}'),
        "->" => Some('\u{2192}'),
        "=>" => Some('\u{21D2}'),
        "<-" => Some('\u{2190}'),
        "<=" => Some('\u{21D0}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typographic_replacements() {
        assert_eq!(resolve_replacement("(C)", None).as_deref(), Some("\u{00A9}"));
        assert_eq!(resolve_replacement("(R)", None).as_deref(), Some("\u{00AE}"));
        assert_eq!(resolve_replacement("(TM)", None).as_deref(), Some("\u{2122}"));
        assert_eq!(resolve_replacement("--", None).as_deref(), Some("\u{2014}"));
        assert_eq!(resolve_replacement("...", None).as_deref(), Some("\u{2026}"));
        assert_eq!(resolve_replacement("->", None).as_deref(), Some("\u{2192}"));
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(resolve_replacement("&#65;", None).as_deref(), Some("A"));
        assert_eq!(resolve_replacement("&#x41;", None).as_deref(), Some("A"));
        assert_eq!(resolve_replacement("&#8212;", None).as_deref(), Some("\u{2014}"));
        // surrogate range is no valid codepoint
        assert_eq!(resolve_replacement("&#55296;", None), None);
    }

    #[test]
    fn test_named_reference_without_resolver() {
        assert_eq!(resolve_replacement("&unknownname;", None), None);
        assert_eq!(resolve_replacement("&copy;", None), None);
    }

    #[test]
    fn test_named_reference_with_resolver() {
        let resolver = |name: &str| match name {
            "copy" => Some('\u{00A9}'),
            _ => None,
        };
        assert_eq!(
            resolve_replacement("&copy;", Some(&resolver)).as_deref(),
            Some("\u{00A9}")
        );
        assert_eq!(resolve_replacement("&nope;", Some(&resolver)), None);
    }

    #[test]
    fn test_non_replacement_text() {
        assert_eq!(resolve_replacement("plain", None), None);
        assert_eq!(resolve_replacement("", None), None);
    }
}
