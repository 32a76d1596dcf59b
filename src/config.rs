//! Grammar configuration
//!
//! Loads settings from ~/.adoc-highlight.toml (or a path given with
//! --config). The configuration is an immutable value: the rule table is
//! rebuilt from it rather than consulting shared mutable state.
//!
//! Example:
//! ```text
//! # adoc-highlight configuration
//! underline-tolerance = 3
//! underline-disable-length = 4
//! max-title-level = 4
//!
//! [[special-words]]
//! pattern = '\b(?:TODO|FIXME)\b'
//! category = "Highlight"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::error::{Error, Result};

/// A user-configured special word rule: a regex classified as-is
#[derive(Debug, Clone)]
pub struct SpecialWord {
    /// Regex source matched against the region
    pub pattern: String,
    /// Category assigned to the whole match
    pub category: Category,
}

/// Immutable grammar configuration
///
/// Structural constraints (delimiter lengths, level bounds) are verified
/// when patterns are constructed from this value, not here.
#[derive(Debug, Clone)]
pub struct GrammarConfig {
    /// Marker character for one-line headings
    pub title_marker: char,
    /// Maximum heading level (0-based, at most 4)
    pub max_title_level: u8,
    /// Two-line heading underline units, one per level, each 2 chars
    pub two_line_delimiters: Vec<String>,
    /// Maximum accepted difference between title and underline length
    pub underline_tolerance: usize,
    /// Underline length at which two-line heading classification is
    /// suppressed entirely (disambiguates delimited-block fences)
    pub underline_disable_len: Option<usize>,
    /// User-defined special word rules
    pub special_words: Vec<SpecialWord>,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            title_marker: '=',
            max_title_level: 4,
            two_line_delimiters: ["==", "--", "~~", "^^", "++"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            underline_tolerance: 3,
            underline_disable_len: None,
            special_words: Vec::new(),
        }
    }
}

impl GrammarConfig {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".adoc-highlight.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".adoc-highlight.toml"))
        }
    }

    /// Load configuration from the default location.
    ///
    /// A missing file yields the defaults; a present but malformed file
    /// is an error.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        let table: toml::Table = contents
            .parse()
            .map_err(|e| Error::Config(format!("not valid TOML: {e}")))?;

        let mut config = Self::default();

        if let Some(value) = table.get("title-marker") {
            let s = value
                .as_str()
                .ok_or_else(|| Error::Config("title-marker must be a string".into()))?;
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => config.title_marker = c,
                _ => {
                    return Err(Error::Config(
                        "title-marker must be a single character".into(),
                    ))
                }
            }
        }

        if let Some(value) = table.get("max-title-level") {
            let n = value
                .as_integer()
                .ok_or_else(|| Error::Config("max-title-level must be an integer".into()))?;
            if !(0..=4).contains(&n) {
                return Err(Error::Config("max-title-level must be 0..=4".into()));
            }
            config.max_title_level = n as u8;
        }

        if let Some(value) = table.get("two-line-delimiters") {
            let list = value
                .as_array()
                .ok_or_else(|| Error::Config("two-line-delimiters must be an array".into()))?;
            let mut delimiters = Vec::with_capacity(list.len());
            for item in list {
                let s = item.as_str().ok_or_else(|| {
                    Error::Config("two-line-delimiters entries must be strings".into())
                })?;
                delimiters.push(s.to_string());
            }
            config.two_line_delimiters = delimiters;
        }

        if let Some(value) = table.get("underline-tolerance") {
            let n = value
                .as_integer()
                .ok_or_else(|| Error::Config("underline-tolerance must be an integer".into()))?;
            config.underline_tolerance = (n.max(1)) as usize;
        }

        if let Some(value) = table.get("underline-disable-length") {
            let n = value.as_integer().ok_or_else(|| {
                Error::Config("underline-disable-length must be an integer".into())
            })?;
            config.underline_disable_len = Some(n.max(0) as usize);
        }

        if let Some(value) = table.get("special-words") {
            let list = value
                .as_array()
                .ok_or_else(|| Error::Config("special-words must be an array of tables".into()))?;
            for item in list {
                let entry = item
                    .as_table()
                    .ok_or_else(|| Error::Config("special-words entries must be tables".into()))?;
                let pattern = entry
                    .get("pattern")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| Error::Config("special-words entry needs a pattern".into()))?;
                let name = entry
                    .get("category")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Highlight");
                let category = Category::from_name(name)
                    .ok_or_else(|| Error::Config(format!("unknown special-word category: {name}")))?;
                config.special_words.push(SpecialWord {
                    pattern: pattern.to_string(),
                    category,
                });
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GrammarConfig::default();
        assert_eq!(config.title_marker, '=');
        assert_eq!(config.max_title_level, 4);
        assert_eq!(config.two_line_delimiters.len(), 5);
        assert_eq!(config.underline_tolerance, 3);
        assert_eq!(config.underline_disable_len, None);
        assert!(config.special_words.is_empty());
    }

    #[test]
    fn test_parse_full() {
        let config = GrammarConfig::parse(
            r##"
# comment
underline-tolerance = 2
underline-disable-length = 4
max-title-level = 3
title-marker = "#"

[[special-words]]
pattern = '\b(?:TODO|FIXME)\b'
category = "Highlight"
"##,
        )
        .unwrap();

        assert_eq!(config.underline_tolerance, 2);
        assert_eq!(config.underline_disable_len, Some(4));
        assert_eq!(config.max_title_level, 3);
        assert_eq!(config.title_marker, '#');
        assert_eq!(config.special_words.len(), 1);
        assert_eq!(config.special_words[0].category, Category::Highlight);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = GrammarConfig::parse("").unwrap();
        assert_eq!(config.underline_tolerance, 3);
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        assert!(GrammarConfig::parse("underline-tolerance = \"three\"").is_err());
        assert!(GrammarConfig::parse("max-title-level = 9").is_err());
        assert!(GrammarConfig::parse("title-marker = \"==\"").is_err());
        assert!(GrammarConfig::parse("not toml at all [").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_special_word_category() {
        let result = GrammarConfig::parse(
            r#"
[[special-words]]
pattern = "x"
category = "Delimiter"
"#,
        );
        assert!(result.is_err());
    }
}
