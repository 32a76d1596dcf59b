//! Syntactic categories emitted by the classification engine
//!
//! This module defines the categories a span of markup can be classified
//! as, and their default visual styles for the terminal renderer.

use crate::style::{Color, Style};

/// Semantic role of a capture group within a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Markup punctuation: fences, markers, quote delimiters
    Delimiter,
    /// Primary content of the construct
    Text,
    /// Auxiliary content: macro attribute text, xref captions
    SecondaryText,
}

/// Syntactic categories for markup classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Section heading, level 0 (document title) through 4
    Heading(u8),
    /// Generic markup delimiter (fences, quote markers, colons)
    Delimiter,
    /// List item marker (`*`, `-`, `.`, numbers)
    ListMarker,
    /// Labeled list term
    ListLabel,
    /// Callout marker (`<1>`)
    Callout,
    /// Table fence or cell separator
    TableMarker,
    /// Comment line or comment block body
    Comment,
    /// Passthrough content, exempt from further interpretation
    Passthrough,
    /// Listing/literal block body
    Literal,
    /// Attribute entry name (`:name:`)
    AttributeName,
    /// Attribute entry value
    AttributeValue,
    /// Block attribute list (`[source,rust]`)
    AttributeList,
    /// Attribute reference (`{name}`)
    AttributeRef,
    /// Block title (`.Title`)
    BlockTitle,
    /// Anchor definition (`[[id]]`)
    Anchor,
    /// Inline or block macro name
    MacroName,
    /// Macro target (URL, path, xref id)
    MacroTarget,
    /// Cross-reference or link caption text
    Reference,
    /// Admonition paragraph marker (`NOTE:`)
    Admonition,
    /// Preprocessor directive (`include::`, `ifdef::`)
    Preprocessor,
    /// Emphasized text
    Emphasis,
    /// Strong text
    Strong,
    /// Monospaced text
    Monospace,
    /// Superscript text
    Superscript,
    /// Subscript text
    Subscript,
    /// Special word from user configuration
    Highlight,
    /// Typographic or character-reference replacement
    Replacement,
    /// Plain text with no special meaning
    Text,
}

impl Category {
    /// Whether this category is structural/meta markup.
    ///
    /// When a position carries both a structural/meta category and a
    /// text-level category, the cleanup pass keeps only the former.
    pub fn is_meta(&self) -> bool {
        matches!(
            self,
            Category::Delimiter
                | Category::ListMarker
                | Category::ListLabel
                | Category::Callout
                | Category::TableMarker
                | Category::Comment
                | Category::Preprocessor
                | Category::Admonition
                | Category::Anchor
                | Category::AttributeName
                | Category::AttributeValue
                | Category::AttributeList
                | Category::BlockTitle
        )
    }

    /// Get the default style for this category
    pub fn default_style(&self) -> Style {
        match self {
            Category::Heading(0) => Style::fg(Color::Blue).with_bold().with_underline(),
            Category::Heading(_) => Style::fg(Color::Blue).with_bold(),
            Category::Delimiter => Style::fg(Color::BrightBlack),
            Category::ListMarker => Style::fg(Color::Yellow).with_bold(),
            Category::ListLabel => Style::fg(Color::Yellow),
            Category::Callout => Style::fg(Color::BrightYellow).with_bold(),
            Category::TableMarker => Style::fg(Color::Yellow),
            Category::Comment => Style::fg(Color::BrightBlack).with_italic(),
            Category::Passthrough => Style::fg(Color::Red),
            Category::Literal => Style::fg(Color::Green),
            Category::AttributeName => Style::fg(Color::Magenta),
            Category::AttributeValue => Style::fg(Color::Cyan),
            Category::AttributeList => Style::fg(Color::Magenta),
            Category::AttributeRef => Style::fg(Color::BrightMagenta),
            Category::BlockTitle => Style::fg(Color::Cyan).with_bold(),
            Category::Anchor => Style::fg(Color::BrightCyan),
            Category::MacroName => Style::fg(Color::Magenta),
            Category::MacroTarget => Style::fg(Color::Cyan).with_underline(),
            Category::Reference => Style::fg(Color::BrightBlue),
            Category::Admonition => Style::fg(Color::Red).with_bold(),
            Category::Preprocessor => Style::fg(Color::BrightMagenta),
            Category::Emphasis => Style::default().with_italic(),
            Category::Strong => Style::default().with_bold(),
            Category::Monospace => Style::fg(Color::Green),
            Category::Superscript => Style::fg(Color::BrightGreen),
            Category::Subscript => Style::fg(Color::BrightGreen),
            Category::Highlight => Style::fg(Color::BrightYellow),
            Category::Replacement => Style::fg(Color::BrightCyan),
            Category::Text => Style::default(),
        }
    }

    /// Get a human-readable name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Category::Heading(0) => "Heading0",
            Category::Heading(1) => "Heading1",
            Category::Heading(2) => "Heading2",
            Category::Heading(3) => "Heading3",
            Category::Heading(_) => "Heading4",
            Category::Delimiter => "Delimiter",
            Category::ListMarker => "ListMarker",
            Category::ListLabel => "ListLabel",
            Category::Callout => "Callout",
            Category::TableMarker => "TableMarker",
            Category::Comment => "Comment",
            Category::Passthrough => "Passthrough",
            Category::Literal => "Literal",
            Category::AttributeName => "AttributeName",
            Category::AttributeValue => "AttributeValue",
            Category::AttributeList => "AttributeList",
            Category::AttributeRef => "AttributeRef",
            Category::BlockTitle => "BlockTitle",
            Category::Anchor => "Anchor",
            Category::MacroName => "MacroName",
            Category::MacroTarget => "MacroTarget",
            Category::Reference => "Reference",
            Category::Admonition => "Admonition",
            Category::Preprocessor => "Preprocessor",
            Category::Emphasis => "Emphasis",
            Category::Strong => "Strong",
            Category::Monospace => "Monospace",
            Category::Superscript => "Superscript",
            Category::Subscript => "Subscript",
            Category::Highlight => "Highlight",
            Category::Replacement => "Replacement",
            Category::Text => "Text",
        }
    }

    /// Parse a category from a string name (for config file loading)
    ///
    /// Only the categories that make sense as special-word targets are
    /// accepted; structural categories cannot be assigned from config.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Emphasis" => Some(Category::Emphasis),
            "Strong" => Some(Category::Strong),
            "Monospace" => Some(Category::Monospace),
            "Highlight" => Some(Category::Highlight),
            "Reference" => Some(Category::Reference),
            "Text" => Some(Category::Text),
            _ => None,
        }
    }
}

impl Role {
    /// Get a human-readable name for this role
    pub fn name(&self) -> &'static str {
        match self {
            Role::Delimiter => "delimiter",
            Role::Text => "text",
            Role::SecondaryText => "secondary-text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_split() {
        assert!(Category::Delimiter.is_meta());
        assert!(Category::ListMarker.is_meta());
        assert!(Category::Comment.is_meta());
        assert!(Category::TableMarker.is_meta());
        assert!(Category::Anchor.is_meta());
        assert!(Category::Preprocessor.is_meta());

        assert!(!Category::Emphasis.is_meta());
        assert!(!Category::Strong.is_meta());
        assert!(!Category::Heading(0).is_meta());
        assert!(!Category::Replacement.is_meta());
        assert!(!Category::Text.is_meta());
    }

    #[test]
    fn test_default_styles() {
        assert!(!Category::Heading(0).default_style().is_default());
        assert!(!Category::Comment.default_style().is_default());
        assert!(Category::Text.default_style().is_default());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Category::from_name("Strong"), Some(Category::Strong));
        assert_eq!(Category::from_name("Highlight"), Some(Category::Highlight));
        assert_eq!(Category::from_name("Delimiter"), None);
        assert_eq!(Category::from_name(""), None);
    }

    #[test]
    fn test_heading_names() {
        assert_eq!(Category::Heading(0).name(), "Heading0");
        assert_eq!(Category::Heading(4).name(), "Heading4");
    }
}
