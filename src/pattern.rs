//! Pattern library for markup constructs
//!
//! Pure constructors that turn a construct type and its parameters into a
//! [`PatternDescriptor`]: a compiled regex plus a map from capture group
//! index to that group's semantic role. Construction fails with
//! `Error::InvalidParameter` for malformed parameters (wrong delimiter
//! length, unsupported nesting level); matching never fails.
//!
//! The regex engine has no lookaround, so constrained quotes use `\B`
//! assertions around their non-word delimiters instead of lookbehind.

use regex::Regex;

use crate::category::Role;
use crate::config::GrammarConfig;
use crate::error::{Error, Result};

/// A compiled pattern plus the semantic roles of its capture groups.
///
/// Immutable once constructed; descriptors for the same construct and
/// parameters are interchangeable and may be cached by the caller.
#[derive(Debug)]
pub struct PatternDescriptor {
    regex: Regex,
    roles: Vec<(usize, Role)>,
}

impl PatternDescriptor {
    /// Compile an expression and attach group roles.
    ///
    /// Every group index in `roles` must exist in the expression.
    pub fn new(expression: &str, roles: Vec<(usize, Role)>) -> Result<Self> {
        let regex = Regex::new(expression)?;
        let groups = regex.captures_len();
        for &(index, _) in &roles {
            if index >= groups {
                return Err(Error::InvalidParameter(format!(
                    "group {index} does not exist in pattern {expression:?}"
                )));
            }
        }
        Ok(Self { regex, roles })
    }

    /// The compiled expression
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Number of capture groups, including group 0
    pub fn group_count(&self) -> usize {
        self.regex.captures_len()
    }

    /// The role of a capture group (`Role::Text` when unassigned)
    pub fn role_of(&self, group: usize) -> Role {
        self.roles
            .iter()
            .find(|(index, _)| *index == group)
            .map(|(_, role)| *role)
            .unwrap_or(Role::Text)
    }
}

/// Delimited block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Comment,
    Passthrough,
    Listing,
    Literal,
    Quote,
    Example,
    Sidebar,
    Open,
}

impl BlockKind {
    /// The character the block's fence lines repeat
    pub fn fence_char(&self) -> char {
        match self {
            BlockKind::Comment => '/',
            BlockKind::Passthrough => '+',
            BlockKind::Listing => '-',
            BlockKind::Literal => '.',
            BlockKind::Quote => '_',
            BlockKind::Example => '=',
            BlockKind::Sidebar => '*',
            BlockKind::Open => '-',
        }
    }
}

/// Explicit numbering styles for ordered list items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// Repeated `.` markers, level encoded by repetition
    Implicit,
    /// `1.` `2.` ...
    Arabic,
    /// `a.` `b.` ...
    LowerAlpha,
    /// `A.` `B.` ...
    UpperAlpha,
    /// `i)` `ii)` ...
    LowerRoman,
    /// `I)` `II)` ...
    UpperRoman,
}

/// Quote (inline formatting) boundary styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Requires a non-word boundary on both sides; the enclosed text may
    /// not start or end with whitespace
    Constrained,
    /// No boundary requirement; may span at most one additional line
    Unconstrained,
}

/// Content sub-pattern spanning at most one additional line, lazily
fn one_extra_line(allow_empty: bool) -> &'static str {
    if allow_empty {
        r"[^\n]*?(?:\n[^\n]*?)?"
    } else {
        r"[^\n]+?(?:\n[^\n]*?)?"
    }
}

/// One-line heading: marker repeated `level+1` times, text, optional
/// symmetric trailing delimiter.
pub fn one_line_title(config: &GrammarConfig, level: u8) -> Result<PatternDescriptor> {
    if level > config.max_title_level {
        return Err(Error::InvalidParameter(format!(
            "one-line title level {level} exceeds maximum {}",
            config.max_title_level
        )));
    }
    let marker = regex::escape(
        &config
            .title_marker
            .to_string()
            .repeat(usize::from(level) + 1),
    );
    let expression = format!(
        r"(?m)^({marker})[ \t]+([^\s\n][^\n]*?)(?:[ \t]+({marker}))?[ \t]*$"
    );
    PatternDescriptor::new(
        &expression,
        vec![(1, Role::Delimiter), (2, Role::Text), (3, Role::Delimiter)],
    )
}

/// Two-line heading: a text line containing at least one word character,
/// underlined by repetitions of the level's 2-character delimiter unit.
///
/// The length heuristic distinguishing an underline from a block fence is
/// an acceptance guard on the rule, not part of this pattern.
pub fn two_line_title(config: &GrammarConfig, level: u8) -> Result<PatternDescriptor> {
    let unit = config
        .two_line_delimiters
        .get(usize::from(level))
        .ok_or_else(|| {
            Error::InvalidParameter(format!("no two-line delimiter for level {level}"))
        })?;
    let mut chars = unit.chars();
    let (first, second) = match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) => (a, b),
        _ => {
            return Err(Error::InvalidParameter(format!(
                "two-line delimiter {unit:?} must be exactly 2 characters"
            )))
        }
    };
    let a = regex::escape(&first.to_string());
    let b = regex::escape(&second.to_string());
    let expression =
        format!(r"(?m)^([^\s\n]*\w[^\n]*?)[ \t]*\n((?:{a}{b})+{a}?)[ \t]*$");
    PatternDescriptor::new(&expression, vec![(1, Role::Text), (2, Role::Delimiter)])
}

/// Unordered list item marker; level 1..=5 encoded by marker repetition.
/// Level 1 also accepts the `-` marker.
pub fn bullet_list_item(level: u8) -> Result<PatternDescriptor> {
    if !(1..=5).contains(&level) {
        return Err(Error::InvalidParameter(format!(
            "bullet list level {level} not in 1..=5"
        )));
    }
    let marker = if level == 1 {
        r"-|\*".to_string()
    } else {
        format!(r"\*{{{level}}}", level = level)
    };
    let expression = format!(r"(?m)^[ \t]*({marker})[ \t]+");
    PatternDescriptor::new(&expression, vec![(1, Role::Delimiter)])
}

/// Ordered list item marker.
///
/// Implicit numbering repeats `.` to encode the level; explicit styles
/// exist only at level 1 (deeper nesting would be contradictory).
pub fn numbered_list_item(style: NumberStyle, level: u8) -> Result<PatternDescriptor> {
    if style == NumberStyle::Implicit {
        if !(1..=5).contains(&level) {
            return Err(Error::InvalidParameter(format!(
                "numbered list level {level} not in 1..=5"
            )));
        }
    } else if level != 1 {
        return Err(Error::InvalidParameter(format!(
            "explicit numbering style {style:?} only exists at level 1"
        )));
    }
    let marker = match style {
        NumberStyle::Implicit => format!(r"\.{{{level}}}", level = level),
        NumberStyle::Arabic => r"\d+\.".to_string(),
        NumberStyle::LowerAlpha => r"[a-z]\.".to_string(),
        NumberStyle::UpperAlpha => r"[A-Z]\.".to_string(),
        NumberStyle::LowerRoman => r"[ivxcm]+\)".to_string(),
        NumberStyle::UpperRoman => r"[IVXCM]+\)".to_string(),
    };
    let expression = format!(r"(?m)^[ \t]*({marker})[ \t]+");
    PatternDescriptor::new(&expression, vec![(1, Role::Delimiter)])
}

/// Labeled list item: label text, then the level's delimiter.
///
/// The label must not end with the delimiter's first character, which
/// disambiguates the label from the delimiter itself.
pub fn labeled_list_item(level: u8) -> Result<PatternDescriptor> {
    let delimiter = match level {
        1 => "::",
        2 => ";;",
        3 => ":::",
        4 => "::::",
        _ => {
            return Err(Error::InvalidParameter(format!(
                "labeled list level {level} not in 1..=4"
            )))
        }
    };
    let first = regex::escape(&delimiter.chars().next().unwrap_or(':').to_string());
    let escaped = regex::escape(delimiter);
    let expression = format!(
        r"(?m)^[ \t]*([^\n]*?[^{first}\s\n])({escaped})(?:[ \t]+|[ \t]*$)"
    );
    PatternDescriptor::new(&expression, vec![(1, Role::Text), (2, Role::Delimiter)])
}

/// Callout list item marker: `<1>` at line start
pub fn callout_list_item() -> Result<PatternDescriptor> {
    PatternDescriptor::new(r"(?m)^(<\d+>)[ \t]+", vec![(1, Role::Delimiter)])
}

/// Delimited block: fence line, non-greedy body, matching fence line.
///
/// Fences repeat the kind's character 4 or more times; the open block is
/// fixed at exactly two hyphens.
pub fn delimited_block(kind: BlockKind) -> Result<PatternDescriptor> {
    let fence = if kind == BlockKind::Open {
        "--".to_string()
    } else {
        format!(
            "{c}{{4,}}",
            c = regex::escape(&kind.fence_char().to_string())
        )
    };
    let expression =
        format!(r"(?m)^({fence})[ \t]*\n((?s:.*?\n)??)({fence})[ \t]*$");
    PatternDescriptor::new(
        &expression,
        vec![(1, Role::Delimiter), (2, Role::Text), (3, Role::Delimiter)],
    )
}

/// Table fence line: `|===`
pub fn table_fence() -> Result<PatternDescriptor> {
    PatternDescriptor::new(r"(?m)^(\|={3,})[ \t]*$", vec![(1, Role::Delimiter)])
}

/// Table cell separator at line start
pub fn table_cell() -> Result<PatternDescriptor> {
    PatternDescriptor::new(r"(?m)^[ \t]*(\|)", vec![(1, Role::Delimiter)])
}

/// Attribute entry: `:name: value`, `:name!:`
pub fn attribute_entry() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"(?m)^(:)(!?\w[\w-]*!?)(:)(?:[ \t]+([^\n]*?))?[ \t]*$",
        vec![
            (1, Role::Delimiter),
            (2, Role::Text),
            (3, Role::Delimiter),
            (4, Role::SecondaryText),
        ],
    )
}

/// Anchor: `[[id]]` or `[[id,xreflabel]]`, block or inline
pub fn anchor() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"(\[\[)(\w[\w:.-]*)(?:,[ \t]*([^\]\n]*?))?(\]\])",
        vec![
            (1, Role::Delimiter),
            (2, Role::Text),
            (3, Role::SecondaryText),
            (4, Role::Delimiter),
        ],
    )
}

/// Block attribute list alone on a line: `[source,rust]`
pub fn attribute_list() -> Result<PatternDescriptor> {
    PatternDescriptor::new(r"(?m)^(\[[^\[\]\n]*\])[ \t]*$", vec![(1, Role::Text)])
}

/// Block title: `.Title`
pub fn block_title() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"(?m)^(\.)([^ \t.\n][^\n]*)$",
        vec![(1, Role::Delimiter), (2, Role::Text)],
    )
}

/// Preprocessor directive: `include::`, `ifdef::`, `ifndef::`, `ifeval::`,
/// `endif::` alone on a line
pub fn preprocessor_macro() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"(?m)^(include|ifdef|ifndef|ifeval|endif)(::)([^ \t\[\n]*)(\[)([^\]\n]*)(\])[ \t]*$",
        vec![
            (1, Role::Text),
            (2, Role::Delimiter),
            (3, Role::SecondaryText),
            (4, Role::Delimiter),
            (5, Role::SecondaryText),
            (6, Role::Delimiter),
        ],
    )
}

/// Generic block macro: `name::target[attrs]` alone on a line
pub fn block_macro() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"(?m)^(\w[\w-]*)(::)([^ \t\[\n]*)(\[)([^\]\n]*)(\])[ \t]*$",
        vec![
            (1, Role::Text),
            (2, Role::Delimiter),
            (3, Role::SecondaryText),
            (4, Role::Delimiter),
            (5, Role::SecondaryText),
            (6, Role::Delimiter),
        ],
    )
}

/// Admonition paragraph marker: `NOTE:` and friends at line start
pub fn admonition() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"(?m)^(NOTE|TIP|IMPORTANT|WARNING|CAUTION)(:)[ \t]",
        vec![(1, Role::Text), (2, Role::Delimiter)],
    )
}

/// Comment line: `//` to end of line
pub fn comment_line() -> Result<PatternDescriptor> {
    PatternDescriptor::new(r"(?m)^(//[^\n]*)$", vec![(1, Role::Text)])
}

/// Inline passthrough with `+++` delimiters
pub fn passthrough_triple_plus() -> Result<PatternDescriptor> {
    let content = one_extra_line(true);
    let expression = format!(r"(\+\+\+)({content})(\+\+\+)");
    PatternDescriptor::new(
        &expression,
        vec![(1, Role::Delimiter), (2, Role::Text), (3, Role::Delimiter)],
    )
}

/// Inline passthrough with `$$` delimiters
pub fn passthrough_double_dollar() -> Result<PatternDescriptor> {
    let content = one_extra_line(true);
    let expression = format!(r"(\$\$)({content})(\$\$)");
    PatternDescriptor::new(
        &expression,
        vec![(1, Role::Delimiter), (2, Role::Text), (3, Role::Delimiter)],
    )
}

/// Passthrough macro: `pass:[text]`, optionally with substitution list
pub fn passthrough_macro() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"\b(pass)(:)([a-z,]*)(\[)([^\]\n]*)(\])",
        vec![
            (1, Role::Text),
            (2, Role::Delimiter),
            (3, Role::SecondaryText),
            (4, Role::Delimiter),
            (5, Role::Text),
            (6, Role::Delimiter),
        ],
    )
}

/// Quote (inline formatting) pattern for a delimiter and boundary style.
///
/// Constrained quotes demand a non-word boundary on both sides, expressed
/// with `\B` around the non-word delimiter, and text that neither starts
/// nor ends with whitespace. Unconstrained quotes have no boundary
/// requirement and may span one additional line.
pub fn quote(delimiter: &str, style: QuoteStyle) -> Result<PatternDescriptor> {
    if delimiter.is_empty() {
        return Err(Error::InvalidParameter("empty quote delimiter".into()));
    }
    let escaped = regex::escape(delimiter);
    let expression = match style {
        QuoteStyle::Constrained => {
            if delimiter.chars().any(|c| c.is_alphanumeric() || c == '_') {
                return Err(Error::InvalidParameter(format!(
                    "constrained quote delimiter {delimiter:?} must not contain word characters"
                )));
            }
            let first = regex::escape(
                &delimiter.chars().next().unwrap_or('*').to_string(),
            );
            format!(
                r"\B({escaped})([^\s{first}](?:[^{first}\n]*?[^\s{first}])?)({escaped})\B"
            )
        }
        QuoteStyle::Unconstrained => {
            let content = one_extra_line(false);
            format!(r"({escaped})({content})({escaped})")
        }
    };
    PatternDescriptor::new(
        &expression,
        vec![(1, Role::Delimiter), (2, Role::Text), (3, Role::Delimiter)],
    )
}

/// User-configured special word pattern, classified as a whole
pub fn special_word(pattern: &str) -> Result<PatternDescriptor> {
    PatternDescriptor::new(pattern, Vec::new())
}

/// Typographic replacements: `(C)`, `(R)`, `(TM)`, arrows, ellipsis,
/// em dash
pub fn typographic_replacement() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"(\((?:C|R|TM)\)|\.\.\.|<=|<-|=>|->|--)",
        vec![(1, Role::Text)],
    )
}

/// Numeric and named character references: `&#65;`, `&#x41;`, `&name;`
pub fn character_reference() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"(&#[0-9]{1,7};|&#x[0-9a-fA-F]{1,6};|&[A-Za-z][A-Za-z0-9]*;)",
        vec![(1, Role::Text)],
    )
}

/// Attribute reference: `{name}`
pub fn attribute_reference() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"(\{)(\w[\w-]*)(\})",
        vec![(1, Role::Delimiter), (2, Role::Text), (3, Role::Delimiter)],
    )
}

/// Cross reference: `<<id>>` or `<<id,caption>>`
pub fn xref() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"(<<)(\w[\w.-]*)(?:(,)[ \t]*([^>\n]*?))?(>>)",
        vec![
            (1, Role::Delimiter),
            (2, Role::SecondaryText),
            (3, Role::Delimiter),
            (4, Role::Text),
            (5, Role::Delimiter),
        ],
    )
}

/// Bare URL with optional bracketed caption
pub fn url() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"\b((?:https?|ftp|file|irc)://[^\s\[\]<>]+)(?:(\[)([^\]\n]*)(\]))?",
        vec![
            (1, Role::SecondaryText),
            (2, Role::Delimiter),
            (3, Role::Text),
            (4, Role::Delimiter),
        ],
    )
}

/// Generic inline macro: `name:target[text]`
pub fn inline_macro() -> Result<PatternDescriptor> {
    PatternDescriptor::new(
        r"\b(\w[\w-]*)(:)((?:[^\s:\[][^\s\[]*)?)(\[)([^\]\n]*)(\])",
        vec![
            (1, Role::Text),
            (2, Role::Delimiter),
            (3, Role::SecondaryText),
            (4, Role::Delimiter),
            (5, Role::Text),
            (6, Role::Delimiter),
        ],
    )
}
