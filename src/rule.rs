//! Classification rules and the ordered rule table
//!
//! A rule couples a pattern with the reservation checks that gate its
//! acceptance and the tag/category assignments applied when a match is
//! accepted. The table's order is the precedence order: structural
//! constructs first, inline substitutions last, and within the inline
//! stage a fixed sub-order ending with a second replacement pass.

use regex::Captures;

use crate::category::Category;
use crate::config::GrammarConfig;
use crate::error::{Error, Result};
use crate::pattern::{self, BlockKind, NumberStyle, PatternDescriptor, QuoteStyle};
use crate::reserve::Tag;

/// Extra acceptance predicate evaluated on the captures of a candidate
/// match, after the reservation checks.
#[derive(Debug, Clone)]
pub enum Guard {
    /// Two-line heading underline length heuristic: the underline length
    /// (group 2) must differ from the title length (group 1) by less than
    /// `tolerance`, and an underline of exactly `disable_len` characters
    /// is never accepted.
    UnderlineLength {
        tolerance: usize,
        disable_len: Option<usize>,
    },
}

impl Guard {
    /// Evaluate the guard against a candidate's captures
    pub fn accepts(&self, captures: &Captures) -> bool {
        match self {
            Guard::UnderlineLength {
                tolerance,
                disable_len,
            } => {
                let title = captures
                    .get(1)
                    .map_or(0, |m| m.as_str().chars().count());
                let underline = captures
                    .get(2)
                    .map_or(0, |m| m.as_str().chars().count());
                if *disable_len == Some(underline) {
                    return false;
                }
                title.abs_diff(underline) < *tolerance
            }
        }
    }
}

/// One entry of the ordered rule table
#[derive(Debug)]
pub struct Rule {
    /// Name for diagnostics and tests
    pub name: String,
    /// The pattern this rule scans for
    pub pattern: PatternDescriptor,
    /// Groups that must be entirely free for a candidate to be accepted
    pub must_be_free: Vec<usize>,
    /// Groups that must not overlap a block delimiter tag
    pub keep_off_delimiters: Vec<usize>,
    /// Reservation tags written over the matched groups on acceptance
    pub reservations: Vec<(usize, Tag)>,
    /// Categories assigned to the matched groups on acceptance
    pub categories: Vec<(usize, Category)>,
    /// Optional extra acceptance predicate
    pub guard: Option<Guard>,
}

impl Rule {
    /// Create a rule with no checks or assignments
    pub fn new(name: &str, pattern: PatternDescriptor) -> Self {
        Self {
            name: name.to_string(),
            pattern,
            must_be_free: Vec::new(),
            keep_off_delimiters: Vec::new(),
            reservations: Vec::new(),
            categories: Vec::new(),
            guard: None,
        }
    }

    /// Builder: require these groups to be entirely free
    pub fn free(mut self, groups: &[usize]) -> Self {
        self.must_be_free.extend_from_slice(groups);
        self
    }

    /// Builder: forbid these groups from overlapping block delimiters
    pub fn keep_off_delimiters(mut self, groups: &[usize]) -> Self {
        self.keep_off_delimiters.extend_from_slice(groups);
        self
    }

    /// Builder: reserve a group with a tag on acceptance
    pub fn reserve(mut self, group: usize, tag: Tag) -> Self {
        self.reservations.push((group, tag));
        self
    }

    /// Builder: assign a category to a group on acceptance
    pub fn classify(mut self, group: usize, category: Category) -> Self {
        self.categories.push((group, category));
        self
    }

    /// Builder: attach an acceptance guard
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Check that every referenced group exists in the pattern
    fn validate(&self) -> Result<()> {
        let groups = self.pattern.group_count();
        let referenced = self
            .must_be_free
            .iter()
            .chain(self.keep_off_delimiters.iter())
            .chain(self.reservations.iter().map(|(g, _)| g))
            .chain(self.categories.iter().map(|(g, _)| g));
        for &group in referenced {
            if group >= groups {
                return Err(Error::InvalidParameter(format!(
                    "rule {} references group {group}, pattern has {groups}",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// The ordered rule table for one grammar configuration
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Build the full table from a grammar configuration.
    ///
    /// The table captures the configuration's values; changing the
    /// configuration means building a new table.
    pub fn build(config: &GrammarConfig) -> Result<Self> {
        let mut table = Self { rules: Vec::new() };

        // Document structure: two-line headings carry the underline
        // length guard, one-line headings follow.
        for level in 0..=config.max_title_level {
            table.add(
                Rule::new(
                    &format!("two-line-title-{level}"),
                    pattern::two_line_title(config, level)?,
                )
                .free(&[1, 2])
                .reserve(2, Tag::BlockDelimiter)
                .classify(1, Category::Heading(level))
                .classify(2, Category::Delimiter)
                .guard(Guard::UnderlineLength {
                    tolerance: config.underline_tolerance,
                    disable_len: config.underline_disable_len,
                }),
            )?;
        }
        for level in 0..=config.max_title_level {
            table.add(
                Rule::new(
                    &format!("one-line-title-{level}"),
                    pattern::one_line_title(config, level)?,
                )
                .free(&[1, 2, 3])
                .reserve(1, Tag::BlockDelimiter)
                .reserve(3, Tag::BlockDelimiter)
                .classify(1, Category::Delimiter)
                .classify(2, Category::Heading(level))
                .classify(3, Category::Delimiter),
            )?;
        }

        // Comments hide everything they enclose from later rules.
        table.add(
            Rule::new("comment-block", pattern::delimited_block(BlockKind::Comment)?)
                .free(&[1, 3])
                .reserve(1, Tag::BlockDelimiter)
                .reserve(3, Tag::BlockDelimiter)
                .reserve(2, Tag::Reserved)
                .classify(1, Category::Comment)
                .classify(2, Category::Comment)
                .classify(3, Category::Comment),
        )?;
        table.add(
            Rule::new("comment-line", pattern::comment_line()?)
                .free(&[1])
                .reserve(1, Tag::Reserved)
                .classify(1, Category::Comment),
        )?;

        // Block macros: preprocessor directives before the generic form.
        table.add(
            Rule::new("preprocessor", pattern::preprocessor_macro()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::Preprocessor)
                .classify(2, Category::Delimiter)
                .classify(3, Category::MacroTarget)
                .classify(4, Category::Delimiter)
                .classify(5, Category::Reference)
                .classify(6, Category::Delimiter),
        )?;
        table.add(
            Rule::new("block-macro", pattern::block_macro()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::MacroName)
                .classify(2, Category::Delimiter)
                .classify(3, Category::MacroTarget)
                .classify(4, Category::Delimiter)
                .classify(5, Category::Reference)
                .classify(6, Category::Delimiter),
        )?;

        // Lists: markers reserve block delimiter tags so inline rules can
        // never span across them.
        for level in 1..=5 {
            table.add(
                Rule::new(
                    &format!("bullet-list-{level}"),
                    pattern::bullet_list_item(level)?,
                )
                .free(&[1])
                .reserve(1, Tag::BlockDelimiter)
                .classify(1, Category::ListMarker),
            )?;
        }
        for level in 1..=5 {
            table.add(
                Rule::new(
                    &format!("numbered-list-{level}"),
                    pattern::numbered_list_item(NumberStyle::Implicit, level)?,
                )
                .free(&[1])
                .reserve(1, Tag::BlockDelimiter)
                .classify(1, Category::ListMarker),
            )?;
        }
        for (name, style) in [
            ("numbered-list-arabic", NumberStyle::Arabic),
            ("numbered-list-lower-alpha", NumberStyle::LowerAlpha),
            ("numbered-list-upper-alpha", NumberStyle::UpperAlpha),
            ("numbered-list-lower-roman", NumberStyle::LowerRoman),
            ("numbered-list-upper-roman", NumberStyle::UpperRoman),
        ] {
            table.add(
                Rule::new(name, pattern::numbered_list_item(style, 1)?)
                    .free(&[1])
                    .reserve(1, Tag::BlockDelimiter)
                    .classify(1, Category::ListMarker),
            )?;
        }
        for level in 1..=4 {
            table.add(
                Rule::new(
                    &format!("labeled-list-{level}"),
                    pattern::labeled_list_item(level)?,
                )
                .free(&[1, 2])
                .reserve(2, Tag::BlockDelimiter)
                .classify(1, Category::ListLabel)
                .classify(2, Category::Delimiter),
            )?;
        }
        table.add(
            Rule::new("callout", pattern::callout_list_item()?)
                .free(&[1])
                .reserve(1, Tag::BlockDelimiter)
                .classify(1, Category::Callout),
        )?;

        // Delimited blocks. Literal-family bodies are reserved; container
        // bodies (quote, example, sidebar, open) stay open to inline rules.
        for (name, kind, body) in [
            ("passthrough-block", BlockKind::Passthrough, Some(Category::Passthrough)),
            ("listing-block", BlockKind::Listing, Some(Category::Literal)),
            ("literal-block", BlockKind::Literal, Some(Category::Literal)),
            ("quote-block", BlockKind::Quote, None),
            ("example-block", BlockKind::Example, None),
            ("sidebar-block", BlockKind::Sidebar, None),
            ("open-block", BlockKind::Open, None),
        ] {
            let mut rule = Rule::new(name, pattern::delimited_block(kind)?)
                .free(&[1, 3])
                .reserve(1, Tag::BlockDelimiter)
                .reserve(3, Tag::BlockDelimiter)
                .classify(1, Category::Delimiter)
                .classify(3, Category::Delimiter);
            if let Some(category) = body {
                rule = rule.reserve(2, Tag::Reserved).classify(2, category);
            }
            table.add(rule)?;
        }

        // Tables.
        table.add(
            Rule::new("table-fence", pattern::table_fence()?)
                .free(&[1])
                .reserve(1, Tag::BlockDelimiter)
                .classify(1, Category::TableMarker),
        )?;
        table.add(
            Rule::new("table-cell", pattern::table_cell()?)
                .free(&[1])
                .reserve(1, Tag::BlockDelimiter)
                .classify(1, Category::TableMarker),
        )?;

        // Attribute entries, anchors, block attribute lists.
        table.add(
            Rule::new("attribute-entry", pattern::attribute_entry()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::Delimiter)
                .classify(2, Category::AttributeName)
                .classify(3, Category::Delimiter)
                .classify(4, Category::AttributeValue),
        )?;
        table.add(
            Rule::new("anchor", pattern::anchor()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::Delimiter)
                .classify(2, Category::Anchor)
                .classify(3, Category::Reference)
                .classify(4, Category::Delimiter),
        )?;
        table.add(
            Rule::new("attribute-list", pattern::attribute_list()?)
                .free(&[1])
                .reserve(1, Tag::Reserved)
                .classify(1, Category::AttributeList),
        )?;

        // Block title.
        table.add(
            Rule::new("block-title", pattern::block_title()?)
                .free(&[1])
                .reserve(1, Tag::Reserved)
                .classify(1, Category::Delimiter)
                .classify(2, Category::BlockTitle),
        )?;

        // Admonition paragraphs; the paragraph text stays free.
        table.add(
            Rule::new("admonition", pattern::admonition()?)
                .free(&[1, 2])
                .reserve(1, Tag::Reserved)
                .reserve(2, Tag::Reserved)
                .classify(1, Category::Admonition)
                .classify(2, Category::Delimiter),
        )?;

        // Inline stage. Passthrough first: its content is exempt from
        // every later rule.
        table.add(
            Rule::new("passthrough-triple-plus", pattern::passthrough_triple_plus()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::Delimiter)
                .classify(2, Category::Passthrough)
                .classify(3, Category::Delimiter),
        )?;
        table.add(
            Rule::new("passthrough-double-dollar", pattern::passthrough_double_dollar()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::Delimiter)
                .classify(2, Category::Passthrough)
                .classify(3, Category::Delimiter),
        )?;
        table.add(
            Rule::new("passthrough-macro", pattern::passthrough_macro()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::MacroName)
                .classify(2, Category::Delimiter)
                .classify(3, Category::MacroTarget)
                .classify(4, Category::Delimiter)
                .classify(5, Category::Passthrough)
                .classify(6, Category::Delimiter),
        )?;

        // Quotes: unconstrained kinds before their constrained siblings.
        for (name, delimiter, style, category) in [
            ("strong-unconstrained", "**", QuoteStyle::Unconstrained, Category::Strong),
            ("emphasis-unconstrained", "__", QuoteStyle::Unconstrained, Category::Emphasis),
            ("monospace-unconstrained", "++", QuoteStyle::Unconstrained, Category::Monospace),
            ("superscript", "^", QuoteStyle::Unconstrained, Category::Superscript),
            ("subscript", "~", QuoteStyle::Unconstrained, Category::Subscript),
            ("strong", "*", QuoteStyle::Constrained, Category::Strong),
            ("emphasis", "_", QuoteStyle::Constrained, Category::Emphasis),
            ("monospace-plus", "+", QuoteStyle::Constrained, Category::Monospace),
            ("monospace-backtick", "`", QuoteStyle::Constrained, Category::Monospace),
        ] {
            table.add(
                Rule::new(name, pattern::quote(delimiter, style)?)
                    .free(&[1, 3])
                    .keep_off_delimiters(&[2])
                    .reserve(1, Tag::Reserved)
                    .reserve(3, Tag::Reserved)
                    .classify(1, Category::Delimiter)
                    .classify(2, category)
                    .classify(3, Category::Delimiter),
            )?;
        }

        // Special words from configuration (empty by default).
        for (index, word) in config.special_words.iter().enumerate() {
            table.add(
                Rule::new(
                    &format!("special-word-{index}"),
                    pattern::special_word(&word.pattern)?,
                )
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(0, word.category),
            )?;
        }

        // Replacements, first pass.
        table.add(replacement_rule("replacement")?)?;
        table.add(reference_rule("character-reference")?)?;

        // Attribute references.
        table.add(
            Rule::new("attribute-reference", pattern::attribute_reference()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::Delimiter)
                .classify(2, Category::AttributeRef)
                .classify(3, Category::Delimiter),
        )?;

        // Inline macros.
        table.add(
            Rule::new("xref", pattern::xref()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::Delimiter)
                .classify(2, Category::MacroTarget)
                .classify(3, Category::Delimiter)
                .classify(4, Category::Reference)
                .classify(5, Category::Delimiter),
        )?;
        table.add(
            Rule::new("url", pattern::url()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::MacroTarget)
                .classify(2, Category::Delimiter)
                .classify(3, Category::Reference)
                .classify(4, Category::Delimiter),
        )?;
        table.add(
            Rule::new("inline-macro", pattern::inline_macro()?)
                .free(&[0])
                .reserve(0, Tag::Reserved)
                .classify(1, Category::MacroName)
                .classify(2, Category::Delimiter)
                .classify(3, Category::MacroTarget)
                .classify(4, Category::Delimiter)
                .classify(5, Category::Reference)
                .classify(6, Category::Delimiter),
        )?;

        // Replacements, second pass: occurrences freed up by macro and
        // reference claims in between.
        table.add(replacement_rule("replacement-2")?)?;
        table.add(reference_rule("character-reference-2")?)?;

        Ok(table)
    }

    fn add(&mut self, rule: Rule) -> Result<()> {
        rule.validate()?;
        self.rules.push(rule);
        Ok(())
    }

    /// The rules in precedence order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules in the table
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn replacement_rule(name: &str) -> Result<Rule> {
    Ok(Rule::new(name, pattern::typographic_replacement()?)
        .free(&[1])
        .reserve(1, Tag::Reserved)
        .classify(1, Category::Replacement))
}

fn reference_rule(name: &str) -> Result<Rule> {
    Ok(Rule::new(name, pattern::character_reference()?)
        .free(&[1])
        .reserve(1, Tag::Reserved)
        .classify(1, Category::Replacement))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_default_table() {
        let table = RuleTable::build(&GrammarConfig::default()).unwrap();
        assert!(!table.is_empty());

        // structural rules precede the inline stage
        let position = |name: &str| {
            table
                .rules()
                .iter()
                .position(|rule| rule.name == name)
                .unwrap_or_else(|| panic!("missing rule {name}"))
        };
        assert!(position("two-line-title-0") < position("one-line-title-0"));
        assert!(position("one-line-title-4") < position("bullet-list-1"));
        assert!(position("bullet-list-1") < position("listing-block"));
        assert!(position("listing-block") < position("table-fence"));
        assert!(position("table-fence") < position("attribute-entry"));
        assert!(position("block-title") < position("admonition"));
        assert!(position("admonition") < position("passthrough-triple-plus"));
        assert!(position("passthrough-triple-plus") < position("strong-unconstrained"));
        assert!(position("strong-unconstrained") < position("strong"));
        assert!(position("strong") < position("replacement"));
        assert!(position("replacement") < position("attribute-reference"));
        assert!(position("attribute-reference") < position("xref"));
        assert!(position("xref") < position("replacement-2"));
    }

    #[test]
    fn test_special_words_enter_table() {
        let mut config = GrammarConfig::default();
        config.special_words.push(crate::config::SpecialWord {
            pattern: r"\bTODO\b".to_string(),
            category: Category::Highlight,
        });
        let table = RuleTable::build(&config).unwrap();
        assert!(table.rules().iter().any(|rule| rule.name == "special-word-0"));
    }

    #[test]
    fn test_bad_special_word_fails_build() {
        let mut config = GrammarConfig::default();
        config.special_words.push(crate::config::SpecialWord {
            pattern: "(unclosed".to_string(),
            category: Category::Highlight,
        });
        assert!(RuleTable::build(&config).is_err());
    }

    #[test]
    fn test_rule_validation_rejects_unknown_group() {
        let pattern = pattern::comment_line().unwrap();
        let rule = Rule::new("bogus", pattern).classify(7, Category::Comment);
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_underline_guard() {
        let guard = Guard::UnderlineLength {
            tolerance: 3,
            disable_len: Some(4),
        };
        let regex = regex::Regex::new(r"(?m)^([^\n]+)\n(-+)$").unwrap();

        let accepted = regex.captures("Title\n---").unwrap();
        assert!(guard.accepts(&accepted)); // |5 - 3| = 2 < 3

        let rejected = regex.captures("Title\n---------").unwrap();
        assert!(!guard.accepts(&rejected)); // |5 - 9| = 4 >= 3

        let disabled = regex.captures("Titl\n----").unwrap();
        assert!(!guard.accepts(&disabled)); // underline length hits disable_len
    }
}
