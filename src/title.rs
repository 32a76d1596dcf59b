//! Title descriptor queries
//!
//! A read-only view of the heading starting at a given line, for
//! consumers that restructure headings (promotion, demotion, style
//! changes). The query applies the same title patterns and underline
//! length guard the classification rules use; it never mutates anything.

use crate::config::GrammarConfig;
use crate::error::Result;
use crate::pattern;
use crate::rule::Guard;
use crate::span::Span;

/// Which title family a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKind {
    OneLine,
    TwoLine,
}

/// One-line title delimiter arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneLineStyle {
    LeadingOnly,
    LeadingAndTrailing,
}

/// Description of a heading found at a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleDescriptor {
    /// Title family
    pub kind: TitleKind,
    /// Delimiter arrangement (one-line family only)
    pub style: Option<OneLineStyle>,
    /// Heading level, 0 through the configured maximum
    pub level: u8,
    /// Span of the title text, in buffer coordinates
    pub text: Span,
    /// Span of the whole construct, including delimiter lines
    pub span: Span,
}

/// Describe the heading starting at `line_start`, if any.
///
/// `line_start` must be the byte offset of a line start. The two-line
/// family is tried first (it consumes the following line as underline,
/// subject to the configured length guard), then the one-line family.
pub fn describe_title(
    text: &str,
    line_start: usize,
    config: &GrammarConfig,
) -> Result<Option<TitleDescriptor>> {
    let line_start = line_start.min(text.len());
    let rest = &text[line_start..];
    let first_line_end = rest.find('\n').unwrap_or(rest.len());
    let second_line_end = match rest[first_line_end..].strip_prefix('\n') {
        Some(second) => {
            first_line_end + 1 + second.find('\n').unwrap_or(second.len())
        }
        None => first_line_end,
    };

    let guard = Guard::UnderlineLength {
        tolerance: config.underline_tolerance,
        disable_len: config.underline_disable_len,
    };
    let two_lines = &rest[..second_line_end];
    for level in 0..=config.max_title_level {
        let pattern = pattern::two_line_title(config, level)?;
        if let Some(captures) = pattern.regex().captures(two_lines) {
            let whole = captures.get(0).map(|m| (m.start(), m.end()));
            if whole.map(|(start, _)| start) != Some(0) || !guard.accepts(&captures) {
                continue;
            }
            let text_group = match captures.get(1) {
                Some(m) => m,
                None => continue,
            };
            let (_, end) = whole.unwrap_or((0, 0));
            return Ok(Some(TitleDescriptor {
                kind: TitleKind::TwoLine,
                style: None,
                level,
                text: Span::new(text_group.start(), text_group.end()).shifted(line_start),
                span: Span::new(0, end).shifted(line_start),
            }));
        }
    }

    let one_line = &rest[..first_line_end];
    for level in 0..=config.max_title_level {
        let pattern = pattern::one_line_title(config, level)?;
        if let Some(captures) = pattern.regex().captures(one_line) {
            let whole = match captures.get(0) {
                Some(m) if m.start() == 0 => m,
                _ => continue,
            };
            let text_group = match captures.get(2) {
                Some(m) => m,
                None => continue,
            };
            let style = if captures.get(3).is_some() {
                OneLineStyle::LeadingAndTrailing
            } else {
                OneLineStyle::LeadingOnly
            };
            return Ok(Some(TitleDescriptor {
                kind: TitleKind::OneLine,
                style: Some(style),
                level,
                text: Span::new(text_group.start(), text_group.end()).shifted(line_start),
                span: Span::new(whole.start(), whole.end()).shifted(line_start),
            }));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GrammarConfig {
        GrammarConfig::default()
    }

    #[test]
    fn test_one_line_leading_only() {
        let text = "=== Deep Section\nbody\n";
        let title = describe_title(text, 0, &config()).unwrap().unwrap();
        assert_eq!(title.kind, TitleKind::OneLine);
        assert_eq!(title.style, Some(OneLineStyle::LeadingOnly));
        assert_eq!(title.level, 2);
        assert_eq!(&text[title.text.start..title.text.end], "Deep Section");
    }

    #[test]
    fn test_one_line_with_trailer() {
        let text = "== Both Sides ==\n";
        let title = describe_title(text, 0, &config()).unwrap().unwrap();
        assert_eq!(title.style, Some(OneLineStyle::LeadingAndTrailing));
        assert_eq!(title.level, 1);
        assert_eq!(&text[title.text.start..title.text.end], "Both Sides");
    }

    #[test]
    fn test_two_line_title() {
        let text = "Underlined\n~~~~~~~~~\nbody\n";
        let title = describe_title(text, 0, &config()).unwrap().unwrap();
        assert_eq!(title.kind, TitleKind::TwoLine);
        assert_eq!(title.style, None);
        assert_eq!(title.level, 2);
        assert_eq!(&text[title.text.start..title.text.end], "Underlined");
        // span covers both lines
        assert_eq!(title.span, Span::new(0, 20));
    }

    #[test]
    fn test_two_line_guard_suppresses() {
        // underline far longer than the text
        let text = "Hi\n~~~~~~~~~~~~\n";
        assert_eq!(describe_title(text, 0, &config()).unwrap(), None);
    }

    #[test]
    fn test_mid_buffer_line() {
        let text = "intro\n\n== Section\n";
        let title = describe_title(text, 7, &config()).unwrap().unwrap();
        assert_eq!(title.level, 1);
        assert_eq!(&text[title.text.start..title.text.end], "Section");
        assert_eq!(title.span, Span::new(7, 17));
    }

    #[test]
    fn test_plain_line_is_no_title() {
        assert_eq!(
            describe_title("just a paragraph\n", 0, &config()).unwrap(),
            None
        );
    }
}
