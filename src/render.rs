//! Terminal rendering of classified text
//!
//! Maps classified spans onto per-position styles and writes the text
//! with ANSI escapes, or produces a plain-text dump of the span triples.
//! This is the presentation layer consuming the engine's output; no
//! classification happens here.

use std::io::Write;

use crossterm::{
    queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use unicode_width::UnicodeWidthChar;

use crate::engine::Classification;
use crate::error::Result;
use crate::style::Style;

/// Rendering options
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Emit ANSI colors (plain text otherwise)
    pub color: bool,
    /// Prefix each line with its number
    pub line_numbers: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            line_numbers: false,
        }
    }
}

/// Render the classified text to a writer
pub fn render(
    out: &mut impl Write,
    text: &str,
    classification: &Classification,
    options: &RenderOptions,
) -> Result<()> {
    let styles = style_map(text.len(), classification);
    let gutter_width = if options.line_numbers {
        text.lines().count().max(1).to_string().len()
    } else {
        0
    };

    let mut line_number = 1;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if options.line_numbers {
            let gutter = format!("{line_number:>gutter_width$} ");
            if options.color {
                queue!(out, SetAttribute(Attribute::Dim), Print(&gutter))?;
                queue!(out, SetAttribute(Attribute::Reset))?;
            } else {
                queue!(out, Print(&gutter))?;
            }
        }
        let content = line.strip_suffix('\n').unwrap_or(line);
        if options.color {
            render_line(out, content, offset, &styles)?;
        } else {
            queue!(out, Print(content))?;
        }
        queue!(out, Print("\n"))?;
        offset += line.len();
        line_number += 1;
    }
    out.flush()?;
    Ok(())
}

/// Render one line as runs of equal style
fn render_line(
    out: &mut impl Write,
    content: &str,
    offset: usize,
    styles: &[Style],
) -> Result<()> {
    let mut run_start = 0;
    let mut run_style = None;
    for (pos, _) in content.char_indices() {
        let style = styles.get(offset + pos).copied().unwrap_or_default();
        match run_style {
            Some(current) if current == style => {}
            Some(current) => {
                emit_run(out, &content[run_start..pos], current)?;
                run_start = pos;
                run_style = Some(style);
            }
            None => run_style = Some(style),
        }
    }
    if let Some(style) = run_style {
        emit_run(out, &content[run_start..], style)?;
    }
    Ok(())
}

fn emit_run(out: &mut impl Write, run: &str, style: Style) -> Result<()> {
    if style.is_default() {
        queue!(out, Print(run))?;
        return Ok(());
    }
    queue!(out, SetForegroundColor(style.fg.into()))?;
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if style.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    queue!(out, Print(run), ResetColor, SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Merge the category styles of all spans into a per-position style map
fn style_map(len: usize, classification: &Classification) -> Vec<Style> {
    let mut styles = vec![Style::default(); len];
    for classified in &classification.spans {
        let style = classified.category.default_style();
        let end = classified.span.end.min(len);
        for slot in &mut styles[classified.span.start.min(end)..end] {
            *slot = slot.merged(style);
        }
    }
    styles
}

/// Plain-text dump of the classified span triples, one per line:
/// `start..end  category  role  snippet`
pub fn span_dump(text: &str, classification: &Classification) -> String {
    let mut dump = String::new();
    for classified in &classification.spans {
        let snippet = text
            .get(classified.span.start..classified.span.end)
            .unwrap_or("");
        let snippet = truncate_to_width(&snippet.replace('\n', "\\n"), 32);
        dump.push_str(&format!(
            "{:>5}..{:<5} {:<14} {:<14} {}\n",
            classified.span.start,
            classified.span.end,
            classified.category.name(),
            classified.role.name(),
            snippet,
        ));
    }
    dump
}

/// Truncate a string to a display-column budget
fn truncate_to_width(text: &str, max_cols: usize) -> String {
    let mut cols = 0;
    let mut result = String::new();
    for ch in text.chars() {
        let width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if cols + width > max_cols {
            result.push('\u{2026}');
            break;
        }
        cols += width;
        result.push(ch);
    }
    result
}
