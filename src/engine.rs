//! The classification engine
//!
//! One classification pass applies every rule of the table, in order,
//! over a single region. Each rule is driven by the matcher loop: find
//! the next candidate, check it against the reservation tracker, and on
//! rejection back off by one character and retry, so a later occurrence
//! of the same construct can still be claimed. After the last rule, the
//! cleanup pass resolves positions that collected more than one category.

use crate::category::{Category, Role};
use crate::config::GrammarConfig;
use crate::error::Result;
use crate::reserve::{ReservationTracker, Tag};
use crate::rule::{Rule, RuleTable};
use crate::span::Span;

/// One candidate match of a rule within a region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Span of the whole match, region-local
    pub span: Span,
    /// Spans of all capture groups (`None` for non-participating groups)
    pub groups: Vec<Option<Span>>,
    /// Whether the reservation checks accepted this candidate
    pub accepted: bool,
}

/// One classified span of the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedSpan {
    /// Buffer-coordinate span
    pub span: Span,
    /// The category assigned to the span
    pub category: Category,
    /// The structural role the span played in its construct
    pub role: Role,
}

/// The result of one classification pass over one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Classified spans in buffer coordinates, ordered by start offset
    pub spans: Vec<ClassifiedSpan>,
    /// Final reservation tag per region-local byte position
    pub tags: Vec<Tag>,
}

/// Classifies regions of markup text against a built rule table.
///
/// The classifier is immutable after construction; each call to
/// [`classify`](Self::classify) runs an independent pass with its own
/// reservation tracker, so independent regions may be classified from
/// separate calls without shared state.
#[derive(Debug)]
pub struct Classifier {
    table: RuleTable,
}

impl Classifier {
    /// Build a classifier for a grammar configuration
    pub fn new(config: &GrammarConfig) -> Result<Self> {
        Ok(Self {
            table: RuleTable::build(config)?,
        })
    }

    /// Wrap an already-built rule table
    pub fn from_table(table: RuleTable) -> Self {
        Self { table }
    }

    /// The underlying rule table
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Classify the whole buffer as one region
    pub fn classify_all(&self, text: &str) -> Classification {
        self.classify(text, Span::new(0, text.len()))
    }

    /// Classify one region of the buffer.
    ///
    /// The region is clamped to the buffer and snapped outward to char
    /// boundaries. Spans in the result are buffer coordinates; the tag
    /// array is region-local.
    pub fn classify(&self, text: &str, region: Span) -> Classification {
        let region = clamp_region(text, region);
        let slice = &text[region.start..region.end];

        let mut tracker = ReservationTracker::new(slice.len());
        let mut categories = CategoryMap::new(slice.len());
        for rule in self.table.rules() {
            run_rule(rule, slice, &mut tracker, &mut categories);
        }
        categories.cleanup();

        Classification {
            spans: categories.emit(region.start),
            tags: tracker.into_tags(),
        }
    }
}

/// Clamp a region to the text and snap its ends to char boundaries
fn clamp_region(text: &str, region: Span) -> Span {
    let mut start = region.start.min(text.len());
    while start < text.len() && !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = region.end.min(text.len()).max(start);
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    Span::new(start, end)
}

/// Position one character past `pos` (or past the end, to stop the loop)
fn next_char_boundary(slice: &str, pos: usize) -> usize {
    if pos >= slice.len() {
        return pos + 1;
    }
    let mut next = pos + 1;
    while next < slice.len() && !slice.is_char_boundary(next) {
        next += 1;
    }
    next
}

/// Run one rule over the region, returning the accepted matches.
///
/// The loop advances the cursor to the end of each accepted match (one
/// character for an empty match, so zero-length-capable patterns still
/// make progress) and one character past the candidate's start on
/// rejection. Each iteration moves the cursor forward, bounding the loop
/// at one iteration per character plus one.
fn run_rule(
    rule: &Rule,
    slice: &str,
    tracker: &mut ReservationTracker,
    categories: &mut CategoryMap,
) -> Vec<MatchResult> {
    let mut results = Vec::new();
    let mut cursor = 0usize;

    while cursor <= slice.len() {
        let Some(captures) = rule.pattern.regex().captures_at(slice, cursor) else {
            break;
        };
        let overall = match captures.get(0) {
            Some(m) => Span::new(m.start(), m.end()),
            None => break,
        };

        let group_span = |group: usize| {
            captures
                .get(group)
                .map(|m| Span::new(m.start(), m.end()))
        };

        let mut accepted = rule
            .must_be_free
            .iter()
            .filter_map(|&group| group_span(group))
            .all(|span| tracker.is_free(span));
        if accepted {
            accepted = !rule
                .keep_off_delimiters
                .iter()
                .filter_map(|&group| group_span(group))
                .any(|span| tracker.overlaps_block_delimiter(span));
        }
        if accepted {
            if let Some(guard) = &rule.guard {
                accepted = guard.accepts(&captures);
            }
        }

        if accepted {
            for &(group, tag) in &rule.reservations {
                if let Some(span) = group_span(group) {
                    tracker.apply(span, tag);
                }
            }
            for &(group, category) in &rule.categories {
                if let Some(span) = group_span(group) {
                    categories.assign(span, category, rule.pattern.role_of(group));
                }
            }
            results.push(MatchResult {
                span: overall,
                groups: (0..rule.pattern.group_count()).map(group_span).collect(),
                accepted: true,
            });
            cursor = if overall.is_empty() {
                next_char_boundary(slice, overall.end)
            } else {
                overall.end
            };
        } else {
            cursor = next_char_boundary(slice, overall.start);
        }
    }

    results
}

/// Per-position category assignments for one region.
///
/// Kept separate from the reservation tracker: the tracker is parser
/// state and is discarded or returned as-is, the category map becomes
/// the render-facing output.
#[derive(Debug)]
struct CategoryMap {
    entries: Vec<Vec<(Category, Role)>>,
}

impl CategoryMap {
    fn new(len: usize) -> Self {
        Self {
            entries: vec![Vec::new(); len],
        }
    }

    /// Record a category over a span, once per position
    fn assign(&mut self, span: Span, category: Category, role: Role) {
        let end = span.end.min(self.entries.len());
        for entry in &mut self.entries[span.start.min(end)..end] {
            if !entry.contains(&(category, role)) {
                entry.push((category, role));
            }
        }
    }

    /// Resolve positions carrying multiple categories: structural/meta
    /// categories win over text-level ones. Idempotent.
    fn cleanup(&mut self) {
        for entry in &mut self.entries {
            if entry.len() > 1 && entry.iter().any(|(category, _)| category.is_meta()) {
                entry.retain(|(category, _)| category.is_meta());
            }
        }
    }

    /// Emit maximal runs of identical (category, role) assignments as
    /// spans, shifted into buffer coordinates
    fn emit(&self, offset: usize) -> Vec<ClassifiedSpan> {
        let mut open: Vec<((Category, Role), usize)> = Vec::new();
        let mut finished = Vec::new();

        for pos in 0..=self.entries.len() {
            let current: &[(Category, Role)] = match self.entries.get(pos) {
                Some(entry) => entry,
                None => &[],
            };
            open.retain(|&(entry, start)| {
                if current.contains(&entry) {
                    true
                } else {
                    finished.push(ClassifiedSpan {
                        span: Span::new(start + offset, pos + offset),
                        category: entry.0,
                        role: entry.1,
                    });
                    false
                }
            });
            for &entry in current {
                if !open.iter().any(|(existing, _)| *existing == entry) {
                    open.push((entry, pos));
                }
            }
        }

        finished.sort_by_key(|classified| (classified.span.start, classified.span.end));
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternDescriptor;

    fn classifier() -> Classifier {
        Classifier::new(&GrammarConfig::default()).unwrap()
    }

    fn spans_of(classification: &Classification, category: Category) -> Vec<Span> {
        classification
            .spans
            .iter()
            .filter(|s| s.category == category)
            .map(|s| s.span)
            .collect()
    }

    #[test]
    fn test_one_line_heading() {
        let text = "== Section ==\nbody text\n";
        let result = classifier().classify_all(text);

        let headings = spans_of(&result, Category::Heading(1));
        assert_eq!(headings, vec![Span::new(3, 10)]);

        let delimiters = spans_of(&result, Category::Delimiter);
        assert!(delimiters.contains(&Span::new(0, 2)));
        assert!(delimiters.contains(&Span::new(11, 13)));
    }

    #[test]
    fn test_two_line_heading_length_guard() {
        // difference 2 < 3: classified
        let result = classifier().classify_all("Title\n---\n");
        assert_eq!(spans_of(&result, Category::Heading(1)), vec![Span::new(0, 5)]);

        // difference 4 >= 3: not a heading
        let result = classifier().classify_all("Title\n---------\n");
        assert!(spans_of(&result, Category::Heading(1)).is_empty());
    }

    #[test]
    fn test_two_line_heading_disable_length() {
        let mut config = GrammarConfig::default();
        config.underline_disable_len = Some(4);
        let classifier = Classifier::new(&config).unwrap();

        // difference 0 but underline length hits the disable threshold
        let result = classifier.classify_all("Titl\n----\n");
        assert!(spans_of(&result, Category::Heading(1)).is_empty());

        // one character longer: accepted again
        let result = classifier.classify_all("Title\n-----\n");
        assert_eq!(spans_of(&result, Category::Heading(1)), vec![Span::new(0, 5)]);
    }

    #[test]
    fn test_constrained_quote_requires_boundaries() {
        let result = classifier().classify_all("a*b*c");
        assert!(spans_of(&result, Category::Strong).is_empty());

        let result = classifier().classify_all("a *b* c");
        assert_eq!(spans_of(&result, Category::Strong), vec![Span::new(3, 4)]);
    }

    #[test]
    fn test_unconstrained_quote_is_unconditional() {
        let result = classifier().classify_all("a**b**c");
        assert_eq!(spans_of(&result, Category::Strong), vec![Span::new(3, 4)]);
    }

    #[test]
    fn test_reservation_precedence_scenario() {
        // The lone ** on the first line must not pair with the next
        // line's list marker once that marker is reserved.
        let text = "NOTE: see <<x>> for ** attempt\n** next item\n";
        let result = classifier().classify_all(text);

        let marker = Span::new(31, 33);
        assert!(spans_of(&result, Category::ListMarker).contains(&marker));
        assert!(spans_of(&result, Category::Admonition).contains(&Span::new(0, 4)));

        // no strong span anywhere, and in particular none crossing into
        // the reserved marker
        let strong = spans_of(&result, Category::Strong);
        assert!(strong.is_empty());
        for classified in &result.spans {
            if !classified.category.is_meta() {
                assert!(
                    !classified.span.overlaps(marker),
                    "text-level span {:?} overlaps the list marker",
                    classified
                );
            }
        }

        // the xref on the first line is still classified
        assert!(result
            .spans
            .iter()
            .any(|s| s.category == Category::MacroTarget && s.span == Span::new(12, 13)));
    }

    #[test]
    fn test_paired_strong_on_one_line_stays_there() {
        let text = "NOTE: a ** strong words ** b\n** next item\n";
        let result = classifier().classify_all(text);

        let strong = spans_of(&result, Category::Strong);
        assert_eq!(strong, vec![Span::new(10, 24)]);

        let marker = Span::new(29, 31);
        assert!(spans_of(&result, Category::ListMarker).contains(&marker));
    }

    #[test]
    fn test_listing_body_is_reserved_but_markers_survive_cleanup() {
        let text = "----\n* not a list? it is, rules ran first\n----\n";
        let result = classifier().classify_all(text);

        // the marker was claimed before the block rule ran; cleanup keeps
        // the structural category and drops the layered literal one
        let marker = Span::new(5, 6);
        assert!(spans_of(&result, Category::ListMarker).contains(&marker));
        for literal in spans_of(&result, Category::Literal) {
            assert!(!literal.overlaps(marker));
        }

        // body text after the marker is literal
        assert!(result
            .spans
            .iter()
            .any(|s| s.category == Category::Literal && s.span.contains(10)));
    }

    #[test]
    fn test_comment_block_hides_content() {
        let text = "////\n== not a heading\n////\n";
        let result = classifier().classify_all(text);

        assert!(spans_of(&result, Category::Heading(1)).is_empty());
        assert!(result
            .spans
            .iter()
            .any(|s| s.category == Category::Comment && s.span.contains(6)));
    }

    #[test]
    fn test_determinism() {
        let text = "= Title\n\nNOTE: *bold* and `mono` with {attr} and <<x,cap>>\n\n* item one\n* item two\n";
        let first = classifier().classify_all(text);
        let second = classifier().classify_all(text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cleanup_idempotent() {
        let mut map = CategoryMap::new(6);
        map.assign(Span::new(0, 6), Category::Literal, Role::Text);
        map.assign(Span::new(2, 4), Category::ListMarker, Role::Delimiter);
        map.assign(Span::new(2, 3), Category::Strong, Role::Text);

        map.cleanup();
        let once = map.emit(0);
        map.cleanup();
        let twice = map.emit(0);
        assert_eq!(once, twice);

        // the contested positions kept only the structural category
        assert!(once
            .iter()
            .any(|s| s.category == Category::ListMarker && s.span == Span::new(2, 4)));
        assert!(!once
            .iter()
            .any(|s| s.category == Category::Strong));
    }

    #[test]
    fn test_matcher_terminates_on_zero_length_pattern() {
        // "b*" matches the empty string at every position; the forced
        // one-character advance bounds the loop at len + 1 iterations
        let pattern = PatternDescriptor::new("b*", Vec::new()).unwrap();
        let rule = Rule::new("zero-length", pattern);
        let mut tracker = ReservationTracker::new(3);
        let mut categories = CategoryMap::new(3);

        let results = run_rule(&rule, "aaa", &mut tracker, &mut categories);
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|m| m.accepted));
    }

    #[test]
    fn test_rejection_backoff_finds_later_occurrence() {
        // Reserve the first occurrence by hand; the rule must skip it and
        // still claim the second one in the same region.
        let pattern = PatternDescriptor::new("ab", Vec::new()).unwrap();
        let rule = Rule::new("pair", pattern)
            .free(&[0])
            .reserve(0, Tag::Reserved);
        let slice = "ab ab";
        let mut tracker = ReservationTracker::new(slice.len());
        tracker.apply(Span::new(0, 2), Tag::BlockDelimiter);
        let mut categories = CategoryMap::new(slice.len());

        let results = run_rule(&rule, slice, &mut tracker, &mut categories);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].span, Span::new(3, 5));
    }

    #[test]
    fn test_region_bounds_results() {
        let text = "== One ==\n== Two ==\n";
        let classifier = classifier();

        // classify only the first line
        let result = classifier.classify(text, Span::new(0, 10));
        let headings = spans_of(&result, Category::Heading(1));
        assert_eq!(headings, vec![Span::new(3, 6)]);
        assert_eq!(result.tags.len(), 10);

        // a second pass over the rest finds the second heading, in
        // buffer coordinates
        let result = classifier.classify(text, Span::new(10, text.len()));
        let headings = spans_of(&result, Category::Heading(1));
        assert_eq!(headings, vec![Span::new(13, 16)]);
    }

    #[test]
    fn test_attribute_entry_and_reference() {
        let text = ":author: Jo\n\nwritten by {author}\n";
        let result = classifier().classify_all(text);

        assert!(spans_of(&result, Category::AttributeName).contains(&Span::new(1, 7)));
        assert!(spans_of(&result, Category::AttributeValue).contains(&Span::new(9, 11)));
        assert!(spans_of(&result, Category::AttributeRef).contains(&Span::new(25, 31)));
    }

    #[test]
    fn test_passthrough_content_is_exempt() {
        let text = "+++*not strong*+++\n";
        let result = classifier().classify_all(text);

        assert!(spans_of(&result, Category::Strong).is_empty());
        assert!(spans_of(&result, Category::Passthrough).contains(&Span::new(3, 15)));
    }

    #[test]
    fn test_unknown_named_reference_still_tagged() {
        // the span is classified either way; resolution is a separate,
        // optional step that may come back empty
        let text = "see &unknownname; here\n";
        let result = classifier().classify_all(text);

        let replacement = Span::new(4, 17);
        assert!(spans_of(&result, Category::Replacement).contains(&replacement));
        assert!(result.tags[4..17].iter().all(|tag| *tag == Tag::Reserved));
        assert_eq!(
            crate::replace::resolve_replacement("&unknownname;", None),
            None
        );
    }

    #[test]
    fn test_non_overlap_with_block_delimiters() {
        let text = "= T\n\n** x\n\n----\ncode\n----\n";
        let result = classifier().classify_all(text);

        // every non-meta span stays clear of every block-delimiter-tagged
        // position
        for classified in &result.spans {
            if classified.category.is_meta() {
                continue;
            }
            for pos in classified.span.start..classified.span.end {
                assert_ne!(
                    result.tags.get(pos),
                    Some(&Tag::BlockDelimiter),
                    "span {classified:?} overlaps a block delimiter at {pos}"
                );
            }
        }
    }
}
