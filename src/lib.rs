//! adoc-highlight - syntax classification for AsciiDoc-style markup
//!
//! An ordered table of regex-based rules classifies regions of markup
//! text into syntactic categories (headings, lists, delimited blocks,
//! tables, attribute lists, inline quotes, macros, replacements). A
//! span-reservation protocol keeps later rules off text already claimed
//! by higher-precedence constructs, with a bounded retry so a rejected
//! rule can still claim a later occurrence in the same region. The
//! output is a list of (span, category, role) triples plus the final
//! reservation tags, ready for a presentation layer.
//!
//! ```
//! use adoc_highlight::{Classifier, GrammarConfig};
//!
//! let classifier = Classifier::new(&GrammarConfig::default()).unwrap();
//! let result = classifier.classify_all("== Section\n\nSome *bold* text.\n");
//! assert!(!result.spans.is_empty());
//! ```

mod category;
mod config;
mod engine;
mod error;
pub mod pattern;
mod render;
mod replace;
mod reserve;
mod rule;
mod span;
mod style;
mod title;

pub use category::{Category, Role};
pub use config::{GrammarConfig, SpecialWord};
pub use engine::{Classification, ClassifiedSpan, Classifier, MatchResult};
pub use error::{Error, Result};
pub use pattern::{BlockKind, NumberStyle, PatternDescriptor, QuoteStyle};
pub use render::{render, span_dump, RenderOptions};
pub use replace::{resolve_replacement, NameResolver};
pub use reserve::{ReservationTracker, Tag};
pub use rule::{Guard, Rule, RuleTable};
pub use span::Span;
pub use style::{Color, Style};
pub use title::{describe_title, OneLineStyle, TitleDescriptor, TitleKind};
