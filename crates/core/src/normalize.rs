//! Input normalization.
//!
//! Folds typographic look-alikes into the ASCII characters the tokenizer
//! understands:
//! - non-breaking space → space
//! - figure/en/em dashes, horizontal bar, minus sign → `-`
//! - one-dot leader, hyphenation point → `.`
//! - low-9 quotation marks → `,`
//!
//! Whitespace runs collapse to one space and the ends are trimmed.

use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

struct Patterns {
    dash: Regex,
    dot: Regex,
    comma: Regex,
    space: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(Patterns::new)
}

impl Patterns {
    fn new() -> Self {
        Self {
            dash: Regex::new(r"[\x{2012}-\x{2015}\x{2212}]").unwrap(),
            dot: Regex::new(r"[\x{2024}\x{2027}]").unwrap(),
            comma: Regex::new(r"[\x{201A}\x{201E}]").unwrap(),
            // \s already covers U+00A0
            space: Regex::new(r"\s+").unwrap(),
        }
    }
}

/// Raw input alongside its normalized forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    pub original: String,
    pub normalized: String,
}

impl NormalizedInput {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Normalize raw input text.
///
/// # Examples
///
/// ```
/// use dateorbit_core::normalize::normalize;
///
/// let input = normalize("  21\u{a0}Sep\u{2013}1978 ");
/// assert_eq!(input.normalized, "21 Sep-1978");
/// ```
#[must_use]
pub fn normalize(input: &str) -> NormalizedInput {
    let p = patterns();
    let folded = p.dash.replace_all(input, "-");
    let folded = p.dot.replace_all(&folded, ".");
    let folded = p.comma.replace_all(&folded, ",");
    let normalized = p.space.replace_all(&folded, " ").trim().to_string();

    trace!(
        input_len = input.len(),
        normalized_len = normalized.len(),
        "normalize: done"
    );

    NormalizedInput {
        original: input.to_string(),
        normalized,
    }
}
