//! Classifier: decides which parser handles a token sequence.
//!
//! Classification is a first-match-wins walk over [`RULES`]. Each rule is a
//! predicate over [`Signals`], a summary of the tokens computed once per
//! parse. Rule order is the priority order:
//!
//! 1. range signals
//! 2. exact (month + day + year, month + numbers, numeric triplet)
//! 3. partial (month + year, month + day, approximate qualifier, lone year)
//! 4. invalid

use serde::Serialize;
use tracing::debug;

use crate::calendar;
use crate::options::ParseOptions;
use crate::types::{Precision, Token, TokenKind};

/// Which parser the classifier routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationKind {
    Exact,
    Partial,
    Range,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Summary of a token sequence.
///
/// Token groups hold indices into the classified sequence. Noise tokens
/// are not counted in `token_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signals {
    pub token_count: usize,
    pub numbers: Vec<usize>,
    pub months: Vec<usize>,
    pub qualifiers: Vec<usize>,
    pub range_markers: Vec<usize>,
    pub symbols: Vec<usize>,
    pub words: Vec<usize>,
    pub year_like: usize,
    pub day_like: usize,
    pub has_hyphen_between_numbers: bool,
    pub has_range_qualifier: bool,
    pub has_range_marker: bool,
    pub has_approximate_qualifier: bool,
}

impl Signals {
    #[must_use]
    pub fn collect(tokens: &[Token], options: &ParseOptions) -> Self {
        let allow_two_digit = options.partial.allow_two_digit_years;
        let mut signals = Self::default();

        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Number => {
                    signals.numbers.push(i);
                    if let Some(value) = token.value {
                        if calendar::is_year_like(value, allow_two_digit) {
                            signals.year_like += 1;
                        }
                        if calendar::is_day_like(value) {
                            signals.day_like += 1;
                        }
                    }
                }
                TokenKind::Month => signals.months.push(i),
                TokenKind::Qualifier => {
                    signals.qualifiers.push(i);
                    match token.subtype.as_deref() {
                        Some("before" | "after") => signals.has_range_qualifier = true,
                        Some("approximate" | "calculated" | "estimated") => {
                            signals.has_approximate_qualifier = true;
                        }
                        _ => {}
                    }
                }
                TokenKind::RangeMarker => {
                    signals.range_markers.push(i);
                    signals.has_range_marker = true;
                }
                TokenKind::Symbol => signals.symbols.push(i),
                TokenKind::Word => signals.words.push(i),
                TokenKind::Noise => continue,
            }
            signals.token_count += 1;

            if token.is_hyphen() && i > 0 {
                let between_numbers = tokens[i - 1].is(TokenKind::Number)
                    && tokens.get(i + 1).is_some_and(|t| t.is(TokenKind::Number));
                signals.has_hyphen_between_numbers |= between_numbers;
            }
        }

        signals
    }

    fn has_month(&self) -> bool {
        !self.months.is_empty()
    }
}

/// Verdict of the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub kind: ClassificationKind,
    pub confidence: Confidence,
    pub precision_hint: Precision,
    pub reasons: Vec<&'static str>,
    pub signals: Signals,
}

/// One entry of the priority table.
pub struct Rule {
    pub reason: &'static str,
    pub kind: ClassificationKind,
    pub confidence: Confidence,
    pub matches: fn(&Signals) -> bool,
    pub precision_hint: fn(&Signals) -> Precision,
}

/// Classification rules, highest priority first.
pub const RULES: &[Rule] = &[
    Rule {
        reason: "range-signals",
        kind: ClassificationKind::Range,
        confidence: Confidence::Medium,
        matches: has_range_signals,
        precision_hint: |_| Precision::Range,
    },
    Rule {
        reason: "month-with-day-and-year",
        kind: ClassificationKind::Exact,
        confidence: Confidence::High,
        matches: |s| s.has_month() && s.year_like > 0 && s.day_like > 0,
        precision_hint: |_| Precision::Day,
    },
    Rule {
        reason: "month-with-numeric-pattern",
        kind: ClassificationKind::Exact,
        confidence: Confidence::Medium,
        matches: |s| s.has_month() && s.numbers.len() >= 2 && s.year_like > 0,
        precision_hint: |_| Precision::Day,
    },
    Rule {
        reason: "numeric-triplet",
        kind: ClassificationKind::Exact,
        confidence: Confidence::Low,
        matches: |s| s.numbers.len() >= 3 && s.year_like > 0,
        precision_hint: |_| Precision::Day,
    },
    Rule {
        reason: "month-with-year",
        kind: ClassificationKind::Partial,
        confidence: Confidence::Medium,
        matches: |s| s.has_month() && s.year_like > 0,
        precision_hint: |_| Precision::Month,
    },
    Rule {
        reason: "month-with-day",
        kind: ClassificationKind::Partial,
        confidence: Confidence::Medium,
        matches: |s| s.has_month() && s.day_like > 0,
        precision_hint: |_| Precision::Day,
    },
    Rule {
        reason: "approximate-qualifier",
        kind: ClassificationKind::Partial,
        confidence: Confidence::Medium,
        matches: |s| s.has_approximate_qualifier,
        precision_hint: |s| {
            if s.year_like > 0 {
                Precision::Year
            } else {
                Precision::Unknown
            }
        },
    },
    Rule {
        reason: "single-year",
        kind: ClassificationKind::Partial,
        confidence: Confidence::Medium,
        matches: |s| s.token_count == 1 && s.year_like == 1,
        precision_hint: |_| Precision::Year,
    },
];

fn has_range_signals(s: &Signals) -> bool {
    if s.has_range_marker || s.has_range_qualifier {
        return true;
    }
    if !s.has_hyphen_between_numbers || s.has_month() {
        return false;
    }
    // 1978-09-21 has one year-like number, 1980-1981 has two
    match s.numbers.len() {
        2 => true,
        3 => s.year_like >= 2,
        _ => false,
    }
}

/// Classify a token sequence.
#[must_use]
pub fn classify(tokens: &[Token], options: &ParseOptions) -> Classification {
    let signals = Signals::collect(tokens, options);

    if signals.token_count == 0 {
        debug!("classifier: no tokens");
        return invalid("no-tokens", signals);
    }

    match RULES.iter().find(|rule| (rule.matches)(&signals)) {
        Some(rule) => {
            debug!(kind = ?rule.kind, reason = rule.reason, "classifier: matched");
            Classification {
                kind: rule.kind,
                confidence: rule.confidence,
                precision_hint: (rule.precision_hint)(&signals),
                reasons: vec![rule.reason],
                signals,
            }
        }
        None => {
            debug!("classifier: no rule matched");
            invalid("no-recognized-components", signals)
        }
    }
}

fn invalid(reason: &'static str, signals: Signals) -> Classification {
    Classification {
        kind: ClassificationKind::Invalid,
        confidence: Confidence::Low,
        precision_hint: Precision::Unknown,
        reasons: vec![reason],
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use crate::normalize::normalize;
    use crate::tokenizer::tokenize;
    use pretty_assertions::assert_eq;

    fn classify_with(input: &str, options: &ParseOptions) -> Classification {
        let stream = tokenize(&normalize(input), &Locale::english());
        classify(&stream.tokens, options)
    }

    fn verdict(input: &str) -> (ClassificationKind, &'static str) {
        let c = classify_with(input, &ParseOptions::default());
        (c.kind, c.reasons[0])
    }

    #[test]
    fn test_rule_priority() {
        use ClassificationKind::*;

        assert_eq!(verdict("21 Sep 1978"), (Exact, "month-with-day-and-year"));
        assert_eq!(verdict("Sep 1978 1979"), (Exact, "month-with-numeric-pattern"));
        assert_eq!(verdict("01/02/1900"), (Exact, "numeric-triplet"));
        assert_eq!(verdict("1978-09-21"), (Exact, "numeric-triplet"));
        assert_eq!(verdict("1980-1981"), (Range, "range-signals"));
        assert_eq!(verdict("1980-1981-1982"), (Range, "range-signals"));
        assert_eq!(verdict("between 1900 and 1910"), (Range, "range-signals"));
        assert_eq!(verdict("after 1900"), (Range, "range-signals"));
        assert_eq!(verdict("Sep 1978"), (Partial, "month-with-year"));
        assert_eq!(verdict("21 Sep"), (Partial, "month-with-day"));
        assert_eq!(verdict("ca 1900"), (Partial, "approximate-qualifier"));
        assert_eq!(verdict("1900"), (Partial, "single-year"));
        assert_eq!(verdict("1900,"), (Partial, "single-year"));
        assert_eq!(verdict("hello world"), (Invalid, "no-recognized-components"));
        assert_eq!(verdict("21"), (Invalid, "no-recognized-components"));
    }

    #[test]
    fn test_month_blocks_hyphen_range() {
        let c = classify_with("21-Sep-1978", &ParseOptions::default());
        assert_eq!(c.kind, ClassificationKind::Exact);
        assert!(!c.signals.has_range_marker);
    }

    #[test]
    fn test_no_tokens() {
        let c = classify(&[], &ParseOptions::default());
        assert_eq!(c.kind, ClassificationKind::Invalid);
        assert_eq!(c.reasons, vec!["no-tokens"]);
        assert_eq!(c.precision_hint, Precision::Unknown);
    }

    #[test]
    fn test_year_like_threshold_follows_options() {
        let mut options = ParseOptions::default();
        assert_eq!(classify_with("31", &options).kind, ClassificationKind::Invalid);
        assert_eq!(classify_with("32", &options).kind, ClassificationKind::Partial);

        options.partial.allow_two_digit_years = true;
        let c = classify_with("31", &options);
        assert_eq!(c.kind, ClassificationKind::Partial);
        assert_eq!(c.signals.year_like, 1);
    }

    #[test]
    fn test_approximate_without_year_hints_unknown() {
        let c = classify_with("circa", &ParseOptions::default());
        assert_eq!(c.kind, ClassificationKind::Partial);
        assert_eq!(c.precision_hint, Precision::Unknown);
    }

    #[test]
    fn test_signals() {
        let stream = tokenize(&normalize("between 1 jan 1980, and 1980"), &Locale::english());
        let signals = Signals::collect(&stream.tokens, &ParseOptions::default());
        assert_eq!(signals.token_count, 6);
        assert_eq!(signals.numbers, vec![1, 3, 6]);
        assert_eq!(signals.months, vec![2]);
        assert_eq!(signals.range_markers, vec![0, 5]);
        assert_eq!(signals.year_like, 2);
        assert_eq!(signals.day_like, 1);
        assert!(signals.has_range_marker);
    }

    #[test]
    fn test_rules_are_ordered_exact_before_partial() {
        let first_partial = RULES
            .iter()
            .position(|r| r.kind == ClassificationKind::Partial)
            .unwrap();
        let last_exact = RULES
            .iter()
            .rposition(|r| r.kind == ClassificationKind::Exact)
            .unwrap();
        assert_eq!(RULES[0].kind, ClassificationKind::Range);
        assert!(last_exact < first_partial);
    }
}
