//! Exact date parsing.
//!
//! Strategies are tried in [`STRATEGIES`] order; the first one producing a
//! candidate wins. Issues from strategies that found nothing are reported
//! only when every strategy fails.

use tracing::{debug, trace};

use crate::calendar::{self, NormalizedYear};
use crate::options::ParseOptions;
use crate::types::{
    Candidate, CandidateMeta, CandidateSource, DateOrder, Issue, Issues, Token, TokenKind,
};

/// Orders tried after the configured preferences.
const NUMERIC_FALLBACK: [DateOrder; 4] =
    [DateOrder::Dmy, DateOrder::Mdy, DateOrder::Ymd, DateOrder::Ydm];

type Strategy = fn(&[Token], &ParseOptions, &mut Issues) -> Vec<Candidate>;

/// Exact-parser strategies, highest priority first.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("month-anchored", month_anchored),
    ("three-number", three_number),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactParse {
    /// Distinct candidates in discovery order.
    pub candidates: Vec<Candidate>,
    pub issues: Issues,
}

/// Find exact `(year, month, day)` candidates.
#[must_use]
pub fn parse_exact(tokens: &[Token], options: &ParseOptions) -> ExactParse {
    let mut failures = Issues::new();

    for (name, strategy) in STRATEGIES {
        let candidates = strategy(tokens, options, &mut failures);
        if candidates.is_empty() {
            trace!(strategy = name, "exact: no candidates");
            continue;
        }
        debug!(strategy = name, candidates = candidates.len(), "exact: matched");
        let issues = candidates.iter().flat_map(|c| c.issues.iter()).collect();
        return ExactParse { candidates, issues };
    }

    failures.push(Issue::ExactNoMatch);
    ExactParse {
        candidates: Vec::new(),
        issues: failures,
    }
}

/// A single month token anchors the scan for a nearby day and year.
fn month_anchored(tokens: &[Token], options: &ParseOptions, failures: &mut Issues) -> Vec<Candidate> {
    let mut months = tokens.iter().enumerate().filter(|(_, t)| t.is(TokenKind::Month));
    let (Some((anchor, month)), None) = (months.next(), months.next()) else {
        return Vec::new();
    };
    let Some(month) = month.value else {
        return Vec::new();
    };

    let mut issues = Issues::new();
    let day = find_day(tokens, anchor);
    let allow_two_digit = options.partial.allow_two_digit_years;
    let year = find_year(
        tokens,
        anchor,
        day.map(|(index, _)| index),
        allow_two_digit,
        &mut issues,
    )
    .or_else(|| day_as_year(day, allow_two_digit, &mut issues));

    let (Some((_, day)), Some(year)) = (day, year) else {
        failures.extend_from(&issues);
        failures.push(Issue::MissingDayOrYear);
        return Vec::new();
    };

    let meta = CandidateMeta {
        order: None,
        source: CandidateSource::MonthName,
    };
    build_candidate(year, month, day, issues, meta, failures)
        .into_iter()
        .collect()
}

/// Tokens a scan may pass over.
fn is_scannable(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Number | TokenKind::Symbol | TokenKind::Noise
    )
}

/// Visit tokens in order until `visit` finds something or a blocking token.
fn scan<'a, T>(
    side: impl Iterator<Item = (usize, &'a Token)>,
    mut visit: impl FnMut(usize, &Token) -> Option<T>,
) -> Option<T> {
    for (index, token) in side {
        if let Some(found) = visit(index, token) {
            return Some(found);
        }
        if !is_scannable(token) {
            break;
        }
    }
    None
}

fn left_of(tokens: &[Token], anchor: usize) -> impl Iterator<Item = (usize, &Token)> {
    tokens[..anchor].iter().enumerate().rev()
}

fn right_of(tokens: &[Token], anchor: usize) -> impl Iterator<Item = (usize, &Token)> {
    tokens
        .iter()
        .enumerate()
        .skip(anchor + 1)
}

/// Nearest day-like number, looking left first.
fn find_day(tokens: &[Token], anchor: usize) -> Option<(usize, i64)> {
    let day_like = |index: usize, token: &Token| {
        token
            .value
            .filter(|v| token.is(TokenKind::Number) && calendar::is_day_like(*v))
            .map(|v| (index, v))
    };
    scan(left_of(tokens, anchor), day_like).or_else(|| scan(right_of(tokens, anchor), day_like))
}

/// Nearest year, looking right first.
///
/// Once a large (≥100) number has been seen without any of them being a
/// valid year, small numbers are no longer accepted.
fn find_year(
    tokens: &[Token],
    anchor: usize,
    day_index: Option<usize>,
    allow_two_digit: bool,
    issues: &mut Issues,
) -> Option<i32> {
    let mut saw_large = false;
    let mut saw_valid_large = false;

    let mut consider = |index: usize, token: &Token| -> Option<NormalizedYear> {
        if Some(index) == day_index || !token.is(TokenKind::Number) {
            return None;
        }
        let value = token.value?;
        let year = calendar::normalize_year(value, allow_two_digit);
        if value >= 100 {
            saw_large = true;
            saw_valid_large |= year.is_some();
            return year;
        }
        if saw_large && !saw_valid_large {
            return None;
        }
        year
    };

    let found = scan(right_of(tokens, anchor), &mut consider)
        .or_else(|| scan(left_of(tokens, anchor), &mut consider));

    match found {
        Some(year) => {
            if year.two_digit {
                issues.push(Issue::TwoDigitYear);
            }
            Some(year.year)
        }
        None => {
            if saw_large && !saw_valid_large {
                issues.push(Issue::InvalidYear);
            }
            None
        }
    }
}

/// The day token doubles as the year when no other number qualifies.
fn day_as_year(
    day: Option<(usize, i64)>,
    allow_two_digit: bool,
    issues: &mut Issues,
) -> Option<i32> {
    let (_, value) = day?;
    let year = calendar::normalize_year(value, allow_two_digit)?;
    if year.two_digit {
        issues.push(Issue::TwoDigitYear);
    }
    Some(year.year)
}

/// Exactly three numbers, read in every allowed day/month/year order.
fn three_number(tokens: &[Token], options: &ParseOptions, failures: &mut Issues) -> Vec<Candidate> {
    let numbers: Vec<i64> = tokens
        .iter()
        .filter(|t| t.is(TokenKind::Number))
        .filter_map(|t| t.value)
        .collect();
    let &[a, b, c] = numbers.as_slice() else {
        return Vec::new();
    };

    // (order, came from the fixed fallback)
    let mut orders: Vec<(DateOrder, bool)> = Vec::new();
    for order in &options.ambiguity.preferred_orders {
        if !orders.iter().any(|(o, _)| o == order) {
            orders.push((*order, false));
        }
    }
    for order in NUMERIC_FALLBACK {
        if !orders.iter().any(|(o, _)| *o == order) {
            orders.push((order, true));
        }
    }

    let allow_two_digit = options.partial.allow_two_digit_years;
    let mut candidates: Vec<Candidate> = Vec::new();

    for (order, from_fallback) in orders {
        // Year-first input reads as YMD; YDM only when YMD found nothing
        if order == DateOrder::Ydm
            && from_fallback
            && candidates
                .iter()
                .any(|c| c.meta.order == Some(DateOrder::Ymd))
        {
            continue;
        }

        let (day, month, year) = order.assign(a, b, c);
        let Some(year) = calendar::normalize_year(year, allow_two_digit) else {
            failures.push(Issue::InvalidYear);
            continue;
        };
        let mut issues = Issues::new();
        if year.two_digit {
            issues.push(Issue::TwoDigitYear);
        }

        let meta = CandidateMeta {
            order: Some(order),
            source: CandidateSource::Numeric,
        };
        let Some(candidate) = build_candidate(year.year, month, day, issues, meta, failures) else {
            continue;
        };
        if !candidates.iter().any(|c| c.same_date(&candidate)) {
            candidates.push(candidate);
        }
    }

    if candidates.len() > 1 {
        for candidate in &mut candidates {
            candidate.issues.push(Issue::AmbiguousOrder);
        }
    }
    candidates
}

/// Validate month and day for `year`, recording what failed.
fn build_candidate(
    year: i32,
    month: i64,
    day: i64,
    issues: Issues,
    meta: CandidateMeta,
    failures: &mut Issues,
) -> Option<Candidate> {
    let month = u32::try_from(month)
        .ok()
        .filter(|m| calendar::is_valid_month(*m));
    let day = u32::try_from(day)
        .ok()
        .filter(|d| calendar::is_valid_day(Some(year), month, *d));

    let (Some(month), Some(day)) = (month, day) else {
        if month.is_none() {
            failures.push(Issue::InvalidMonth);
        }
        if day.is_none() {
            failures.push(Issue::InvalidDay);
        }
        return None;
    };

    Some(Candidate {
        year,
        month,
        day,
        normalized: calendar::format_partial(Some(year), Some(month), Some(day))?,
        sort_key: calendar::sort_key(year, month, day)?,
        issues,
        meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use crate::normalize::normalize;
    use crate::tokenizer::tokenize;
    use pretty_assertions::assert_eq;

    fn exact_with(input: &str, options: &ParseOptions) -> ExactParse {
        let stream = tokenize(&normalize(input), &Locale::english());
        parse_exact(&stream.tokens, options)
    }

    fn exact(input: &str) -> ExactParse {
        exact_with(input, &ParseOptions::default())
    }

    fn dates(parse: &ExactParse) -> Vec<(i32, u32, u32)> {
        parse
            .candidates
            .iter()
            .map(|c| (c.year, c.month, c.day))
            .collect()
    }

    #[test]
    fn test_month_anchored_variants() {
        for input in [
            "21 Sep 1978",
            "Sep 21 1978",
            "September 21st, 1978",
            "1978 Sep 21",
            "21-Sep-1978",
            "21. Sept. 1978",
        ] {
            let parse = exact(input);
            assert_eq!(dates(&parse), vec![(1978, 9, 21)], "{input}");
            assert!(parse.issues.is_empty(), "{input}: {:?}", parse.issues);
            assert_eq!(parse.candidates[0].meta.source, CandidateSource::MonthName);
        }
    }

    #[test]
    fn test_month_anchored_noise_is_transparent() {
        assert_eq!(dates(&exact("May 19, 1980")), vec![(1980, 5, 19)]);
    }

    #[test]
    fn test_day_is_not_reused_as_year() {
        let mut options = ParseOptions::default();
        options.partial.allow_two_digit_years = true;
        let parse = exact_with("Sep 21 1978", &options);
        assert_eq!(dates(&parse), vec![(1978, 9, 21)]);
        assert!(!parse.issues.contains(Issue::TwoDigitYear));
    }

    #[test]
    fn test_lone_day_doubles_as_two_digit_year() {
        let mut options = ParseOptions::default();
        options.partial.allow_two_digit_years = true;
        for input in ["Sep 21", "21 Sep"] {
            let parse = exact_with(input, &options);
            assert_eq!(dates(&parse), vec![(21, 9, 21)], "{input}");
            assert!(parse.issues.contains(Issue::TwoDigitYear), "{input}");
            assert_eq!(parse.candidates[0].normalized, "0021-09-21");
        }
    }

    #[test]
    fn test_invalid_day_for_month() {
        let parse = exact("31 Feb 1900");
        assert!(parse.candidates.is_empty());
        assert!(parse.issues.contains(Issue::InvalidDay));
        assert!(parse.issues.contains(Issue::ExactNoMatch));
    }

    #[test]
    fn test_leap_day() {
        assert_eq!(dates(&exact("29 Feb 2000")), vec![(2000, 2, 29)]);
        assert!(exact("29 Feb 1900").candidates.is_empty());
    }

    #[test]
    fn test_missing_year() {
        let parse = exact("21 Sep 15");
        assert!(parse.candidates.is_empty());
        assert!(parse.issues.contains(Issue::MissingDayOrYear));
    }

    #[test]
    fn test_two_digit_year_recorded() {
        let mut options = ParseOptions::default();
        options.partial.allow_two_digit_years = true;
        let parse = exact_with("5 Sep 12", &options);
        assert_eq!(dates(&parse), vec![(12, 9, 5)]);
        assert!(parse.issues.contains(Issue::TwoDigitYear));
    }

    #[test]
    fn test_numeric_ambiguous() {
        let parse = exact("01/02/1900");
        assert_eq!(dates(&parse), vec![(1900, 2, 1), (1900, 1, 2)]);
        assert!(parse
            .candidates
            .iter()
            .all(|c| c.issues.contains(Issue::AmbiguousOrder)));
        assert_eq!(parse.candidates[0].meta.order, Some(DateOrder::Dmy));
        assert_eq!(parse.candidates[1].meta.order, Some(DateOrder::Mdy));
    }

    #[test]
    fn test_numeric_unambiguous() {
        let parse = exact("21/09/1978");
        assert_eq!(dates(&parse), vec![(1978, 9, 21)]);
        assert!(parse.issues.is_empty());
    }

    #[test]
    fn test_same_date_from_two_orders_collapses() {
        let parse = exact("05/05/1900");
        assert_eq!(dates(&parse), vec![(1900, 5, 5)]);
        assert!(!parse.issues.contains(Issue::AmbiguousOrder));
    }

    #[test]
    fn test_iso_reads_year_first() {
        let parse = exact("1900-02-01");
        assert_eq!(dates(&parse), vec![(1900, 2, 1)]);
        assert_eq!(parse.candidates[0].meta.order, Some(DateOrder::Ymd));
    }

    #[test]
    fn test_ydm_when_ymd_fails() {
        let parse = exact("1900-21-09");
        assert_eq!(dates(&parse), vec![(1900, 9, 21)]);
        assert_eq!(parse.candidates[0].meta.order, Some(DateOrder::Ydm));
    }

    #[test]
    fn test_preferred_orders_go_first() {
        let mut options = ParseOptions::default();
        options.ambiguity.preferred_orders = vec![DateOrder::Mdy];
        let parse = exact_with("01/02/1900", &options);
        assert_eq!(dates(&parse), vec![(1900, 1, 2), (1900, 2, 1)]);
    }

    #[test]
    fn test_numeric_no_valid_order() {
        let parse = exact("40/40/1900");
        assert!(parse.candidates.is_empty());
        assert!(parse.issues.contains(Issue::ExactNoMatch));
    }

    #[test]
    fn test_strategy_table_order() {
        let names: Vec<&str> = STRATEGIES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["month-anchored", "three-number"]);
    }
}
