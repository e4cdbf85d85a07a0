//! Range parsing.
//!
//! The token sequence (noise removed) is segmented into one of three shapes:
//! - open start: `after 1900`, `since 1 jan 1900`
//! - open end: `before 1900`, `until 1900`
//! - bounded: `between 1900 and 1910`, `1900 to 1910`, `1900-1910`
//!
//! Each half is parsed as an exact date (through the ambiguity resolver)
//! or, failing that, as a partial date.

use tracing::{debug, trace};

use crate::ambiguity::{self, Resolution};
use crate::calendar;
use crate::options::ParseOptions;
use crate::parsers::exact::parse_exact;
use crate::parsers::partial::parse_partial;
use crate::types::{
    Candidate, DateOrder, DateValue, Issue, Issues, Precision, RangeCandidates, RangeValue, Token,
    TokenKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    OpenStart,
    OpenEnd,
    Bounded,
}

#[derive(Debug, Clone)]
struct Segments {
    shape: Shape,
    start: Vec<Token>,
    end: Vec<Token>,
    inclusive_start: bool,
    inclusive_end: bool,
}

/// How one side of a range parsed.
#[derive(Debug, Clone)]
enum Boundary {
    Missing,
    Resolved {
        value: DateValue,
        alternatives: Vec<Candidate>,
    },
    Ambiguous(Vec<Candidate>),
    Invalid,
}

impl Boundary {
    fn into_parts(self) -> (Option<DateValue>, Option<Vec<Candidate>>, Option<Vec<Candidate>>) {
        match self {
            Self::Resolved {
                value,
                alternatives,
            } => {
                let alternatives = (!alternatives.is_empty()).then_some(alternatives);
                (Some(value), None, alternatives)
            }
            Self::Ambiguous(candidates) => {
                (Some(agreed_reading(&candidates)), Some(candidates), None)
            }
            Self::Missing | Self::Invalid => (None, None, None),
        }
    }
}

/// The fields every candidate agrees on.
///
/// Year precision when only the year is shared, month precision when the
/// month is too. Candidates disagreeing on the year give an unknown-precision
/// value with no fields.
fn agreed_reading(candidates: &[Candidate]) -> DateValue {
    let shared = |field: fn(&Candidate) -> u32| {
        let first = field(candidates.first()?);
        candidates.iter().all(|c| field(c) == first).then_some(first)
    };
    let year = candidates
        .first()
        .map(|c| c.year)
        .filter(|y| candidates.iter().all(|c| c.year == *y));
    let month = year.and(shared(|c| c.month));

    let precision = match (year, month) {
        (Some(_), Some(_)) => Precision::Month,
        (Some(_), None) => Precision::Year,
        _ => Precision::Unknown,
    };
    DateValue {
        year,
        month,
        day: None,
        qualifiers: Vec::new(),
        precision,
        normalized: calendar::format_partial(year, month, None),
        sort_key: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeParse {
    pub value: RangeValue,
    /// `start..end`, `start..` or `..end`.
    pub normalized: Option<String>,
    pub sort_key: Option<i64>,
    /// Boundaries that stayed ambiguous.
    pub candidates: RangeCandidates,
    /// Full candidate sets behind boundaries picked by a strategy.
    pub alternatives: RangeCandidates,
    pub issues: Issues,
}

/// Parse a range expression.
pub fn parse_range(
    tokens: &[Token],
    options: &ParseOptions,
    locale_orders: &[DateOrder],
) -> Result<RangeParse, Issues> {
    let Some(segments) = segment(tokens, options) else {
        debug!("range: no open marker, join or hyphen");
        return Err(Issues::new().with(Issue::RangeNoMatch));
    };
    trace!(
        shape = ?segments.shape,
        start = segments.start.len(),
        end = segments.end.len(),
        "range: segmented"
    );

    let mut issues = Issues::new();
    let start = parse_boundary(&segments.start, options, locale_orders, &mut issues);
    let end = parse_boundary(&segments.end, options, locale_orders, &mut issues);

    if segments.shape == Shape::Bounded && (segments.start.is_empty() || segments.end.is_empty())
    {
        issues.push(Issue::RangeBoundMissing);
    }
    if matches!(start, Boundary::Invalid) || matches!(end, Boundary::Invalid) {
        issues.push(Issue::RangeBoundInvalid);
        return Err(issues);
    }
    if matches!((&start, &end), (Boundary::Missing, Boundary::Missing)) {
        issues.push(Issue::RangeNoMatch);
        return Err(issues);
    }

    let (start, start_candidates, start_alternatives) = start.into_parts();
    let (end, end_candidates, end_alternatives) = end.into_parts();

    let normalized = match (
        start.as_ref().and_then(|v| v.normalized.as_deref()),
        end.as_ref().and_then(|v| v.normalized.as_deref()),
    ) {
        (Some(s), Some(e)) => Some(format!("{s}..{e}")),
        (Some(s), None) => Some(format!("{s}..")),
        (None, Some(e)) => Some(format!("..{e}")),
        (None, None) => None,
    };
    let sort_key = start.as_ref().and_then(|v| v.sort_key);

    debug!(?normalized, shape = ?segments.shape, "range: matched");
    Ok(RangeParse {
        value: RangeValue {
            start,
            end,
            inclusive_start: segments.inclusive_start,
            inclusive_end: segments.inclusive_end,
        },
        normalized,
        sort_key,
        candidates: RangeCandidates {
            start: start_candidates,
            end: end_candidates,
        },
        alternatives: RangeCandidates {
            start: start_alternatives,
            end: end_alternatives,
        },
        issues,
    })
}

fn is_open_start(token: &Token) -> bool {
    (token.is(TokenKind::RangeMarker) && token.has_subtype("openStart"))
        || (token.is(TokenKind::Qualifier) && token.has_subtype("after"))
}

fn is_open_end(token: &Token) -> bool {
    (token.is(TokenKind::RangeMarker) && token.has_subtype("openEnd"))
        || (token.is(TokenKind::Qualifier) && token.has_subtype("before"))
}

fn is_join(token: &Token) -> bool {
    token.is(TokenKind::RangeMarker)
        && (token.has_subtype("boundedJoin") || token.has_subtype("boundedEnd"))
}

/// Drop range markers, hyphens and noise from one side.
fn boundary_tokens(tokens: &[&Token]) -> Vec<Token> {
    tokens
        .iter()
        .filter(|t| !t.is(TokenKind::RangeMarker) && !t.is(TokenKind::Noise) && !t.is_hyphen())
        .map(|&t| t.clone())
        .collect()
}

fn segment(tokens: &[Token], options: &ParseOptions) -> Option<Segments> {
    let default = options.ranges.default_inclusivity;
    let relevant: Vec<&Token> = tokens.iter().filter(|t| !t.is(TokenKind::Noise)).collect();
    let (first, rest) = relevant.split_first()?;

    if is_open_start(first) {
        // "since" includes its bound, "after" excludes it
        let inclusive_start = if first.lower == "since" {
            true
        } else if first.has_subtype("after") {
            false
        } else {
            default.start
        };
        return Some(Segments {
            shape: Shape::OpenStart,
            start: boundary_tokens(rest),
            end: Vec::new(),
            inclusive_start,
            inclusive_end: default.end,
        });
    }

    if is_open_end(first) {
        let inclusive_end = !first.has_subtype("before") && default.end;
        return Some(Segments {
            shape: Shape::OpenEnd,
            start: Vec::new(),
            end: boundary_tokens(rest),
            inclusive_start: default.start,
            inclusive_end,
        });
    }

    let split = relevant
        .iter()
        .position(|t| is_join(t))
        .or_else(|| relevant.iter().position(|t| t.is_hyphen()))?;

    Some(Segments {
        shape: Shape::Bounded,
        start: boundary_tokens(&relevant[..split]),
        end: boundary_tokens(&relevant[split + 1..]),
        inclusive_start: default.start,
        inclusive_end: default.end,
    })
}

fn parse_boundary(
    tokens: &[Token],
    options: &ParseOptions,
    locale_orders: &[DateOrder],
    issues: &mut Issues,
) -> Boundary {
    if tokens.is_empty() {
        return Boundary::Missing;
    }

    let exact = parse_exact(tokens, options);
    if !exact.candidates.is_empty() {
        issues.extend_from(&exact.issues);
        let resolved = ambiguity::resolve(exact.candidates, &options.ambiguity, locale_orders);
        issues.extend_from(&resolved.issues);
        match resolved.resolution {
            Resolution::Single {
                candidate,
                alternates,
            } => {
                return Boundary::Resolved {
                    value: candidate.to_value(),
                    alternatives: alternates,
                }
            }
            Resolution::Ambiguous { candidates } => {
                issues.push(Issue::RangeBoundAmbiguous);
                return Boundary::Ambiguous(candidates);
            }
            Resolution::None => {}
        }
    }

    match parse_partial(tokens, options) {
        Ok(partial) => {
            issues.extend_from(&partial.issues);
            Boundary::Resolved {
                value: partial.value,
                alternatives: Vec::new(),
            }
        }
        Err(partial_issues) => {
            issues.extend_from(&partial_issues);
            Boundary::Invalid
        }
    }
}
