//! Partial date parsing.
//!
//! Fills whichever of year, month and day the tokens support. Missing
//! fields are reported as issues and lower the precision. When the options
//! allow it, a missing day and month are inferred for the sort key only.

use tracing::debug;

use crate::calendar;
use crate::options::ParseOptions;
use crate::types::{DateValue, Issue, Issues, Precision, Token, TokenKind};

/// Magnitude buckets tried in order for the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Bucket {
    Large,
    Medium,
    Small,
}

impl Bucket {
    fn of(value: i64) -> Self {
        if value >= 1000 {
            Self::Large
        } else if value >= 100 || value > 31 {
            Self::Medium
        } else {
            Self::Small
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialParse {
    pub value: DateValue,
    pub issues: Issues,
}

/// Parse a partial date.
///
/// Fails with `partial-no-match` when no field and no qualifier was found.
pub fn parse_partial(tokens: &[Token], options: &ParseOptions) -> Result<PartialParse, Issues> {
    let mut issues = Issues::new();

    let numbers: Vec<(usize, i64)> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is(TokenKind::Number))
        .filter_map(|(i, t)| t.value.map(|v| (i, v)))
        .collect();
    let month = tokens
        .iter()
        .find(|t| t.is(TokenKind::Month))
        .and_then(|t| t.value)
        .and_then(|v| u32::try_from(v).ok());
    let qualifiers = qualifier_names(tokens);

    let allow_small = month.is_none() || numbers.len() > 1;
    let mut by_bucket = numbers.clone();
    by_bucket.sort_by_key(|(_, v)| Bucket::of(*v));
    let year = by_bucket
        .iter()
        .filter(|(_, v)| allow_small || Bucket::of(*v) != Bucket::Small)
        .find_map(|(i, v)| {
            calendar::normalize_year(*v, options.partial.allow_two_digit_years).map(|y| (*i, y))
        });
    if let Some((_, y)) = year {
        if y.two_digit {
            issues.push(Issue::TwoDigitYear);
        }
    }
    let year_index = year.map(|(i, _)| i);
    let year = year.map(|(_, y)| y.year);

    let day = numbers
        .iter()
        .find(|(i, v)| Some(*i) != year_index && calendar::is_day_like(*v))
        .and_then(|(_, v)| u32::try_from(*v).ok());

    if let Some(m) = month {
        if !calendar::is_valid_month(m) {
            issues.push(Issue::InvalidMonth);
        }
    }
    if let Some(d) = day {
        if !calendar::is_valid_day(year, month, d) {
            issues.push(Issue::InvalidDay);
        }
    }

    let precision = precision_of(year, month, day, &mut issues);
    if precision == Precision::Unknown && qualifiers.is_empty() {
        debug!("partial: no components");
        issues.push(Issue::PartialNoMatch);
        return Err(issues);
    }

    let sort_key = match (year, month, day) {
        (Some(y), Some(m), Some(d)) => calendar::sort_key(y, m, d),
        (Some(y), Some(m), None) if options.partial.infer_missing_day => {
            issues.push(Issue::InferredDay);
            calendar::sort_key(y, m, 1)
        }
        (Some(y), None, None)
            if options.partial.infer_missing_month && options.partial.infer_missing_day =>
        {
            issues.push(Issue::InferredMonth);
            issues.push(Issue::InferredDay);
            calendar::sort_key(y, 1, 1)
        }
        _ => None,
    };

    debug!(?year, ?month, ?day, ?precision, "partial: matched");
    Ok(PartialParse {
        value: DateValue {
            year,
            month,
            day,
            qualifiers,
            precision,
            normalized: calendar::format_partial(year, month, day),
            sort_key,
        },
        issues,
    })
}

/// Distinct qualifier names in source order.
fn qualifier_names(tokens: &[Token]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in tokens.iter().filter(|t| t.is(TokenKind::Qualifier)) {
        let name = token.subtype.as_ref().unwrap_or(&token.normalized);
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

fn precision_of(
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    issues: &mut Issues,
) -> Precision {
    match (year, month, day) {
        (Some(_), Some(_), Some(_)) => Precision::Day,
        (Some(_), Some(_), None) => {
            issues.push(Issue::MissingDay);
            Precision::Month
        }
        (Some(_), None, _) => Precision::Year,
        (None, Some(_), Some(_)) => {
            issues.push(Issue::MissingYear);
            Precision::Day
        }
        (None, Some(_), None) => {
            issues.push(Issue::MissingYear);
            issues.push(Issue::MissingDay);
            Precision::Month
        }
        (None, None, Some(_)) => {
            issues.push(Issue::MissingMonth);
            issues.push(Issue::MissingYear);
            Precision::Day
        }
        (None, None, None) => Precision::Unknown,
    }
}
