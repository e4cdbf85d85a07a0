//! Core types for Dateorbit.
//!
//! Everything a parse call produces lives here: tokens, date values,
//! candidates, ranges, and the kind-tagged [`ParseResult`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::classifier::Classification;

/// Lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Number,
    Month,
    Qualifier,
    RangeMarker,
    Symbol,
    Word,
    Noise,
}

/// A classified run of the normalized input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The run exactly as it appears in the normalized input.
    pub raw: String,
    pub normalized: String,
    /// Lowercased, alias-expanded form used for lookups.
    pub lower: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Qualifier name, range-marker role, or `ordinal` for suffixed numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Numeric value for `number` and `month` tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    pub index: usize,
    /// Byte offsets into the normalized input.
    pub start: usize,
    pub end: usize,
}

impl Token {
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// A symbol run containing `-`, the only symbol that can split a range.
    #[must_use]
    pub fn is_hyphen(&self) -> bool {
        self.kind == TokenKind::Symbol && self.normalized.contains('-')
    }

    #[must_use]
    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtype.as_deref() == Some(subtype)
    }
}

/// The coarsest calendar granularity a value actually determines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Day,
    Month,
    Year,
    Range,
    Unknown,
}

/// A day/month/year slot assignment for three-number dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DateOrder {
    Dmy,
    Mdy,
    Ymd,
    Ydm,
}

impl DateOrder {
    /// Map three values in source order to `(day, month, year)`.
    #[must_use]
    pub fn assign(self, a: i64, b: i64, c: i64) -> (i64, i64, i64) {
        match self {
            Self::Dmy => (a, b, c),
            Self::Mdy => (b, a, c),
            Self::Ymd => (c, b, a),
            Self::Ydm => (b, c, a),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dmy => "DMY",
            Self::Mdy => "MDY",
            Self::Ymd => "YMD",
            Self::Ydm => "YDM",
        }
    }
}

impl std::fmt::Display for DateOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal observation recorded while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Issue {
    InputEmpty,
    ExactNoMatch,
    PartialNoMatch,
    RangeNoMatch,
    RangeBoundInvalid,
    ParserNotImplemented,
    InvalidMonth,
    InvalidDay,
    InvalidYear,
    TwoDigitYear,
    MissingDay,
    MissingMonth,
    MissingYear,
    MissingDayOrYear,
    AmbiguousOrder,
    AmbiguityAutoResolved,
    AmbiguityNoCandidates,
    RangeBoundMissing,
    RangeBoundAmbiguous,
    InferredDay,
    InferredMonth,
}

impl Issue {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InputEmpty => "input-empty",
            Self::ExactNoMatch => "exact-no-match",
            Self::PartialNoMatch => "partial-no-match",
            Self::RangeNoMatch => "range-no-match",
            Self::RangeBoundInvalid => "range-bound-invalid",
            Self::ParserNotImplemented => "parser-not-implemented",
            Self::InvalidMonth => "invalid-month",
            Self::InvalidDay => "invalid-day",
            Self::InvalidYear => "invalid-year",
            Self::TwoDigitYear => "two-digit-year",
            Self::MissingDay => "missing-day",
            Self::MissingMonth => "missing-month",
            Self::MissingYear => "missing-year",
            Self::MissingDayOrYear => "missing-day-or-year",
            Self::AmbiguousOrder => "ambiguous-order",
            Self::AmbiguityAutoResolved => "ambiguity-auto-resolved",
            Self::AmbiguityNoCandidates => "ambiguity-no-candidates",
            Self::RangeBoundMissing => "range-bound-missing",
            Self::RangeBoundAmbiguous => "range-bound-ambiguous",
            Self::InferredDay => "inferred-day",
            Self::InferredMonth => "inferred-month",
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, duplicate-free list of issues.
///
/// Issues are additive: merging keeps first-seen order and never removes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Issues(Vec<Issue>);

impl Issues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        if !self.0.contains(&issue) {
            self.0.push(issue);
        }
    }

    pub fn extend_from(&mut self, other: &Issues) {
        for issue in &other.0 {
            self.push(*issue);
        }
    }

    #[must_use]
    pub fn with(mut self, issue: Issue) -> Self {
        self.push(issue);
        self
    }

    #[must_use]
    pub fn contains(&self, issue: Issue) -> bool {
        self.0.contains(&issue)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Issue> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }
}

impl FromIterator<Issue> for Issues {
    fn from_iter<I: IntoIterator<Item = Issue>>(iter: I) -> Self {
        let mut issues = Self::new();
        for issue in iter {
            issues.push(issue);
        }
        issues
    }
}

impl Extend<Issue> for Issues {
    fn extend<I: IntoIterator<Item = Issue>>(&mut self, iter: I) {
        for issue in iter {
            self.push(issue);
        }
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A (possibly partial) calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateValue {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    #[serde(default)]
    pub qualifiers: Vec<String>,
    pub precision: Precision,
    pub normalized: Option<String>,
    pub sort_key: Option<i64>,
}

impl DateValue {
    /// A fully determined day-precision value.
    #[must_use]
    pub fn exact(year: i32, month: u32, day: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
            qualifiers: Vec::new(),
            precision: Precision::Day,
            normalized: calendar::format_partial(Some(year), Some(month), Some(day)),
            sort_key: calendar::sort_key(year, month, day),
        }
    }

    /// The value as a chrono date, when all three fields form a real date.
    #[must_use]
    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }
}

/// Which exact-parser strategy produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateSource {
    MonthName,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMeta {
    /// Slot assignment, for numeric candidates only.
    pub order: Option<DateOrder>,
    pub source: CandidateSource,
}

/// A fully specified `(year, month, day)` guess from the exact parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub normalized: String,
    pub sort_key: i64,
    pub issues: Issues,
    pub meta: CandidateMeta,
}

impl Candidate {
    /// The candidate as a day-precision [`DateValue`].
    #[must_use]
    pub fn to_value(&self) -> DateValue {
        DateValue {
            year: Some(self.year),
            month: Some(self.month),
            day: Some(self.day),
            qualifiers: Vec::new(),
            precision: Precision::Day,
            normalized: Some(self.normalized.clone()),
            sort_key: Some(self.sort_key),
        }
    }

    #[must_use]
    pub fn same_date(&self, other: &Candidate) -> bool {
        (self.year, self.month, self.day) == (other.year, other.month, other.day)
    }
}

/// A span between two (possibly open) boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeValue {
    pub start: Option<DateValue>,
    pub end: Option<DateValue>,
    pub inclusive_start: bool,
    pub inclusive_end: bool,
}

/// Per-boundary candidate lists attached to a range result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeCandidates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Vec<Candidate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Vec<Candidate>>,
}

impl RangeCandidates {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Kind-specific payload of a [`ParseResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Outcome {
    Exact {
        value: DateValue,
        /// The full candidate set when a strategy picked one of several.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        alternatives: Vec<Candidate>,
    },
    Partial {
        value: DateValue,
    },
    Range {
        value: RangeValue,
        /// Boundaries that are still ambiguous.
        #[serde(skip_serializing_if = "RangeCandidates::is_empty")]
        candidates: RangeCandidates,
        /// Full candidate sets behind boundaries a strategy resolved.
        #[serde(skip_serializing_if = "RangeCandidates::is_empty")]
        alternatives: RangeCandidates,
    },
    Ambiguous {
        candidates: Vec<Candidate>,
    },
    Invalid,
}

/// Top-level result kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Exact,
    Partial,
    Range,
    Ambiguous,
    Invalid,
}

/// The result of one parse call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub original: String,
    pub normalized: Option<String>,
    pub precision: Precision,
    pub sortable: bool,
    pub sort_key: Option<i64>,
    pub tokens: Vec<Token>,
    pub classification: Classification,
    pub issues: Issues,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ParseResult {
    #[must_use]
    pub fn kind(&self) -> ResultKind {
        match self.outcome {
            Outcome::Exact { .. } => ResultKind::Exact,
            Outcome::Partial { .. } => ResultKind::Partial,
            Outcome::Range { .. } => ResultKind::Range,
            Outcome::Ambiguous { .. } => ResultKind::Ambiguous,
            Outcome::Invalid => ResultKind::Invalid,
        }
    }

    /// The date value for exact and partial results.
    #[must_use]
    pub fn date(&self) -> Option<&DateValue> {
        match &self.outcome {
            Outcome::Exact { value, .. } | Outcome::Partial { value } => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn range(&self) -> Option<&RangeValue> {
        match &self.outcome {
            Outcome::Range { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Candidates of an ambiguous result, or alternatives of an exact one.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        match &self.outcome {
            Outcome::Ambiguous { candidates } => candidates,
            Outcome::Exact { alternatives, .. } => alternatives,
            _ => &[],
        }
    }

    #[must_use]
    pub fn has_issue(&self, issue: Issue) -> bool {
        self.issues.contains(issue)
    }
}
