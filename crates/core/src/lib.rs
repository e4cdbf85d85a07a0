//! Dateorbit Core
//!
//! A locale-aware parser for free-text genealogical dates. Input a date
//! as people write it (e.g., `21 Sep 1978`, `ca 1900`, `between 1 jan 1980
//! and 1 oct 1980`) and get back an exact date, a partial date, a range,
//! the competing readings of an ambiguous date, or a typed invalid result
//! with the issues that explain why.
//!
//! # Quick Start
//!
//! ```
//! use dateorbit_core::{parse_date, ResultKind};
//!
//! let result = parse_date("21 Sep 1978");
//! assert_eq!(result.kind(), ResultKind::Exact);
//! assert_eq!(result.normalized.as_deref(), Some("1978-09-21"));
//! assert_eq!(result.sort_key, Some(19_780_921));
//!
//! // Numeric dates can read several ways
//! let result = parse_date("01/02/1900");
//! assert_eq!(result.kind(), ResultKind::Ambiguous);
//! assert_eq!(result.candidates().len(), 2);
//! ```
//!
//! # Per-call Options
//!
//! ```
//! use dateorbit_core::{DateParser, ResultKind};
//! use serde_json::json;
//!
//! let parser = DateParser::new().unwrap();
//! let result = parser
//!     .parse_with("01/02/1900", &json!({
//!         "ambiguity": { "strategy": "prefer-order", "preferredOrders": ["MDY"] }
//!     }))
//!     .unwrap();
//!
//! assert_eq!(result.kind(), ResultKind::Exact);
//! assert_eq!(result.normalized.as_deref(), Some("1900-01-02"));
//! // The other reading is kept
//! assert_eq!(result.candidates().len(), 2);
//! ```

pub mod ambiguity;
pub mod calendar;
pub mod classifier;
pub mod display;
pub mod error;
pub mod locale;
pub mod normalize;
pub mod options;
pub mod parsers;
pub mod tokenizer;
pub mod types;

pub use classifier::{Classification, ClassificationKind, Confidence};
pub use error::{Error, Result};
pub use locale::{Locale, LocalePack, LocaleRegistry, RangeRole};
pub use options::{
    AmbiguityOptions, AmbiguityStrategy, Inclusivity, ParseOptions, PartialOptions, RangeOptions,
};
pub use types::*;

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::{debug, trace};

use ambiguity::Resolution;
use normalize::{normalize, NormalizedInput};

/// Main entry point - a parser bound to options and a resolved locale.
///
/// The locale is resolved when the parser is built. Packs registered later
/// are picked up by building a new parser.
#[derive(Debug, Clone)]
pub struct DateParser {
    registry: Arc<LocaleRegistry>,
    options: ParseOptions,
    locale: Arc<Locale>,
}

impl DateParser {
    /// Create a parser with default options and the global registry.
    ///
    /// # Errors
    ///
    /// Fails only if the default locale is missing from the registry.
    pub fn new() -> Result<Self> {
        Self::with_options(ParseOptions::default())
    }

    /// Create a parser with custom options and the global registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use dateorbit_core::{DateParser, Error, ParseOptions};
    ///
    /// let options = ParseOptions {
    ///     locale: "xx".into(),
    ///     fallback_locales: vec![],
    ///     ..ParseOptions::default()
    /// };
    /// assert!(matches!(
    ///     DateParser::with_options(options),
    ///     Err(Error::LocaleNotFound { .. })
    /// ));
    /// ```
    pub fn with_options(options: ParseOptions) -> Result<Self> {
        Self::with_registry(Arc::clone(LocaleRegistry::global()), options)
    }

    /// Create a parser reading locales from `registry`.
    pub fn with_registry(registry: Arc<LocaleRegistry>, options: ParseOptions) -> Result<Self> {
        let locale = registry.resolve(&options.locale, &options.fallback_locales)?;
        debug!(locale = locale.id(), "parser: locale resolved");
        Ok(Self {
            registry,
            options,
            locale,
        })
    }

    /// Built-in English with default options. Cannot fail.
    fn english() -> Self {
        let registry = Arc::clone(LocaleRegistry::global());
        let locale = registry
            .get(locale::en::ID)
            .unwrap_or_else(|| Arc::new(Locale::english()));
        Self {
            registry,
            options: ParseOptions::default(),
            locale,
        }
    }

    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Parse with the parser's own options.
    #[must_use]
    pub fn parse(&self, input: &str) -> ParseResult {
        run(input, &self.options, &self.locale)
    }

    /// Parse with `overrides` deep-merged over the parser's options.
    ///
    /// The parser itself is not changed. A different `locale` or
    /// `fallbackLocales` is resolved against the parser's registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] for overrides of the wrong shape and
    /// [`Error::LocaleNotFound`] when no requested locale is registered.
    pub fn parse_with(&self, input: &str, overrides: &Value) -> Result<ParseResult> {
        let options = self.options.merged(overrides)?;
        let same_locale = options.locale == self.options.locale
            && options.fallback_locales == self.options.fallback_locales;
        let locale = if same_locale {
            Arc::clone(&self.locale)
        } else {
            self.registry
                .resolve(&options.locale, &options.fallback_locales)?
        };
        Ok(run(input, &options, &locale))
    }
}

/// Parse with default options and the built-in English locale.
///
/// # Examples
///
/// ```
/// use dateorbit_core::{parse_date, Issue, Precision, ResultKind};
///
/// let result = parse_date("ca 1900");
/// assert_eq!(result.kind(), ResultKind::Partial);
/// assert_eq!(result.precision, Precision::Year);
///
/// let result = parse_date("31 Feb 1900");
/// assert_eq!(result.kind(), ResultKind::Invalid);
/// assert!(result.has_issue(Issue::ExactNoMatch));
/// ```
#[must_use]
pub fn parse_date(input: &str) -> ParseResult {
    static DEFAULT: OnceLock<DateParser> = OnceLock::new();
    DEFAULT.get_or_init(DateParser::english).parse(input)
}

/// What a parser stage contributes to the final result.
struct Stage {
    outcome: Outcome,
    normalized: Option<String>,
    precision: Precision,
    sort_key: Option<i64>,
    issues: Issues,
}

impl Stage {
    fn invalid(input: &NormalizedInput, issues: Issues) -> Self {
        Self {
            outcome: Outcome::Invalid,
            normalized: (!input.is_empty()).then(|| input.normalized.clone()),
            precision: Precision::Unknown,
            sort_key: None,
            issues,
        }
    }
}

fn run(input: &str, options: &ParseOptions, locale: &Locale) -> ParseResult {
    trace!(input, locale = locale.id(), "parse: start");

    let normalized = normalize(input);
    let stream = tokenizer::tokenize(&normalized, locale);
    let classification = classifier::classify(&stream.tokens, options);

    let stage = if normalized.is_empty() {
        Stage::invalid(&normalized, Issues::new())
    } else {
        match classification.kind {
            ClassificationKind::Exact => exact_stage(&normalized, &stream.tokens, options, locale),
            ClassificationKind::Partial => partial_stage(&normalized, &stream.tokens, options),
            ClassificationKind::Range => range_stage(&normalized, &stream.tokens, options, locale),
            ClassificationKind::Invalid => Stage::invalid(
                &normalized,
                Issues::new().with(Issue::ParserNotImplemented),
            ),
        }
    };

    let mut issues = stream.issues;
    issues.extend_from(&stage.issues);

    let result = ParseResult {
        original: normalized.original,
        normalized: stage.normalized,
        precision: stage.precision,
        sortable: stage.sort_key.is_some(),
        sort_key: stage.sort_key,
        tokens: stream.tokens,
        classification,
        issues,
        outcome: stage.outcome,
    };
    debug!(
        kind = ?result.kind(),
        normalized = ?result.normalized,
        issues = result.issues.len(),
        "parse: done"
    );
    result
}

fn exact_stage(
    input: &NormalizedInput,
    tokens: &[Token],
    options: &ParseOptions,
    locale: &Locale,
) -> Stage {
    let exact = parsers::parse_exact(tokens, options);
    if exact.candidates.is_empty() {
        return Stage::invalid(input, exact.issues);
    }

    let mut issues = exact.issues;
    let resolved = ambiguity::resolve(
        exact.candidates,
        &options.ambiguity,
        locale.day_month_order(),
    );
    issues.extend_from(&resolved.issues);

    match resolved.resolution {
        Resolution::Single {
            candidate,
            alternates,
        } => {
            let value = candidate.to_value();
            Stage {
                normalized: value.normalized.clone(),
                precision: Precision::Day,
                sort_key: value.sort_key,
                outcome: Outcome::Exact {
                    value,
                    alternatives: alternates,
                },
                issues,
            }
        }
        Resolution::Ambiguous { candidates } => Stage {
            outcome: Outcome::Ambiguous { candidates },
            normalized: None,
            precision: Precision::Day,
            sort_key: None,
            issues,
        },
        Resolution::None => Stage::invalid(input, issues),
    }
}

fn partial_stage(input: &NormalizedInput, tokens: &[Token], options: &ParseOptions) -> Stage {
    match parsers::parse_partial(tokens, options) {
        Ok(partial) => Stage {
            normalized: partial.value.normalized.clone(),
            precision: partial.value.precision,
            sort_key: partial.value.sort_key,
            outcome: Outcome::Partial {
                value: partial.value,
            },
            issues: partial.issues,
        },
        Err(issues) => Stage::invalid(input, issues),
    }
}

fn range_stage(
    input: &NormalizedInput,
    tokens: &[Token],
    options: &ParseOptions,
    locale: &Locale,
) -> Stage {
    match parsers::parse_range(tokens, options, locale.day_month_order()) {
        Ok(range) => Stage {
            normalized: range.normalized.or_else(|| Some(input.normalized.clone())),
            precision: Precision::Range,
            sort_key: range.sort_key,
            outcome: Outcome::Range {
                value: range.value,
                candidates: range.candidates,
                alternatives: range.alternatives,
            },
            issues: range.issues,
        },
        Err(issues) => Stage::invalid(input, issues),
    }
}
