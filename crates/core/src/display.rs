//! Display hook.
//!
//! Rendering parse results for people is left to the caller. This module
//! only defines the seam a formatter plugs into: a hook receives the entity
//! being rendered and where it sits, and returns text or `None` to fall
//! back to the formatter's default.

use crate::types::{Candidate, DateValue, ParseResult, RangeValue};

/// The thing being rendered.
#[derive(Debug, Clone, Copy)]
pub enum DisplayEntity<'a> {
    Result(&'a ParseResult),
    Value(&'a DateValue),
    Range(&'a RangeValue),
    Candidate(&'a Candidate),
}

/// Where the entity appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayContext {
    /// A whole result or a standalone value.
    Standalone,
    RangeStart,
    RangeEnd,
    /// One entry of an ambiguous candidate list.
    CandidateList,
}

/// Custom rendering callback.
///
/// Implemented for any `Fn(DisplayEntity, DisplayContext) -> Option<String>`.
///
/// # Examples
///
/// ```
/// use dateorbit_core::display::{DisplayContext, DisplayEntity, DisplayHook};
/// use dateorbit_core::DateValue;
///
/// let hook = |entity: DisplayEntity<'_>, _ctx: DisplayContext| match entity {
///     DisplayEntity::Value(v) => v.year.map(|y| format!("year {y}")),
///     _ => None,
/// };
///
/// let value = DateValue::exact(1978, 9, 21);
/// assert_eq!(
///     hook.render(DisplayEntity::Value(&value), DisplayContext::Standalone),
///     Some("year 1978".to_string())
/// );
/// ```
pub trait DisplayHook: Send + Sync {
    fn render(&self, entity: DisplayEntity<'_>, context: DisplayContext) -> Option<String>;
}

impl<F> DisplayHook for F
where
    F: Fn(DisplayEntity<'_>, DisplayContext) -> Option<String> + Send + Sync,
{
    fn render(&self, entity: DisplayEntity<'_>, context: DisplayContext) -> Option<String> {
        self(entity, context)
    }
}
