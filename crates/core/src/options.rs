//! Parse options and per-call overrides.
//!
//! Options serialize in camelCase so they can be loaded from the same JSON
//! documents other tooling uses. Overrides are plain JSON objects that are
//! deep-merged over a base [`ParseOptions`]:
//!
//! - objects merge key by key, recursively
//! - arrays and scalars replace the base value
//! - `null` leaves the base value untouched

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::types::DateOrder;

/// How multiple valid exact candidates are turned into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityStrategy {
    /// Report every candidate as an ambiguous result.
    #[default]
    All,
    /// Pick by preferred day/month/year order.
    PreferOrder,
    /// Pick the first candidate in input order. Unknown names land here.
    #[serde(other)]
    First,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AmbiguityOptions {
    pub strategy: AmbiguityStrategy,
    pub preferred_orders: Vec<DateOrder>,
    pub prefer_locale_order: bool,
}

impl Default for AmbiguityOptions {
    fn default() -> Self {
        Self {
            strategy: AmbiguityStrategy::All,
            preferred_orders: vec![DateOrder::Dmy, DateOrder::Mdy],
            prefer_locale_order: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialOptions {
    /// Accept year values of 31 or less (including 0).
    pub allow_two_digit_years: bool,
    pub infer_missing_day: bool,
    pub infer_missing_month: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inclusivity {
    pub start: bool,
    pub end: bool,
}

impl Default for Inclusivity {
    fn default() -> Self {
        Self {
            start: true,
            end: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeOptions {
    pub default_inclusivity: Inclusivity,
}

/// Configuration for a parse call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    pub locale: String,
    pub fallback_locales: Vec<String>,
    pub ambiguity: AmbiguityOptions,
    pub partial: PartialOptions,
    pub ranges: RangeOptions,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            fallback_locales: vec!["en".to_string()],
            ambiguity: AmbiguityOptions::default(),
            partial: PartialOptions::default(),
            ranges: RangeOptions::default(),
        }
    }
}

impl ParseOptions {
    /// Defaults with `overrides` merged on top.
    pub fn from_overrides(overrides: &Value) -> Result<Self> {
        Self::default().merged(overrides)
    }

    /// A copy of these options with `overrides` deep-merged on top.
    ///
    /// Non-object overrides are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use dateorbit_core::{AmbiguityStrategy, ParseOptions};
    /// use serde_json::json;
    ///
    /// let base = ParseOptions::default();
    /// let merged = base
    ///     .merged(&json!({ "ambiguity": { "strategy": "prefer-order" } }))
    ///     .unwrap();
    ///
    /// assert_eq!(merged.ambiguity.strategy, AmbiguityStrategy::PreferOrder);
    /// // Untouched siblings keep their base values
    /// assert_eq!(merged.ambiguity.preferred_orders, base.ambiguity.preferred_orders);
    /// ```
    pub fn merged(&self, overrides: &Value) -> Result<Self> {
        if !overrides.is_object() {
            return Ok(self.clone());
        }
        let mut base = serde_json::to_value(self)?;
        merge_deep(&mut base, overrides);
        Ok(serde_json::from_value(base)?)
    }
}

fn merge_deep(target: &mut Value, source: &Value) {
    let (Value::Object(target), Value::Object(source)) = (target, source) else {
        return;
    };
    for (key, value) in source {
        if value.is_null() {
            continue;
        }
        match target.get_mut(key) {
            Some(existing) if existing.is_object() && value.is_object() => {
                merge_deep(existing, value);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
