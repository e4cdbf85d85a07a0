//! Locale model: token tables and the registry that holds them.
//!
//! A [`LocalePack`] is the registration input. Packs merge into a prepared
//! [`Locale`] keyed by id; token tables union (the latest registration wins
//! on conflict) while scalar settings are replaced when a pack provides them.
//!
//! The [`LocaleRegistry`] swaps whole `Arc<Locale>` entries, so a reader
//! holding a locale never sees a half-merged one.

pub mod en;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::DateOrder;

/// Structural role of a range marker word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeRole {
    BoundedStart,
    BoundedJoin,
    BoundedEnd,
    OpenStart,
    OpenEnd,
}

impl RangeRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BoundedStart => "boundedStart",
            Self::BoundedJoin => "boundedJoin",
            Self::BoundedEnd => "boundedEnd",
            Self::OpenStart => "openStart",
            Self::OpenEnd => "openEnd",
        }
    }

    /// Splits a bounded range into start and end halves.
    #[must_use]
    pub fn is_join(self) -> bool {
        matches!(self, Self::BoundedJoin | Self::BoundedEnd)
    }
}

/// Month name lists used for display. Each provided list replaces the
/// stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthNamesPack {
    pub long: Option<Vec<String>>,
    pub short: Option<Vec<String>>,
    pub numeric: Option<Vec<String>>,
}

/// Registration input. Everything but `id` is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalePack {
    pub id: Option<String>,
    pub month_lookup: BTreeMap<String, u32>,
    /// Qualifier name → words.
    pub qualifiers: BTreeMap<String, Vec<String>>,
    pub range_markers: BTreeMap<RangeRole, Vec<String>>,
    pub noise_tokens: Vec<String>,
    /// Alias → canonical word.
    pub aliases: BTreeMap<String, String>,
    pub ordinal_suffixes: Option<Vec<String>>,
    pub day_month_order: Option<Vec<DateOrder>>,
    pub month_names: Option<MonthNamesPack>,
    pub qualifier_display: BTreeMap<String, String>,
    pub range_separator: Option<String>,
}

impl LocalePack {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// The registry key: trimmed, lowercased id.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        let id = normalize_id(self.id.as_deref()?);
        (!id.is_empty()).then_some(id)
    }
}

fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}

fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// What a canonical word means in a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexeme<'a> {
    Month(u32),
    Qualifier(&'a str),
    RangeMarker(RangeRole),
    Noise,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthNames {
    pub long: Vec<String>,
    pub short: Vec<String>,
    pub numeric: Vec<String>,
}

/// A prepared, immutable locale ready for tokenization.
#[derive(Debug, Clone)]
pub struct Locale {
    id: String,
    months: HashMap<String, u32>,
    qualifiers: HashMap<String, String>,
    range_markers: HashMap<String, RangeRole>,
    noise: HashSet<String>,
    aliases: HashMap<String, String>,
    ordinal_suffixes: Vec<String>,
    day_month_order: Vec<DateOrder>,
    month_names: MonthNames,
    qualifier_display: HashMap<String, String>,
    range_separator: String,
}

impl Locale {
    fn empty(id: String) -> Self {
        Self {
            id,
            months: HashMap::new(),
            qualifiers: HashMap::new(),
            range_markers: HashMap::new(),
            noise: HashSet::new(),
            aliases: HashMap::new(),
            ordinal_suffixes: Vec::new(),
            day_month_order: vec![DateOrder::Dmy, DateOrder::Mdy],
            month_names: MonthNames::default(),
            qualifier_display: HashMap::new(),
            range_separator: " – ".to_string(),
        }
    }

    /// Prepare a locale from a single pack.
    pub fn from_pack(pack: &LocalePack) -> Result<Self> {
        let id = pack
            .key()
            .ok_or_else(|| Error::LocaleInvalid("locale pack requires an id".to_string()))?;
        let mut locale = Self::empty(id);
        locale.apply(pack);
        Ok(locale)
    }

    /// The built-in English locale.
    #[must_use]
    pub fn english() -> Self {
        let mut locale = Self::empty(en::ID.to_string());
        locale.apply(&en::pack());
        locale
    }

    fn apply(&mut self, pack: &LocalePack) {
        for (word, month) in &pack.month_lookup {
            self.months.insert(normalize_word(word), *month);
        }
        for (name, words) in &pack.qualifiers {
            for word in words {
                self.qualifiers.insert(normalize_word(word), name.clone());
            }
        }
        for (role, words) in &pack.range_markers {
            for word in words {
                self.range_markers.insert(normalize_word(word), *role);
            }
        }
        self.noise
            .extend(pack.noise_tokens.iter().map(|w| normalize_word(w)));
        for (alias, canonical) in &pack.aliases {
            self.aliases
                .insert(normalize_word(alias), normalize_word(canonical));
        }
        if let Some(suffixes) = &pack.ordinal_suffixes {
            self.ordinal_suffixes = suffixes.iter().map(|s| normalize_word(s)).collect();
        }
        if let Some(order) = pack.day_month_order.as_ref().filter(|o| !o.is_empty()) {
            self.day_month_order = order.clone();
        }
        if let Some(names) = &pack.month_names {
            if let Some(long) = &names.long {
                self.month_names.long = long.clone();
            }
            if let Some(short) = &names.short {
                self.month_names.short = short.clone();
            }
            if let Some(numeric) = &names.numeric {
                self.month_names.numeric = numeric.clone();
            }
        }
        for (name, display) in &pack.qualifier_display {
            self.qualifier_display.insert(name.clone(), display.clone());
        }
        if let Some(separator) = &pack.range_separator {
            self.range_separator = separator.clone();
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Expand an alias; words without one map to themselves.
    #[must_use]
    pub fn canonical<'a>(&'a self, lower: &'a str) -> &'a str {
        self.aliases.get(lower).map_or(lower, String::as_str)
    }

    /// Look up a canonical word: month, then qualifier, range marker, noise.
    #[must_use]
    pub fn lookup(&self, canonical: &str) -> Option<Lexeme<'_>> {
        if let Some(month) = self.months.get(canonical) {
            return Some(Lexeme::Month(*month));
        }
        if let Some(name) = self.qualifiers.get(canonical) {
            return Some(Lexeme::Qualifier(name));
        }
        if let Some(role) = self.range_markers.get(canonical) {
            return Some(Lexeme::RangeMarker(*role));
        }
        self.noise.contains(canonical).then_some(Lexeme::Noise)
    }

    /// Byte length of the registered ordinal suffix `rest` starts with.
    ///
    /// The longest match wins, and a suffix followed by another letter does
    /// not count (`21stx` is not an ordinal).
    #[must_use]
    pub fn ordinal_suffix_len(&self, rest: &str) -> Option<usize> {
        self.ordinal_suffixes
            .iter()
            .filter(|suffix| {
                rest.get(..suffix.len())
                    .is_some_and(|head| head.to_lowercase() == **suffix)
                    && !rest[suffix.len()..]
                        .chars()
                        .next()
                        .is_some_and(char::is_alphabetic)
            })
            .map(String::len)
            .max()
    }

    /// Numeric part of an ordinal such as `21st`.
    #[must_use]
    pub fn parse_ordinal(&self, word: &str) -> Option<i64> {
        self.ordinal_suffixes.iter().find_map(|suffix| {
            let digits = word.strip_suffix(suffix.as_str())?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok()
        })
    }

    #[must_use]
    pub fn day_month_order(&self) -> &[DateOrder] {
        &self.day_month_order
    }

    #[must_use]
    pub fn month_names(&self) -> &MonthNames {
        &self.month_names
    }

    #[must_use]
    pub fn qualifier_display(&self, name: &str) -> Option<&str> {
        self.qualifier_display.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn range_separator(&self) -> &str {
        &self.range_separator
    }
}

/// Shared, merge-only table of prepared locales.
///
/// Registration copies the current entry, applies the pack, then swaps the
/// entry in one short write. Writers are serialized so concurrent merges
/// into the same id cannot lose updates.
#[derive(Debug, Default)]
pub struct LocaleRegistry {
    entries: RwLock<HashMap<String, Arc<Locale>>>,
    writer: Mutex<()>,
}

impl LocaleRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with English.
    #[must_use]
    pub fn with_defaults() -> Self {
        let english = Locale::english();
        let mut entries = HashMap::new();
        entries.insert(english.id.clone(), Arc::new(english));
        Self {
            entries: RwLock::new(entries),
            writer: Mutex::new(()),
        }
    }

    /// Process-wide registry, created on first use with English registered.
    pub fn global() -> &'static Arc<LocaleRegistry> {
        static GLOBAL: OnceLock<Arc<LocaleRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(LocaleRegistry::with_defaults()))
    }

    /// Merge `pack` into the entry for its id, creating it if absent.
    pub fn register(&self, pack: &LocalePack) -> Result<Arc<Locale>> {
        let id = pack
            .key()
            .ok_or_else(|| Error::LocaleInvalid("locale pack requires an id".to_string()))?;

        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = match self.get(&id) {
            Some(existing) => Locale::clone(&existing),
            None => Locale::empty(id.clone()),
        };
        next.apply(pack);
        let next = Arc::new(next);

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), Arc::clone(&next));

        debug!(locale = id, "locale: registered");
        Ok(next)
    }

    /// Exact, case-insensitive lookup.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<Locale>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize_id(id))
            .cloned()
    }

    /// First registered locale among `id` and then each fallback.
    pub fn resolve(&self, id: &str, fallbacks: &[String]) -> Result<Arc<Locale>> {
        let attempts = std::iter::once(id).chain(fallbacks.iter().map(String::as_str));
        for attempt in attempts.clone() {
            if let Some(locale) = self.get(attempt) {
                return Ok(locale);
            }
        }
        Err(Error::LocaleNotFound {
            attempted: attempts
                .filter(|a| !a.trim().is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_english_lookups() {
        let en = Locale::english();
        assert_eq!(en.lookup("sept"), Some(Lexeme::Month(9)));
        assert_eq!(en.lookup("sep."), Some(Lexeme::Month(9)));
        assert_eq!(en.lookup("c."), Some(Lexeme::Qualifier("approximate")));
        assert_eq!(en.lookup("~"), Some(Lexeme::Qualifier("approximate")));
        // Qualifier table wins over range markers
        assert_eq!(en.lookup("after"), Some(Lexeme::Qualifier("after")));
        assert_eq!(en.lookup("since"), Some(Lexeme::RangeMarker(RangeRole::OpenStart)));
        assert_eq!(en.lookup("and"), Some(Lexeme::RangeMarker(RangeRole::BoundedEnd)));
        assert_eq!(en.lookup(","), Some(Lexeme::Noise));
        assert_eq!(en.lookup("foo"), None);
        assert_eq!(en.canonical("circa"), "ca");
        assert_eq!(en.canonical("sep"), "sep");
    }

    #[test]
    fn test_ordinals() {
        let en = Locale::english();
        assert_eq!(en.parse_ordinal("21st"), Some(21));
        assert_eq!(en.parse_ordinal("3rd"), Some(3));
        assert_eq!(en.parse_ordinal("st"), None);
        assert_eq!(en.parse_ordinal("xst"), None);
        assert_eq!(en.ordinal_suffix_len("TH January"), Some(2));
        assert_eq!(en.ordinal_suffix_len("thx"), None);
        assert_eq!(en.ordinal_suffix_len(" th"), None);
    }

    #[test]
    fn test_register_requires_id() {
        let registry = LocaleRegistry::new();
        let err = registry.register(&LocalePack::default()).unwrap_err();
        assert!(matches!(err, Error::LocaleInvalid(_)));

        let err = registry.register(&LocalePack::new("  ")).unwrap_err();
        assert!(matches!(err, Error::LocaleInvalid(_)));
    }

    #[test]
    fn test_register_merges_into_existing() {
        let registry = LocaleRegistry::with_defaults();
        let before = registry.get("en").unwrap();

        let mut pack = LocalePack::new(" EN ");
        pack.month_lookup.insert("Septembre".into(), 9);
        pack.month_lookup.insert("may".into(), 6);
        pack.range_separator = Some(" to ".into());
        let merged = registry.register(&pack).unwrap();

        assert_eq!(merged.id(), "en");
        assert_eq!(merged.lookup("septembre"), Some(Lexeme::Month(9)));
        // Latest registration wins on conflict
        assert_eq!(merged.lookup("may"), Some(Lexeme::Month(6)));
        // Untouched tables survive
        assert_eq!(merged.canonical("circa"), "ca");
        assert_eq!(merged.lookup("ca"), Some(Lexeme::Qualifier("approximate")));
        assert_eq!(merged.range_separator(), " to ");
        assert_eq!(merged.day_month_order(), &[DateOrder::Dmy, DateOrder::Mdy]);

        // Earlier snapshot is untouched
        assert_eq!(before.lookup("may"), Some(Lexeme::Month(5)));
        assert_eq!(before.range_separator(), " – ");
    }

    #[test]
    fn test_resolve_with_fallbacks() {
        let registry = LocaleRegistry::with_defaults();
        let locale = registry
            .resolve("sv", &["de".to_string(), "EN".to_string()])
            .unwrap();
        assert_eq!(locale.id(), "en");

        let err = registry.resolve("sv", &["de".to_string()]).unwrap_err();
        match err {
            Error::LocaleNotFound { attempted } => {
                assert_eq!(attempted, vec!["sv".to_string(), "de".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_independent_registries() {
        let a = LocaleRegistry::new();
        let b = LocaleRegistry::with_defaults();
        a.register(&LocalePack::new("sv")).unwrap();

        assert_eq!(a.ids(), vec!["sv".to_string()]);
        assert_eq!(b.ids(), vec!["en".to_string()]);
    }

    #[test]
    fn test_pack_from_json() {
        let pack: LocalePack = serde_json::from_value(serde_json::json!({
            "id": "sv",
            "monthLookup": { "januari": 1, "maj": 5 },
            "qualifiers": { "approximate": ["omkring", "ca"] },
            "dayMonthOrder": ["DMY"]
        }))
        .unwrap();
        let locale = Locale::from_pack(&pack).unwrap();

        assert_eq!(locale.lookup("maj"), Some(Lexeme::Month(5)));
        assert_eq!(locale.lookup("omkring"), Some(Lexeme::Qualifier("approximate")));
        assert_eq!(locale.day_month_order(), &[DateOrder::Dmy]);
    }

    #[test]
    fn test_concurrent_registration_same_id() {
        let registry = Arc::new(LocaleRegistry::with_defaults());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let mut pack = LocalePack::new("en");
                    pack.month_lookup.insert(format!("month{i}"), 1);
                    registry.register(&pack).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let en = registry.get("en").unwrap();
        for i in 0..8 {
            assert_eq!(en.lookup(&format!("month{i}")), Some(Lexeme::Month(1)));
        }
    }
}
