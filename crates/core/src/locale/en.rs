//! Built-in English locale.

use super::{LocalePack, MonthNamesPack, RangeRole};
use crate::types::DateOrder;

pub const ID: &str = "en";

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("jan.", 1),
    ("february", 2),
    ("feb", 2),
    ("feb.", 2),
    ("march", 3),
    ("mar", 3),
    ("mar.", 3),
    ("april", 4),
    ("apr", 4),
    ("apr.", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("jun.", 6),
    ("july", 7),
    ("jul", 7),
    ("jul.", 7),
    ("august", 8),
    ("aug", 8),
    ("aug.", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("sep.", 9),
    ("sept.", 9),
    ("october", 10),
    ("oct", 10),
    ("oct.", 10),
    ("november", 11),
    ("nov", 11),
    ("nov.", 11),
    ("december", 12),
    ("dec", 12),
    ("dec.", 12),
];

const QUALIFIERS: &[(&str, &[&str])] = &[
    ("approximate", &["ca", "circa", "abt", "about", "~", "c."]),
    ("before", &["before", "bef", "prior"]),
    ("after", &["after", "aft", "post"]),
    ("calculated", &["calc", "calculated"]),
    ("estimated", &["est", "estimated"]),
];

const JOINS: &[&str] = &["and", "to", "through", "thru"];

const RANGE_MARKERS: &[(RangeRole, &[&str])] = &[
    (RangeRole::BoundedStart, &["between", "from"]),
    (RangeRole::BoundedJoin, JOINS),
    (RangeRole::BoundedEnd, JOINS),
    (RangeRole::OpenStart, &["after", "since"]),
    (RangeRole::OpenEnd, &["before", "until", "till"]),
];

const LONG_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const SHORT_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const QUALIFIER_DISPLAY: &[(&str, &str)] = &[
    ("approximate", "ca"),
    ("before", "before"),
    ("after", "after"),
    ("calculated", "calc"),
    ("estimated", "est"),
];

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// The English locale pack.
#[must_use]
pub fn pack() -> LocalePack {
    LocalePack {
        id: Some(ID.to_string()),
        month_lookup: MONTHS.iter().map(|(w, m)| ((*w).to_string(), *m)).collect(),
        qualifiers: QUALIFIERS
            .iter()
            .map(|(name, words)| ((*name).to_string(), strings(words)))
            .collect(),
        range_markers: RANGE_MARKERS
            .iter()
            .map(|(role, words)| (*role, strings(words)))
            .collect(),
        noise_tokens: strings(&[","]),
        aliases: [("circa", "ca"), ("approx", "ca")]
            .iter()
            .map(|(a, c)| ((*a).to_string(), (*c).to_string()))
            .collect(),
        ordinal_suffixes: Some(strings(&["st", "nd", "rd", "th"])),
        day_month_order: Some(vec![DateOrder::Dmy, DateOrder::Mdy]),
        month_names: Some(MonthNamesPack {
            long: Some(strings(&LONG_NAMES)),
            short: Some(strings(&SHORT_NAMES)),
            numeric: Some((1..=12).map(|m| format!("{m:02}")).collect()),
        }),
        qualifier_display: QUALIFIER_DISPLAY
            .iter()
            .map(|(n, d)| ((*n).to_string(), (*d).to_string()))
            .collect(),
        range_separator: Some(" – ".to_string()),
    }
}
