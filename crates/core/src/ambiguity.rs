//! Ambiguity resolution for exact candidates.
//!
//! Resolution never discards candidates: whenever a strategy picks one of
//! several, the full list travels along as alternates.

use tracing::debug;

use crate::options::{AmbiguityOptions, AmbiguityStrategy};
use crate::types::{Candidate, DateOrder, Issue, Issues};

/// Orders appended after explicit and locale preferences.
const PREFERENCE_FALLBACK: [DateOrder; 3] = [DateOrder::Dmy, DateOrder::Mdy, DateOrder::Ymd];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    None,
    Single {
        candidate: Candidate,
        /// Every candidate considered, when the pick was made from several.
        alternates: Vec<Candidate>,
    },
    Ambiguous {
        candidates: Vec<Candidate>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguityResolution {
    pub resolution: Resolution,
    pub issues: Issues,
}

/// Resolve de-duplicated exact candidates.
///
/// `locale_orders` is the active locale's day/month order, folded into the
/// preference list unless `prefer_locale_order` is off.
#[must_use]
pub fn resolve(
    candidates: Vec<Candidate>,
    options: &AmbiguityOptions,
    locale_orders: &[DateOrder],
) -> AmbiguityResolution {
    if candidates.len() <= 1 {
        return match candidates.into_iter().next() {
            Some(candidate) => AmbiguityResolution {
                issues: candidate.issues.clone(),
                resolution: Resolution::Single {
                    candidate,
                    alternates: Vec::new(),
                },
            },
            None => AmbiguityResolution {
                resolution: Resolution::None,
                issues: Issues::new().with(Issue::AmbiguityNoCandidates),
            },
        };
    }

    let mut issues: Issues = candidates.iter().flat_map(|c| c.issues.iter()).collect();

    let chosen = match options.strategy {
        AmbiguityStrategy::All => {
            issues.push(Issue::AmbiguousOrder);
            debug!(candidates = candidates.len(), "ambiguity: reporting all");
            return AmbiguityResolution {
                resolution: Resolution::Ambiguous { candidates },
                issues,
            };
        }
        AmbiguityStrategy::PreferOrder => {
            issues.push(Issue::AmbiguityAutoResolved);
            let preferences = preference_list(options, locale_orders);
            preferences
                .iter()
                .find_map(|order| {
                    candidates
                        .iter()
                        .position(|c| c.meta.order == Some(*order))
                })
                .unwrap_or(0)
        }
        AmbiguityStrategy::First => 0,
    };

    debug!(
        strategy = ?options.strategy,
        chosen,
        candidates = candidates.len(),
        "ambiguity: resolved"
    );
    AmbiguityResolution {
        resolution: Resolution::Single {
            candidate: candidates[chosen].clone(),
            alternates: candidates,
        },
        issues,
    }
}

/// Explicit preferences, then the locale's order, then the fixed fallback.
#[must_use]
pub fn preference_list(options: &AmbiguityOptions, locale_orders: &[DateOrder]) -> Vec<DateOrder> {
    let locale_orders: &[DateOrder] = if options.prefer_locale_order {
        locale_orders
    } else {
        &[]
    };

    let mut preferences = Vec::new();
    for order in options
        .preferred_orders
        .iter()
        .chain(locale_orders)
        .chain(&PREFERENCE_FALLBACK)
    {
        if !preferences.contains(order) {
            preferences.push(*order);
        }
    }
    preferences
}
