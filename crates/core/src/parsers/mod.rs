//! Parsers for each classification kind.
//!
//! - [`exact`]: fully specified dates, possibly several candidates
//! - [`partial`]: dates missing a day, month or year, and qualified dates
//! - [`range`]: open and bounded ranges, built from the other two

pub mod exact;
pub mod partial;
pub mod range;

pub use exact::{parse_exact, ExactParse};
pub use partial::{parse_partial, PartialParse};
pub use range::{parse_range, RangeParse};
