#![forbid(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/zip_range_union/0.1.0")]

//! Consolidates ranges of 5-digit ZIP codes into the smallest sorted set of
//! disjoint, non-adjacent ranges, and tests ZIP codes against that set.
//!
//! Example usage:
//! ```
//! # use zip_range_union::*;
//! let input = ["[94133,94133]", "[94200,94299]", "[94600,94699]", "[94226,94399]"];
//! let ranges = input.iter()
//!     .map(|line| line.parse::<ZipRange>())
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let excluded = ZipRangeSet::from_ranges(&ranges);
//! assert_eq!(excluded.to_string(), "[[94133,94133], [94200,94399], [94600,94699]]");
//! assert!(excluded.is_excluded(94300)?);
//! assert!(!excluded.is_excluded_str("94500")?);
//! # Ok::<(), ZipRangeError>(())
//! ```
//!
//! The building blocks are [`ZipRange`], the [`consolidate`] function and the
//! [`is_excluded`] family of membership tests. [`ZipRangeSet`] bundles them.
//!
//! Enable the `include_serde` feature to (de)serialize [`ZipRange`] as a
//! `[start, end]` pair.

mod zip_range;
mod consolidate;

pub use zip_range::{ZipRange, ZIP_MIN, ZIP_MAX};
pub use consolidate::{consolidate, is_excluded, is_excluded_str, is_in_range, ZipRangeSet};

use std::fmt;

use std::error::Error;

/// Enum describing why a ZIP code or range was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZipRangeError {
    /// Text does not match the range or ZIP code grammar.
    InvalidFormat,
    /// Value lies outside `0..=99999`, or a collection does not hold exactly two values.
    OutOfBounds
}
impl fmt::Display for ZipRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description_str = match self {
            ZipRangeError::InvalidFormat =>
                "invalid zip code or zip code range format",
            ZipRangeError::OutOfBounds =>
                "zip code outside 00000-99999 or range without exactly two values"
        };
        write!(f, "{}", description_str)
    }
}
impl Error for ZipRangeError {}
