use crate::ZipRangeError;

use core::cmp::{max, min};
use core::convert::TryFrom;
use core::fmt;
use core::ops::RangeInclusive;
use core::str::FromStr;

use lazy_static::lazy_static;
use num_traits::PrimInt;
use regex::Regex;
use tracing::debug;

#[cfg(feature = "include_serde")]
use serde::{Serialize, Deserialize};

/// Smallest valid ZIP code.
pub const ZIP_MIN: u32 = 0;
/// Largest valid ZIP code.
pub const ZIP_MAX: u32 = 99999;

lazy_static! {
    // Brackets optional, whitespace allowed around the comma and inside the brackets
    static ref RANGE_PATTERN: Regex =
        Regex::new(r"^\[?\s*([0-9]{1,5})\s*,\s*([0-9]{1,5})\s*\]?$").unwrap();
    static ref ZIP_CODE_PATTERN: Regex = Regex::new(r"^([0-9]{5})$").unwrap();
}

/// Converts any primitive integer into a ZIP code, rejecting anything outside
/// [`ZIP_MIN`]`..=`[`ZIP_MAX`].
pub(crate) fn to_zip_code<N: PrimInt>(value: N) -> Result<u32, ZipRangeError> {
    match value.to_u32() {
        Some(zip) if (ZIP_MIN..=ZIP_MAX).contains(&zip) => Ok(zip),
        _ => Err(ZipRangeError::OutOfBounds)
    }
}

/// Parses a ZIP code given as exactly five decimal digits.
pub(crate) fn parse_zip_code(text: &str) -> Result<u32, ZipRangeError> {
    let captures = match ZIP_CODE_PATTERN.captures(text) {
        Some(captures) => captures,
        None => {
            debug!(input = text, "rejected malformed zip code");
            return Err(ZipRangeError::InvalidFormat);
        }
    };
    // At most five digits, so this always fits
    captures[1].parse::<u32>().map_err(|_| ZipRangeError::InvalidFormat)
}

/// An inclusive range `[start, end]` of ZIP codes.
///
/// Both ends lie in [`ZIP_MIN`]`..=`[`ZIP_MAX`] and `start <= end` always holds;
/// every constructor swaps the ends when given them out of order.
///
/// Ranges are ordered by `start`, then by `end`.
///
/// # Example
///
/// ```
/// # use zip_range_union::*;
/// let range = ZipRange::parse("[00130, 00120]")?;
/// assert_eq!(range.start(), 120);
/// assert_eq!(range.end(), 130);
/// assert_eq!(range.to_string(), "[00120,00130]");
/// # Ok::<(), ZipRangeError>(())
/// ```
// Field order matters: the derived ordering compares start before end
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "include_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "include_serde", serde(try_from = "[u32; 2]", into = "[u32; 2]"))]
pub struct ZipRange {
    start: u32,
    end: u32,
}

impl ZipRange {
    /// Parses a range such as `[00120, 00130]` or `5,10`.
    ///
    /// The brackets are optional, any amount of whitespace may surround the
    /// comma or sit inside the brackets, and each value has 1 to 5 digits.
    ///
    /// # Errors
    ///
    /// Returns [`ZipRangeError::InvalidFormat`] if the text does not match.
    pub fn parse(text: &str) -> Result<Self, ZipRangeError> {
        let captures = match RANGE_PATTERN.captures(text) {
            Some(captures) => captures,
            None => {
                debug!(input = text, "rejected malformed zip range");
                return Err(ZipRangeError::InvalidFormat);
            }
        };
        let start = captures[1].parse::<u32>().map_err(|_| ZipRangeError::InvalidFormat)?;
        let end = captures[2].parse::<u32>().map_err(|_| ZipRangeError::InvalidFormat)?;
        Self::from_pair(start, end)
    }

    /// Constructs a range from two ZIP codes given in either order.
    ///
    /// # Errors
    ///
    /// Returns [`ZipRangeError::OutOfBounds`] if either value is negative or
    /// greater than [`ZIP_MAX`].
    ///
    /// Only integers are accepted:
    ///
    /// ```compile_fail
    /// # use zip_range_union::*;
    /// let _ = ZipRange::from_pair(0.5f64, 10.0f64);
    /// ```
    pub fn from_pair<N: PrimInt>(a: N, b: N) -> Result<Self, ZipRangeError> {
        let a = to_zip_code(a)?;
        let b = to_zip_code(b)?;
        Ok(ZipRange {
            start: min(a, b),
            end: max(a, b),
        })
    }

    /// Constructs a range from a slice holding exactly two ZIP codes.
    ///
    /// # Errors
    ///
    /// Returns [`ZipRangeError::OutOfBounds`] if the slice does not have
    /// exactly two elements or either value is out of bounds.
    pub fn from_slice<N: PrimInt>(values: &[N]) -> Result<Self, ZipRangeError> {
        match values {
            [a, b] => Self::from_pair(*a, *b),
            _ => Err(ZipRangeError::OutOfBounds)
        }
    }

    /// Returns the first ZIP code in the range.
    pub fn start(&self) -> u32 {
        self.start
    }
    /// Returns the last ZIP code in the range.
    pub fn end(&self) -> u32 {
        self.end
    }
    /// Returns `[start, end]`.
    pub fn to_array(&self) -> [u32; 2] {
        [self.start, self.end]
    }
    /// Returns the range as a `start..=end` [`RangeInclusive`].
    pub fn to_range_inclusive(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Returns whether `zip` lies within the range, both ends included.
    pub fn contains(&self, zip: u32) -> bool {
        self.start <= zip && zip <= self.end
    }

    /// Returns whether the two ranges can be replaced by their union, i.e.
    /// whether they overlap or are adjacent.
    ///
    /// ```
    /// # use zip_range_union::*;
    /// let range = ZipRange::from_pair(10, 20)?;
    /// assert!(range.is_mergeable(&ZipRange::from_pair(21, 30)?));
    /// assert!(range.is_mergeable(&ZipRange::from_pair(0, 9)?));
    /// assert!(range.is_mergeable(&ZipRange::from_pair(15, 15)?));
    /// assert!(!range.is_mergeable(&ZipRange::from_pair(22, 30)?));
    /// # Ok::<(), ZipRangeError>(())
    /// ```
    pub fn is_mergeable(&self, other: &ZipRange) -> bool {
        // Widen before adding so ZIP_MAX + 1 stays comparable
        let self_start = u64::from(self.start);
        let self_end = u64::from(self.end);
        let other_start = u64::from(other.start);
        let other_end = u64::from(other.end);
        other_end + 1 == self_start
            || self_end + 1 == other_start
            || self.contains(other.start)
            || self.contains(other.end)
            || other.contains(self.start)
    }

    /// Widens this range to cover `other` as well: the start becomes the
    /// smaller of the two starts and the end the larger of the two ends.
    ///
    /// The caller must first check [`Self::is_mergeable`]. Merging ranges that
    /// are not mergeable still applies the min/max, which silently covers the
    /// gap between them.
    pub fn merge(&mut self, other: &ZipRange) {
        self.start = min(self.start, other.start);
        self.end = max(self.end, other.end);
    }
}

impl FromStr for ZipRange {
    type Err = ZipRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZipRange::parse(s)
    }
}

impl<N: PrimInt> TryFrom<(N, N)> for ZipRange {
    type Error = ZipRangeError;

    fn try_from(value: (N, N)) -> Result<Self, Self::Error> {
        ZipRange::from_pair(value.0, value.1)
    }
}

impl<N: PrimInt> TryFrom<[N; 2]> for ZipRange {
    type Error = ZipRangeError;

    fn try_from(value: [N; 2]) -> Result<Self, Self::Error> {
        let [a, b] = value;
        ZipRange::from_pair(a, b)
    }
}

impl<N: PrimInt> TryFrom<&[N]> for ZipRange {
    type Error = ZipRangeError;

    fn try_from(value: &[N]) -> Result<Self, Self::Error> {
        ZipRange::from_slice(value)
    }
}

impl<N: PrimInt> TryFrom<Vec<N>> for ZipRange {
    type Error = ZipRangeError;

    fn try_from(value: Vec<N>) -> Result<Self, Self::Error> {
        ZipRange::from_slice(&value)
    }
}

impl From<ZipRange> for [u32; 2] {
    fn from(range: ZipRange) -> [u32; 2] {
        range.to_array()
    }
}

impl From<ZipRange> for RangeInclusive<u32> {
    fn from(range: ZipRange) -> RangeInclusive<u32> {
        range.to_range_inclusive()
    }
}

impl fmt::Display for ZipRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:05},{:05}]", self.start, self.end)
    }
}

impl fmt::Debug for ZipRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipRange")
            .field("start", &format_args!("{:05}", self.start))
            .field("end", &format_args!("{:05}", self.end))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::TryFrom;

    fn range(start: u32, end: u32) -> ZipRange {
        ZipRange::from_pair(start, end).unwrap()
    }

    #[test]
    fn parse_accepts_grammar_variants() {
        assert_eq!(ZipRange::parse("[00120,00130]").unwrap(), range(120, 130));
        assert_eq!(ZipRange::parse("[00120, 00130]").unwrap(), range(120, 130));
        assert_eq!(ZipRange::parse("[ 5 ,\t10 ]").unwrap(), range(5, 10));
        assert_eq!(ZipRange::parse("5,10").unwrap(), range(5, 10));
        assert_eq!(ZipRange::parse("[5,10").unwrap(), range(5, 10));
        assert_eq!(ZipRange::parse("5,10]").unwrap(), range(5, 10));
        assert_eq!(ZipRange::parse("99999,0").unwrap(), range(0, 99999));
    }
    #[test]
    fn parse_swaps_reversed_ends() {
        let parsed = ZipRange::parse("[00130,00120]").unwrap();
        assert_eq!(parsed.start(), 120);
        assert_eq!(parsed.end(), 130);
        let single = ZipRange::parse("7,7").unwrap();
        assert_eq!(single.to_array(), [7, 7]);
    }
    #[test]
    fn parse_rejects_bad_text() {
        for text in &["", "5", "1,2,3", "-1,5", "5,-1", "100000,5", "5,123456",
                "a,b", "5;10", "[[5,10]]", "x5,10", "5,10 x", "٣,5"] {
            assert_eq!(ZipRange::parse(text).unwrap_err(), ZipRangeError::InvalidFormat,
                "{:?} should not parse", text);
        }
    }
    #[test]
    fn from_str_matches_parse() {
        let parsed: ZipRange = "[1, 2]".parse().unwrap();
        assert_eq!(parsed, range(1, 2));
        "nope".parse::<ZipRange>().unwrap_err();
    }
    #[test]
    fn pair_rejects_out_of_bounds() {
        assert_eq!(ZipRange::from_pair(-1, 5).unwrap_err(), ZipRangeError::OutOfBounds);
        assert_eq!(ZipRange::from_pair(5, 100_000).unwrap_err(), ZipRangeError::OutOfBounds);
        assert_eq!(ZipRange::from_pair(u64::MAX, 0).unwrap_err(), ZipRangeError::OutOfBounds);
        assert_eq!(ZipRange::from_pair(0i64, 99999i64).unwrap(), range(0, 99999));
    }
    #[test]
    fn pair_accepts_any_integer_type() {
        assert_eq!(ZipRange::from_pair(99999u64, 0u64).unwrap(), range(0, 99999));
        assert_eq!(ZipRange::from_pair(7i8, 3i8).unwrap(), range(3, 7));
        assert_eq!(ZipRange::from_pair(i128::MIN, 0).unwrap_err(), ZipRangeError::OutOfBounds);
        assert_eq!(ZipRange::from_pair(0usize, 100_000usize).unwrap_err(), ZipRangeError::OutOfBounds);
        assert_eq!(to_zip_code(-1i64).unwrap_err(), ZipRangeError::OutOfBounds);
        assert_eq!(to_zip_code(99999u32).unwrap(), 99999);
    }
    #[test]
    fn collections_need_exactly_two_values() {
        assert_eq!(ZipRange::try_from(vec![9u32, 3]).unwrap(), range(3, 9));
        assert_eq!(ZipRange::try_from([4u16, 8]).unwrap(), range(4, 8));
        assert_eq!(ZipRange::try_from((8i32, 4i32)).unwrap(), range(4, 8));
        assert_eq!(ZipRange::try_from(&[1u32, 2][..]).unwrap(), range(1, 2));

        assert_eq!(ZipRange::try_from(vec![1u32]).unwrap_err(), ZipRangeError::OutOfBounds);
        assert_eq!(ZipRange::try_from(vec![1u32, 2, 3]).unwrap_err(), ZipRangeError::OutOfBounds);
        assert_eq!(ZipRange::try_from(Vec::<u32>::new()).unwrap_err(), ZipRangeError::OutOfBounds);
    }
    #[test]
    fn ordering_is_start_then_end() {
        assert!(range(1, 5) < range(2, 3));
        assert!(range(1, 5) < range(1, 6));
        assert_eq!(range(1, 5).cmp(&range(1, 5)), core::cmp::Ordering::Equal);
        let mut ranges = vec![range(4, 9), range(1, 8), range(1, 2)];
        ranges.sort();
        assert_eq!(ranges, vec![range(1, 2), range(1, 8), range(4, 9)]);
    }
    #[test]
    fn mergeable_adjacent_and_overlapping() {
        let base = range(10, 20);
        assert!(base.is_mergeable(&range(21, 25)));
        assert!(base.is_mergeable(&range(5, 9)));
        assert!(base.is_mergeable(&range(5, 10)));
        assert!(base.is_mergeable(&range(20, 30)));
        assert!(base.is_mergeable(&range(12, 14)));
        assert!(base.is_mergeable(&range(0, 99999)));
        assert!(!base.is_mergeable(&range(22, 25)));
        assert!(!base.is_mergeable(&range(0, 8)));
    }
    #[test]
    fn mergeable_at_bounds() {
        assert!(range(0, 0).is_mergeable(&range(1, 1)));
        assert!(range(99999, 99999).is_mergeable(&range(99998, 99998)));
        assert!(!range(0, 0).is_mergeable(&range(99999, 99999)));
    }
    #[test]
    fn merge_takes_min_start_max_end() {
        let mut merged = range(10, 20);
        merged.merge(&range(5, 12));
        assert_eq!(merged, range(5, 20));
        merged.merge(&range(21, 30));
        assert_eq!(merged, range(5, 30));

        // Unchecked: the gap between disjoint ranges is swallowed
        let mut unchecked = range(1, 2);
        unchecked.merge(&range(8, 9));
        assert_eq!(unchecked, range(1, 9));
    }
    #[test]
    fn formatting_is_zero_padded() {
        assert_eq!(range(5, 10).to_string(), "[00005,00010]");
        assert_eq!(format!("{:?}", range(5, 10)), "ZipRange { start: 00005, end: 00010 }");
        assert_eq!(ZipRange::parse(&range(42, 99999).to_string()).unwrap(), range(42, 99999));
    }
    #[test]
    fn zip_code_parsing() {
        assert_eq!(parse_zip_code("00010").unwrap(), 10);
        assert_eq!(parse_zip_code("99999").unwrap(), 99999);
        for text in &["123", "123456", "", "0001a", " 00010", "-0001"] {
            assert_eq!(parse_zip_code(text).unwrap_err(), ZipRangeError::InvalidFormat);
        }
    }
}
