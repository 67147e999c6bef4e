use crate::zip_range::{parse_zip_code, to_zip_code, ZipRange};
use crate::ZipRangeError;

use core::borrow::Borrow;
use core::fmt;
use core::iter::FromIterator;
use core::ops::{BitOr, BitOrAssign};

use num_traits::PrimInt;
use sorted_vec::SortedVec;
use tracing::{debug, trace};

/// Consolidates `ranges` into the smallest sorted list of disjoint,
/// non-adjacent ranges covering the same ZIP codes.
///
/// The input is copied and sorted first. Each range is then merged into the
/// first accumulated entry it is mergeable with, or added as a new entry.
/// A range merges into at most one entry; entries are never fused with each
/// other afterwards.
///
/// # Example
///
/// ```
/// # use zip_range_union::*;
/// let ranges = ["[94133,94133]", "[94200,94299]", "[94226,94399]"]
///     .iter()
///     .map(|text| ZipRange::parse(text))
///     .collect::<Result<Vec<_>, _>>()?;
/// let consolidated = consolidate(&ranges);
/// assert_eq!(consolidated, vec![
///     ZipRange::from_pair(94133, 94133)?,
///     ZipRange::from_pair(94200, 94399)?,
/// ]);
/// # Ok::<(), ZipRangeError>(())
/// ```
pub fn consolidate<I, B>(ranges: I) -> Vec<ZipRange>
where
    I: IntoIterator<Item = B>,
    B: Borrow<ZipRange>
{
    let mut sorted_input: Vec<ZipRange> = ranges.into_iter()
        .map(|range| *range.borrow())
        .collect();
    if sorted_input.is_empty() {
        return Vec::new();
    }
    sorted_input.sort();

    let mut accumulated: SortedVec<ZipRange> = SortedVec::new();
    for range in sorted_input.iter() {
        match accumulated.iter().position(|existing| existing.is_mergeable(range)) {
            Some(index) => {
                // Remove and reinsert so the storage stays sorted
                let mut existing = accumulated.remove_index(index);
                trace!(%existing, %range, "merging zip range into existing entry");
                existing.merge(range);
                accumulated.insert(existing);
            }
            None => {
                trace!(%range, "adding zip range as new entry");
                accumulated.insert(*range);
            }
        }
    }
    debug!(input = sorted_input.len(), output = accumulated.len(), "consolidated zip ranges");
    accumulated.to_vec()
}

/// Returns whether `zip` lies within `range`, both ends included.
pub fn is_in_range(zip: u32, range: &ZipRange) -> bool {
    range.contains(zip)
}

/// Returns whether `zip` is excluded by (contained in) any of `ranges`.
///
/// `ranges` need not be consolidated, though a consolidated list is shorter
/// to scan.
///
/// # Errors
///
/// Returns [`ZipRangeError::OutOfBounds`] if `zip` is not a valid ZIP code.
///
/// Fractional ZIP codes do not compile:
///
/// ```compile_fail
/// # use zip_range_union::*;
/// let _ = is_excluded(10.9f64, &[]);
/// ```
pub fn is_excluded<N: PrimInt>(zip: N, ranges: &[ZipRange]) -> Result<bool, ZipRangeError> {
    let zip = to_zip_code(zip)?;
    Ok(ranges.iter().any(|range| is_in_range(zip, range)))
}

/// Functions like [`is_excluded`] given a ZIP code written as exactly five digits.
///
/// ```
/// # use zip_range_union::*;
/// let ranges = consolidate(&[ZipRange::parse("[00001,00010]")?]);
/// assert!(is_excluded_str("00010", &ranges)?);
/// assert!(!is_excluded_str("00011", &ranges)?);
/// assert_eq!(is_excluded_str("123", &ranges), Err(ZipRangeError::InvalidFormat));
/// # Ok::<(), ZipRangeError>(())
/// ```
///
/// # Errors
///
/// Returns [`ZipRangeError::InvalidFormat`] if `zip` is not five digits.
pub fn is_excluded_str(zip: &str, ranges: &[ZipRange]) -> Result<bool, ZipRangeError> {
    is_excluded(parse_zip_code(zip)?, ranges)
}

/// A consolidated set of ZIP code ranges: sorted by start, with no two
/// entries overlapping or adjacent.
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct ZipRangeSet {
    ranges: Vec<ZipRange>,
}

impl ZipRangeSet {
    /// Constructs an empty [`ZipRangeSet`].
    pub fn new() -> Self {
        ZipRangeSet {
            ranges: Vec::new(),
        }
    }
    /// Consolidates `ranges` into a new [`ZipRangeSet`].
    pub fn from_ranges<I, B>(ranges: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Borrow<ZipRange>
    {
        ZipRangeSet {
            ranges: consolidate(ranges),
        }
    }

    /// Returns the consolidated ranges in ascending order.
    pub fn as_slice(&self) -> &[ZipRange] {
        &self.ranges
    }
    /// Returns an iterator over the consolidated ranges.
    pub fn iter(&self) -> core::slice::Iter<'_, ZipRange> {
        self.ranges.iter()
    }
    /// Returns the number of disjoint ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }
    /// Returns whether the set covers no ZIP codes.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
    /// Converts the set into its sorted list of ranges.
    pub fn into_vec(self) -> Vec<ZipRange> {
        self.ranges
    }

    /// Returns whether `zip` is covered by the set. See [`is_excluded`].
    ///
    /// # Errors
    ///
    /// Returns [`ZipRangeError::OutOfBounds`] if `zip` is not a valid ZIP code.
    pub fn is_excluded<N: PrimInt>(&self, zip: N) -> Result<bool, ZipRangeError> {
        is_excluded(zip, &self.ranges)
    }
    /// Returns whether the five-digit `zip` is covered by the set. See [`is_excluded_str`].
    ///
    /// # Errors
    ///
    /// Returns [`ZipRangeError::InvalidFormat`] if `zip` is not five digits.
    pub fn is_excluded_str(&self, zip: &str) -> Result<bool, ZipRangeError> {
        is_excluded_str(zip, &self.ranges)
    }
}

impl<B: Borrow<ZipRange>> Extend<B> for ZipRangeSet {
    /// Adds the ranges and consolidates the result again.
    fn extend<I: IntoIterator<Item = B>>(&mut self, iter: I) {
        let combined = self.ranges.iter()
            .copied()
            .chain(iter.into_iter().map(|range| *range.borrow()));
        self.ranges = consolidate(combined);
    }
}

impl<B: Borrow<ZipRange>> FromIterator<B> for ZipRangeSet {
    fn from_iter<I: IntoIterator<Item = B>>(iter: I) -> Self {
        ZipRangeSet::from_ranges(iter)
    }
}

impl BitOrAssign for ZipRangeSet {
    /// Extends the [`ZipRangeSet`] with the ranges of `rhs`.
    fn bitor_assign(&mut self, rhs: Self) {
        self.extend(rhs.ranges);
    }
}

impl BitOr for ZipRangeSet {
    type Output = Self;
    /// Computes the union of the two [`ZipRangeSet`] objects.
    fn bitor(self, rhs: Self) -> Self::Output {
        let mut dup_obj = self;
        dup_obj.extend(rhs.ranges);
        dup_obj
    }
}

impl<'a> IntoIterator for &'a ZipRangeSet {
    type Item = &'a ZipRange;
    type IntoIter = core::slice::Iter<'a, ZipRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl From<ZipRangeSet> for Vec<ZipRange> {
    fn from(set: ZipRangeSet) -> Vec<ZipRange> {
        set.into_vec()
    }
}

impl fmt::Display for ZipRangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.ranges.iter()
            .map(|range| range.to_string())
            .collect();
        write!(f, "[{}]", pairs.join(", "))
    }
}

impl fmt::Debug for ZipRangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
