//! Ratio-scaled mapping between two range lists
//!
//! A `MapList` relates positions in a *from* frame to positions in a *to*
//! frame. Both sides are concatenations of directed ranges, and every
//! `from_ratio` consecutive from-positions correspond to `to_ratio`
//! consecutive to-positions (3:1 for codon to residue, 1:1 for base to base,
//! 1:3 for residue to codon).
//!
//! # Algorithm
//! All arithmetic is done on ordinals (the 1-based count of a position
//! along its concatenation):
//! 1. Locate the source ordinal of a position
//! 2. Snap it to the start of its ratio group
//! 3. Walk the target concatenation to the matching target ordinal
//!
//! Interval projection slices ordinals out of the target concatenation, so
//! spliced and reverse-strand lists need no special casing.

use crate::core::config::SingletonPolicy;
use crate::core::error::{MapListError, MapListResult};
use crate::core::range::{
    add_range, bounds, coalesce_vec, count_pos, count_to_pos, find_overlap, is_forward_strand,
    ranges_from_flat, slice_ordinals, total_length, Direction, Range,
};
use log::{debug, warn};
use std::fmt;

/// Result of shifting a single position into the other frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shift {
    /// Mapped position of the first member of the target group
    pub position: i64,
    /// Offset of the input position within its source group (0-based)
    pub remainder: i64,
    /// Direction of the target range holding `position`
    pub direction: Direction,
}

/// Mapping between two directed range lists at a fixed ratio
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapList {
    from_ranges: Vec<Range>,
    to_ranges: Vec<Range>,
    from_ratio: u32,
    to_ratio: u32,
    from_lowest: i64,
    from_highest: i64,
    to_lowest: i64,
    to_highest: i64,
}

impl MapList {
    /// Create a mapping from range lists
    ///
    /// Both lists are coalesced. Fails only on a zero ratio.
    ///
    /// # Examples
    /// ```
    /// use fast_codonmap::core::{MapList, Range};
    ///
    /// // two exons encoding a four-residue peptide
    /// let cds = MapList::new(
    ///     vec![Range::new(11, 16), Range::new(21, 26)],
    ///     vec![Range::new(1, 4)],
    ///     3,
    ///     1,
    /// )
    /// .unwrap();
    /// assert_eq!(cds.locate_in_to(21, 26), Some(vec![Range::new(3, 4)]));
    /// ```
    pub fn new(
        from_ranges: Vec<Range>,
        to_ranges: Vec<Range>,
        from_ratio: u32,
        to_ratio: u32,
    ) -> MapListResult<Self> {
        if from_ratio == 0 || to_ratio == 0 {
            return Err(MapListError::ZeroRatio {
                from_ratio,
                to_ratio,
            });
        }
        Ok(Self::from_parts(from_ranges, to_ranges, from_ratio, to_ratio))
    }

    /// Create a mapping from flat `[start1, end1, start2, end2, ...]` arrays
    ///
    /// An unpaired trailing value is logged and dropped.
    pub fn from_flat(from: &[i64], to: &[i64], from_ratio: u32, to_ratio: u32) -> MapListResult<Self> {
        Self::from_flat_with_policy(from, to, from_ratio, to_ratio, SingletonPolicy::default())
    }

    /// Same as [`MapList::from_flat`], with control over how single-position
    /// ranges are tagged
    pub fn from_flat_with_policy(
        from: &[i64],
        to: &[i64],
        from_ratio: u32,
        to_ratio: u32,
        policy: SingletonPolicy,
    ) -> MapListResult<Self> {
        Self::new(
            ranges_from_flat(from, policy),
            ranges_from_flat(to, policy),
            from_ratio,
            to_ratio,
        )
    }

    /// Like [`MapList::from_flat`] but rejects odd-length arrays
    pub fn try_from_flat(from: &[i64], to: &[i64], from_ratio: u32, to_ratio: u32) -> MapListResult<Self> {
        for flat in [from, to] {
            if flat.len() % 2 != 0 {
                return Err(MapListError::OddLengthRanges { len: flat.len() });
            }
        }
        Self::from_flat(from, to, from_ratio, to_ratio)
    }

    /// Build without ratio validation; callers guarantee positive ratios
    pub(crate) fn from_parts(
        from_ranges: Vec<Range>,
        to_ranges: Vec<Range>,
        from_ratio: u32,
        to_ratio: u32,
    ) -> Self {
        let from_ranges = coalesce_vec(from_ranges);
        let to_ranges = coalesce_vec(to_ranges);
        let (from_lowest, from_highest) = bounds(&from_ranges);
        let (to_lowest, to_highest) = bounds(&to_ranges);

        Self {
            from_ranges,
            to_ranges,
            from_ratio,
            to_ratio,
            from_lowest,
            from_highest,
            to_lowest,
            to_highest,
        }
    }

    pub fn from_ranges(&self) -> &[Range] {
        &self.from_ranges
    }

    pub fn to_ranges(&self) -> &[Range] {
        &self.to_ranges
    }

    pub fn from_ratio(&self) -> u32 {
        self.from_ratio
    }

    pub fn to_ratio(&self) -> u32 {
        self.to_ratio
    }

    pub fn from_lowest(&self) -> i64 {
        self.from_lowest
    }

    pub fn from_highest(&self) -> i64 {
        self.from_highest
    }

    pub fn to_lowest(&self) -> i64 {
        self.to_lowest
    }

    pub fn to_highest(&self) -> i64 {
        self.to_highest
    }

    /// Number of positions covered on the from side
    pub fn from_length(&self) -> i64 {
        total_length(&self.from_ranges)
    }

    /// Number of positions covered on the to side
    pub fn to_length(&self) -> i64 {
        total_length(&self.to_ranges)
    }

    /// Check for a codon mapping in either direction (3:1 or 1:3)
    pub fn is_triplet_map(&self) -> bool {
        matches!((self.from_ratio, self.to_ratio), (3, 1) | (1, 3))
    }

    /// Check for a single range on each side
    pub fn is_contiguous(&self) -> bool {
        self.from_ranges.len() == 1 && self.to_ranges.len() == 1
    }

    pub fn is_from_forward_strand(&self) -> bool {
        is_forward_strand(&self.from_ranges)
    }

    pub fn is_to_forward_strand(&self) -> bool {
        is_forward_strand(&self.to_ranges)
    }

    /// Map a from-position into the to frame
    ///
    /// # Examples
    /// ```
    /// use fast_codonmap::core::{Direction, MapList};
    ///
    /// let codons = MapList::from_flat(&[1, 12], &[1, 4], 3, 1).unwrap();
    /// let shift = codons.shift_from(5).unwrap();
    /// assert_eq!((shift.position, shift.remainder), (2, 1));
    /// assert_eq!(shift.direction, Direction::Forward);
    /// assert_eq!(codons.shift_from(13), None);
    /// ```
    pub fn shift_from(&self, pos: i64) -> Option<Shift> {
        shift(pos, &self.from_ranges, self.from_ratio, &self.to_ranges, self.to_ratio)
            .map(|(_, shift)| shift)
    }

    /// Map a to-position back into the from frame
    pub fn shift_to(&self, pos: i64) -> Option<Shift> {
        shift(pos, &self.to_ranges, self.to_ratio, &self.from_ranges, self.from_ratio)
            .map(|(_, shift)| shift)
    }

    /// Mapped position of a from-position, or the position itself when it
    /// is not covered
    pub fn to_position(&self, pos: i64) -> i64 {
        self.shift_from(pos).map_or(pos, |s| s.position)
    }

    /// From-frame ranges covering the to-frame interval `[start, end]`
    ///
    /// Each mapped group is returned whole, so one residue yields its full
    /// codon. `start > end` walks the from ranges backwards and returns
    /// reversed ranges. `None` if either endpoint is unmapped.
    pub fn locate_in_from(&self, start: i64, end: i64) -> Option<Vec<Range>> {
        locate(
            start,
            end,
            (&self.to_ranges, self.to_ratio),
            (&self.from_ranges, self.from_ratio),
        )
    }

    /// To-frame ranges covering the from-frame interval `[start, end]`
    pub fn locate_in_to(&self, start: i64, end: i64) -> Option<Vec<Range>> {
        locate(
            start,
            end,
            (&self.from_ranges, self.from_ratio),
            (&self.to_ranges, self.to_ratio),
        )
    }

    /// From-frame ranges for the mapped part of to-frame `[begin, end]`
    ///
    /// Unlike [`MapList::locate_in_from`] the interval may run over unmapped
    /// positions; it is first clipped to the covered positions. Assumes
    /// forward to ranges.
    pub fn get_overlaps_in_from(&self, begin: i64, end: i64) -> Option<Vec<Range>> {
        let (first, last) = find_overlap(&self.to_ranges, begin, end)?;
        self.locate_in_from(first, last)
    }

    /// To-frame ranges for the mapped part of from-frame `[begin, end]`
    pub fn get_overlaps_in_to(&self, begin: i64, end: i64) -> Option<Vec<Range>> {
        let (first, last) = find_overlap(&self.from_ranges, begin, end)?;
        self.locate_in_to(first, last)
    }

    /// The same mapping read the other way
    pub fn inverse(&self) -> MapList {
        Self {
            from_ranges: self.to_ranges.clone(),
            to_ranges: self.from_ranges.clone(),
            from_ratio: self.to_ratio,
            to_ratio: self.from_ratio,
            from_lowest: self.to_lowest,
            from_highest: self.to_highest,
            to_lowest: self.from_lowest,
            to_highest: self.from_highest,
        }
    }

    /// Compose this mapping (X to Y) with `map` (Y to Z) into X to Z
    ///
    /// Ratios multiply and are reduced, so 1:3 then 3:1 gives 1:1.
    /// Returns `None` unless every to range of this mapping is carried
    /// through `map` in full.
    ///
    /// # Examples
    /// ```
    /// use fast_codonmap::core::{MapList, Range};
    ///
    /// // CDS positions within a transcript, transcript exons on the genome
    /// let cds = MapList::from_flat(&[1, 40], &[41, 80], 1, 1).unwrap();
    /// let transcript = MapList::from_flat(&[1, 100], &[2000, 1951, 1000, 951], 1, 1).unwrap();
    ///
    /// let loci = cds.traverse(&transcript).unwrap();
    /// assert_eq!(loci.to_ranges(), &[Range::new(1960, 1951), Range::new(1000, 971)]);
    /// ```
    pub fn traverse(&self, map: &MapList) -> Option<MapList> {
        let from_ratio = u64::from(self.from_ratio) * u64::from(map.from_ratio);
        let to_ratio = u64::from(self.to_ratio) * u64::from(map.to_ratio);
        let divisor = gcd(from_ratio, to_ratio);
        let (Ok(from_ratio), Ok(to_ratio)) = (
            u32::try_from(from_ratio / divisor),
            u32::try_from(to_ratio / divisor),
        ) else {
            warn!("Composed ratio {}:{} overflows", from_ratio, to_ratio);
            return None;
        };

        let mut to_ranges = Vec::with_capacity(self.to_ranges.len());
        for range in &self.to_ranges {
            let Some(located) = map.locate_in_to(range.start(), range.end()) else {
                debug!("Range {} is not mapped by {}", range, map);
                return None;
            };

            let located_length = total_length(&located);
            if range.len() * i64::from(map.to_ratio) != located_length * i64::from(map.from_ratio) {
                debug!(
                    "Range {} is only partly mapped ({} positions) by {}",
                    range, located_length, map
                );
                return None;
            }
            to_ranges.extend(located);
        }

        Some(Self::from_parts(
            self.from_ranges.clone(),
            to_ranges,
            from_ratio,
            to_ratio,
        ))
    }

    /// Append another mapping's ranges to this one
    ///
    /// Ranges are merged where they carry straight on from the current last
    /// range. Adding a mapping to itself does nothing.
    pub fn add_map_list(&mut self, other: &MapList) {
        if self == other {
            return;
        }
        if self.from_ratio != other.from_ratio || self.to_ratio != other.to_ratio {
            warn!(
                "Adding {}:{} mapping to {}:{} mapping, keeping the original ratio",
                other.from_ratio, other.to_ratio, self.from_ratio, self.to_ratio
            );
        }

        self.from_lowest = self.from_lowest.min(other.from_lowest);
        self.from_highest = self.from_highest.max(other.from_highest);
        self.to_lowest = self.to_lowest.min(other.to_lowest);
        self.to_highest = self.to_highest.max(other.to_highest);

        for &range in &other.from_ranges {
            add_range(range, &mut self.from_ranges);
        }
        for &range in &other.to_ranges {
            add_range(range, &mut self.to_ranges);
        }
    }

    /// Check whether one side's bounds enclose the other mapping's
    ///
    /// With `local` the to bounds are compared, otherwise the from bounds.
    pub fn contains_either(&self, local: bool, other: &MapList) -> bool {
        if local {
            self.to_lowest <= other.to_lowest && self.to_highest >= other.to_highest
        } else {
            self.from_lowest <= other.from_lowest && self.from_highest >= other.from_highest
        }
    }
}

/// Shift `pos` from one range list into the other, returning the target
/// ordinal alongside the result
fn shift(
    pos: i64,
    source: &[Range],
    source_ratio: u32,
    target: &[Range],
    target_ratio: u32,
) -> Option<(i64, Shift)> {
    let (ordinal, _) = count_pos(source, pos)?;
    let source_ratio = i64::from(source_ratio);
    let remainder = (ordinal - 1) % source_ratio;
    let target_ordinal = 1 + ((ordinal - 1) / source_ratio) * i64::from(target_ratio);
    let (position, direction) = count_to_pos(target, target_ordinal)?;

    Some((
        target_ordinal,
        Shift {
            position,
            remainder,
            direction,
        },
    ))
}

/// Project `[start, end]` from the source list into whole target groups
fn locate(
    start: i64,
    end: i64,
    (source, source_ratio): (&[Range], u32),
    (target, target_ratio): (&[Range], u32),
) -> Option<Vec<Range>> {
    let (first, _) = shift(start, source, source_ratio, target, target_ratio)?;
    let (last, _) = shift(end, source, source_ratio, target, target_ratio)?;

    // extend the trailing group to its full width
    let group_tail = i64::from(target_ratio) - 1;
    if first <= last {
        slice_ordinals(target, first, last + group_tail)
    } else {
        slice_ordinals(target, first + group_tail, last)
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a.max(1)
    } else {
        gcd(b, a % b)
    }
}

fn write_ranges(f: &mut fmt::Formatter<'_>, ranges: &[Range]) -> fmt::Result {
    write!(f, "[ ")?;
    for range in ranges {
        write!(f, "{} ", range)?;
    }
    write!(f, "]")
}

impl fmt::Display for MapList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ranges(f, &self.from_ranges)?;
        write!(f, " {}:{} to ", self.from_ratio, self.to_ratio)?;
        write_ranges(f, &self.to_ranges)
    }
}
