//! Directed interval lists
//!
//! A range list is read as a concatenation: walking its ranges in list
//! order defines a virtual contiguous coordinate space. The 1-based count
//! of a position along that walk is its *ordinal*, the common currency
//! used by all mapping arithmetic.
//!
//! Ranges are 1-based and inclusive on both ends. A range with
//! `end < start` runs in reverse (minus strand).

use crate::core::config::SingletonPolicy;
use log::{debug, warn};
use std::borrow::Cow;
use std::fmt;

/// Direction of travel through a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    /// Infer the direction of `start..=end`; single positions read as forward
    ///
    /// # Examples
    /// ```
    /// use fast_codonmap::core::Direction;
    /// assert_eq!(Direction::of(1, 5), Direction::Forward);
    /// assert_eq!(Direction::of(5, 1), Direction::Reverse);
    /// assert_eq!(Direction::of(3, 3), Direction::Forward);
    /// ```
    #[inline]
    pub fn of(start: i64, end: i64) -> Self {
        if end >= start {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// +1 for forward, -1 for reverse
    #[inline]
    pub fn step(&self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Check if this is the forward direction
    pub fn is_forward(&self) -> bool {
        matches!(self, Direction::Forward)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "+"),
            Direction::Reverse => write!(f, "-"),
        }
    }
}

/// A directed, inclusive interval `[start, end]`
///
/// The direction is stored rather than re-derived, so a single position
/// keeps whatever strand it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: i64,
    end: i64,
    direction: Direction,
}

impl Range {
    /// Create a range, inferring direction from the endpoints
    ///
    /// # Examples
    /// ```
    /// use fast_codonmap::core::{Direction, Range};
    ///
    /// let exon = Range::new(2000, 1951);
    /// assert_eq!(exon.direction(), Direction::Reverse);
    /// assert_eq!(exon.len(), 50);
    /// ```
    #[inline]
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            direction: Direction::of(start, end),
        }
    }

    /// Create a single-position range with an explicit direction
    #[inline]
    pub fn point(pos: i64, direction: Direction) -> Self {
        Self {
            start: pos,
            end: pos,
            direction,
        }
    }

    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> i64 {
        self.end
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of positions covered (always at least 1)
    #[inline]
    pub fn len(&self) -> i64 {
        i64::try_from(self.start.abs_diff(self.end)).map_or(i64::MAX, |d| d.saturating_add(1))
    }

    /// Ranges are never empty; provided for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn is_singleton(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn lowest(&self) -> i64 {
        self.start.min(self.end)
    }

    #[inline]
    pub fn highest(&self) -> i64 {
        self.start.max(self.end)
    }

    /// Check whether `pos` lies within the range, in either direction
    #[inline]
    pub fn contains(&self, pos: i64) -> bool {
        pos >= self.lowest() && pos <= self.highest()
    }

    /// 0-based offset of `pos` from `start`, walking in the range's direction
    #[inline]
    pub fn offset_of(&self, pos: i64) -> Option<i64> {
        if self.contains(pos) {
            Some((pos - self.start) * self.direction.step())
        } else {
            None
        }
    }

    /// Position reached after walking `offset` steps from `start`
    #[inline]
    pub fn position_at(&self, offset: i64) -> i64 {
        self.start + offset * self.direction.step()
    }

    /// The same positions walked the other way
    ///
    /// # Examples
    /// ```
    /// use fast_codonmap::core::Range;
    /// assert_eq!(Range::new(4, 9).reversed(), Range::new(9, 4));
    /// ```
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            direction: self.direction.reverse(),
        }
    }

    /// Sub-range between two 0-based offsets, keeping this range's direction
    fn slice(&self, first_offset: i64, last_offset: i64) -> Self {
        Self {
            start: self.position_at(first_offset),
            end: self.position_at(last_offset),
            direction: self.direction,
        }
    }

    /// Move the end point, keeping the direction tag
    #[inline]
    fn extend_to(&mut self, end: i64) {
        self.end = end;
    }
}

impl From<(i64, i64)> for Range {
    fn from((start, end): (i64, i64)) -> Self {
        Range::new(start, end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Build ranges from a flat `[start1, end1, start2, end2, ...]` array
///
/// A trailing unpaired value is logged and ignored.
pub fn ranges_from_flat(flat: &[i64], policy: SingletonPolicy) -> Vec<Range> {
    if flat.len() % 2 != 0 {
        warn!(
            "Range array of length {} has an unpaired trailing value {:?}, ignoring it",
            flat.len(),
            flat.last()
        );
    }

    let mut ranges: Vec<Range> = Vec::with_capacity(flat.len() / 2);
    for pair in flat.chunks_exact(2) {
        let (start, end) = (pair[0], pair[1]);
        let range = match ranges.last() {
            Some(prev) if start == end && policy.inherits() => Range::point(start, prev.direction()),
            _ => Range::new(start, end),
        };
        ranges.push(range);
    }
    ranges
}

/// Flatten ranges into `[start1, end1, start2, end2, ...]`
///
/// # Examples
/// ```
/// use fast_codonmap::core::{flatten, Range};
/// let ranges = [Range::new(2, 3), Range::new(5, 6)];
/// assert_eq!(flatten(&ranges), vec![2, 3, 5, 6]);
/// ```
pub fn flatten(ranges: &[Range]) -> Vec<i64> {
    ranges.iter().flat_map(|r| [r.start, r.end]).collect()
}

/// Total number of positions in the concatenation
pub fn total_length(ranges: &[Range]) -> i64 {
    ranges.iter().map(Range::len).sum()
}

/// Lowest and highest positions touched by any range
///
/// Returns `(i64::MAX, i64::MIN)` for an empty list so that any clipping
/// against these bounds comes out empty.
pub fn bounds(ranges: &[Range]) -> (i64, i64) {
    ranges.iter().fold((i64::MAX, i64::MIN), |(lo, hi), r| {
        (lo.min(r.lowest()), hi.max(r.highest()))
    })
}

/// Merge adjacent, overlapping and duplicate ranges that share a direction
///
/// Walking left to right:
/// 1. A range identical to the last kept range is dropped
/// 2. A range lying wholly inside the last kept range, running the same way
///    (or a single position), is dropped
/// 3. A range that continues or overlaps the last kept range in the same
///    direction extends it (a single position may extend either direction)
/// 4. Anything else starts a new segment carrying its own direction
///
/// The input is returned borrowed when nothing merged.
///
/// # Examples
/// ```
/// use fast_codonmap::core::{coalesce, Range};
/// use std::borrow::Cow;
///
/// let exons = [Range::new(1, 20), Range::new(21, 35), Range::new(36, 71)];
/// assert_eq!(coalesce(&exons).as_ref(), &[Range::new(1, 71)]);
///
/// let introns = [Range::new(1, 20), Range::new(30, 40)];
/// assert!(matches!(coalesce(&introns), Cow::Borrowed(_)));
/// ```
pub fn coalesce(ranges: &[Range]) -> Cow<'_, [Range]> {
    if ranges.len() < 2 {
        return Cow::Borrowed(ranges);
    }

    let mut changed = false;
    let mut merged = Vec::with_capacity(ranges.len());
    let mut last = ranges[0];

    for &range in &ranges[1..] {
        if range.start == last.start && range.end == last.end {
            changed = true;
            continue;
        }

        let same_direction = range.is_singleton() || range.direction == last.direction;

        // an opposite-strand re-walk inside `last` still contributes positions
        if same_direction && last.contains(range.start) && last.contains(range.end) {
            changed = true;
            continue;
        }

        let extending = range.start == last.end + last.direction.step();
        let overlapping = last.contains(range.start);

        if same_direction && (overlapping || extending) {
            last.extend_to(range.end);
            changed = true;
        } else {
            merged.push(last);
            last = range;
        }
    }
    merged.push(last);

    if changed {
        debug!("Coalesced {} ranges into {}", ranges.len(), merged.len());
        Cow::Owned(merged)
    } else {
        Cow::Borrowed(ranges)
    }
}

/// Coalesce an owned list, reusing it when nothing merged
pub(crate) fn coalesce_vec(ranges: Vec<Range>) -> Vec<Range> {
    let merged = match coalesce(&ranges) {
        Cow::Owned(merged) => Some(merged),
        Cow::Borrowed(_) => None,
    };
    merged.unwrap_or(ranges)
}

/// Append a range, merging it into the last one when it carries straight on
///
/// The last range is extended when the new one has the same direction (or
/// is a single position) and starts either on the last end position or one
/// step past it.
pub fn add_range(range: Range, ranges: &mut Vec<Range>) {
    if let Some(last) = ranges.last_mut() {
        let same_direction = range.is_singleton() || range.direction == last.direction;
        let contiguous =
            range.start == last.end || range.start == last.end + last.direction.step();
        if same_direction && contiguous {
            last.extend_to(range.end);
            return;
        }
    }
    ranges.push(range);
}

/// Ordinal of `pos` in the concatenation, with the direction of the range
/// that holds it
///
/// # Examples
/// ```
/// use fast_codonmap::core::{count_pos, Direction, Range};
/// let ranges = [Range::new(10, 20), Range::new(5, -5)];
/// assert_eq!(count_pos(&ranges, 15), Some((6, Direction::Forward)));
/// assert_eq!(count_pos(&ranges, -1), Some((18, Direction::Reverse)));
/// assert_eq!(count_pos(&ranges, 21), None);
/// ```
pub fn count_pos(ranges: &[Range], pos: i64) -> Option<(i64, Direction)> {
    let mut count = 0;
    for range in ranges {
        if let Some(offset) = range.offset_of(pos) {
            return Some((count + offset + 1, range.direction));
        }
        count += range.len();
    }
    None
}

/// Position found at `ordinal` in the concatenation, with the direction of
/// the range that holds it
pub fn count_to_pos(ranges: &[Range], ordinal: i64) -> Option<(i64, Direction)> {
    if ordinal < 1 {
        return None;
    }

    let mut traversed = 0;
    for range in ranges {
        let len = range.len();
        if ordinal <= traversed + len {
            return Some((range.position_at(ordinal - traversed - 1), range.direction));
        }
        traversed += len;
    }
    None
}

/// Sub-ranges covering ordinals `first..=last` of the concatenation
///
/// When `first > last` the walk runs backwards through the list: the same
/// positions are returned in reverse list order with each piece reversed.
/// Returns `None` if either ordinal falls outside the concatenation.
///
/// # Examples
/// ```
/// use fast_codonmap::core::{slice_ordinals, Range};
/// let exons = [Range::new(2000, 1951), Range::new(1000, 951)];
/// assert_eq!(
///     slice_ordinals(&exons, 41, 80),
///     Some(vec![Range::new(1960, 1951), Range::new(1000, 971)])
/// );
/// assert_eq!(slice_ordinals(&exons, 41, 101), None);
/// ```
pub fn slice_ordinals(ranges: &[Range], first: i64, last: i64) -> Option<Vec<Range>> {
    if first > last {
        let forward = slice_ordinals(ranges, last, first)?;
        return Some(forward.iter().rev().map(Range::reversed).collect());
    }
    if first < 1 {
        return None;
    }

    let mut sliced = Vec::new();
    let mut traversed = 0;
    for range in ranges {
        let lo = traversed + 1;
        let hi = traversed + range.len();
        if hi >= first && lo <= last {
            sliced.push(range.slice(first.max(lo) - lo, last.min(hi) - lo));
        }
        traversed = hi;
        if traversed >= last {
            return Some(sliced);
        }
    }
    None
}

/// The first position at or after `begin` and the last position at or
/// before `end` that fall inside forward ranges
///
/// ```text
/// ranges [4-10], [12-19]
///   find_overlap(ranges, 1, 20)  == (4, 19)
///   find_overlap(ranges, 9, 15)  == (9, 15)
///   find_overlap(ranges, 11, 11) == None
/// ```
pub fn find_overlap(ranges: &[Range], begin: i64, end: i64) -> Option<(i64, i64)> {
    let mut from = None;
    let mut to = None;

    for range in ranges {
        if from.is_none() {
            if range.start >= begin {
                from = Some(range.start);
            } else if range.end >= begin {
                from = Some(begin);
            }
        }
        if range.start <= end {
            to = Some(end.min(range.end));
        }
    }

    match (from, to) {
        (Some(from), Some(to)) if to >= from => Some((from, to)),
        _ => None,
    }
}

/// Direction of the first range that is not a single position
///
/// Defaults to forward when every range is a single position.
pub fn is_forward_strand(ranges: &[Range]) -> bool {
    ranges
        .iter()
        .find(|r| !r.is_singleton())
        .map_or(true, |r| r.direction.is_forward())
}
