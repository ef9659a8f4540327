//! Aligned codon iteration
//!
//! Walks a codon mapping (from bases to residues) three bases at a time and
//! reports, for each codon, the aligned columns of its bases in a gapped
//! rendering of the from sequence together with the residue it translates
//! to.
//!
//! The iterator is single pass. Its column tally only moves forward, so the
//! mapping's from positions must be visited in increasing order.

use crate::core::error::{CodonError, CodonResult};
use crate::core::maplist::MapList;
use crate::core::range::Range;
use crate::core::sequence::{is_gap, Sequence};
use log::debug;
use std::fmt;
use std::iter::FusedIterator;
use std::slice;

/// One codon's aligned columns and its translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlignedCodon {
    /// Aligned column (0-based) of the first base
    pub base1: usize,
    pub base2: usize,
    pub base3: usize,
    /// Translated residue
    pub peptide: u8,
    /// Column (0-based) of the residue in the target sequence
    pub peptide_col: usize,
}

impl AlignedCodon {
    /// Aligned columns of the three bases
    pub fn columns(&self) -> [usize; 3] {
        [self.base1, self.base2, self.base3]
    }
}

impl fmt::Display for AlignedCodon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {} {} {}]",
            self.base1, self.base2, self.base3, self.peptide as char, self.peptide_col
        )
    }
}

/// Forward cursor over the positions of a range list
#[derive(Debug, Clone)]
struct RangeCursor<'a> {
    ranges: slice::Iter<'a, Range>,
    current: Option<Range>,
    offset: i64,
    last: Option<i64>,
}

impl<'a> RangeCursor<'a> {
    fn new(ranges: &'a [Range]) -> Self {
        let mut ranges = ranges.iter();
        let current = ranges.next().copied();
        Self {
            ranges,
            current,
            offset: 0,
            last: None,
        }
    }

    fn has_remaining(&self) -> bool {
        self.current.is_some_and(|r| self.offset < r.len()) || self.ranges.len() > 0
    }

    /// Next position, stepping into the following range when needed
    fn advance(&mut self) -> Option<i64> {
        loop {
            let range = self.current?;
            if self.offset < range.len() {
                let pos = range.position_at(self.offset);
                self.offset += 1;
                self.last = Some(pos);
                return Some(pos);
            }
            self.current = self.ranges.next().copied();
            self.offset = 0;
        }
    }
}

/// Single-pass iterator over aligned codons
///
/// Yields `Err` once if the mapping cannot be walked to its end (for
/// example fewer than three bases remain for the last codon) and then stops.
#[derive(Debug, Clone)]
pub struct AlignedCodonIterator<'a> {
    aligned: &'a Sequence,
    to: Option<&'a Sequence>,
    gap: u8,
    from_cursor: RangeCursor<'a>,
    to_cursor: RangeCursor<'a>,
    /// Next aligned column to scan
    aligned_column: usize,
    /// Residues seen in columns before `aligned_column`
    aligned_bases: i64,
    failed: bool,
}

impl<'a> AlignedCodonIterator<'a> {
    /// Create an iterator over `aligned`, a gapped rendering of the from
    /// sequence, reading residues from `to`
    pub fn new(map: &'a MapList, to: Option<&'a Sequence>, aligned: &'a Sequence, gap: u8) -> Self {
        Self {
            aligned,
            to,
            gap,
            from_cursor: RangeCursor::new(map.from_ranges()),
            to_cursor: RangeCursor::new(map.to_ranges()),
            aligned_column: 0,
            aligned_bases: 0,
            failed: false,
        }
    }

    /// Check whether any mapped bases remain
    pub fn has_next(&self) -> bool {
        !self.failed && self.from_cursor.has_remaining()
    }

    fn next_codon(&mut self) -> CodonResult<AlignedCodon> {
        let mut codon = [0i64; 3];
        for base in codon.iter_mut() {
            *base = self
                .from_cursor
                .advance()
                .ok_or(CodonError::IncompleteCodon {
                    position: self.from_cursor.last.unwrap_or(0),
                })?;
        }

        let base1 = self.aligned_column_of(codon[0])?;
        let base2 = self.aligned_column_of(codon[1])?;
        let base3 = self.aligned_column_of(codon[2])?;
        let (peptide, peptide_col) = self.next_peptide()?;

        Ok(AlignedCodon {
            base1,
            base2,
            base3,
            peptide,
            peptide_col,
        })
    }

    /// Residue at the next mapped to position, with its column
    fn next_peptide(&mut self) -> CodonResult<(u8, usize)> {
        let to = self.to.ok_or(CodonError::MissingTarget)?;
        let position = self
            .to_cursor
            .advance()
            .ok_or(CodonError::PeptideExhausted {
                position: self.to_cursor.last.unwrap_or(0),
            })?;

        let column = usize::try_from(position - to.start())
            .map_err(|_| CodonError::PositionOutsideSequence { position })?;
        let peptide = to
            .char_at(column)
            .ok_or(CodonError::PositionOutsideSequence { position })?;
        Ok((peptide, column))
    }

    /// Aligned column (0-based) of a sequence position (1-based), counting
    /// residues forward from the last column scanned
    fn aligned_column_of(&mut self, position: i64) -> CodonResult<usize> {
        // offset e.g. position 8 is the 2nd residue when the sequence starts at 7
        let true_pos = position - (self.aligned.start() - 1);
        if true_pos < 1 {
            return Err(CodonError::PositionOutsideSequence { position });
        }
        if true_pos < self.aligned_bases {
            return Err(CodonError::PositionBehindCursor { position });
        }

        while self.aligned_bases < true_pos {
            let Some(c) = self.aligned.char_at(self.aligned_column) else {
                return Err(CodonError::PositionOutsideSequence { position });
            };
            self.aligned_column += 1;
            if c != self.gap && !is_gap(c) {
                self.aligned_bases += 1;
            }
        }
        Ok(self.aligned_column - 1)
    }
}

impl Iterator for AlignedCodonIterator<'_> {
    type Item = CodonResult<AlignedCodon>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }

        let codon = self.next_codon();
        if let Err(e) = &codon {
            debug!("Codon iteration over {} stopped: {}", self.aligned.name(), e);
            self.failed = true;
        }
        Some(codon)
    }
}

impl FusedIterator for AlignedCodonIterator<'_> {}
