//! Sequence utilities
//!
//! Provides the minimal sequence model the mapping layer needs: a named
//! run of residues with a 1-based start position, and gap classification
//! for aligned (gap-padded) renderings.

use std::fmt;

/// Gap characters recognised in every aligned sequence
pub const STANDARD_GAPS: [u8; 3] = [b'-', b'.', b' '];

/// Check whether a byte is a standard gap character
///
/// # Examples
/// ```
/// use fast_codonmap::core::sequence::is_gap;
///
/// assert!(is_gap(b'-'));
/// assert!(is_gap(b'.'));
/// assert!(!is_gap(b'A'));
/// ```
#[inline]
pub fn is_gap(c: u8) -> bool {
    STANDARD_GAPS.contains(&c)
}

/// A named sequence whose first residue sits at position `start`
///
/// Residues may include gap characters when the sequence is an aligned
/// rendering. Positions count residues only, so gaps never take a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    name: String,
    start: i64,
    residues: Vec<u8>,
}

impl Sequence {
    /// Create a sequence starting at position 1
    pub fn new(name: impl Into<String>, residues: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            start: 1,
            residues: residues.into(),
        }
    }

    /// Set the position of the first residue
    pub fn with_start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    /// Number of columns, gaps included
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Character at a 0-based column
    #[inline]
    pub fn char_at(&self, column: usize) -> Option<u8> {
        self.residues.get(column).copied()
    }

    /// Number of non-gap residues
    pub fn ungapped_len(&self) -> usize {
        self.residues.iter().filter(|&&c| !is_gap(c)).count()
    }

    /// Position of the last residue
    pub fn end(&self) -> i64 {
        // residue counts never approach i64::MAX
        self.start + self.ungapped_len() as i64 - 1
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}-{}", self.name, self.start, self.end())
    }
}
