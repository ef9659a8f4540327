//! Error types for FastCodonMap
//!
//! Positions or intervals that a mapping does not cover are reported as
//! `None` by the query methods. The enums here are reserved for input that
//! cannot be used at all, and for codon traversals that cannot complete.

use thiserror::Error;

/// Main error type for FastCodonMap operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodonMapError {
    /// MapList construction errors
    #[error("MapList error: {0}")]
    MapList(#[from] MapListError),

    /// Codon iteration errors
    #[error("Codon error: {0}")]
    Codon(#[from] CodonError),
}

/// Errors raised while building a [`crate::core::MapList`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapListError {
    /// Ratios must both be positive
    #[error("Invalid ratio {from_ratio}:{to_ratio}, both sides must be positive")]
    ZeroRatio { from_ratio: u32, to_ratio: u32 },

    /// Flat range arrays must hold start/end pairs
    #[error("Range array of length {len} does not hold start/end pairs")]
    OddLengthRanges { len: usize },
}

/// Errors raised by [`crate::core::AlignedCodonIterator`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodonError {
    /// Fewer than three mapped bases remain
    #[error("Incomplete codon: mapped bases run out after position {position}")]
    IncompleteCodon { position: i64 },

    /// No mapped residue is left for the codon just read
    #[error("Ran out of peptide at position {position}")]
    PeptideExhausted { position: i64 },

    /// The mapping has no resolved 'to' sequence to read residues from
    #[error("Mapping has no target sequence")]
    MissingTarget,

    /// A mapped position lies outside the residues of a sequence
    #[error("Position {position} lies outside the sequence")]
    PositionOutsideSequence { position: i64 },

    /// The aligned column tally only moves forward
    #[error("Position {position} lies behind the aligned column cursor")]
    PositionBehindCursor { position: i64 },
}

/// Result type alias for FastCodonMap operations
pub type Result<T> = std::result::Result<T, CodonMapError>;

/// Result type alias for MapList construction
pub type MapListResult<T> = std::result::Result<T, MapListError>;

/// Result type alias for codon iteration
pub type CodonResult<T> = std::result::Result<T, CodonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodonError::IncompleteCodon { position: 7 };
        assert_eq!(
            err.to_string(),
            "Incomplete codon: mapped bases run out after position 7"
        );

        let err = MapListError::ZeroRatio { from_ratio: 3, to_ratio: 0 };
        assert_eq!(
            err.to_string(),
            "Invalid ratio 3:0, both sides must be positive"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: CodonMapError = CodonError::MissingTarget.into();
        assert_eq!(err, CodonMapError::Codon(CodonError::MissingTarget));
        assert_eq!(err.to_string(), "Codon error: Mapping has no target sequence");

        let err: CodonMapError = MapListError::OddLengthRanges { len: 3 }.into();
        assert!(matches!(err, CodonMapError::MapList(_)));
    }
}
