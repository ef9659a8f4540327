//! FastCodonMap - Ratio-scaled coordinate mapping between sequences
//!
//! Relates positions between two linear coordinate systems (genome and
//! transcript, transcript and protein, CDS and protein) through directed,
//! possibly spliced, interval lists.
//!
//! # Features
//!
//! - Position and interval projection at any ratio (1:1, 3:1, 1:3)
//! - Reverse-strand and spliced mappings without special casing
//! - Composition and inversion of mappings
//! - Codon iteration over gapped alignments
//!
//! # Example
//!
//! ```
//! use fast_codonmap::{MapList, Range};
//!
//! // CDS to transcript, then transcript exons to genome (minus strand)
//! let cds = MapList::from_flat(&[1, 40], &[41, 80], 1, 1)?;
//! let transcript = MapList::from_flat(&[1, 100], &[2000, 1951, 1000, 951], 1, 1)?;
//!
//! let loci = cds.traverse(&transcript).expect("CDS lies within the transcript");
//! assert_eq!(
//!     loci.locate_in_to(1, 40),
//!     Some(vec![Range::new(1960, 1951), Range::new(1000, 971)])
//! );
//! # Ok::<(), fast_codonmap::MapListError>(())
//! ```

pub mod core;

// Re-export commonly used types
pub use core::{
    AlignedCodon, AlignedCodonIterator, CodonError, CodonMapError, Direction, MapList,
    MapListError, Mapping, Range, Sequence, SequenceFeature, Shift, SingletonPolicy,
};
