//! Core coordinate mapping functionality
//!
//! This module contains the directed range lists, the ratio-scaled
//! mapping algebra built on them, sequence-bound mappings and the aligned
//! codon iterator.

mod codon;
mod config;
mod error;
mod feature;
mod mapping;
mod maplist;
mod range;
pub mod sequence;

pub use codon::{AlignedCodon, AlignedCodonIterator};
pub use config::SingletonPolicy;
pub use error::{
    CodonError, CodonMapError, CodonResult, MapListError, MapListResult, Result,
};
pub use feature::SequenceFeature;
pub use mapping::Mapping;
pub use maplist::{MapList, Shift};
pub use range::{
    add_range, bounds, coalesce, count_pos, count_to_pos, find_overlap, flatten,
    is_forward_strand, ranges_from_flat, slice_ordinals, total_length, Direction, Range,
};
pub use sequence::Sequence;
