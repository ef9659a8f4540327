//! Sequence-bound mappings
//!
//! A [`Mapping`] pairs a [`MapList`] with the sequence it maps *to*. The
//! *from* side is the sequence that owns the mapping; when that partner is
//! not yet resolved its identifier can be kept in `mapped_from_id`.
//!
//! The target sequence is shared, not owned: several mappings commonly
//! point at the same protein or transcript.

use crate::core::codon::{AlignedCodon, AlignedCodonIterator};
use crate::core::error::{CodonResult, Result};
use crate::core::feature::SequenceFeature;
use crate::core::maplist::MapList;
use crate::core::range::{coalesce_vec, Range};
use crate::core::sequence::Sequence;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// A [`MapList`] bound to its target sequence
#[derive(Debug, Clone)]
pub struct Mapping {
    map: MapList,
    to: Option<Arc<Sequence>>,
    mapped_from_id: Option<String>,
}

impl Mapping {
    /// Create a mapping with no target sequence yet
    pub fn new(map: MapList) -> Self {
        Self {
            map,
            to: None,
            mapped_from_id: None,
        }
    }

    /// Create a mapping onto `to`
    pub fn with_to(map: MapList, to: Arc<Sequence>) -> Self {
        Self {
            map,
            to: Some(to),
            mapped_from_id: None,
        }
    }

    pub fn map(&self) -> &MapList {
        &self.map
    }

    pub fn set_map(&mut self, map: MapList) {
        self.map = map;
    }

    pub fn to(&self) -> Option<&Arc<Sequence>> {
        self.to.as_ref()
    }

    /// Point the mapping at a resolved target sequence
    ///
    /// Used to realise a placeholder once the real sequence is available.
    pub fn set_to(&mut self, to: Arc<Sequence>) {
        self.to = Some(to);
    }

    pub fn mapped_from_id(&self) -> Option<&str> {
        self.mapped_from_id.as_deref()
    }

    pub fn set_mapped_from_id(&mut self, id: impl Into<String>) {
        self.mapped_from_id = Some(id.into());
    }

    /// Number of from positions in one mapping group
    pub fn width(&self) -> u32 {
        self.map.from_ratio()
    }

    /// Number of to positions in one mapping group
    pub fn mapped_width(&self) -> u32 {
        self.map.to_ratio()
    }

    /// Map a single position across the mapping
    ///
    /// With `is_mapped` the position is read in the associated sequence and
    /// its mapped (to) position is returned; otherwise it is read in the
    /// mapped frame and translated back into the associated sequence.
    pub fn get_position(&self, pos: i64, is_mapped: bool) -> Option<i64> {
        let shift = if is_mapped {
            self.map.shift_from(pos)
        } else {
            self.map.shift_to(pos)
        };
        shift.map(|s| s.position)
    }

    /// Relocate a feature from the mapped frame onto the associated sequence
    ///
    /// A feature landing on several disjoint ranges is split into parts,
    /// each with `"\nPart N"` appended to its description.
    pub fn locate_feature(&self, feature: &SequenceFeature) -> Option<Vec<SequenceFeature>> {
        let ranges = self.map.locate_in_from(feature.begin, feature.end)?;
        let split = ranges.len() > 1;

        let located = ranges
            .iter()
            .enumerate()
            .map(|(i, range)| {
                let mut part = feature.relocated(range.start(), range.end());
                if split {
                    part.description = format!("{}\nPart {}", feature.description, i + 1);
                }
                part
            })
            .collect();
        Some(located)
    }

    /// Associated-sequence ranges for mapped-frame `[from, to]`
    ///
    /// The interval is first clipped to the mapped bounds, keeping its
    /// direction. `None` when nothing is left after clipping.
    pub fn locate_range(&self, from: i64, to: i64) -> Option<Vec<Range>> {
        let (from, to) = clip(from, to, self.map.to_lowest(), self.map.to_highest())?;
        self.map.locate_in_from(from, to)
    }

    /// Mapped-frame ranges for associated-sequence `[from, to]`
    pub fn locate_mapped_range(&self, from: i64, to: i64) -> Option<Vec<Range>> {
        let (from, to) = clip(from, to, self.map.from_lowest(), self.map.from_highest())?;
        self.map.locate_in_to(from, to)
    }

    /// Restrict the mapping to the visible parts of the associated sequence
    ///
    /// `contigs` are inclusive 1-based regions of the associated sequence
    /// that remain visible. Each contig is clipped to the mapped ranges it
    /// overlaps, so a contig ending inside an intron keeps its exonic part.
    /// The clipped pieces are projected into the mapped frame and back,
    /// which keeps partly visible groups whole. The target sequence and
    /// from identifier carry over.
    pub fn intersect_vis_contigs(&self, contigs: &[Range]) -> Mapping {
        let mut to_ranges = Vec::new();

        for contig in contigs {
            let before = to_ranges.len();
            for range in self.map.from_ranges() {
                let Some((from, to)) = visible_part(range, contig) else {
                    continue;
                };
                if let Some(mapped) = self.locate_mapped_range(from, to) {
                    to_ranges.extend(mapped);
                }
            }
            if to_ranges.len() == before {
                debug!("Visible region {} is not mapped", contig);
            }
        }

        // groups straddling an intron are reached from both sides
        let to_ranges = coalesce_vec(to_ranges);
        let mut from_ranges = Vec::new();
        for range in &to_ranges {
            if let Some(located) = self.locate_range(range.start(), range.end()) {
                from_ranges.extend(located);
            }
        }

        Mapping {
            map: MapList::from_parts(
                from_ranges,
                to_ranges,
                self.map.from_ratio(),
                self.map.to_ratio(),
            ),
            to: self.to.clone(),
            mapped_from_id: self.mapped_from_id.clone(),
        }
    }

    /// Aligned codons of a coding region given as flat exon bounds
    ///
    /// `exons` are start/end pairs on the sequence rendered by `aligned`,
    /// read three bases to each residue of `protein`. Malformed exon bounds
    /// and codons that cannot be completed are both reported as errors.
    pub fn exon_codons(
        exons: &[i64],
        protein: Arc<Sequence>,
        aligned: &Sequence,
        gap: u8,
    ) -> Result<Vec<AlignedCodon>> {
        let residues = [protein.start(), protein.end()];
        let mapping = Mapping::with_to(MapList::try_from_flat(exons, &residues, 3, 1)?, protein);
        let codons = mapping.codon_iter(aligned, gap).collect::<CodonResult<Vec<_>>>()?;
        Ok(codons)
    }

    /// Iterate over the codons of `aligned`, a gapped rendering of the
    /// associated sequence
    ///
    /// `gap` is treated as a gap in addition to the standard gap characters.
    pub fn codon_iter<'a>(&'a self, aligned: &'a Sequence, gap: u8) -> AlignedCodonIterator<'a> {
        AlignedCodonIterator::new(&self.map, self.to.as_deref(), aligned, gap)
    }
}

/// The part of `range` inside `contig`, in the direction of `range`
fn visible_part(range: &Range, contig: &Range) -> Option<(i64, i64)> {
    let lo = range.lowest().max(contig.lowest());
    let hi = range.highest().min(contig.highest());
    if lo > hi {
        return None;
    }
    Some(if range.direction().is_forward() { (lo, hi) } else { (hi, lo) })
}

/// Clip `[from, to]` to `[lowest, highest]`, keeping its direction
fn clip(from: i64, to: i64, lowest: i64, highest: i64) -> Option<(i64, i64)> {
    if from <= to {
        let (from, to) = (from.max(lowest), to.min(highest));
        (from <= to).then_some((from, to))
    } else {
        let (from, to) = (from.min(highest), to.max(lowest));
        (from >= to).then_some((from, to))
    }
}

/// Equal when the range lists match and both point at the same target
impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        let same_target = match (&self.to, &other.to) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_target && self.map == other.map
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.map)?;
        if let Some(to) = &self.to {
            write!(f, " {}", to.name())?;
        }
        Ok(())
    }
}
