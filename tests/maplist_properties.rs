//! Property-based tests for MapList
//!
//! **Properties: shift round trip, ratio grouping, inversion, composition**
//!
//! Also covers the worked genomic scenarios: plain offsets, a spliced
//! minus-strand transcript and exon records joined across a splice site.

use fast_codonmap::core::{coalesce, total_length, Direction, MapList, Range};
use proptest::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Gap-separated segments of the given lengths placed after `base`,
/// each randomly reversed
fn place_segments(base: i64, segments: &[(i64, i64, bool)]) -> Vec<Range> {
    let mut cursor = base;
    segments
        .iter()
        .map(|&(len, gap, reverse)| {
            let start = cursor + gap;
            let end = start + len - 1;
            cursor = end;
            if reverse {
                Range::new(end, start)
            } else {
                Range::new(start, end)
            }
        })
        .collect()
}

/// Split `total` positions into segment lengths following `cuts`
fn split_lengths(total: i64, cuts: &[i64]) -> Vec<i64> {
    let mut points: Vec<i64> = cuts.iter().map(|c| c.rem_euclid(total)).filter(|&c| c > 0).collect();
    points.sort_unstable();
    points.dedup();

    let mut lengths = Vec::new();
    let mut previous = 0;
    for point in points.into_iter().chain([total]) {
        lengths.push(point - previous);
        previous = point;
    }
    lengths
}

/// A 1:1 mapping between disjoint range lists of equal length
fn arb_one_to_one() -> impl Strategy<Value = MapList> {
    (
        10i64..200,
        prop::collection::vec(any::<i64>(), 0..4),
        prop::collection::vec(any::<i64>(), 0..4),
        prop::collection::vec((2i64..30, any::<bool>()), 5),
        prop::collection::vec((2i64..30, any::<bool>()), 5),
    )
        .prop_map(|(total, from_cuts, to_cuts, from_layout, to_layout)| {
            let place = |lengths: Vec<i64>, layout: &[(i64, bool)], base: i64| {
                let segments: Vec<_> = lengths
                    .into_iter()
                    .zip(layout.iter().cycle())
                    .map(|(len, &(gap, reverse))| (len, gap, reverse))
                    .collect();
                place_segments(base, &segments)
            };
            let from = place(split_lengths(total, &from_cuts), &from_layout[..], 0);
            let to = place(split_lengths(total, &to_cuts), &to_layout[..], 5000);
            MapList::new(from, to, 1, 1).unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: shift round trip**
    ///
    /// At 1:1 every from position shifts to a to position that shifts back.
    #[test]
    fn prop_shift_round_trip(ml in arb_one_to_one()) {
        init_logging();
        for range in ml.from_ranges() {
            for offset in 0..range.len() {
                let pos = range.position_at(offset);
                let mapped = ml.shift_from(pos).unwrap();
                prop_assert_eq!(mapped.remainder, 0);
                prop_assert_eq!(ml.shift_to(mapped.position).map(|s| s.position), Some(pos));
            }
        }
    }

    /// **Property 2: three consecutive bases map to one residue**
    #[test]
    fn prop_ratio_grouping(
        residues in 1i64..40,
        cuts in prop::collection::vec(any::<i64>(), 0..5),
        layout in prop::collection::vec((2i64..20, any::<bool>()), 6),
    ) {
        let lengths = split_lengths(residues * 3, &cuts);
        let segments: Vec<_> = lengths
            .into_iter()
            .zip(layout.iter().cycle())
            .map(|(len, &(gap, reverse))| (len, gap, reverse))
            .collect();
        let exons = place_segments(100, &segments);
        let ml = MapList::new(exons.clone(), vec![Range::new(1, residues)], 3, 1).unwrap();

        let bases: Vec<i64> = exons
            .iter()
            .flat_map(|r| (0..r.len()).map(move |i| r.position_at(i)))
            .collect();
        for (i, codon) in bases.chunks(3).enumerate() {
            let residue = i as i64 + 1;
            for (remainder, &base) in codon.iter().enumerate() {
                let shift = ml.shift_from(base).unwrap();
                prop_assert_eq!(shift.position, residue);
                prop_assert_eq!(shift.remainder, remainder as i64);
            }
            // and each residue locates back to exactly its codon
            let located = ml.locate_in_from(residue, residue).unwrap();
            prop_assert_eq!(total_length(&located), 3);
            prop_assert_eq!(located.first().map(Range::start), Some(codon[0]));
            prop_assert_eq!(located.last().map(Range::end), Some(codon[2]));
        }
    }

    /// **Property 3: inversion is an involution**
    #[test]
    fn prop_inverse_involution(ml in arb_one_to_one(), from_ratio in 1u32..4, to_ratio in 1u32..4) {
        let ml = MapList::new(ml.from_ranges().to_vec(), ml.to_ranges().to_vec(), from_ratio, to_ratio).unwrap();
        let inverse = ml.inverse();
        prop_assert_eq!(inverse.from_ranges(), ml.to_ranges());
        prop_assert_eq!((inverse.from_ratio(), inverse.to_ratio()), (to_ratio, from_ratio));
        prop_assert_eq!(inverse.inverse(), ml);
    }

    /// **Property 4: composition matches stepwise projection**
    ///
    /// Projecting through `a.traverse(b)` gives the same ranges as
    /// projecting through `a` and then through `b`.
    #[test]
    fn prop_traverse_matches_stepwise(
        a_len in 1i64..60,
        a_offset in 0i64..40,
        a_start in 1i64..1000,
        b_cuts in prop::collection::vec(any::<i64>(), 0..5),
        b_layout in prop::collection::vec((2i64..20, any::<bool>()), 6),
        x in 0i64..60,
        y in 0i64..60,
    ) {
        let b_len = a_offset + a_len + 10;
        let segments: Vec<_> = split_lengths(b_len, &b_cuts)
            .into_iter()
            .zip(b_layout.iter().cycle())
            .map(|(len, &(gap, reverse))| (len, gap, reverse))
            .collect();
        let b = MapList::new(vec![Range::new(1, b_len)], place_segments(10_000, &segments), 1, 1).unwrap();
        let a = MapList::new(
            vec![Range::new(a_start, a_start + a_len - 1)],
            vec![Range::new(a_offset + 1, a_offset + a_len)],
            1,
            1,
        )
        .unwrap();

        let composite = a.traverse(&b).unwrap();
        prop_assert_eq!(composite.from_ranges(), a.from_ranges());
        prop_assert_eq!(composite.to_length(), a_len);

        let (x, y) = (a_start + x.min(a_len - 1), a_start + y.min(a_len - 1));
        let direct = composite.locate_in_to(x, y).unwrap();
        let mut stepwise = Vec::new();
        for range in a.locate_in_to(x, y).unwrap() {
            stepwise.extend(b.locate_in_to(range.start(), range.end()).unwrap());
        }
        prop_assert_eq!(direct, coalesce(&stepwise).into_owned());
    }
}

#[test]
fn test_offset_mapping() {
    init_logging();
    let ml = MapList::from_flat(&[1, 100], &[501, 600], 1, 1).unwrap();
    assert_eq!(ml.locate_in_to(10, 40), Some(vec![Range::new(510, 540)]));
    assert_eq!(ml.locate_in_from(510, 540), Some(vec![Range::new(10, 40)]));
    assert_eq!(ml.shift_to(510).map(|s| s.position), Some(10));
}

#[test]
fn test_spliced_reverse_strand_composition() {
    init_logging();
    let transcript = MapList::from_flat(&[1, 100], &[2000, 1951, 1000, 951], 1, 1).unwrap();
    let cds = MapList::from_flat(&[1, 40], &[41, 80], 1, 1).unwrap();

    let loci = cds.traverse(&transcript).unwrap();
    assert_eq!((loci.from_ratio(), loci.to_ratio()), (1, 1));
    assert_eq!(loci.from_ranges(), &[Range::new(1, 40)]);
    assert_eq!(
        loci.to_ranges(),
        &[Range::new(1960, 1951), Range::new(1000, 971)]
    );
    assert!(!loci.is_to_forward_strand());

    // CDS positions 10-40 start on the last base of the first exon
    assert_eq!(
        loci.locate_in_to(10, 40),
        Some(vec![
            Range::point(1951, Direction::Reverse),
            Range::new(1000, 971)
        ])
    );
    assert_eq!(loci.locate_in_from(1000, 971), Some(vec![Range::new(11, 40)]));
}

#[test]
fn test_exon_records_join_across_splice() {
    init_logging();
    let mut ml = MapList::from_flat(&[12923, 13060], &[1, 138], 1, 1).unwrap();
    let next_exon = MapList::from_flat(&[13411, 13550], &[139, 278], 1, 1).unwrap();
    ml.add_map_list(&next_exon);

    assert_eq!(ml.to_ranges(), &[Range::new(1, 278)]);
    assert_eq!(
        ml.from_ranges(),
        &[Range::new(12923, 13060), Range::new(13411, 13550)]
    );
    assert_eq!((ml.from_lowest(), ml.from_highest()), (12923, 13550));
    assert_eq!(ml.shift_from(13411).map(|s| s.position), Some(139));
    assert_eq!(
        ml.locate_in_from(100, 200),
        Some(vec![Range::new(13022, 13060), Range::new(13411, 13472)])
    );
}

#[test]
fn test_codon_composition_with_protein() {
    init_logging();
    // genomic exons -> transcript, transcript CDS -> protein
    let exons = MapList::from_flat(&[101, 109, 201, 209], &[1, 18], 1, 1).unwrap();
    let cds = MapList::from_flat(&[1, 18], &[1, 6], 3, 1).unwrap();

    let genome_to_protein = exons.traverse(&cds);
    // 18 bases carried through 3:1 yield 6 residues, ratio 3:1
    let genome_to_protein = genome_to_protein.unwrap();
    assert_eq!((genome_to_protein.from_ratio(), genome_to_protein.to_ratio()), (3, 1));
    assert_eq!(genome_to_protein.to_ranges(), &[Range::new(1, 6)]);

    // residue 4 is split across the intron
    assert_eq!(
        genome_to_protein.locate_in_from(3, 4),
        Some(vec![Range::new(107, 109), Range::new(201, 203)])
    );
}
