//! Per-level deduplication and the unity split

use std::collections::HashSet;

use mediant::domain::{
    generate_levels, simplex_basis, split_at_unity, stern_brocot_basis, unique_per_level,
    TreeLevel, Vector,
};
use rstest::rstest;

#[rstest]
#[case(1)]
#[case(4)]
#[case(9)]
fn given_classic_levels_when_deduplicating_then_level_k_introduces_two_to_k_minus_one(
    #[case] g: usize,
) {
    let unique = unique_per_level(&generate_levels(&stern_brocot_basis(), g, 2).unwrap());
    assert_eq!(unique.len(), g + 1);
    assert_eq!(unique[0].len(), 2);
    for k in 1..=g {
        assert_eq!(unique[k].len(), 1 << (k - 1), "level {}", k);
    }
}

#[rstest]
#[case(stern_brocot_basis(), 2, 8)]
#[case(simplex_basis(3).unwrap(), 3, 5)]
fn given_levels_when_deduplicating_then_concatenation_is_first_seen_distinct_set(
    #[case] basis: Vec<Vector>,
    #[case] dimensions: usize,
    #[case] g: usize,
) {
    let levels = generate_levels(&basis, g, dimensions).unwrap();
    let unique = unique_per_level(&levels);

    let concatenated: Vec<&Vector> = unique.iter().flat_map(TreeLevel::iter).collect();

    let mut expected: Vec<&Vector> = Vec::new();
    let mut seen = HashSet::new();
    for vector in levels.iter().flat_map(TreeLevel::iter) {
        if seen.insert(vector) {
            expected.push(vector);
        }
    }
    assert_eq!(concatenated, expected);

    let distinct: HashSet<&Vector> = concatenated.iter().copied().collect();
    assert_eq!(distinct.len(), concatenated.len(), "no duplicates");
}

#[rstest]
fn given_two_calls_when_deduplicating_then_no_state_is_shared() {
    let levels = generate_levels(&stern_brocot_basis(), 3, 2).unwrap();
    let first = unique_per_level(&levels);
    let second = unique_per_level(&levels);
    assert_eq!(first, second);
    assert_eq!(second[0].len(), 2);
}

#[rstest]
fn given_classic_levels_when_splitting_then_sides_mirror_each_other() {
    let levels = generate_levels(&stern_brocot_basis(), 6, 2).unwrap();
    let split = split_at_unity(&levels).unwrap();
    for (below, above) in split.below.iter().zip(&split.above) {
        assert_eq!(below.len(), above.len());
        // a/b below 1 pairs with b/a above 1
        let mirrored: Vec<Vector> = below
            .iter()
            .rev()
            .map(|v| Vector::new(vec![v.components()[1], v.components()[0]]))
            .collect();
        assert_eq!(mirrored, above.vectors);
    }
}
