use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng};
use sporlshuffle::{
    management::{shuffle, shuffle_with},
    types::{PlaylistSnapshot, TrackEntry},
};

fn snapshot_of(ids: &[&str]) -> PlaylistSnapshot {
    let entries = ids
        .iter()
        .enumerate()
        .map(|(i, id)| TrackEntry::new(*id, i))
        .collect();
    PlaylistSnapshot::from_entries(entries, 1)
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

#[test]
fn test_shuffle_is_a_permutation() {
    for n in [0usize, 1, 2, 3, 10, 99, 100, 101, 250] {
        let ids: Vec<String> = (0..n).map(|i| format!("t{}", i)).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let snapshot = snapshot_of(&refs);

        let order = shuffle(&snapshot);

        assert_eq!(order.len(), n);
        assert_eq!(sorted(order.into_inner()), sorted(ids.clone()));
    }
}

#[test]
fn test_shuffle_empty_and_single_are_unchanged() {
    let empty = snapshot_of(&[]);
    assert!(shuffle(&empty).is_empty());

    let single = snapshot_of(&["only"]);
    assert_eq!(shuffle(&single).track_ids(), ["only".to_string()]);
}

#[test]
fn test_shuffle_does_not_touch_snapshot() {
    let snapshot = snapshot_of(&["a", "b", "c", "d", "e"]);
    let mut rng = StdRng::seed_from_u64(7);

    let _ = shuffle_with(&snapshot, &mut rng);

    assert_eq!(snapshot.track_ids(), vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn test_shuffle_with_seed_is_reproducible() {
    let snapshot = snapshot_of(&["a", "b", "c", "d", "e", "f", "g", "h"]);

    let first = shuffle_with(&snapshot, &mut StdRng::seed_from_u64(42));
    let second = shuffle_with(&snapshot, &mut StdRng::seed_from_u64(42));

    assert_eq!(first, second);
}

#[test]
fn test_shuffle_covers_all_orderings_evenly() {
    let snapshot = snapshot_of(&["a", "b", "c"]);
    let mut rng = StdRng::seed_from_u64(2024);
    let mut counts: HashMap<Vec<String>, usize> = HashMap::new();

    for _ in 0..6000 {
        let order = shuffle_with(&snapshot, &mut rng).into_inner();
        *counts.entry(order).or_default() += 1;
    }

    // 3! orderings, about 1000 each
    assert_eq!(counts.len(), 6);
    for (order, count) in counts {
        assert!(
            (800..=1200).contains(&count),
            "{:?} drawn {} times",
            order,
            count
        );
    }
}
