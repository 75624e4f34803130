//! Property tests over generated three-language trees.
//!
//! Roots are `en` 1 (main), `de` 2, `fr` 3; the i-th page is 100+i in the
//! main tree, 200+i in `de`, 300+i in `fr`. The `de`/`fr` copies exist per a
//! generated presence mask and always carry explicit links, so the builds
//! never guess and the algebraic properties must hold exactly.

use proptest::prelude::*;

use pivotmap::{Mapping, MemorySink, MemorySource, PageMap};

fn tree(de_present: &[bool], fr_present: &[bool]) -> MemorySource {
    let mut records = MemorySource::new();
    records.add_root(1, "en", true);
    records.add_root(2, "de", false);
    records.add_root(3, "fr", false);

    for i in 0..de_present.len() {
        let main = 100 + i as u64;
        records.add_page(main, 1, None, "regular");
        if de_present[i] {
            records.add_page(200 + i as u64, 2, Some(main), "regular");
        }
        if fr_present[i] {
            records.add_page(300 + i as u64, 3, Some(main), "regular");
        }
    }
    records
}

proptest! {
    #[test]
    fn combined_pairs_exist_exactly_when_both_sides_do(
        (de_present, fr_present) in (1usize..24).prop_flat_map(|n| {
            (prop::collection::vec(any::<bool>(), n), prop::collection::vec(any::<bool>(), n))
        })
    ) {
        let records = tree(&de_present, &fr_present);
        let sink = MemorySink::new();
        let map = PageMap::new("de", "fr", &records, &sink).expect("page map");

        // Asymmetric presence warns about missing sources, but never guesses.
        prop_assert!(sink.of_kind("page_fallback_guess").is_empty());
        prop_assert!(sink.of_kind("page_no_fallback").is_empty());

        // Root pair is axiomatic.
        prop_assert_eq!(map.target_id_for(2).expect("root pair"), 3);

        for i in 0..de_present.len() {
            let de_id = 200 + i as u64;
            let fr_id = 300 + i as u64;
            prop_assert_eq!(map.has_target_for(de_id), de_present[i] && fr_present[i]);
            if de_present[i] && fr_present[i] {
                prop_assert_eq!(map.target_id_for(de_id).expect("pair"), fr_id);
            }
        }
    }

    #[test]
    fn inverse_consistency_over_combined_entries(
        (de_present, fr_present) in (1usize..24).prop_flat_map(|n| {
            (prop::collection::vec(any::<bool>(), n), prop::collection::vec(any::<bool>(), n))
        })
    ) {
        let records = tree(&de_present, &fr_present);
        let sink = MemorySink::new();
        let map = PageMap::new("de", "fr", &records, &sink).expect("page map");

        let sources: Vec<_> = map.source_ids().collect();
        let targets: Vec<_> = map.target_ids().collect();
        prop_assert_eq!(sources.len(), targets.len());

        for source in sources {
            let target = map.target_id_for(source).expect("combined entry");
            prop_assert_eq!(map.source_id_for(target).expect("inverse entry"), source);
        }
    }

    #[test]
    fn main_branch_ids_are_fixpoints(
        fr_present in prop::collection::vec(any::<bool>(), 1..24)
    ) {
        let all = vec![true; fr_present.len()];
        let records = tree(&all, &fr_present);
        let sink = MemorySink::new();
        let map = PageMap::new("en", "fr", &records, &sink).expect("page map");

        for i in 0..fr_present.len() {
            let main = 100 + i as u64;
            prop_assert_eq!(map.main_from_source(main).expect("identity"), main);
        }
    }
}
