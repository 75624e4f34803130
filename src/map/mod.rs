//! Bidirectional id mapping between two languages via the main language.
//!
//! All three mappers ([`PageMap`], [`ArticleMap`], [`ContentMap`]) share the
//! same shape: a source→main map, a target→main map, their inverses, and a
//! combined source↔target map derived by composing the two through the main
//! language. [`MapSet`] holds that state and the analysis that runs over it;
//! the mappers compose it by value and only differ in how they populate it.

mod article;
mod content;
mod page;

pub use article::ArticleMap;
pub use content::ContentMap;
pub use page::PageMap;

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::anomaly::{Anomaly, AnomalySink, MapSide};
use crate::error::{Error, Result};
use crate::record::RecordId;

// ============================================================================
// Mapping trait
// ============================================================================

/// Uniform read access to a built mapper.
///
/// Lookups return [`Error::NotMapped`] for ids that were excluded during the
/// build or never existed in that branch; callers are expected to handle
/// that as a normal outcome. Mappers are immutable once built, so sharing a
/// `Mapping` across threads is safe by construction.
pub trait Mapping: std::fmt::Debug + Send + Sync {
    /// Language the mapping translates from.
    fn source_language(&self) -> &str;

    /// Language the mapping translates to.
    fn target_language(&self) -> &str;

    /// The pivot language both sides reconcile against.
    fn main_language(&self) -> &str;

    /// Source ids that have a resolved target, in map order.
    fn source_ids(&self) -> Box<dyn Iterator<Item = RecordId> + '_>;

    /// Target ids that have a resolved source, in map order.
    fn target_ids(&self) -> Box<dyn Iterator<Item = RecordId> + '_>;

    /// Whether the source id resolves to a target id.
    fn has_target_for(&self, source: RecordId) -> bool;

    /// The target id for a source id.
    fn target_id_for(&self, source: RecordId) -> Result<RecordId>;

    /// The source id for a target id.
    fn source_id_for(&self, target: RecordId) -> Result<RecordId>;

    /// The main-language id for a source id.
    fn main_from_source(&self, source: RecordId) -> Result<RecordId>;

    /// The main-language id for a target id.
    fn main_from_target(&self, target: RecordId) -> Result<RecordId>;
}

/// Access to the composed [`MapSet`]; gives every mapper the [`Mapping`]
/// implementation for free.
pub(crate) trait AsMapSet {
    fn map_set(&self) -> &MapSet;
}

impl<T: AsMapSet + std::fmt::Debug + Send + Sync> Mapping for T {
    fn source_language(&self) -> &str {
        &self.map_set().source_language
    }

    fn target_language(&self) -> &str {
        &self.map_set().target_language
    }

    fn main_language(&self) -> &str {
        &self.map_set().main_language
    }

    fn source_ids(&self) -> Box<dyn Iterator<Item = RecordId> + '_> {
        Box::new(self.map_set().target_to_source.values().copied())
    }

    fn target_ids(&self) -> Box<dyn Iterator<Item = RecordId> + '_> {
        Box::new(self.map_set().source_to_target.values().copied())
    }

    fn has_target_for(&self, source: RecordId) -> bool {
        self.map_set().source_to_target.contains_key(&source)
    }

    fn target_id_for(&self, source: RecordId) -> Result<RecordId> {
        self.map_set()
            .source_to_target
            .get(&source)
            .copied()
            .ok_or(Error::NotMapped(source))
    }

    fn source_id_for(&self, target: RecordId) -> Result<RecordId> {
        self.map_set()
            .target_to_source
            .get(&target)
            .copied()
            .ok_or(Error::NotMapped(target))
    }

    fn main_from_source(&self, source: RecordId) -> Result<RecordId> {
        self.map_set()
            .source_to_main
            .get(&source)
            .copied()
            .ok_or(Error::NotMapped(source))
    }

    fn main_from_target(&self, target: RecordId) -> Result<RecordId> {
        self.map_set()
            .target_to_main
            .get(&target)
            .copied()
            .ok_or(Error::NotMapped(target))
    }
}

// ============================================================================
// MapSet
// ============================================================================

/// The shared mapping state: four directional maps plus the combined map.
///
/// Insertion order is iteration order (the maps are [`IndexMap`]s), which
/// makes the build deterministic for a given record source.
#[derive(Debug, Clone)]
pub struct MapSet {
    source_language: String,
    target_language: String,
    main_language: String,
    source_to_main: IndexMap<RecordId, RecordId>,
    main_to_source: IndexMap<RecordId, RecordId>,
    target_to_main: IndexMap<RecordId, RecordId>,
    main_to_target: IndexMap<RecordId, RecordId>,
    source_to_target: IndexMap<RecordId, RecordId>,
    target_to_source: IndexMap<RecordId, RecordId>,
}

impl AsMapSet for MapSet {
    fn map_set(&self) -> &MapSet {
        self
    }
}

impl MapSet {
    pub(crate) fn new(
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        main_language: impl Into<String>,
    ) -> Self {
        MapSet {
            source_language: source_language.into(),
            target_language: target_language.into(),
            main_language: main_language.into(),
            source_to_main: IndexMap::new(),
            main_to_source: IndexMap::new(),
            target_to_main: IndexMap::new(),
            main_to_target: IndexMap::new(),
            source_to_target: IndexMap::new(),
            target_to_source: IndexMap::new(),
        }
    }

    /// Record a source→main pair together with its inverse.
    pub(crate) fn insert_source(&mut self, source: RecordId, main: RecordId) {
        self.source_to_main.insert(source, main);
        self.main_to_source.insert(main, source);
    }

    /// Record a target→main pair together with its inverse.
    pub(crate) fn insert_target(&mut self, target: RecordId, main: RecordId) {
        self.target_to_main.insert(target, main);
        self.main_to_target.insert(main, target);
    }

    /// Record a source→main pair without touching the inverse.
    /// Pair with [`rebuild_source_inverse`](Self::rebuild_source_inverse).
    pub(crate) fn insert_source_forward(&mut self, source: RecordId, main: RecordId) {
        self.source_to_main.insert(source, main);
    }

    /// Record a target→main pair without touching the inverse.
    pub(crate) fn insert_target_forward(&mut self, target: RecordId, main: RecordId) {
        self.target_to_main.insert(target, main);
    }

    /// Rebuild the main→source inverse by flipping the forward map.
    /// On duplicate main ids the later entry wins.
    pub(crate) fn rebuild_source_inverse(&mut self) {
        self.main_to_source = self
            .source_to_main
            .iter()
            .map(|(&source, &main)| (main, source))
            .collect();
    }

    /// Rebuild the main→target inverse by flipping the forward map.
    pub(crate) fn rebuild_target_inverse(&mut self) {
        self.main_to_target = self
            .target_to_main
            .iter()
            .map(|(&target, &main)| (main, target))
            .collect();
    }

    /// Resolve a mapped source id to its main id.
    pub(crate) fn lookup_source_main(&self, source: RecordId) -> Option<RecordId> {
        self.source_to_main.get(&source).copied()
    }

    /// Resolve a mapped target id to its main id.
    pub(crate) fn lookup_target_main(&self, target: RecordId) -> Option<RecordId> {
        self.target_to_main.get(&target).copied()
    }

    /// Derive the combined source↔target map.
    ///
    /// Runs [`analyze`](Self::analyze) first, then composes target→main with
    /// main→source. Target ids whose main id has no source counterpart are
    /// dropped silently here; the analysis pass has already warned about
    /// them.
    pub(crate) fn combine(&mut self, sink: &dyn AnomalySink) {
        self.analyze(sink);

        for (&target, &main) in &self.target_to_main {
            let Some(&source) = self.main_to_source.get(&main) else {
                continue;
            };
            self.source_to_target.insert(source, target);
            self.target_to_source.insert(target, source);
        }
    }

    /// Scan both directional maps for common data mistakes.
    pub(crate) fn analyze(&self, sink: &dyn AnomalySink) {
        analyze_duplicates(
            MapSide::Source,
            &self.source_language,
            &self.main_language,
            &self.source_to_main,
            &self.main_to_source,
            sink,
        );
        analyze_duplicates(
            MapSide::Target,
            &self.target_language,
            &self.main_language,
            &self.target_to_main,
            &self.main_to_target,
            sink,
        );

        for (&target, &main) in &self.target_to_main {
            if !self.main_to_source.contains_key(&main) {
                sink.record(Anomaly::NoSourceForTarget {
                    source_language: self.source_language.clone(),
                    main_language: self.main_language.clone(),
                    target_language: self.target_language.clone(),
                    target,
                    main,
                });
            }
        }
    }
}

/// Detect main ids with more than one id mapped to them.
///
/// When the inverse is smaller than the forward map, at least one main id was
/// overwritten. One warning is emitted per ambiguous main id, listing every
/// colliding id in map order.
fn analyze_duplicates(
    side: MapSide,
    language: &str,
    main_language: &str,
    map: &IndexMap<RecordId, RecordId>,
    inverse: &IndexMap<RecordId, RecordId>,
    sink: &dyn AnomalySink,
) {
    if inverse.len() == map.len() {
        return;
    }

    let winners: HashSet<RecordId> = inverse.values().copied().collect();
    let mut reported: HashSet<RecordId> = HashSet::new();

    for (&id, &main) in map {
        if winners.contains(&id) || !reported.insert(main) {
            continue;
        }
        let ids: Vec<RecordId> = map
            .iter()
            .filter(|&(_, &m)| m == main)
            .map(|(&i, _)| i)
            .collect();
        sink.record(Anomaly::MultipleMapping {
            side,
            language: language.to_owned(),
            main_language: main_language.to_owned(),
            main,
            ids,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::MemorySink;

    /// Seed a map set the way the mappers do and combine it.
    fn seeded(source: &[(RecordId, RecordId)], target: &[(RecordId, RecordId)]) -> (MapSet, MemorySink) {
        let mut set = MapSet::new("fr", "de", "en");
        for &(id, main) in source {
            set.insert_source(id, main);
        }
        for &(id, main) in target {
            set.insert_target(id, main);
        }
        let sink = MemorySink::new();
        set.combine(&sink);
        (set, sink)
    }

    #[test]
    fn getters_over_a_combined_set() {
        let (set, sink) = seeded(&[(100, 1), (200, 2)], &[(1000, 1), (2000, 2)]);

        assert_eq!(set.source_language(), "fr");
        assert_eq!(set.target_language(), "de");
        assert_eq!(set.main_language(), "en");
        assert_eq!(set.source_ids().collect::<Vec<_>>(), vec![100, 200]);
        assert_eq!(set.target_ids().collect::<Vec<_>>(), vec![1000, 2000]);
        assert!(set.has_target_for(100));
        assert!(!set.has_target_for(101));
        assert_eq!(set.target_id_for(100).expect("mapped"), 1000);
        assert_eq!(set.source_id_for(1000).expect("mapped"), 100);
        assert_eq!(set.main_from_source(100).expect("mapped"), 1);
        assert_eq!(set.main_from_target(1000).expect("mapped"), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn lookups_fail_with_not_mapped_when_absent() {
        let (set, _sink) = seeded(&[], &[]);

        assert!(matches!(set.target_id_for(1), Err(Error::NotMapped(1))));
        assert!(matches!(set.source_id_for(1), Err(Error::NotMapped(1))));
        assert!(matches!(set.main_from_source(1), Err(Error::NotMapped(1))));
        assert!(matches!(set.main_from_target(1), Err(Error::NotMapped(1))));
    }

    #[test]
    fn clean_mapping_reports_nothing() {
        let (_set, sink) = seeded(&[(100, 1)], &[(1000, 1)]);
        assert!(sink.is_empty());
    }

    #[test]
    fn duplicate_mapping_in_source_is_reported() {
        let (_set, sink) = seeded(&[(101, 1), (102, 2), (103, 1)], &[(1001, 1), (1002, 2)]);

        let warnings = sink.entries();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0],
            Anomaly::MultipleMapping {
                side: MapSide::Source,
                language: "fr".into(),
                main_language: "en".into(),
                main: 1,
                ids: vec![101, 103],
            }
        );
    }

    #[test]
    fn duplicate_mapping_in_target_is_reported() {
        let (_set, sink) = seeded(&[(101, 1), (102, 2)], &[(1001, 1), (1002, 2), (1003, 1)]);

        let warnings = sink.entries();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0],
            Anomaly::MultipleMapping {
                side: MapSide::Target,
                language: "de".into(),
                main_language: "en".into(),
                main: 1,
                ids: vec![1001, 1003],
            }
        );
    }

    #[test]
    fn duplicate_detection_is_symmetric() {
        // Relabeling which side collides moves the side tag but not the
        // collision set.
        let (_s1, sink1) = seeded(&[(101, 1), (103, 1)], &[(1001, 1)]);
        let (_s2, sink2) = seeded(&[(1001, 1)], &[(101, 1), (103, 1)]);

        let w1 = sink1.of_kind("multiple_mapping_in_source");
        let w2 = sink2.of_kind("multiple_mapping_in_target");
        assert_eq!(w1.len(), 1);
        assert_eq!(w2.len(), 1);
        let (Anomaly::MultipleMapping { main: m1, ids: i1, .. }, Anomaly::MultipleMapping { main: m2, ids: i2, .. }) =
            (&w1[0], &w2[0])
        else {
            panic!("expected multiple-mapping warnings");
        };
        assert_eq!(m1, m2);
        assert_eq!(i1, i2);
    }

    #[test]
    fn three_colliders_produce_one_warning() {
        let (_set, sink) = seeded(&[(101, 1), (102, 1), (103, 1)], &[]);

        let warnings = sink.of_kind("multiple_mapping_in_source");
        assert_eq!(warnings.len(), 1);
        let Anomaly::MultipleMapping { main, ids, .. } = &warnings[0] else {
            panic!("expected a multiple-mapping warning");
        };
        assert_eq!(*main, 1);
        assert_eq!(ids, &vec![101, 102, 103]);
    }

    #[test]
    fn missing_source_for_target_is_reported_and_dropped() {
        let (set, sink) = seeded(&[(101, 1)], &[(1001, 1), (1002, 2)]);

        let warnings = sink.entries();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0],
            Anomaly::NoSourceForTarget {
                source_language: "fr".into(),
                main_language: "en".into(),
                target_language: "de".into(),
                target: 1002,
                main: 2,
            }
        );

        // Only the resolvable pair made it into the combined map.
        assert_eq!(set.source_ids().collect::<Vec<_>>(), vec![101]);
        assert_eq!(set.target_ids().collect::<Vec<_>>(), vec![1001]);
        assert!(set.target_id_for(1002).is_err());
    }

    #[test]
    fn inverse_consistency_holds_for_combined_entries() {
        let (set, _sink) = seeded(&[(100, 1), (200, 2), (300, 3)], &[(1000, 1), (3000, 3)]);

        for source in set.source_ids().collect::<Vec<_>>() {
            let target = set.target_id_for(source).expect("combined entry");
            assert_eq!(set.source_id_for(target).expect("inverse entry"), source);
        }
    }
}
