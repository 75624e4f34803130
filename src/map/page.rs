//! Page mapping: breadth-first walk of the per-language page trees.

use std::collections::HashMap;

use crate::anomaly::{Anomaly, AnomalySink, MapSide};
use crate::error::{Error, Result};
use crate::map::{AsMapSet, MapSet};
use crate::record::{RecordId, RecordSource};

/// Resolved root page ids for one language pair.
struct Roots {
    source: RecordId,
    target: RecordId,
    main: RecordId,
    main_language: String,
}

/// Maps page ids between a source and a target language.
///
/// Built eagerly in [`PageMap::new`]: the three root pages are located, then
/// each non-main branch is walked breadth-first, mapping every page to its
/// main-language counterpart — through the explicit fallback link when
/// present, by sibling position when not.
#[derive(Debug)]
pub struct PageMap {
    set: MapSet,
    /// Type tag per seen page id; lets the article mapper recognize page
    /// kinds that structurally carry no articles.
    types: HashMap<RecordId, String>,
}

impl AsMapSet for PageMap {
    fn map_set(&self) -> &MapSet {
        &self.set
    }
}

impl PageMap {
    /// Build the page map for a language pair.
    ///
    /// Fails with [`Error::RootPagesMissing`] when any of the source, target,
    /// or main root pages cannot be found; every other inconsistency is
    /// reported to `sink` and the affected page excluded.
    pub fn new(
        source_language: &str,
        target_language: &str,
        records: &dyn RecordSource,
        sink: &dyn AnomalySink,
    ) -> Result<Self> {
        let mut types = HashMap::new();
        let roots = find_roots(source_language, target_language, records, &mut types)?;

        let mut map = PageMap {
            set: MapSet::new(source_language, target_language, roots.main_language.clone()),
            types,
        };
        map.build_branch(MapSide::Source, roots.main, roots.source, records, sink)?;
        map.build_branch(MapSide::Target, roots.main, roots.target, records, sink)?;
        map.set.combine(sink);

        Ok(map)
    }

    /// The type tag of a page, `"unknown"` for ids never seen during the
    /// build.
    pub fn type_for(&self, page: RecordId) -> &str {
        self.types.get(&page).map(String::as_str).unwrap_or("unknown")
    }

    /// Walk one language branch and populate its directional map.
    fn build_branch(
        &mut self,
        side: MapSide,
        main_root: RecordId,
        branch_root: RecordId,
        records: &dyn RecordSource,
        sink: &dyn AnomalySink,
    ) -> Result<()> {
        // Root-to-root identity across languages is axiomatic.
        self.insert(side, branch_root, main_root);

        let is_main = main_root == branch_root;
        let mut frontier = vec![branch_root];

        loop {
            let children = records.child_pages(&frontier)?;
            if children.is_empty() {
                break;
            }
            frontier.clear();

            for (index, child) in children.iter().enumerate() {
                let explicit = if is_main { Some(child.id) } else { child.language_main };
                let main = match explicit {
                    Some(main) => main,
                    None => {
                        match self.positional_candidate(side, index, child.parent, records)? {
                            Some(guessed) => {
                                sink.record(Anomaly::PageFallbackGuess {
                                    page: child.id,
                                    index,
                                    guessed,
                                });
                                guessed
                            }
                            None => {
                                sink.record(Anomaly::PageNoFallback { page: child.id });
                                continue;
                            }
                        }
                    }
                };

                self.insert(side, child.id, main);
                self.types.insert(child.id, child.page_type.clone());
                frontier.push(child.id);
            }
        }

        Ok(())
    }

    /// Guess a main id by position: resolve the parent to its main
    /// counterpart and pick the child at the same index of the current batch.
    fn positional_candidate(
        &self,
        side: MapSide,
        index: usize,
        parent: RecordId,
        records: &dyn RecordSource,
    ) -> Result<Option<RecordId>> {
        let main_parent = self
            .forward(side, parent)
            .ok_or(Error::ParentNotMapped(parent))?;
        let main_children = records.child_pages(&[main_parent])?;
        Ok(main_children.get(index).map(|page| page.id))
    }

    fn insert(&mut self, side: MapSide, id: RecordId, main: RecordId) {
        match side {
            MapSide::Source => self.set.insert_source(id, main),
            MapSide::Target => self.set.insert_target(id, main),
        }
    }

    fn forward(&self, side: MapSide, id: RecordId) -> Option<RecordId> {
        match side {
            MapSide::Source => self.set.lookup_source_main(id),
            MapSide::Target => self.set.lookup_target_main(id),
        }
    }
}

/// Locate the source, target, and main root pages in one scan.
fn find_roots(
    source_language: &str,
    target_language: &str,
    records: &dyn RecordSource,
    types: &mut HashMap<RecordId, String>,
) -> Result<Roots> {
    tracing::debug!(
        source = source_language,
        target = target_language,
        "searching root pages"
    );

    let mut source = None;
    let mut target = None;
    let mut main = None;
    let mut main_language = None;

    for root in records.root_pages()? {
        if root.is_fallback {
            main = Some(root.id);
            main_language = Some(root.language.clone());
        }
        if root.language == source_language {
            source = Some(root.id);
        }
        if root.language == target_language {
            target = Some(root.id);
        }
        types.insert(root.id, "root".to_owned());
    }

    tracing::debug!(?source, ?target, ?main, "found root pages");

    match (source, target, main, main_language) {
        (Some(source), Some(target), Some(main), Some(main_language)) => Ok(Roots {
            source,
            target,
            main,
            main_language,
        }),
        _ => Err(Error::RootPagesMissing {
            source,
            target,
            main,
        }),
    }
}
