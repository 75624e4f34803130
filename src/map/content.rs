//! Content-element mapping within already-mapped articles.

use crate::anomaly::{Anomaly, AnomalySink, MapSide};
use crate::error::Result;
use crate::map::{ArticleMap, AsMapSet, MapSet, Mapping};
use crate::record::{ContentRecord, RecordId, RecordSource};

/// Maps content-element ids between a source and a target language.
///
/// Built on top of an [`ArticleMap`]. Content elements carry no fallback
/// link; pairing is purely positional against the main article's element
/// list, and only trusted when the type tags agree.
#[derive(Debug)]
pub struct ContentMap {
    set: MapSet,
}

impl AsMapSet for ContentMap {
    fn map_set(&self) -> &MapSet {
        &self.set
    }
}

impl ContentMap {
    /// Build the content-element map for the article map's language pair.
    pub fn new(
        articles: &ArticleMap,
        records: &dyn RecordSource,
        sink: &dyn AnomalySink,
    ) -> Result<Self> {
        let mut map = ContentMap {
            set: MapSet::new(
                articles.source_language(),
                articles.target_language(),
                articles.main_language(),
            ),
        };

        for target_article in articles.target_ids().collect::<Vec<_>>() {
            let main_article = articles.main_from_target(target_article)?;
            let source_article = articles.source_id_for(target_article)?;

            let target_elements = records.content_elements(target_article)?;
            let source_elements = records.content_elements(source_article)?;
            let main_elements = records.content_elements(main_article)?;

            map.pair_elements(MapSide::Target, &target_elements, &main_elements, sink);
            map.pair_elements(MapSide::Source, &source_elements, &main_elements, sink);
        }

        map.set.combine(sink);
        Ok(map)
    }

    /// Pair one article's elements with the main article's by position.
    fn pair_elements(
        &mut self,
        side: MapSide,
        elements: &[ContentRecord],
        main_elements: &[ContentRecord],
        sink: &dyn AnomalySink,
    ) {
        for (index, element) in elements.iter().enumerate() {
            let Some(main_element) = main_elements.get(index) else {
                sink.record(Anomaly::ContentNoMain {
                    element: element.id,
                });
                continue;
            };
            if element.element_type != main_element.element_type {
                sink.record(Anomaly::ContentTypeMismatch {
                    element: element.id,
                    main: main_element.id,
                });
                continue;
            }

            self.insert(side, element.id, main_element.id);
        }
    }

    fn insert(&mut self, side: MapSide, id: RecordId, main: RecordId) {
        match side {
            MapSide::Source => self.set.insert_source(id, main),
            MapSide::Target => self.set.insert_target(id, main),
        }
    }
}
