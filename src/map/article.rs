//! Article mapping within already-mapped pages.

use crate::anomaly::{Anomaly, AnomalySink, MapSide};
use crate::error::Result;
use crate::map::{AsMapSet, MapSet, Mapping, PageMap};
use crate::record::{RecordId, RecordSource};

/// Page kinds that structurally carry no articles; their empty pages are
/// skipped without a notice.
const ARTICLE_LESS_PAGE_TYPES: &[&str] = &["error_403", "error_404", "forward", "redirect", "root"];

/// Maps article ids between a source and a target language.
///
/// Built on top of a [`PageMap`]: for every mapped page the page's articles
/// are paired with the main page's articles — by explicit fallback link when
/// present, by position within the same layout column when not.
#[derive(Debug)]
pub struct ArticleMap {
    set: MapSet,
}

impl AsMapSet for ArticleMap {
    fn map_set(&self) -> &MapSet {
        &self.set
    }
}

impl ArticleMap {
    /// Build the article map for the page map's language pair.
    pub fn new(
        pages: &PageMap,
        records: &dyn RecordSource,
        sink: &dyn AnomalySink,
    ) -> Result<Self> {
        let mut map = ArticleMap {
            set: MapSet::new(
                pages.source_language(),
                pages.target_language(),
                pages.main_language(),
            ),
        };

        for page in pages.source_ids().collect::<Vec<_>>() {
            let main_page = pages.main_from_source(page)?;
            map.map_page_articles(MapSide::Source, page, main_page, pages, records, sink)?;
        }
        map.set.rebuild_source_inverse();

        for page in pages.target_ids().collect::<Vec<_>>() {
            let main_page = pages.main_from_target(page)?;
            map.map_page_articles(MapSide::Target, page, main_page, pages, records, sink)?;
        }
        map.set.rebuild_target_inverse();

        map.set.combine(sink);
        Ok(map)
    }

    /// Map one page's articles onto the main page's articles.
    fn map_page_articles(
        &mut self,
        side: MapSide,
        page: RecordId,
        main_page: RecordId,
        pages: &PageMap,
        records: &dyn RecordSource,
        sink: &dyn AnomalySink,
    ) -> Result<()> {
        tracing::debug!(page, "mapping articles from page");

        let articles = records.articles(page, None)?;
        if articles.is_empty() {
            let page_type = pages.type_for(page);
            if !ARTICLE_LESS_PAGE_TYPES.contains(&page_type) {
                sink.record(Anomaly::PageNoArticles {
                    page,
                    page_type: page_type.to_owned(),
                });
            }
            return Ok(());
        }

        // The branch is the main language itself; articles map to themselves.
        if page == main_page {
            for article in &articles {
                self.insert(side, article.id, article.id);
            }
            return Ok(());
        }

        for (index, article) in articles.iter().enumerate() {
            let main = match article.language_main {
                Some(main) => main,
                None => {
                    let candidate = records
                        .articles(main_page, Some(article.column.as_str()))?
                        .get(index)
                        .map(|main_article| main_article.id);
                    match candidate {
                        Some(guessed) => {
                            sink.record(Anomaly::ArticleFallbackGuess {
                                article: article.id,
                                index,
                                guessed,
                            });
                            guessed
                        }
                        None => {
                            sink.record(Anomaly::ArticleNoFallback {
                                article: article.id,
                                page: article.parent,
                            });
                            continue;
                        }
                    }
                }
            };

            self.insert(side, article.id, main);
        }

        Ok(())
    }

    /// Forward-only insert; the inverses are rebuilt per branch.
    fn insert(&mut self, side: MapSide, id: RecordId, main: RecordId) {
        match side {
            MapSide::Source => self.set.insert_source_forward(id, main),
            MapSide::Target => self.set.insert_target_forward(id, main),
        }
    }
}
