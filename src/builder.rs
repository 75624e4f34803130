//! Memoizing factory for mapper instances.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::anomaly::AnomalySink;
use crate::error::{Error, Result};
use crate::map::{ArticleMap, ContentMap, Mapping, PageMap};
use crate::record::RecordSource;

/// The three mapped record kinds, addressed by table path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Pages,
    Articles,
    ContentElements,
}

impl FromStr for TableKind {
    type Err = Error;

    /// Parse a table path: `page`, `article`, or the parented
    /// `article.content`.
    fn from_str(path: &str) -> Result<Self> {
        match path {
            "page" => Ok(TableKind::Pages),
            "article" => Ok(TableKind::Articles),
            "article.content" => Ok(TableKind::ContentElements),
            other => Err(Error::UnknownTable(other.to_owned())),
        }
    }
}

type LanguagePair = (String, String);

/// Builds and memoizes mappers per (table kind, source, target).
///
/// Mappers are expensive to build (each walks its whole tree tier), so one
/// instance per language pair is cached and shared via [`Arc`]. The cache
/// lock is held across a build, which serializes concurrent first requests
/// for the same pair instead of walking the tree twice.
pub struct MapBuilder {
    records: Arc<dyn RecordSource>,
    sink: Arc<dyn AnomalySink>,
    pages: Mutex<HashMap<LanguagePair, Arc<PageMap>>>,
    articles: Mutex<HashMap<LanguagePair, Arc<ArticleMap>>>,
    content: Mutex<HashMap<LanguagePair, Arc<ContentMap>>>,
    languages: Mutex<Option<Vec<String>>>,
}

impl MapBuilder {
    /// Create a builder over a record source. The sink receives every
    /// anomaly from every build this builder performs.
    pub fn new(records: Arc<dyn RecordSource>, sink: Arc<dyn AnomalySink>) -> Self {
        MapBuilder {
            records,
            sink,
            pages: Mutex::new(HashMap::new()),
            articles: Mutex::new(HashMap::new()),
            content: Mutex::new(HashMap::new()),
            languages: Mutex::new(None),
        }
    }

    /// The mapping for a table kind and language pair, built on first use.
    pub fn mapping_for(
        &self,
        kind: TableKind,
        source: &str,
        target: &str,
    ) -> Result<Arc<dyn Mapping>> {
        Ok(match kind {
            TableKind::Pages => self.page_map(source, target)?,
            TableKind::Articles => self.article_map(source, target)?,
            TableKind::ContentElements => self.content_map(source, target)?,
        })
    }

    /// Whether the table path parses and both languages are known.
    pub fn supports(&self, path: &str, source: &str, target: &str) -> bool {
        path.parse::<TableKind>().is_ok()
            && self.supports_language(source)
            && self.supports_language(target)
    }

    /// Languages of the discovered root pages, memoized.
    pub fn supported_languages(&self) -> Result<Vec<String>> {
        let mut cached = self.languages.lock();
        if let Some(languages) = cached.as_ref() {
            return Ok(languages.clone());
        }

        let languages: Vec<String> = self
            .records
            .root_pages()?
            .into_iter()
            .map(|root| root.language)
            .collect();
        *cached = Some(languages.clone());
        Ok(languages)
    }

    /// The page map for a language pair.
    pub fn page_map(&self, source: &str, target: &str) -> Result<Arc<PageMap>> {
        let key = (source.to_owned(), target.to_owned());
        let mut cache = self.pages.lock();
        if let Some(map) = cache.get(&key) {
            return Ok(map.clone());
        }

        let map = Arc::new(PageMap::new(source, target, &*self.records, &*self.sink)?);
        cache.insert(key, map.clone());
        Ok(map)
    }

    /// The article map for a language pair, built on the cached page map.
    pub fn article_map(&self, source: &str, target: &str) -> Result<Arc<ArticleMap>> {
        let key = (source.to_owned(), target.to_owned());
        let mut cache = self.articles.lock();
        if let Some(map) = cache.get(&key) {
            return Ok(map.clone());
        }

        let pages = self.page_map(source, target)?;
        let map = Arc::new(ArticleMap::new(&pages, &*self.records, &*self.sink)?);
        cache.insert(key, map.clone());
        Ok(map)
    }

    /// The content-element map for a language pair, built on the cached
    /// article map.
    pub fn content_map(&self, source: &str, target: &str) -> Result<Arc<ContentMap>> {
        let key = (source.to_owned(), target.to_owned());
        let mut cache = self.content.lock();
        if let Some(map) = cache.get(&key) {
            return Ok(map.clone());
        }

        let articles = self.article_map(source, target)?;
        let map = Arc::new(ContentMap::new(&articles, &*self.records, &*self.sink)?);
        cache.insert(key, map.clone());
        Ok(map)
    }

    fn supports_language(&self, language: &str) -> bool {
        self.supported_languages()
            .map(|languages| languages.iter().any(|known| known == language))
            .unwrap_or(false)
    }
}
