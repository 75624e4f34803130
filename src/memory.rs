//! In-memory record source for tests and fixtures.

use crate::error::Result;
use crate::record::{ArticleRecord, ContentRecord, PageRecord, RecordId, RecordSource, RootPage};

/// A [`RecordSource`] backed by plain vectors.
///
/// Rows are returned in the contract's order: insertion order is the stable
/// sort key, roots are sorted non-fallback first, and articles are sorted by
/// column before position. Useful for testing mapper behavior and for
/// downstream crates exercising their own glue without a real store.
#[derive(Debug, Default)]
pub struct MemorySource {
    roots: Vec<RootPage>,
    pages: Vec<PageRecord>,
    articles: Vec<ArticleRecord>,
    content: Vec<(RecordId, ContentRecord)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root page. Exactly one root should carry the fallback flag.
    pub fn add_root(&mut self, id: RecordId, language: &str, is_fallback: bool) {
        self.roots.push(RootPage {
            id,
            language: language.to_owned(),
            is_fallback,
        });
    }

    /// Add a page below a parent.
    pub fn add_page(
        &mut self,
        id: RecordId,
        parent: RecordId,
        language_main: Option<RecordId>,
        page_type: &str,
    ) {
        self.pages.push(PageRecord {
            id,
            parent,
            language_main,
            page_type: page_type.to_owned(),
        });
    }

    /// Add an article to a page.
    pub fn add_article(
        &mut self,
        id: RecordId,
        page: RecordId,
        language_main: Option<RecordId>,
        column: &str,
    ) {
        self.articles.push(ArticleRecord {
            id,
            parent: page,
            language_main,
            column: column.to_owned(),
        });
    }

    /// Add a content element to an article.
    pub fn add_content(&mut self, id: RecordId, article: RecordId, element_type: &str) {
        self.content.push((
            article,
            ContentRecord {
                id,
                element_type: element_type.to_owned(),
            },
        ));
    }
}

impl RecordSource for MemorySource {
    fn root_pages(&self) -> Result<Vec<RootPage>> {
        let mut roots = self.roots.clone();
        // Stable: non-fallback roots first, insertion order within each group.
        roots.sort_by_key(|root| root.is_fallback);
        Ok(roots)
    }

    fn child_pages(&self, parents: &[RecordId]) -> Result<Vec<PageRecord>> {
        Ok(self
            .pages
            .iter()
            .filter(|page| parents.contains(&page.parent))
            .cloned()
            .collect())
    }

    fn articles(&self, page: RecordId, column: Option<&str>) -> Result<Vec<ArticleRecord>> {
        let mut articles: Vec<ArticleRecord> = self
            .articles
            .iter()
            .filter(|article| article.parent == page)
            .filter(|article| column.is_none_or(|col| article.column == col))
            .cloned()
            .collect();
        articles.sort_by(|a, b| a.column.cmp(&b.column));
        Ok(articles)
    }

    fn content_elements(&self, article: RecordId) -> Result<Vec<ContentRecord>> {
        Ok(self
            .content
            .iter()
            .filter(|(parent, _)| *parent == article)
            .map(|(_, element)| element.clone())
            .collect())
    }
}
