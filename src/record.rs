//! Record rows and the read-only record source contract.
//!
//! The mappers never touch storage directly. They consume a [`RecordSource`],
//! a narrow set of read-only queries over the per-language content trees:
//! root pages, child pages by parent batch, articles by page, and content
//! elements by article. Implementations back this with whatever store holds
//! the trees; [`MemorySource`](crate::MemorySource) is a ready-made in-memory
//! implementation for tests and fixtures.

use crate::error::Result;

/// Opaque record identifier, scoped to a single language variant.
pub type RecordId = u64;

/// A root page: the top of one language's content tree.
#[derive(Debug, Clone)]
pub struct RootPage {
    pub id: RecordId,
    /// Language code of the tree below this root.
    pub language: String,
    /// Set on exactly one root: the main (pivot) language all others
    /// reconcile against.
    pub is_fallback: bool,
}

/// A page below a root.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: RecordId,
    pub parent: RecordId,
    /// Explicit link to the corresponding page in the main language.
    /// `None` when the link was never maintained (the store's 0/NULL).
    pub language_main: Option<RecordId>,
    /// Type tag; non-content kinds (error pages, forwards, redirects) are
    /// expected to carry no articles.
    pub page_type: String,
}

/// An article within a page.
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub id: RecordId,
    pub parent: RecordId,
    /// Explicit link to the corresponding article in the main language.
    pub language_main: Option<RecordId>,
    /// Layout column the article lives in; the secondary key for positional
    /// fallback.
    pub column: String,
}

/// A content element within an article.
#[derive(Debug, Clone)]
pub struct ContentRecord {
    pub id: RecordId,
    /// Type tag; a positional pairing is only trusted when the tags agree.
    pub element_type: String,
}

/// Read-only access to the replicated content trees.
///
/// Result ordering is part of the contract; positional fallback indexes into
/// these lists:
///
/// - [`root_pages`](Self::root_pages): non-fallback roots first, then a
///   stable sort key.
/// - [`child_pages`](Self::child_pages): the stable sort key, over the whole
///   parent batch.
/// - [`articles`](Self::articles): column, then position.
/// - [`content_elements`](Self::content_elements): position.
pub trait RecordSource: Send + Sync {
    /// All root pages, one per language.
    fn root_pages(&self) -> Result<Vec<RootPage>>;

    /// All direct children of the given pages, in one batch.
    fn child_pages(&self, parents: &[RecordId]) -> Result<Vec<PageRecord>>;

    /// Articles of one page, optionally restricted to a layout column.
    fn articles(&self, page: RecordId, column: Option<&str>) -> Result<Vec<ArticleRecord>>;

    /// Content elements of one article.
    fn content_elements(&self, article: RecordId) -> Result<Vec<ContentRecord>>;
}
