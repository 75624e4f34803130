//! Structured anomaly records emitted during map construction.
//!
//! Anomalies are the system's only observability surface: every oddity the
//! build encounters (missing fallback links, ambiguous mappings, type
//! mismatches, pages without articles) is reported through an [`AnomalySink`]
//! and the offending record is excluded from the map. Nothing here is fatal;
//! callers that want strict behavior collect the stream (for example via
//! [`MemorySink`]) and decide for themselves.
//!
//! The [`kind`](Anomaly::kind) tags are stable and filtered on by downstream
//! tooling; do not rename them.

use std::fmt;

use parking_lot::Mutex;

use crate::record::RecordId;

/// Which directional map an analysis finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSide {
    Source,
    Target,
}

impl fmt::Display for MapSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapSide::Source => f.write_str("Source"),
            MapSide::Target => f.write_str("Target"),
        }
    }
}

/// Severity of an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational; the data may well be intentional.
    Notice,
    /// The data is inconsistent and a record was skipped or guessed.
    Warning,
}

/// A single anomaly encountered while building a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// A page has no fallback link and no positional candidate; it is
    /// permanently excluded from the map.
    PageNoFallback { page: RecordId },

    /// A page has no fallback link; the positional candidate `guessed` was
    /// used instead.
    PageFallbackGuess {
        page: RecordId,
        index: usize,
        guessed: RecordId,
    },

    /// A content page carries no articles.
    PageNoArticles { page: RecordId, page_type: String },

    /// An article has no fallback link and no positional candidate in its
    /// column; it is excluded.
    ArticleNoFallback { article: RecordId, page: RecordId },

    /// An article has no fallback link; the positional candidate `guessed`
    /// within its column was used instead.
    ArticleFallbackGuess {
        article: RecordId,
        index: usize,
        guessed: RecordId,
    },

    /// The main article has no content element at this position; the element
    /// is excluded.
    ContentNoMain { element: RecordId },

    /// The main element at this position has a different type tag; the
    /// positional pairing is not trusted and the element is excluded.
    ContentTypeMismatch { element: RecordId, main: RecordId },

    /// Several ids on one side map to the same main id.
    MultipleMapping {
        side: MapSide,
        language: String,
        main_language: String,
        main: RecordId,
        ids: Vec<RecordId>,
    },

    /// A target id resolves to a main id that no source id maps to; the pair
    /// is dropped from the combined map.
    NoSourceForTarget {
        source_language: String,
        main_language: String,
        target_language: String,
        target: RecordId,
        main: RecordId,
    },
}

impl Anomaly {
    /// Stable tag identifying the anomaly kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Anomaly::PageNoFallback { .. } => "page_no_fallback",
            Anomaly::PageFallbackGuess { .. } => "page_fallback_guess",
            Anomaly::PageNoArticles { .. } => "page_no_articles",
            Anomaly::ArticleNoFallback { .. } => "article_no_fallback",
            Anomaly::ArticleFallbackGuess { .. } => "article_fallback_guess",
            Anomaly::ContentNoMain { .. } => "article_content_no_main",
            Anomaly::ContentTypeMismatch { .. } => "article_content_type_mismatch",
            Anomaly::MultipleMapping {
                side: MapSide::Source,
                ..
            } => "multiple_mapping_in_source",
            Anomaly::MultipleMapping {
                side: MapSide::Target,
                ..
            } => "multiple_mapping_in_target",
            Anomaly::NoSourceForTarget { .. } => "no_source_for_target",
        }
    }

    /// Severity of the anomaly. Only [`PageNoArticles`](Anomaly::PageNoArticles)
    /// is a notice; everything else is a warning.
    pub fn severity(&self) -> Severity {
        match self {
            Anomaly::PageNoArticles { .. } => Severity::Notice,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::PageNoFallback { page } => write!(
                f,
                "page {page} has no fallback set and unable to determine automatically, page skipped"
            ),
            Anomaly::PageFallbackGuess {
                page,
                index,
                guessed,
            } => write!(
                f,
                "page {page} (index: {index}) has no fallback set, expect problems, guessing {guessed}"
            ),
            Anomaly::PageNoArticles { page, page_type } => {
                write!(f, "page {page} (type: {page_type}) has no articles")
            }
            Anomaly::ArticleNoFallback { article, page } => write!(
                f,
                "article {article} in page {page} has no fallback set and unable to determine \
                 automatically, article skipped"
            ),
            Anomaly::ArticleFallbackGuess {
                article,
                index,
                guessed,
            } => write!(
                f,
                "article {article} (index: {index}) has no fallback set, expect problems, \
                 guessing {guessed}"
            ),
            Anomaly::ContentNoMain { element } => write!(
                f,
                "content element {element} has no mapping in main, element skipped"
            ),
            Anomaly::ContentTypeMismatch { element, main } => write!(
                f,
                "content element {element} has a different type than main element {main}, \
                 element skipped"
            ),
            Anomaly::MultipleMapping {
                side,
                language,
                main_language,
                main,
                ids,
            } => {
                write!(
                    f,
                    "{side} map {main_language} => {language}: multiple elements map to {main}:"
                )?;
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {id}")?;
                }
                Ok(())
            }
            Anomaly::NoSourceForTarget {
                source_language,
                main_language,
                target_language,
                target,
                main,
            } => write!(
                f,
                "no source for target found: {target_language}: {target} => \
                 {main_language}: {main} <= {source_language}: ?"
            ),
        }
    }
}

/// Receiver for anomalies produced during a build.
///
/// Supplied explicitly to every mapper constructor; there is no implicit
/// null default. Implementations take `&self` so a sink can be shared by
/// concurrent builds.
pub trait AnomalySink: Send + Sync {
    fn record(&self, anomaly: Anomaly);
}

/// Sink that buffers all anomalies in memory.
///
/// The backbone for tests and for callers implementing strict mode on top of
/// the reported-only error tier.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Anomaly>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All anomalies recorded so far, in emission order.
    pub fn entries(&self) -> Vec<Anomaly> {
        self.entries.lock().clone()
    }

    /// Drain the recorded anomalies.
    pub fn take(&self) -> Vec<Anomaly> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Anomalies with the given stable kind tag.
    pub fn of_kind(&self, kind: &str) -> Vec<Anomaly> {
        self.entries
            .lock()
            .iter()
            .filter(|a| a.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl AnomalySink for MemorySink {
    fn record(&self, anomaly: Anomaly) {
        self.entries.lock().push(anomaly);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        let cases: Vec<(Anomaly, &str)> = vec![
            (Anomaly::PageNoFallback { page: 1 }, "page_no_fallback"),
            (
                Anomaly::PageFallbackGuess {
                    page: 1,
                    index: 0,
                    guessed: 2,
                },
                "page_fallback_guess",
            ),
            (
                Anomaly::PageNoArticles {
                    page: 1,
                    page_type: "regular".into(),
                },
                "page_no_articles",
            ),
            (
                Anomaly::ArticleNoFallback {
                    article: 1,
                    page: 2,
                },
                "article_no_fallback",
            ),
            (
                Anomaly::ArticleFallbackGuess {
                    article: 1,
                    index: 0,
                    guessed: 2,
                },
                "article_fallback_guess",
            ),
            (Anomaly::ContentNoMain { element: 1 }, "article_content_no_main"),
            (
                Anomaly::ContentTypeMismatch { element: 1, main: 2 },
                "article_content_type_mismatch",
            ),
            (
                Anomaly::MultipleMapping {
                    side: MapSide::Source,
                    language: "de".into(),
                    main_language: "en".into(),
                    main: 1,
                    ids: vec![101, 103],
                },
                "multiple_mapping_in_source",
            ),
            (
                Anomaly::MultipleMapping {
                    side: MapSide::Target,
                    language: "fr".into(),
                    main_language: "en".into(),
                    main: 1,
                    ids: vec![1001, 1003],
                },
                "multiple_mapping_in_target",
            ),
            (
                Anomaly::NoSourceForTarget {
                    source_language: "de".into(),
                    main_language: "en".into(),
                    target_language: "fr".into(),
                    target: 1002,
                    main: 2,
                },
                "no_source_for_target",
            ),
        ];

        for (anomaly, kind) in cases {
            assert_eq!(anomaly.kind(), kind);
        }
    }

    #[test]
    fn only_missing_articles_is_a_notice() {
        let notice = Anomaly::PageNoArticles {
            page: 1,
            page_type: "regular".into(),
        };
        assert_eq!(notice.severity(), Severity::Notice);

        let warning = Anomaly::PageNoFallback { page: 1 };
        assert_eq!(warning.severity(), Severity::Warning);
    }

    #[test]
    fn memory_sink_buffers_in_order() {
        let sink = MemorySink::new();
        sink.record(Anomaly::PageNoFallback { page: 1 });
        sink.record(Anomaly::ContentNoMain { element: 2 });

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind(), "page_no_fallback");
        assert_eq!(entries[1].kind(), "article_content_no_main");

        assert_eq!(sink.of_kind("article_content_no_main").len(), 1);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn multiple_mapping_lists_all_colliders() {
        let anomaly = Anomaly::MultipleMapping {
            side: MapSide::Source,
            language: "fr".into(),
            main_language: "en".into(),
            main: 1,
            ids: vec![101, 103],
        };
        assert_eq!(
            anomaly.to_string(),
            "Source map en => fr: multiple elements map to 1: 101, 103"
        );
    }
}
