//! # pivotmap
//!
//! Cross-language id mapping for multilingual content trees.
//!
//! A content tree (pages → articles → content elements) replicated once per
//! language, with one language designated as the **main** (fallback/pivot)
//! language, rarely has perfect cross-language links in practice. This crate
//! reconstructs a consistent bidirectional correspondence between the records
//! of a chosen **source** language and a chosen **target** language by
//! composing each side's link to the main language — falling back to sibling
//! position where explicit links are missing — and reports every anomaly it
//! encounters along the way.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use pivotmap::{MapBuilder, MemorySink, MemorySource, TableKind};
//!
//! // One tree per language; `en` is the main language.
//! let mut records = MemorySource::new();
//! records.add_root(1, "en", true);
//! records.add_root(100, "de", false);
//! records.add_root(1000, "fr", false);
//! records.add_page(2, 1, None, "regular");
//! records.add_page(200, 100, Some(2), "regular");
//! records.add_page(2000, 1000, Some(2), "regular");
//!
//! let sink = Arc::new(MemorySink::new());
//! let builder = MapBuilder::new(Arc::new(records), sink.clone());
//!
//! // de page 200 and fr page 2000 both link to en page 2.
//! let pages = builder.mapping_for(TableKind::Pages, "de", "fr")?;
//! assert_eq!(pages.target_id_for(200)?, 2000);
//! assert_eq!(pages.source_id_for(2000)?, 200);
//! assert!(sink.is_empty());
//! # Ok::<(), pivotmap::Error>(())
//! ```
//!
//! ## Design
//!
//! - Mappers ([`PageMap`], [`ArticleMap`], [`ContentMap`]) build eagerly in
//!   their constructors and are immutable afterwards; share them freely.
//! - The only fatal condition is a missing root page. Everything else —
//!   missing fallback links, ambiguous mappings, type mismatches — is
//!   reported through an [`AnomalySink`] as a structured [`Anomaly`] with a
//!   stable [`kind`](Anomaly::kind) tag, and the offending record is simply
//!   left out of the map.
//! - Storage access goes through the [`RecordSource`] trait; [`MemorySource`]
//!   is a ready-made in-memory implementation.

pub mod anomaly;
pub mod builder;
pub mod error;
pub mod map;
pub mod memory;
pub mod record;

pub use anomaly::{Anomaly, AnomalySink, MapSide, MemorySink, Severity};
pub use builder::{MapBuilder, TableKind};
pub use error::{Error, Result};
pub use map::{ArticleMap, ContentMap, MapSet, Mapping, PageMap};
pub use memory::MemorySource;
pub use record::{ArticleRecord, ContentRecord, PageRecord, RecordId, RecordSource, RootPage};
