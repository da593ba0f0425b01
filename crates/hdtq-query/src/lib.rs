//! HDTQ Query Layer
//!
//! Paginated, cardinality-aware access to an indexed triple store:
//!
//! ```text
//! HdtDocument ──► PatternTranslator ──► DictionaryAdapter ──► engine dictionary
//!      │                │
//!      │                └─► IdPattern ──► engine search ──► apply_offset
//!      │                                                        │
//!      │                                     TripleIdIterator ◄─┘
//!      │                                            │
//!      │                                     TripleIterator (resolves strings)
//!      │
//!      └─► search_join ──► engine join search ──► JoinIterator
//! ```
//!
//! ## Windowing
//!
//! Native search cursors only support "skip N from the start" and report an
//! estimated cardinality that may be wrong. The iterators here turn that
//! into exact `offset`/`limit` windows:
//! - `offset` is applied once, when the search is opened (see [`apply_offset`])
//! - `limit` is enforced on every pull (`0` means unbounded)
//! - `accurate_cardinality` counts independently of the consumer's position
//!
//! ## Empty results vs. errors
//!
//! A bound term that is not in the dictionary short-circuits to an empty
//! iterator. Pulling past the end ([`HdtError::Exhausted`]) and identifiers
//! that do not resolve ([`HdtError::DictionaryLookup`]) are errors.

pub mod config;
pub mod cursor;
pub mod dictionary;
pub mod document;
pub mod error;
pub mod id_iterator;
pub mod join;
pub mod offset;
pub mod pattern;
pub mod string_iterator;

pub use config::QueryConfig;
pub use cursor::TripleCursor;
pub use dictionary::DictionaryAdapter;
pub use document::HdtDocument;
pub use error::{HdtError, Result};
pub use id_iterator::TripleIdIterator;
pub use join::JoinIterator;
pub use offset::apply_offset;
pub use pattern::{PatternTerm, PatternTranslator, Translation};
pub use string_iterator::TripleIterator;

pub use hdtq_index::{Bindings, Id, TripleId, TriplePosition, TripleString, WILDCARD};
