//! # Taxonomy Corpus
//!
//! Paper and keyword model for the classification engine, plus the
//! ingestion layer that turns raw dataset rows into a normalized
//! paper-to-keywords index.
//!
//! ## Pipeline
//!
//! ```text
//! RawPaper[] (JSON export of the reference sheet)
//!     │
//!     ├──> KeywordCatalog (validated synonyms + priorities)
//!     │
//!     └──> CorpusLoader
//!            ├─ split + normalize keyword cells
//!            ├─ unify synonyms, drop unwanted / priority-0 keywords
//!            ├─ merge operator-assigned keywords
//!            └─ rescue keyword-less papers via title/abstract matching
//!                 │
//!                 └──> KeywordIndex
//! ```

mod catalog;
mod error;
mod loader;
mod types;

pub use catalog::{KeywordCatalog, KeywordCustomization, DEFAULT_PRIORITY, MAX_PRIORITY};
pub use error::{CorpusError, Result};
pub use loader::{load_raw_papers, CorpusLoader, KeywordCell, LoadedCorpus, RawPaper};
pub use types::{normalize_keyword, KeywordIndex, KeywordStats, Paper, PaperKeywords};
