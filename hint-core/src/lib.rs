//! Localized "tip of the day" catalogs for a terminal file manager.
//!
//! A requested locale is mapped to an ordered list of candidate catalog
//! files (preferred encoding, then legacy encoding, then the base catalog).
//! The first candidate that reads, decodes under its declared encoding and
//! holds at least one hint becomes the session's [`HintCatalog`]. Hints are
//! blank-line separated paragraphs of the decoded text.
//!
//! ```no_run
//! use hint_core::{HintConfig, HintSession, SelectMode};
//!
//! let config = HintConfig::with_data_dir("/usr/share/mc");
//! let session = HintSession::open(&config, "cs_CZ.UTF-8", None)?;
//! match session.get_hint(SelectMode::Random) {
//!     Ok(hint) => println!("{}", hint.one_line()),
//!     Err(e) if e.is_catalog_unavailable() => {} // no hint bar this session
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), hint_core::HintError>(())
//! ```

pub mod error;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;

pub use error::{CandidateError, CatalogUnavailable, HintError, Result};
pub use model::candidate::{Candidate, CandidateTier};
pub use model::config::{HintConfig, VariantSpec};
pub use model::hint::{CatalogLocale, HintCatalog, HintRecord, SelectMode};
pub use model::locale::LocaleId;
pub use services::session::{HintSession, LoadState};
pub use services::source::{ByteSource, FsSource, MemorySource};

/// One-shot lookup: resolve, load and select in a single call.
///
/// Callers showing more than one hint should keep a [`HintSession`] instead,
/// which loads the catalog only once.
pub fn get_hint(config: &HintConfig, locale: &str, mode: SelectMode) -> Result<HintRecord> {
    get_hint_from(config, FsSource, locale, mode)
}

pub fn get_hint_from<S: ByteSource>(
    config: &HintConfig,
    source: S,
    locale: &str,
    mode: SelectMode,
) -> Result<HintRecord> {
    HintSession::with_source(config, source, locale, None)?.get_hint(mode)
}
