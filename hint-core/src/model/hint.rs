use std::fmt;
use std::path::PathBuf;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::model::candidate::CandidateTier;

/// One displayable tip.
///
/// `text` keeps the source's internal line breaks and any leading
/// `Tip:`/`Note:` style prefix exactly as written.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HintRecord {
    pub text: String,
}

impl HintRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Hint bar form: every line break becomes a single space.
    pub fn one_line(&self) -> String {
        self.text.lines().collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for HintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Which locale a loaded catalog actually belongs to. A request for "cs" that
/// fell through to the base file yields `Default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocale {
    Default,
    Named(String),
}

impl fmt::Display for CatalogLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogLocale::Default => f.write_str("default"),
            CatalogLocale::Named(name) => f.write_str(name),
        }
    }
}

/// A fully decoded catalog for one locale+encoding variant. Immutable once built.
#[derive(Debug, Clone)]
pub struct HintCatalog {
    locale: CatalogLocale,
    source_encoding: &'static Encoding,
    source: PathBuf,
    tier: CandidateTier,
    records: Vec<HintRecord>,
}

impl HintCatalog {
    /// Returns `None` for an empty record list: an empty catalog never counts
    /// as loaded.
    pub fn new(
        locale: CatalogLocale,
        source_encoding: &'static Encoding,
        source: PathBuf,
        tier: CandidateTier,
        records: Vec<HintRecord>,
    ) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        Some(Self {
            locale,
            source_encoding,
            source,
            tier,
            records,
        })
    }

    pub fn locale(&self) -> &CatalogLocale {
        &self.locale
    }

    pub fn source_encoding(&self) -> &'static Encoding {
        self.source_encoding
    }

    pub fn source(&self) -> &PathBuf {
        &self.source
    }

    pub fn tier(&self) -> CandidateTier {
        self.tier
    }

    pub fn records(&self) -> &[HintRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// How `select_hint` picks a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// `records[index % len]`; any index is valid.
    Sequential(usize),
    /// Uniform over the whole catalog on every call.
    Random,
}
