use std::path::PathBuf;

use encoding_rs::Encoding;
use serde::Serialize;

/// Priority band of a candidate. Bands are tried in declaration order.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CandidateTier {
    Preferred,
    Legacy,
    Base,
}

/// One (path, encoding) pair the resolver may try.
///
/// Two files for the same locale in different encodings are two candidates;
/// they are never merged and the bytes of neither are transcoded on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub encoding: &'static Encoding,
    pub tier: CandidateTier,
}

impl Candidate {
    pub fn new(path: impl Into<PathBuf>, encoding: &'static Encoding, tier: CandidateTier) -> Self {
        Self {
            path: path.into(),
            encoding,
            tier,
        }
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }
}
