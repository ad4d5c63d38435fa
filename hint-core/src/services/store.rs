use log::{info, warn};

use crate::error::{CandidateError, CatalogUnavailable};
use crate::model::candidate::{Candidate, CandidateTier};
use crate::model::hint::{CatalogLocale, HintCatalog};
use crate::model::locale::LocaleId;
use crate::parsers::hint_file;
use crate::services::encoding;
use crate::services::resolver;
use crate::services::source::ByteSource;

/// Decodes and parses one candidate's bytes.
///
/// A decode failure or an empty record list rejects the candidate so the
/// resolver can move on.
pub fn build_catalog(
    locale: &LocaleId,
    candidate: &Candidate,
    bytes: &[u8],
) -> Result<HintCatalog, CandidateError> {
    let Some(text) = encoding::decode_strict(bytes, candidate.encoding) else {
        let guess = encoding::sniff(bytes);
        warn!(
            "{} is not valid {} (looks like {}), skipping",
            candidate.path.display(),
            candidate.encoding_name(),
            guess.best
        );
        return Err(CandidateError::DecodeFailure {
            path: candidate.path.clone(),
            encoding: candidate.encoding_name(),
        });
    };

    let records = hint_file::parse(&text);

    let catalog_locale = match candidate.tier {
        CandidateTier::Base => CatalogLocale::Default,
        CandidateTier::Preferred | CandidateTier::Legacy => {
            CatalogLocale::Named(locale.as_str().to_string())
        }
    };

    HintCatalog::new(
        catalog_locale,
        candidate.encoding,
        candidate.path.clone(),
        candidate.tier,
        records,
    )
    .ok_or_else(|| CandidateError::EmptyCatalog {
        path: candidate.path.clone(),
    })
}

/// Runs resolve, decode and parse over `candidates` and returns the first
/// catalog that loads.
pub fn load_catalog<S: ByteSource + ?Sized>(
    source: &S,
    locale: &LocaleId,
    candidates: &[Candidate],
) -> Result<HintCatalog, CatalogUnavailable> {
    let resolved = resolver::resolve_with(source, locale, candidates, |candidate, bytes| {
        build_catalog(locale, candidate, &bytes)
    })?;

    info!(
        "loaded {} hints from {} ({}, {} candidates skipped)",
        resolved.value.len(),
        resolved.candidate.path.display(),
        resolved.candidate.encoding_name(),
        resolved.skipped.len()
    );

    Ok(resolved.value)
}
