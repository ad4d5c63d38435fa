use std::path::PathBuf;

use encoding_rs::Encoding;
use log::debug;

use crate::error::{CandidateError, CatalogUnavailable, Result};
use crate::model::candidate::{Candidate, CandidateTier};
use crate::model::config::HintConfig;
use crate::model::locale::LocaleId;
use crate::services::encoding;
use crate::services::source::ByteSource;

/// Raw catalog bytes together with the candidate they came from.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub bytes: Vec<u8>,
    pub encoding: &'static Encoding,
    pub candidate: Candidate,
}

/// What the resolver settled on, plus every candidate it skipped on the way.
#[derive(Debug)]
pub struct Resolved<T> {
    pub value: T,
    pub candidate: Candidate,
    pub skipped: Vec<CandidateError>,
}

/// Builds the ordered candidate list for `locale`.
///
/// Preferred-encoding locale variants come first, then legacy-encoded ones,
/// then the base catalog. With `requested` set, only locale variants in that
/// encoding are kept; the base catalog is always last and never filtered.
pub fn candidates(
    config: &HintConfig,
    locale: &LocaleId,
    requested: Option<&'static Encoding>,
) -> Result<Vec<Candidate>> {
    let preferred = encoding::for_label(&config.preferred_encoding)?;
    let mut list = locale_candidates(config, locale, preferred)?;

    if let Some(requested) = requested {
        list.retain(|c| c.encoding == requested);

        // A pinned encoding with no configured file still gets the
        // conventional legacy name.
        if list.is_empty() && requested != preferred && !locale.is_default() {
            let path = legacy_path(config, locale.language(), requested);
            list.push(Candidate::new(path, requested, CandidateTier::Legacy));
        }
    }

    // stable: keeps configured order inside each tier
    list.sort_by_key(|c| c.tier);

    let mut seen: Vec<PathBuf> = Vec::with_capacity(list.len());
    list.retain(|c| {
        if seen.contains(&c.path) {
            false
        } else {
            seen.push(c.path.clone());
            true
        }
    });

    list.push(Candidate::new(
        config.base_path(),
        preferred,
        CandidateTier::Base,
    ));

    Ok(list)
}

fn locale_candidates(
    config: &HintConfig,
    locale: &LocaleId,
    preferred: &'static Encoding,
) -> Result<Vec<Candidate>> {
    if locale.is_default() {
        return Ok(Vec::new());
    }

    let names = locale.lookup_names();
    let mut list = Vec::new();

    let explicit: Vec<_> = names
        .iter()
        .filter_map(|name| config.variants.get(name))
        .flatten()
        .collect();

    if !explicit.is_empty() {
        for spec in explicit {
            let tier = if spec.legacy {
                CandidateTier::Legacy
            } else {
                CandidateTier::Preferred
            };
            list.push(Candidate::new(
                config.data_dir.join(&spec.file),
                encoding::for_label(&spec.encoding)?,
                tier,
            ));
        }
        return Ok(list);
    }

    for name in &names {
        list.push(Candidate::new(
            config
                .data_dir
                .join(format!("{}.{}", config.base_name, name)),
            preferred,
            CandidateTier::Preferred,
        ));
    }

    if let Some(label) = config.legacy_encodings.get(locale.language()) {
        let legacy = encoding::for_label(label)?;
        list.push(Candidate::new(
            legacy_path(config, locale.language(), legacy),
            legacy,
            CandidateTier::Legacy,
        ));
    }

    Ok(list)
}

fn legacy_path(config: &HintConfig, language: &str, encoding: &'static Encoding) -> PathBuf {
    config.data_dir.join(format!(
        "{}.{}.{}",
        config.base_name,
        language,
        encoding.name().to_lowercase()
    ))
}

/// Tries candidates in order until `accept` takes one.
///
/// Unreadable and zero-length sources are skipped here; `accept` reports its
/// own failures (bad encoding, no records) the same way. Only when every
/// candidate has been skipped does this fail.
pub fn resolve_with<S, T, F>(
    source: &S,
    locale: &LocaleId,
    candidates: &[Candidate],
    mut accept: F,
) -> std::result::Result<Resolved<T>, CatalogUnavailable>
where
    S: ByteSource + ?Sized,
    F: FnMut(&Candidate, Vec<u8>) -> std::result::Result<T, CandidateError>,
{
    let mut skipped = Vec::new();

    for candidate in candidates {
        debug!(
            "trying hint catalog {} ({})",
            candidate.path.display(),
            candidate.encoding_name()
        );

        let bytes = match source.read(&candidate.path) {
            Ok(b) => b,
            Err(e) => {
                skipped.push(CandidateError::SourceUnavailable {
                    path: candidate.path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if bytes.is_empty() {
            skipped.push(CandidateError::EmptyCatalog {
                path: candidate.path.clone(),
            });
            continue;
        }

        match accept(candidate, bytes) {
            Ok(value) => {
                return Ok(Resolved {
                    value,
                    candidate: candidate.clone(),
                    skipped,
                });
            }
            Err(e) => {
                debug!("skipping hint catalog: {e}");
                skipped.push(e);
            }
        }
    }

    Err(CatalogUnavailable {
        locale: locale.as_str().to_string(),
        attempts: skipped,
    })
}

/// First readable, non-empty candidate, undecoded.
pub fn resolve<S: ByteSource + ?Sized>(
    source: &S,
    locale: &LocaleId,
    candidates: &[Candidate],
) -> std::result::Result<ResolvedSource, CatalogUnavailable> {
    let resolved = resolve_with(source, locale, candidates, |_, bytes| Ok(bytes))?;

    Ok(ResolvedSource {
        bytes: resolved.value,
        encoding: resolved.candidate.encoding,
        candidate: resolved.candidate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::VariantSpec;
    use crate::services::source::MemorySource;
    use encoding_rs::{ISO_8859_2, KOI8_R, UTF_8};

    fn config() -> HintConfig {
        HintConfig::with_data_dir("/share")
    }

    fn paths(list: &[Candidate]) -> Vec<String> {
        list.iter()
            .map(|c| c.path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn czech_candidates_follow_priority_order() {
        let list = candidates(&config(), &LocaleId::parse("cs_CZ.UTF-8"), None).unwrap();

        assert_eq!(
            paths(&list),
            vec![
                "/share/mc.hint.cs_CZ.UTF-8",
                "/share/mc.hint.cs_CZ",
                "/share/mc.hint.cs",
                "/share/mc.hint.cs.iso-8859-2",
                "/share/mc.hint",
            ]
        );
        assert_eq!(list[3].encoding, ISO_8859_2);
        assert_eq!(list[3].tier, CandidateTier::Legacy);
        assert_eq!(list[4].tier, CandidateTier::Base);
    }

    #[test]
    fn empty_locale_only_tries_base() {
        let list = candidates(&config(), &LocaleId::parse(""), None).unwrap();
        assert_eq!(paths(&list), vec!["/share/mc.hint"]);
        assert_eq!(list[0].encoding, UTF_8);
    }

    #[test]
    fn requested_encoding_with_default_locale_only_tries_base() {
        for raw in ["", "C", "POSIX", "C.ISO-8859-1"] {
            let list = candidates(&config(), &LocaleId::parse(raw), Some(ISO_8859_2)).unwrap();
            assert_eq!(paths(&list), vec!["/share/mc.hint"], "locale {raw:?}");
        }
    }

    #[test]
    fn default_locale_ignores_stray_legacy_file() {
        let source = MemorySource::new()
            .with_file("/share/mc.hint.C.iso-8859-2", b"stray".to_vec())
            .with_file("/share/mc.hint", b"base".to_vec());

        let locale = LocaleId::parse("C");
        let list = candidates(&config(), &locale, Some(ISO_8859_2)).unwrap();
        let resolved = resolve(&source, &locale, &list).unwrap();
        assert_eq!(resolved.bytes, b"base");
    }

    #[test]
    fn requested_encoding_keeps_matching_variants_only() {
        let list = candidates(&config(), &LocaleId::parse("cs"), Some(ISO_8859_2)).unwrap();
        assert_eq!(
            paths(&list),
            vec!["/share/mc.hint.cs.iso-8859-2", "/share/mc.hint"]
        );
    }

    #[test]
    fn requested_encoding_without_configured_file_uses_convention() {
        let list = candidates(&config(), &LocaleId::parse("de"), Some(KOI8_R)).unwrap();
        assert_eq!(paths(&list), vec!["/share/mc.hint.de.koi8-r", "/share/mc.hint"]);
    }

    #[test]
    fn explicit_variants_replace_convention_and_are_tiered() {
        let mut cfg = config();
        cfg.variants.insert(
            "cs".into(),
            vec![
                VariantSpec {
                    file: "hints/cs-old.txt".into(),
                    encoding: "iso-8859-2".into(),
                    legacy: true,
                },
                VariantSpec {
                    file: "hints/cs.txt".into(),
                    encoding: "utf-8".into(),
                    legacy: false,
                },
            ],
        );

        let list = candidates(&cfg, &LocaleId::parse("cs_CZ"), None).unwrap();
        assert_eq!(
            paths(&list),
            vec![
                "/share/hints/cs.txt",
                "/share/hints/cs-old.txt",
                "/share/mc.hint",
            ]
        );
    }

    #[test]
    fn unknown_encoding_label_is_a_config_error() {
        let mut cfg = config();
        cfg.legacy_encodings.insert("xx".into(), "no-such-charset".into());
        let err = candidates(&cfg, &LocaleId::parse("xx"), None).unwrap_err();
        assert_eq!(err.code(), "unknown_encoding");
    }

    #[test]
    fn resolve_skips_missing_and_empty_sources() {
        let source = MemorySource::new()
            .with_file("/share/mc.hint.cs", Vec::new())
            .with_file("/share/mc.hint", b"Base hint".to_vec());

        let locale = LocaleId::parse("cs");
        let list = candidates(&config(), &locale, None).unwrap();
        let resolved = resolve(&source, &locale, &list).unwrap();

        assert_eq!(resolved.bytes, b"Base hint");
        assert_eq!(resolved.encoding, UTF_8);
        assert_eq!(resolved.candidate.tier, CandidateTier::Base);
    }

    #[test]
    fn resolve_fails_when_nothing_is_readable() {
        let locale = LocaleId::parse("cs");
        let list = candidates(&config(), &locale, None).unwrap();
        let err = resolve(&MemorySource::new(), &locale, &list).unwrap_err();

        assert_eq!(err.locale, "cs");
        assert_eq!(err.attempts.len(), list.len());
        assert!(err
            .attempts
            .iter()
            .all(|a| a.kind() == "source_unavailable"));
    }

    #[test]
    fn rejected_candidate_falls_through() {
        let source = MemorySource::new()
            .with_file("/share/mc.hint.cs", b"bad".to_vec())
            .with_file("/share/mc.hint", b"good".to_vec());

        let locale = LocaleId::parse("cs");
        let list = candidates(&config(), &locale, None).unwrap();
        let resolved = resolve_with(&source, &locale, &list, |c, bytes| {
            if bytes == b"bad" {
                Err(CandidateError::DecodeFailure {
                    path: c.path.clone(),
                    encoding: c.encoding_name(),
                })
            } else {
                Ok(bytes)
            }
        })
        .unwrap();

        assert_eq!(resolved.value, b"good");
        assert_eq!(resolved.skipped.len(), 2);
        assert_eq!(resolved.skipped[0].kind(), "decode_failure");
    }
}
