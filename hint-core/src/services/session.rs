use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use encoding_rs::Encoding;
use log::warn;

use crate::error::{CatalogUnavailable, Result};
use crate::model::candidate::Candidate;
use crate::model::config::HintConfig;
use crate::model::hint::{HintCatalog, HintRecord, SelectMode};
use crate::model::locale::LocaleId;
use crate::services::source::{ByteSource, FsSource};
use crate::services::{resolver, selector, store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
    Failed,
}

/// Hint state for one UI session and one locale.
///
/// The catalog is loaded on first use behind a one-time guard, so concurrent
/// first requests share a single load. After that every read is lock-free.
/// A failed load is remembered too: the session stays without hints until
/// `reload`.
pub struct HintSession<S = FsSource> {
    locale: LocaleId,
    requested: Option<&'static Encoding>,
    candidates: Vec<Candidate>,
    source: S,
    refresh: Duration,
    catalog: OnceLock<std::result::Result<Arc<HintCatalog>, CatalogUnavailable>>,
    last_rotation: Mutex<Option<Instant>>,
}

impl HintSession<FsSource> {
    pub fn open(
        config: &HintConfig,
        locale: &str,
        requested: Option<&'static Encoding>,
    ) -> Result<Self> {
        Self::with_source(config, FsSource, locale, requested)
    }
}

impl<S: ByteSource> HintSession<S> {
    /// Builds the candidate list up front; nothing is read until the first
    /// hint is asked for.
    pub fn with_source(
        config: &HintConfig,
        source: S,
        locale: &str,
        requested: Option<&'static Encoding>,
    ) -> Result<Self> {
        let locale = LocaleId::parse(locale);
        let candidates = resolver::candidates(config, &locale, requested)?;

        Ok(Self {
            locale,
            requested,
            candidates,
            source,
            refresh: Duration::from_secs(config.refresh_secs),
            catalog: OnceLock::new(),
            last_rotation: Mutex::new(None),
        })
    }

    pub fn locale(&self) -> &LocaleId {
        &self.locale
    }

    pub fn requested_encoding(&self) -> Option<&'static Encoding> {
        self.requested
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn state(&self) -> LoadState {
        match self.catalog.get() {
            None => LoadState::Unloaded,
            Some(Ok(_)) => LoadState::Loaded,
            Some(Err(_)) => LoadState::Failed,
        }
    }

    /// The loaded catalog, loading it on first call.
    pub fn catalog(&self) -> Result<Arc<HintCatalog>> {
        let loaded = self.catalog.get_or_init(|| {
            store::load_catalog(&self.source, &self.locale, &self.candidates)
                .map(Arc::new)
                .inspect_err(|e| warn!("{e}; hints disabled for this session"))
        });

        match loaded {
            Ok(catalog) => Ok(Arc::clone(catalog)),
            Err(e) => Err(e.clone().into()),
        }
    }

    pub fn get_hint(&self, mode: SelectMode) -> Result<HintRecord> {
        let catalog = self.catalog()?;
        Ok(selector::select_hint(&catalog, mode).clone())
    }

    /// A fresh random hint at most once per refresh period.
    ///
    /// `Ok(None)` means the period has not elapsed yet and the current hint
    /// should stay on screen. `force` skips the wait.
    pub fn next_hint(&self, force: bool) -> Result<Option<HintRecord>> {
        {
            let mut last = self
                .last_rotation
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let now = Instant::now();

            if !force {
                if let Some(at) = *last {
                    if now.duration_since(at) < self.refresh {
                        return Ok(None);
                    }
                }
            }
            *last = Some(now);
        }

        self.get_hint(SelectMode::Random).map(Some)
    }

    /// Drops the loaded catalog; the next request resolves from scratch.
    pub fn reload(&mut self) {
        self.catalog = OnceLock::new();
        *self
            .last_rotation
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}
