use std::sync::OnceLock;

use regex::Regex;

/// A requested locale, split into its POSIX parts.
///
/// `lang[_TERRITORY][.codeset][@modifier]`, e.g. `cs_CZ.ISO-8859-2` or
/// `sr@latin`. Strings that don't follow that shape are kept whole as the
/// language so an odd but existing catalog suffix still resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleId {
    raw: String,
    language: String,
    territory: Option<String>,
    codeset: Option<String>,
    modifier: Option<String>,
}

fn locale_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<lang>[A-Za-z]{2,3})(?:_(?P<territory>[A-Za-z0-9]+))?(?:\.(?P<codeset>[A-Za-z0-9_\-]+))?(?:@(?P<modifier>[A-Za-z0-9_\-]+))?$",
        )
        .expect("locale pattern is valid")
    })
}

impl LocaleId {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        let Some(caps) = locale_re().captures(raw) else {
            return Self {
                raw: raw.to_string(),
                language: raw.to_string(),
                territory: None,
                codeset: None,
                modifier: None,
            };
        };

        let part = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

        Self {
            raw: raw.to_string(),
            language: part("lang").unwrap_or_default(),
            territory: part("territory"),
            codeset: part("codeset"),
            modifier: part("modifier"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn territory(&self) -> Option<&str> {
        self.territory.as_deref()
    }

    pub fn codeset(&self) -> Option<&str> {
        self.codeset.as_deref()
    }

    pub fn modifier(&self) -> Option<&str> {
        self.modifier.as_deref()
    }

    /// Empty, `C` and `POSIX` (with or without a codeset) select only the base
    /// catalog.
    pub fn is_default(&self) -> bool {
        let head = self.raw.split(['.', '@']).next().unwrap_or("");
        head.is_empty() || head == "C" || head == "POSIX"
    }

    /// Catalog suffixes to try for this locale, most specific first.
    ///
    /// The full identifier comes first, then `lang_TERRITORY`, then the bare
    /// language code. Duplicates are dropped.
    pub fn lookup_names(&self) -> Vec<String> {
        if self.is_default() {
            return Vec::new();
        }

        let mut names = vec![self.raw.clone()];

        if let Some(territory) = &self.territory {
            names.push(format!("{}_{}", self.language, territory));
        }
        names.push(self.language.clone());

        let mut seen = Vec::with_capacity(names.len());
        names.retain(|n| {
            if seen.contains(n) {
                false
            } else {
                seen.push(n.clone());
                true
            }
        });
        names
    }
}
