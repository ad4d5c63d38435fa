use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HintError, Result};

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_base_name() -> String {
    "mc.hint".to_string()
}

fn default_preferred_encoding() -> String {
    "utf-8".to_string()
}

fn default_refresh_secs() -> u64 {
    60
}

fn default_legacy_encodings() -> BTreeMap<String, String> {
    [
        ("cs", "ISO-8859-2"),
        ("hu", "ISO-8859-2"),
        ("pl", "ISO-8859-2"),
        ("sk", "ISO-8859-2"),
        ("ru", "KOI8-R"),
        ("uk", "KOI8-U"),
        ("ja", "EUC-JP"),
        ("zh", "GB18030"),
    ]
    .into_iter()
    .map(|(lang, enc)| (lang.to_string(), enc.to_string()))
    .collect()
}

/// One explicitly configured catalog file for a locale.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    /// File name relative to `data_dir`.
    pub file: String,

    #[serde(default = "default_preferred_encoding")]
    pub encoding: String,

    /// Sorts the entry into the legacy band instead of the preferred one.
    #[serde(default)]
    pub legacy: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HintConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_base_name")]
    pub base_name: String,

    #[serde(default = "default_preferred_encoding")]
    pub preferred_encoding: String,

    /// language code -> encoding label of the legacy-encoded variant,
    /// stored as `<base_name>.<lang>.<label in lowercase>`.
    #[serde(default = "default_legacy_encodings")]
    pub legacy_encodings: BTreeMap<String, String>,

    /// locale -> explicit candidate list, replacing the naming convention.
    #[serde(default)]
    pub variants: BTreeMap<String, Vec<VariantSpec>>,

    /// Minimum seconds between two throttled hint rotations.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            base_name: default_base_name(),
            preferred_encoding: default_preferred_encoding(),
            legacy_encodings: default_legacy_encodings(),
            variants: BTreeMap::new(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl HintConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| {
            HintError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let config: HintConfig = serde_json::from_str(data)?;

        if config.base_name.trim().is_empty() {
            return Err(HintError::config("base_name must not be empty"));
        }

        Ok(config)
    }

    pub fn base_path(&self) -> PathBuf {
        self.data_dir.join(&self.base_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = HintConfig::from_json("{}").unwrap();
        assert_eq!(cfg.base_name, "mc.hint");
        assert_eq!(cfg.preferred_encoding, "utf-8");
        assert_eq!(cfg.refresh_secs, 60);
        assert_eq!(cfg.legacy_encodings.get("cs").map(String::as_str), Some("ISO-8859-2"));
        assert!(cfg.variants.is_empty());
    }

    #[test]
    fn explicit_variants_are_read() {
        let cfg = HintConfig::from_json(
            r#"{
                "data_dir": "/usr/share/mc",
                "variants": {
                    "cs": [
                        { "file": "mc.hint.cs" },
                        { "file": "mc.hint.cs.old", "encoding": "iso-8859-2", "legacy": true }
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.base_path(), PathBuf::from("/usr/share/mc/mc.hint"));
        let cs = &cfg.variants["cs"];
        assert_eq!(cs[0].encoding, "utf-8");
        assert!(!cs[0].legacy);
        assert!(cs[1].legacy);
    }

    #[test]
    fn blank_base_name_is_rejected() {
        let err = HintConfig::from_json(r#"{ "base_name": " " }"#).unwrap_err();
        assert_eq!(err.code(), "config");
    }
}
