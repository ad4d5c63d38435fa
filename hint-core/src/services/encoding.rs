use std::borrow::Cow;
use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::error::{HintError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub fn for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| HintError::UnknownEncoding(label.to_string()))
}

/// Decodes `bytes` under exactly `encoding`.
///
/// Returns `None` on any malformed sequence; nothing is replaced or cut off.
/// A UTF-8 BOM is skipped when the declared encoding is UTF-8, other BOMs are
/// not sniffed.
pub fn decode_strict<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Option<Cow<'a, str>> {
    let bytes = if encoding == UTF_8 {
        bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
    } else {
        bytes
    };

    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub bom: bool,
    pub candidates: Vec<EncodingCandidate>,
}

/// Best guess at the encoding of a catalog file. Diagnostic only: the
/// resolver always decodes with the declared encoding.
pub fn sniff(bytes: &[u8]) -> EncodingDetectionResult {
    if bytes.starts_with(UTF8_BOM) {
        return EncodingDetectionResult {
            best: "utf-8".into(),
            confidence: 0.99,
            bom: true,
            candidates: vec![EncodingCandidate {
                name: "utf-8".into(),
                confidence: 0.99,
            }],
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);

    let encoding = detector.guess(None, true);
    let best = encoding.name().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = vec![EncodingCandidate {
        name: best.clone(),
        confidence,
    }];

    // Web-oriented guesses; catalogs were written with the ISO/KOI8 siblings.
    let sibling = match best.as_str() {
        "windows-1250" => Some("iso-8859-2"),
        "windows-1251" => Some("koi8-r"),
        "gbk" => Some("gb18030"),
        _ => None,
    };
    if let Some(name) = sibling {
        candidates.push(EncodingCandidate {
            name: name.into(),
            confidence: (confidence - 0.05).max(0.0),
        });
    }

    EncodingDetectionResult {
        best,
        confidence,
        bom: false,
        candidates,
    }
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult> {
    let bytes = fs::read(path)?;
    Ok(sniff(&bytes))
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}
