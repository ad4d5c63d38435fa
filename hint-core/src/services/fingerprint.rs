use sha2::{Digest, Sha256};

use crate::model::hint::HintCatalog;

/// SHA-256 of the catalog's records, each separated by one blank line.
///
/// Two variants with the same wording hash alike regardless of the encoding
/// or line endings they were shipped in.
pub fn catalog_digest(catalog: &HintCatalog) -> String {
    let mut hasher = Sha256::new();
    for (i, record) in catalog.records().iter().enumerate() {
        if i > 0 {
            hasher.update(b"\n\n");
        }
        hasher.update(record.as_str().as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::candidate::CandidateTier;
    use crate::model::hint::CatalogLocale;
    use crate::parsers::hint_file;
    use std::path::PathBuf;

    fn hash_text(text: &str) -> String {
        hex::encode(Sha256::digest(text.as_bytes()))
    }

    fn catalog(text: &str, encoding: &'static encoding_rs::Encoding) -> HintCatalog {
        HintCatalog::new(
            CatalogLocale::Named("cs".into()),
            encoding,
            PathBuf::from("mc.hint.cs"),
            CandidateTier::Preferred,
            hint_file::parse(text),
        )
        .unwrap()
    }

    #[test]
    fn digest_matches_hash_of_canonical_text() {
        let c = catalog("\r\nA\r\n\r\n\r\nB\nB2\n", encoding_rs::UTF_8);
        assert_eq!(catalog_digest(&c), hash_text("A\n\nB\nB2"));
    }

    #[test]
    fn diverging_variants_hash_differently() {
        let a = catalog("Report bugs to mc-devel@gnome.org", encoding_rs::UTF_8);
        let b = catalog("Report bugs to mc-devel@gnu.org", encoding_rs::ISO_8859_2);
        assert_ne!(catalog_digest(&a), catalog_digest(&b));
    }

    #[test]
    fn known_sha256() {
        assert_eq!(
            hash_text("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
