use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use encoding_rs::{Encoding, UTF_8};
use serde_json::{json, Value};

use crate::error::HintError;
use crate::model::config::HintConfig;
use crate::model::hint::{HintCatalog, HintRecord, SelectMode};
use crate::model::locale::LocaleId;
use crate::services::session::HintSession;
use crate::services::source::{ByteSource, FsSource};
use crate::services::{encoding, fingerprint, selector};

mod command;
pub use command::Command;

type SessionKey = (String, Option<&'static str>);

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, code: &str, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "code": code,
        "message": message.into()
    })
    .to_string()
}

fn hint_error(id: Value, e: &HintError) -> String {
    err(id, e.code(), e.to_string())
}

fn hint_payload(catalog: &HintCatalog, record: &HintRecord) -> Value {
    json!({
        "hint": record.text,
        "one_line": record.one_line(),
        "locale": catalog.locale().to_string(),
        "encoding": catalog.source_encoding().name(),
        "source": catalog.source().display().to_string(),
        "tier": catalog.tier(),
    })
}

/// Request handler for the host UI. Owns one `HintSession` per
/// (locale, encoding) pair that has been asked for.
pub struct Core<S = FsSource> {
    config: HintConfig,
    source: Arc<S>,
    default_locale: String,
    default_encoding: Option<&'static Encoding>,
    sessions: HashMap<SessionKey, HintSession<Arc<S>>>,
}

impl Core<FsSource> {
    pub fn new(config: HintConfig) -> Self {
        Self::with_source(config, FsSource)
    }
}

impl<S: ByteSource> Core<S> {
    pub fn with_source(config: HintConfig, source: S) -> Self {
        Self {
            config,
            source: Arc::new(source),
            default_locale: String::new(),
            default_encoding: None,
            sessions: HashMap::new(),
        }
    }

    /// Locale used when a request names none. A non-UTF-8 codeset in it
    /// (`cs_CZ.ISO-8859-2`) pins that encoding for such requests.
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self.default_encoding = LocaleId::parse(&self.default_locale)
            .codeset()
            .and_then(|cs| Encoding::for_label(cs.as_bytes()))
            .filter(|enc| *enc != UTF_8);
        self
    }

    fn session_key(&self, payload: &Value) -> Result<SessionKey, HintError> {
        let explicit_locale = payload.get("locale").and_then(|v| v.as_str());
        let label = payload.get("encoding").and_then(|v| v.as_str());

        let locale = explicit_locale.unwrap_or(&self.default_locale).to_string();
        let requested = match label {
            Some(label) => Some(encoding::for_label(label)?),
            None if explicit_locale.is_none() => self.default_encoding,
            None => None,
        };

        Ok((locale, requested.map(|e| e.name())))
    }

    fn session(&mut self, payload: &Value) -> Result<&HintSession<Arc<S>>, HintError> {
        let key = self.session_key(payload)?;

        if !self.sessions.contains_key(&key) {
            let requested = match key.1 {
                Some(name) => Some(encoding::for_label(name)?),
                None => None,
            };
            let session =
                HintSession::with_source(&self.config, Arc::clone(&self.source), &key.0, requested)?;
            self.sessions.insert(key.clone(), session);
        }

        self.sessions
            .get(&key)
            .ok_or_else(|| HintError::config("session cache lost its entry"))
    }

    pub fn handle(&mut self, input: &str) -> String {
        let req: Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(_) => {
                return json!({
                    "status": "error",
                    "code": "json",
                    "message": "invalid json"
                })
                .to_string();
            }
        };

        let id = get_id(&req);
        let payload = get_payload(&req);

        match Command::from(get_cmd(&req)) {
            Command::Ping => ok(id, json!({ "message": "hint-core alive" })),

            Command::HintGet => {
                let catalog = match self.session(payload).and_then(|s| s.catalog()) {
                    Ok(c) => c,
                    Err(e) => return hint_error(id, &e),
                };

                // reduce in u64: usize may be 32 bits
                let mode = match payload.get("index").and_then(|v| v.as_u64()) {
                    Some(i) => SelectMode::Sequential((i % catalog.len() as u64) as usize),
                    None => SelectMode::Random,
                };
                let record = selector::select_hint(&catalog, mode);
                ok(id, hint_payload(&catalog, record))
            }

            Command::HintNext => {
                let force = payload
                    .get("force")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);

                let session = match self.session(payload) {
                    Ok(s) => s,
                    Err(e) => return hint_error(id, &e),
                };
                let next = session
                    .next_hint(force)
                    .and_then(|hint| Ok((hint, session.catalog()?)));

                match next {
                    Ok((Some(record), catalog)) => ok(id, hint_payload(&catalog, &record)),
                    Ok((None, _)) => ok(id, json!({ "hint": Value::Null })),
                    Err(e) => hint_error(id, &e),
                }
            }

            Command::CatalogInfo => {
                let session = match self.session(payload) {
                    Ok(s) => s,
                    Err(e) => return hint_error(id, &e),
                };
                let candidates: Vec<Value> = session
                    .candidates()
                    .iter()
                    .map(|c| {
                        json!({
                            "path": c.path.display().to_string(),
                            "encoding": c.encoding_name(),
                            "tier": c.tier,
                        })
                    })
                    .collect();

                match session.catalog() {
                    Ok(catalog) => ok(
                        id,
                        json!({
                            "locale": catalog.locale().to_string(),
                            "encoding": catalog.source_encoding().name(),
                            "source": catalog.source().display().to_string(),
                            "tier": catalog.tier(),
                            "records": catalog.len(),
                            "fingerprint": fingerprint::catalog_digest(&catalog),
                            "candidates": candidates,
                        }),
                    ),
                    Err(e) => hint_error(id, &e),
                }
            }

            Command::CatalogReload => {
                let key = match self.session_key(payload) {
                    Ok(k) => k,
                    Err(e) => return hint_error(id, &e),
                };
                let reloaded = match self.sessions.get_mut(&key) {
                    Some(session) => {
                        session.reload();
                        true
                    }
                    None => false,
                };
                ok(id, json!({ "reloaded": reloaded }))
            }

            Command::DetectEncoding => {
                let path_str = payload.get("path").and_then(|v| v.as_str()).unwrap_or("");
                if path_str.is_empty() {
                    return err(id, "config", "payload.path is required");
                }
                match encoding::detect_from_file(&PathBuf::from(path_str)) {
                    Ok(result) => ok(id, serde_json::to_value(result).unwrap_or(json!({}))),
                    Err(e) => hint_error(id, &e),
                }
            }

            Command::Unknown => err(id, "unknown_command", "unknown command"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::source::MemorySource;

    fn core() -> Core<MemorySource> {
        let source = MemorySource::new()
            .with_file("/share/mc.hint", b"Base one\n\nBase two".to_vec())
            .with_file("/share/mc.hint.cs", "Tip: první\n\nTip: druhý\nřádek".as_bytes().to_vec())
            .with_file("/share/mc.hint.cs.iso-8859-2", b"P\xF8\xEDkaz".to_vec());
        Core::with_source(HintConfig::with_data_dir("/share"), source)
    }

    fn call(core: &mut Core<MemorySource>, line: &str) -> Value {
        serde_json::from_str(&core.handle(line)).unwrap()
    }

    #[test]
    fn ping_echoes_id() {
        let resp = call(&mut core(), r#"{"id": 7, "cmd": "ping"}"#);
        assert_eq!(resp["id"], 7);
        assert_eq!(resp["status"], "ok");
    }

    #[test]
    fn sequential_hint_for_locale() {
        let mut core = core();
        let resp = call(
            &mut core,
            r#"{"id": 1, "cmd": "hint.get", "payload": {"locale": "cs", "index": 3}}"#,
        );
        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["payload"]["hint"], "Tip: druhý\nřádek");
        assert_eq!(resp["payload"]["one_line"], "Tip: druhý řádek");
        assert_eq!(resp["payload"]["locale"], "cs");
        assert_eq!(resp["payload"]["tier"], "preferred");
    }

    #[test]
    fn large_index_wraps_like_small_one() {
        let mut core = core();
        let small = call(
            &mut core,
            r#"{"cmd": "hint.get", "payload": {"locale": "cs", "index": 1}}"#,
        );
        let large = call(
            &mut core,
            r#"{"cmd": "hint.get", "payload": {"locale": "cs", "index": 4294967297}}"#,
        );
        let max = call(
            &mut core,
            r#"{"cmd": "hint.get", "payload": {"locale": "cs", "index": 18446744073709551615}}"#,
        );

        assert_eq!(small["payload"]["hint"], "Tip: druhý\nřádek");
        assert_eq!(large["payload"]["hint"], small["payload"]["hint"]);
        assert_eq!(max["payload"]["hint"], small["payload"]["hint"]);
    }

    #[test]
    fn explicit_encoding_pins_legacy_variant() {
        let mut core = core();
        let resp = call(
            &mut core,
            r#"{"cmd": "hint.get", "payload": {"locale": "cs", "encoding": "iso-8859-2", "index": 0}}"#,
        );
        assert_eq!(resp["payload"]["hint"], "Příkaz");
        assert_eq!(resp["payload"]["encoding"], "ISO-8859-2");
    }

    #[test]
    fn default_locale_codeset_pins_encoding() {
        let mut core = core().with_default_locale("cs_CZ.ISO-8859-2");
        let resp = call(&mut core, r#"{"cmd": "hint.get", "payload": {"index": 0}}"#);
        assert_eq!(resp["payload"]["hint"], "Příkaz");
    }

    #[test]
    fn unknown_locale_uses_base_catalog() {
        let mut core = core();
        let resp = call(
            &mut core,
            r#"{"cmd": "hint.get", "payload": {"locale": "de_DE.UTF-8", "index": 1}}"#,
        );
        assert_eq!(resp["payload"]["hint"], "Base two");
        assert_eq!(resp["payload"]["locale"], "default");
    }

    #[test]
    fn missing_catalogs_report_unavailable() {
        let mut core = Core::with_source(HintConfig::default(), MemorySource::new());
        let resp = call(&mut core, r#"{"id": "x", "cmd": "hint.get"}"#);
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["code"], "catalog_unavailable");
    }

    #[test]
    fn bad_encoding_label_is_an_error() {
        let mut core = core();
        let resp = call(
            &mut core,
            r#"{"cmd": "hint.get", "payload": {"encoding": "nope-42"}}"#,
        );
        assert_eq!(resp["code"], "unknown_encoding");
    }

    #[test]
    fn next_is_throttled() {
        let mut core = core();
        let first = call(&mut core, r#"{"cmd": "hint.next"}"#);
        assert!(first["payload"]["hint"].is_string());

        let second = call(&mut core, r#"{"cmd": "hint.next"}"#);
        assert!(second["payload"]["hint"].is_null());

        let forced = call(&mut core, r#"{"cmd": "hint.next", "payload": {"force": true}}"#);
        assert!(forced["payload"]["hint"].is_string());
    }

    #[test]
    fn catalog_info_lists_candidates_and_fingerprint() {
        let mut core = core();
        let resp = call(&mut core, r#"{"cmd": "catalog.info", "payload": {"locale": "cs"}}"#);
        let payload = &resp["payload"];

        assert_eq!(payload["records"], 2);
        assert_eq!(payload["source"], "/share/mc.hint.cs");
        assert_eq!(payload["fingerprint"].as_str().map(str::len), Some(64));
        assert_eq!(payload["candidates"].as_array().map(Vec::len), Some(3));
        assert_eq!(payload["candidates"][2]["tier"], "base");
    }

    #[test]
    fn reload_only_touches_known_sessions() {
        let mut core = core();
        let resp = call(&mut core, r#"{"cmd": "catalog.reload", "payload": {"locale": "cs"}}"#);
        assert_eq!(resp["payload"]["reloaded"], false);

        call(&mut core, r#"{"cmd": "hint.get", "payload": {"locale": "cs"}}"#);
        let resp = call(&mut core, r#"{"cmd": "catalog.reload", "payload": {"locale": "cs"}}"#);
        assert_eq!(resp["payload"]["reloaded"], true);
    }

    #[test]
    fn invalid_json_and_unknown_command() {
        let mut core = core();
        assert_eq!(call(&mut core, "{nope")["message"], "invalid json");
        assert_eq!(
            call(&mut core, r#"{"cmd": "hint.shuffle"}"#)["code"],
            "unknown_command"
        );
    }
}
