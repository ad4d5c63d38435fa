#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    HintGet,
    HintNext,
    CatalogInfo,
    CatalogReload,
    DetectEncoding,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "hint.get" => Command::HintGet,
            "hint.next" => Command::HintNext,
            "catalog.info" => Command::CatalogInfo,
            "catalog.reload" => Command::CatalogReload,
            "encoding.detect" => Command::DetectEncoding,
            _ => Command::Unknown,
        }
    }
}
