use crate::model::hint::HintRecord;

/// Rewrites CRLF and lone CR terminators as LF.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Splits decoded catalog text into hint records.
///
/// A record is a run of non-blank lines; a blank line is one that holds only
/// whitespace. Runs of blank lines count as one boundary and blank lines at
/// either end are ignored. Lines inside a record are joined with `\n` after
/// dropping trailing whitespace. Nothing else is interpreted: a `Tip:` prefix
/// is ordinary text.
pub fn parse(text: &str) -> Vec<HintRecord> {
    let text = normalize_newlines(text);

    let mut records = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                records.push(HintRecord::new(current.join("\n")));
                current.clear();
            }
            continue;
        }
        current.push(line.trim_end());
    }

    if !current.is_empty() {
        records.push(HintRecord::new(current.join("\n")));
    }

    records
}
