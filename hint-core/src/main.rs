use std::env;
use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process;

use hint_core::protocol::Core;
use hint_core::HintConfig;
use log::{error, info};

/// The message locale as the C library would pick it. `LANGUAGE` is left out
/// on purpose: it lists translation preferences, not the terminal's locale.
fn guess_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => match HintConfig::load(Path::new(&path)) {
            Ok(c) => c,
            Err(e) => {
                error!("{e}");
                process::exit(2);
            }
        },
        None => HintConfig::default(),
    };

    let locale = guess_locale();
    info!(
        "hint catalogs from {} for locale '{locale}'",
        config.data_dir.display()
    );

    let mut core = Core::new(config).with_default_locale(locale);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| core.handle(&line)));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => serde_json::json!({
                "status": "error",
                "code": "internal",
                "message": "internal core error"
            })
            .to_string(),
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}
