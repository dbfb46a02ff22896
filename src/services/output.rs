use crate::domain::models::JsonOut;
use serde::Serialize;

/// Prints `data` as a `{"ok": true, "data": ...}` envelope when `json` is
/// set, otherwise one line per entry returned by `lines`.
pub fn emit<T: Serialize>(
    json: bool,
    data: &T,
    lines: impl Fn(&T) -> Vec<String>,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for line in lines(data) {
            println!("{}", line);
        }
    }
    Ok(())
}
