use crate::domain::models::JsonOut;
use serde::Serialize;

pub const YELLOW: &str = "\x1b[33m";
pub const BRIGHT_YELLOW: &str = "\x1b[93m";
pub const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

pub fn paint(color: &str, text: &str) -> String {
    format!("{}{}{}", color, text, RESET)
}

pub fn print_json<T: Serialize>(ok: bool, data: T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok, data })?
    );
    Ok(())
}

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        print_json(true, data)
    } else {
        for d in data {
            println!("{}", row(d));
        }
        Ok(())
    }
}

/// Human-facing progress line. Suppressed in JSON mode so stdout stays one document.
pub fn say(json: bool, line: impl AsRef<str>) {
    if !json {
        println!("{}", line.as_ref());
    }
}

pub fn warn_line(json: bool, line: impl AsRef<str>) {
    if json {
        tracing::warn!("{}", line.as_ref());
    } else {
        println!("{}", paint(RED, line.as_ref()));
    }
}
