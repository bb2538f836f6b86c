//! Terminal output for CLI handlers.
//!
//! Human-readable lines by default, one `{"type", "payload"}` JSON object per
//! line with `--json`, and nothing but warnings and errors with `--quiet`.

use std::fmt::Display;
use std::io::IsTerminal;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::{json, Value};

use super::command::ColorChoice;

/// Output mode resolved from the global flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    pub verbose: u8,
    /// ANSI styling on or off, after resolving `auto`.
    pub color: bool,
}

impl OutputConfig {
    #[must_use]
    pub fn new(json: bool, quiet: bool, verbose: u8, color: &ColorChoice) -> Self {
        let color = match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stdout().is_terminal(),
        };
        Self {
            json,
            quiet,
            verbose,
            color,
        }
    }

    /// Informational lines are dropped only in quiet text mode.
    fn shows_info(self) -> bool {
        self.json || !self.quiet
    }
}

static MODE: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn mode() -> OutputConfig {
    *MODE.get_or_init(RwLock::default).read()
}

pub fn configure(config: OutputConfig) {
    *MODE.get_or_init(RwLock::default).write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    mode().json
}

#[must_use]
pub fn is_quiet() -> bool {
    mode().quiet
}

#[must_use]
pub fn verbosity() -> u8 {
    mode().verbose
}

fn envelope(kind: &str, payload: Value) -> Value {
    json!({ "type": kind, "payload": payload })
}

/// Informational line: JSON envelope in JSON mode, `text` otherwise, nothing
/// when quiet.
fn info(kind: &str, payload: Value, text: impl FnOnce() -> String) {
    let mode = mode();
    if !mode.shows_info() {
        return;
    }
    if mode.json {
        println!("{}", envelope(kind, payload));
    } else {
        println!("{}", text());
    }
}

fn paint(value: impl Display, style: impl FnOnce(&str) -> String) -> String {
    let text = value.to_string();
    if mode().color {
        style(&text)
    } else {
        text
    }
}

pub fn header(version: &str) {
    info("header", json!({ "app": "flipper", "version": version }), || {
        format!(
            "{} {}\n",
            paint("flipper", |s| s.bold().to_string()),
            paint(version, |s| s.dimmed().to_string())
        )
    });
}

/// `label` padded into a column, then `value`.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    let payload = json!({ "label": label, "value": value });
    info("field", payload, || {
        format!("  {} {value}", paint(format!("{label:<14}"), |s| s.dimmed().to_string()))
    });
}

pub fn section(title: &str) {
    info("section", json!({ "title": title }), || {
        format!("\n{}", paint(title, |s| s.bold().to_string()))
    });
}

pub fn success(message: &str) {
    info("success", json!({ "message": message }), || {
        format!("  {} {message}", paint("✓", |s| s.green().to_string()))
    });
}

pub fn note(message: &str) {
    info("note", json!({ "message": message }), || {
        format!("  {}", paint(message, |s| s.dimmed().to_string()))
    });
}

/// Shown even with `--quiet`.
pub fn warning(message: &str) {
    if is_json() {
        println!("{}", envelope("warning", json!({ "message": message })));
    } else {
        println!("  {} {message}", paint("⚠", |s| s.yellow().to_string()));
    }
}

/// Always written to stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", envelope("error", json!({ "message": message })));
    } else {
        eprintln!("  {} {message}", paint("×", |s| s.red().to_string()));
    }
}

/// Structured command result; callers use it only in JSON mode.
pub fn json_output(kind: &str, payload: Value) {
    println!("{}", envelope(kind, payload));
}

pub fn positive(value: impl Display) -> String {
    paint(value, |s| s.green().to_string())
}

pub fn negative(value: impl Display) -> String {
    paint(value, |s| s.red().to_string())
}

pub fn highlight(value: impl Display) -> String {
    paint(value, |s| s.cyan().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_hides_info_in_text_mode_only() {
        let never = ColorChoice::Never;
        assert!(!OutputConfig::new(false, true, 0, &never).shows_info());
        assert!(OutputConfig::new(true, true, 0, &never).shows_info());
        assert!(OutputConfig::new(false, false, 2, &never).shows_info());
    }

    #[test]
    fn explicit_color_choice_wins() {
        assert!(OutputConfig::new(false, false, 0, &ColorChoice::Always).color);
        assert!(!OutputConfig::new(false, false, 0, &ColorChoice::Never).color);
    }

    #[test]
    fn envelope_wraps_payload() {
        let line = envelope("evaluation", json!({ "profit": "62.00" }));
        assert_eq!(line["type"], "evaluation");
        assert_eq!(line["payload"]["profit"], "62.00");
    }
}
