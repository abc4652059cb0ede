//! CLI color helpers.
//!
//! All functions respect `NO_COLOR`, `FORCE_COLOR` and TTY detection via
//! `owo-colors`' `if_supports_color()`.

use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

/// Call once from main.rs when `--no-color` is passed.
pub fn set_no_color() {
    // SAFETY: Called once at startup before any threads are spawned.
    unsafe { std::env::set_var("NO_COLOR", "1") };
}

/// Session names and other primary identifiers.
pub fn accent(text: &str) -> String {
    text.if_supports_color(Stdout, |t| t.cyan()).to_string()
}

pub fn success(text: &str) -> String {
    text.if_supports_color(Stdout, |t| t.green()).to_string()
}

pub fn caution(text: &str) -> String {
    text.if_supports_color(Stdout, |t| t.yellow()).to_string()
}

pub fn bold(text: &str) -> String {
    text.if_supports_color(Stdout, |t| t.bold()).to_string()
}

/// Secondary info such as paths and hints.
pub fn muted(text: &str) -> String {
    text.if_supports_color(Stdout, |t| t.dimmed()).to_string()
}

/// Error styling for stderr messages.
pub fn error(text: &str) -> String {
    text.if_supports_color(Stderr, |t| t.red()).to_string()
}

pub fn warning(text: &str) -> String {
    text.if_supports_color(Stderr, |t| t.yellow()).to_string()
}
