// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output helpers shared by the subcommands.

use std::io::IsTerminal;

use colored::Colorize;

/// Color is used only on a terminal and never with `--plain`.
pub fn use_color(plain: bool) -> bool {
    !plain && std::io::stdout().is_terminal()
}

pub fn success(text: &str, color: bool) -> String {
    if color {
        text.green().to_string()
    } else {
        text.to_string()
    }
}

pub fn warning(text: &str, color: bool) -> String {
    if color {
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}

pub fn failure(text: &str, color: bool) -> String {
    if color {
        text.red().to_string()
    } else {
        text.to_string()
    }
}

pub fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

pub fn muted(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}
