//! Advisory checks run before a fresh playback.
//!
//! Nothing here rejects a script; every finding is a `Diagnostic` the host
//! may show next to the offending line.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::ast::{Command, Script};
use crate::model::Config;

/// How many palette names a "not a valid color" message lists.
const PALETTE_HINT_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 0-based source line.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line + 1, self.message)
    }
}

pub fn check(script: &Script, config: &Config) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let mut country_colors: HashMap<String, &str> = HashMap::new();

    for (line, cmd) in script.entries() {
        if let Some(token) = cmd.color_token() {
            if !config.is_known_color(token) {
                let hint: Vec<&str> = config
                    .palette
                    .keys()
                    .take(PALETTE_HINT_LEN)
                    .map(String::as_str)
                    .collect();
                out.push(Diagnostic {
                    line,
                    message: format!(
                        "\"{token}\" is not a valid color. Available: {}...",
                        hint.join(", ")
                    ),
                });
            }
        }

        match cmd {
            Command::Country { name, color, .. } => {
                let key = name.to_lowercase();
                if let Some(previous) = country_colors.get(&key) {
                    if !previous.eq_ignore_ascii_case(color) {
                        out.push(Diagnostic {
                            line,
                            message: format!(
                                "\"{name}\" is already colored \"{previous}\". A country can only show one color at a time."
                            ),
                        });
                    }
                }
                country_colors.insert(key, color);
            }
            Command::Effect { effect_name, .. } if config.effect(effect_name).is_none() => {
                out.push(Diagnostic {
                    line,
                    message: format!("\"{effect_name}\" is not a known effect"),
                });
            }
            _ => {}
        }
    }

    out
}
