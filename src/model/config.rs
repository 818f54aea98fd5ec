use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::processor::ast::Command;

/// Read-only tables consulted while validating and executing a script.
///
/// Every field has a built-in default, so a JSON config file only needs to
/// list what it overrides.  A table given in the file replaces the built-in
/// one as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Color name → hex, in the order shown to script authors.
    pub palette: IndexMap<String, String>,
    /// Used when a command has no color token at all.
    pub default_color: String,
    /// Normalised territory alias → canonical normalised name.
    pub aliases: HashMap<String, String>,
    /// Representative-point overrides keyed by lower-case territory name, `[lng, lat]`.
    pub fixed_centers: HashMap<String, [f64; 2]>,
    /// Symbol catalog for `effect:` lines.
    pub effects: IndexMap<String, EffectDef>,
    pub settle: SettleTimes,
    pub cinematic: CinematicDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDef {
    pub label: String,
    pub category: String,
}

/// How long the executor waits after dispatching a camera command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleTimes {
    pub zoom_ms: u64,
    pub fly_ms: u64,
    pub cinematic_ms: u64,
}

impl Default for SettleTimes {
    fn default() -> Self {
        Self {
            zoom_ms: 600,
            fly_ms: 1300,
            cinematic_ms: 2100,
        }
    }
}

impl SettleTimes {
    /// Delay awaited after `cmd` has been dispatched; zero for fire-and-continue commands.
    pub fn for_command(&self, cmd: &Command) -> Duration {
        let ms = match cmd {
            Command::Zoom { .. } => self.zoom_ms,
            Command::Fly { .. } => self.fly_ms,
            Command::Cinematic { .. } => self.cinematic_ms,
            Command::Wait { ms } => *ms,
            _ => 0,
        };
        Duration::from_millis(ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CinematicDefaults {
    pub pitch: f64,
    pub bearing: f64,
}

impl Default for CinematicDefaults {
    fn default() -> Self {
        Self {
            pitch: 30.0,
            bearing: 0.0,
        }
    }
}

const PALETTE: &[(&str, &str)] = &[
    ("red", "#ff4757"),
    ("orange", "#ffa502"),
    ("yellow", "#ffda00"),
    ("gold", "#f9ca24"),
    ("green", "#2ed573"),
    ("blue", "#3742fa"),
    ("cyan", "#00d2d3"),
    ("purple", "#8854d0"),
    ("pink", "#ff6b81"),
    ("magenta", "#a55eea"),
    ("white", "#ffffff"),
    ("maroon", "#b71540"),
    ("coral", "#ff7675"),
    ("salmon", "#ffb8b8"),
    ("navy", "#1e3799"),
    ("lime", "#7bed9f"),
];

const ALIASES: &[(&str, &str)] = &[
    ("usa", "united states of america"),
    ("us", "united states of america"),
    ("america", "united states of america"),
    ("uk", "united kingdom"),
    ("britain", "united kingdom"),
    ("england", "united kingdom"),
    ("uae", "united arab emirates"),
    ("czech", "czechia"),
    ("russia", "russian federation"),
    ("holland", "netherlands"),
];

const FIXED_CENTERS: &[(&str, [f64; 2])] = &[
    ("france", [2.5, 46.6]),
    ("united kingdom", [-2.5, 54.5]),
    ("netherlands", [5.5, 52.2]),
    ("united states of america", [-98.5, 39.5]),
    ("denmark", [10.0, 56.0]),
    ("portugal", [-8.0, 39.6]),
    ("spain", [-3.5, 40.0]),
    ("norway", [10.0, 62.0]),
    ("russia", [37.0, 55.0]),
    ("russian federation", [37.0, 55.0]),
];

// (name, label, category)
const EFFECTS: &[(&str, &str, &str)] = &[
    ("explosion", "Explosion", "combat"),
    ("battle", "Battle", "combat"),
    ("bombing", "Bombing", "combat"),
    ("fire", "Fire / Destruction", "combat"),
    ("skull", "Casualties / Atrocity", "combat"),
    ("nuke", "Nuclear", "combat"),
    ("tank", "Armor / Tank", "military"),
    ("troops", "Infantry / Troops", "military"),
    ("plane", "Air Force", "military"),
    ("naval", "Navy / Fleet", "military"),
    ("oil", "Oil / Petroleum", "resources"),
    ("factory", "Industry / Factory", "resources"),
    ("port", "Port / Trade", "resources"),
    ("flag", "Flag / Claim", "political"),
    ("capital", "Capital / Key City", "political"),
    ("shield", "Defense / Fortification", "political"),
    ("treaty", "Peace / Treaty", "political"),
    ("uprising", "Uprising / Revolution", "political"),
    ("occupation", "Occupation", "political"),
];

impl Default for Config {
    fn default() -> Self {
        Self {
            palette: PALETTE
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            default_color: "#3b82f6".to_string(),
            aliases: ALIASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            fixed_centers: FIXED_CENTERS
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            effects: EFFECTS
                .iter()
                .map(|(name, label, category)| {
                    (
                        name.to_string(),
                        EffectDef {
                            label: label.to_string(),
                            category: category.to_string(),
                        },
                    )
                })
                .collect(),
            settle: SettleTimes::default(),
            cinematic: CinematicDefaults::default(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).context("parsing config JSON")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Reading {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Loading config {}", path.display()))
    }

    /// Hex color for a script token.
    ///
    /// Palette names resolve case-insensitively; anything else (`#hex`,
    /// unknown names) is forwarded as written.
    pub fn resolve_color(&self, token: Option<&str>) -> String {
        match token {
            None | Some("") => self.default_color.clone(),
            Some(t) => self
                .palette
                .get(&t.to_lowercase())
                .cloned()
                .unwrap_or_else(|| t.to_string()),
        }
    }

    /// `true` for `#hex` tokens and palette names.
    pub fn is_known_color(&self, token: &str) -> bool {
        token.starts_with('#') || self.palette.contains_key(&token.to_lowercase())
    }

    pub fn effect(&self, name: &str) -> Option<&EffectDef> {
        self.effects.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_color() {
        let config = Config::default();
        let test_cases = vec![
            (Some("red"), "#ff4757"),
            (Some("Navy"), "#1e3799"),
            (Some("#123456"), "#123456"),
            (Some("chartreuse"), "chartreuse"),
            (None, "#3b82f6"),
        ];

        for (token, expected) in test_cases {
            assert_eq!(config.resolve_color(token), expected, "token: {token:?}");
        }
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json(r#"{ "settle": { "fly_ms": 10 }, "default_color": "black" }"#)
            .unwrap();
        assert_eq!(config.settle.fly_ms, 10);
        assert_eq!(config.settle.zoom_ms, 600);
        assert_eq!(config.default_color, "black");
        assert_eq!(config.palette.len(), 16);
    }

    #[test]
    fn test_settle_times() {
        let settle = SettleTimes::default();
        let test_cases = vec![
            (Command::Zoom { target: "x".into() }, 600),
            (
                Command::Fly {
                    lat: 0.0,
                    lng: 0.0,
                    zoom: 3.0,
                },
                1300,
            ),
            (Command::Wait { ms: 42 }, 42),
            (Command::Year { text: "1991".into(), highlight: false }, 0),
        ];

        for (cmd, ms) in test_cases {
            assert_eq!(settle.for_command(&cmd), Duration::from_millis(ms), "{cmd:?}");
        }
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Config::from_json("{ palette: ").is_err());
    }
}
