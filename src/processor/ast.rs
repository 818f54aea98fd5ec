//! Typed commands produced from script lines.
//!
//! Every variant holds plain values only (names, color tokens, numbers), so a
//! `Command` can be cloned, compared and serialised freely and never points at
//! anything owned by a renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default color token of `bubble:` and `legend:` lines.
pub const DEFAULT_BUBBLE_COLOR: &str = "blue";
/// Default color token of `effect:` lines.
pub const DEFAULT_EFFECT_COLOR: &str = "red";
/// Default color token of `arrow:` lines.
pub const DEFAULT_ARROW_COLOR: &str = "white";
pub const DEFAULT_CURVE: f64 = 0.15;
pub const DEFAULT_ARROW_WIDTH: f64 = 1.0;
pub const DEFAULT_LABEL_SIZE: u32 = 14;
pub const DEFAULT_EFFECT_SIZE: f64 = 1.0;

/// Fill animation of a `country:` or `region:` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    #[default]
    None,
    Pulse,
    Fade,
    Radial,
    Sweep,
}

impl Animation {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "none" => Some(Animation::None),
            "pulse" => Some(Animation::Pulse),
            "fade" => Some(Animation::Fade),
            "radial" => Some(Animation::Radial),
            "sweep" => Some(Animation::Sweep),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Animation::None => "none",
            Animation::Pulse => "pulse",
            Animation::Fade => "fade",
            Animation::Radial => "radial",
            Animation::Sweep => "sweep",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoveScope {
    /// Most recently placed marker.
    Last,
    /// Every connector / attack arrow.
    Arrows,
    /// Every effect symbol.
    Effects,
}

/// One end of a `line:` or `attack:` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    /// `lat lng` literal.
    Coordinates { lat: f64, lng: f64 },
    /// Territory name, resolved when the command executes.
    Territory(String),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Coordinates { lat, lng } => write!(f, "{lat:.1}, {lng:.1}"),
            Endpoint::Territory(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Legend {
    /// `legend: "text", color`
    Entry { label: String, color: String },
    /// `legend: auto` – derive entries from the territories of the script.
    Auto,
    /// `legend: hide`
    Hide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Command {
    /// `Name: color[, animation]` – fill a whole country.
    Country {
        name: String,
        color: String,
        animation: Animation,
    },

    /// `region: Name, Country, color[, occupied | animation]`.
    Region {
        name: String,
        country: String,
        color: String,
        animation: Animation,
        occupied: bool,
    },

    /// `line: From, To, color` – plain connector.
    Line {
        from: Endpoint,
        to: Endpoint,
        color: String,
    },

    /// `attack: From, To, color[, curve[, width[, headSize]]]`.
    Attack {
        from: Endpoint,
        to: Endpoint,
        color: String,
        curve: f64,
        width: f64,
        #[serde(rename = "headSize")]
        head_size: f64,
    },

    /// `bubble: lat, lng, "text"[, color]`.
    Bubble {
        lat: f64,
        lng: f64,
        text: String,
        color: String,
    },

    /// `label: lat, lng, "text"[, size[, color]]`.
    Label {
        lat: f64,
        lng: f64,
        text: String,
        size: u32,
        color: Option<String>,
    },

    /// `arrow: lat, lng, "text"[, direction[, color]]` – text callout.
    Arrow {
        lat: f64,
        lng: f64,
        text: String,
        direction: Direction,
        color: String,
    },

    /// `year: "text"[, highlight]`.
    Year { text: String, highlight: bool },

    /// `effect: lat, lng, name[, color[, size]]` – symbol from the effect catalog.
    Effect {
        lat: f64,
        lng: f64,
        #[serde(rename = "effectName")]
        effect_name: String,
        color: String,
        size: f64,
    },

    Legend(Legend),

    /// `zoom: Territory` – frame a territory.
    Zoom { target: String },

    /// `fly: lat, lng, zoom`.
    Fly { lat: f64, lng: f64, zoom: f64 },

    /// `cinematic: lat, lng, zoom[, pitch[, bearing]]`.
    Cinematic {
        lat: f64,
        lng: f64,
        zoom: f64,
        pitch: Option<f64>,
        bearing: Option<f64>,
    },

    /// `wait: N[ms|s]`.
    Wait { ms: u64 },

    /// `remove: last|arrows|effects`.
    Remove { scope: RemoveScope },
}

impl Command {
    /// Keyword of the line this command comes from (`country` for the fallback form).
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Country { .. } => "country",
            Command::Region { .. } => "region",
            Command::Line { .. } => "line",
            Command::Attack { .. } => "attack",
            Command::Bubble { .. } => "bubble",
            Command::Label { .. } => "label",
            Command::Arrow { .. } => "arrow",
            Command::Year { .. } => "year",
            Command::Effect { .. } => "effect",
            Command::Legend(_) => "legend",
            Command::Zoom { .. } => "zoom",
            Command::Fly { .. } => "fly",
            Command::Cinematic { .. } => "cinematic",
            Command::Wait { .. } => "wait",
            Command::Remove { .. } => "remove",
        }
    }

    /// Color token as written in the script, if the command carries one.
    pub fn color_token(&self) -> Option<&str> {
        match self {
            Command::Country { color, .. }
            | Command::Region { color, .. }
            | Command::Line { color, .. }
            | Command::Attack { color, .. }
            | Command::Bubble { color, .. }
            | Command::Arrow { color, .. }
            | Command::Effect { color, .. }
            | Command::Legend(Legend::Entry { color, .. }) => Some(color.as_str()),
            Command::Label { color, .. } => color.as_deref(),
            _ => None,
        }
    }
}

/// One parsed script: commands plus the 0-based source line each came from.
///
/// Both vectors always have the same length; the only way to grow a script
/// is `push`, which appends to both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Script {
    commands: Vec<Command>,
    source_lines: Vec<usize>,
    /// Lines that looked like commands but matched no rule.
    rejected_lines: Vec<usize>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command, source_line: usize) {
        self.commands.push(command);
        self.source_lines.push(source_line);
    }

    pub fn reject(&mut self, source_line: usize) {
        self.rejected_lines.push(source_line);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn source_lines(&self) -> &[usize] {
        &self.source_lines
    }

    pub fn rejected_lines(&self) -> &[usize] {
        &self.rejected_lines
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub fn source_line(&self, index: usize) -> Option<usize> {
        self.source_lines.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// `(source_line, command)` pairs in execution order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Command)> {
        self.source_lines.iter().copied().zip(self.commands.iter())
    }
}
