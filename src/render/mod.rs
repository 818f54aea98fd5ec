//! The drawing surface the timeline drives.
//!
//! Everything visual lives behind `Renderer`; the crate ships only
//! `RecordingRenderer`, which keeps a log of calls and a little camera state.

mod recording;

pub use recording::{RecordingRenderer, RenderCall};

use serde::Serialize;

use crate::geo::Territory;
use crate::model::{BoundingBox, LngLat};
use crate::processor::ast::{Animation, Direction};
use crate::processor::legend::LegendEntry;

/// How a territory polygon is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStyle {
    Solid(Animation),
    /// Striped fill of an occupied region.
    Occupied,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrowStyle {
    pub curve: f64,
    pub width: f64,
    /// Zero draws no arrow head.
    pub head_size: f64,
}

impl ArrowStyle {
    /// Straight, thin, headless: what a coordinate `line:` draws.
    pub const PLAIN_LINE: ArrowStyle = ArrowStyle {
        curve: 0.0,
        width: 0.5,
        head_size: 0.0,
    };
}

/// Text shown at either end of an attack arrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrowLabels {
    pub from: String,
    pub to: String,
}

/// What a positioned marker looks like. Colors are already resolved to hex.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MarkerSpec {
    Bubble {
        text: String,
        color: String,
    },
    Label {
        text: String,
        size: u32,
        color: String,
    },
    Callout {
        text: String,
        direction: Direction,
        color: String,
    },
    /// Icon from the effect catalog.
    Symbol {
        effect: String,
        label: String,
        color: String,
        scale: f64,
    },
}

impl MarkerSpec {
    pub fn is_symbol(&self) -> bool {
        matches!(self, MarkerSpec::Symbol { .. })
    }
}

/// Which side of the marker sits on its coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    #[default]
    Center,
    Left,
    Right,
}

pub type MarkerId = usize;

/// Camera target of a `cinematic:` move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraShot {
    pub lat: f64,
    pub lng: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

pub trait Renderer {
    fn draw_territory(&mut self, territory: &Territory, color: &str, fill: FillStyle);
    fn draw_connector(&mut self, from: &Territory, to: &Territory, color: &str);
    fn draw_arrow(
        &mut self,
        from: LngLat,
        to: LngLat,
        color: &str,
        style: ArrowStyle,
        labels: Option<ArrowLabels>,
    );

    fn place_marker(&mut self, spec: MarkerSpec, at: LngLat, anchor: Anchor) -> MarkerId;
    /// No-op when nothing is placed.
    fn remove_last_marker(&mut self);
    /// Connectors and arrows.
    fn clear_connectors(&mut self);
    fn clear_symbol_markers(&mut self);

    fn show_year(&mut self, text: &str, highlight: bool);
    fn add_legend_entry(&mut self, label: &str, color: &str);
    fn show_auto_legend(&mut self, entries: &[LegendEntry]);
    fn hide_legend(&mut self);

    fn pan_to(&mut self, lat: f64, lng: f64, zoom: f64);
    fn pan_to_bounds(&mut self, bounds: BoundingBox);
    fn cinematic_pan_to(&mut self, shot: CameraShot);

    /// Back to the state of a freshly loaded surface.
    fn clear_all(&mut self);

    fn zoom(&self) -> f64;
    fn pitch(&self) -> f64;
    fn bearing(&self) -> f64;
}
