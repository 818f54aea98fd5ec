use std::fmt;

use serde::Serialize;

use super::{Anchor, ArrowLabels, ArrowStyle, CameraShot, FillStyle, MarkerId, MarkerSpec, Renderer};
use crate::geo::Territory;
use crate::model::{BoundingBox, LngLat};
use crate::processor::legend::LegendEntry;

/// One call received by a `RecordingRenderer`, with territories reduced to their names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RenderCall {
    DrawTerritory {
        name: String,
        color: String,
        fill: FillStyle,
    },
    DrawConnector {
        from: String,
        to: String,
        color: String,
    },
    DrawArrow {
        from: LngLat,
        to: LngLat,
        color: String,
        style: ArrowStyle,
        labels: Option<ArrowLabels>,
    },
    PlaceMarker {
        id: MarkerId,
        spec: MarkerSpec,
        at: LngLat,
        anchor: Anchor,
    },
    RemoveLastMarker,
    ClearConnectors,
    ClearSymbolMarkers,
    ShowYear {
        text: String,
        highlight: bool,
    },
    AddLegendEntry {
        label: String,
        color: String,
    },
    ShowAutoLegend {
        entries: Vec<LegendEntry>,
    },
    HideLegend,
    PanTo {
        lat: f64,
        lng: f64,
        zoom: f64,
    },
    PanToBounds {
        bounds: BoundingBox,
    },
    CinematicPanTo {
        shot: CameraShot,
    },
    ClearAll,
}

impl RenderCall {
    /// Calls that put something new on the surface.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            RenderCall::DrawTerritory { .. }
                | RenderCall::DrawConnector { .. }
                | RenderCall::DrawArrow { .. }
                | RenderCall::PlaceMarker { .. }
        )
    }
}

impl fmt::Display for RenderCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderCall::DrawTerritory { name, color, fill } => {
                write!(f, "fill {name} {color} {fill:?}")
            }
            RenderCall::DrawConnector { from, to, color } => {
                write!(f, "connect {from} -> {to} {color}")
            }
            RenderCall::DrawArrow {
                from, to, color, ..
            } => write!(f, "arrow {from} -> {to} {color}"),
            RenderCall::PlaceMarker { id, spec, at, .. } => {
                write!(f, "marker #{id} at {at}: {spec:?}")
            }
            RenderCall::RemoveLastMarker => f.write_str("remove last marker"),
            RenderCall::ClearConnectors => f.write_str("clear arrows"),
            RenderCall::ClearSymbolMarkers => f.write_str("clear effects"),
            RenderCall::ShowYear { text, highlight } => {
                write!(f, "year {text}{}", if *highlight { " (highlight)" } else { "" })
            }
            RenderCall::AddLegendEntry { label, color } => write!(f, "legend {label} {color}"),
            RenderCall::ShowAutoLegend { entries } => {
                write!(f, "auto legend ({} entries)", entries.len())
            }
            RenderCall::HideLegend => f.write_str("hide legend"),
            RenderCall::PanTo { lat, lng, zoom } => write!(f, "fly to {lat}, {lng} z{zoom}"),
            RenderCall::PanToBounds { bounds } => write!(f, "zoom to {bounds}"),
            RenderCall::CinematicPanTo { shot } => write!(
                f,
                "cinematic to {}, {} z{} pitch {} bearing {}",
                shot.lat, shot.lng, shot.zoom, shot.pitch, shot.bearing
            ),
            RenderCall::ClearAll => f.write_str("clear"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Camera {
    center: LngLat,
    zoom: f64,
    pitch: f64,
    bearing: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: LngLat::new(0.0, 20.0),
            zoom: 2.0,
            pitch: 0.0,
            bearing: 0.0,
        }
    }
}

/// Headless `Renderer` that records every call.
///
/// Used by the CLI to print a playback and by tests to assert on the exact
/// sequence of render operations.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<RenderCall>,
    markers: Vec<(MarkerId, MarkerSpec)>,
    next_marker: MarkerId,
    camera: Camera,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Calls after the most recent `clear_all`, or every call if there was none.
    pub fn since_last_clear(&self) -> &[RenderCall] {
        match self.calls.iter().rposition(|c| *c == RenderCall::ClearAll) {
            Some(i) => &self.calls[i + 1..],
            None => &self.calls,
        }
    }

    /// Markers currently on the surface, oldest first.
    pub fn markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.markers.iter().map(|(_, spec)| spec)
    }

    pub fn center(&self) -> LngLat {
        self.camera.center
    }

    fn record(&mut self, call: RenderCall) {
        log::info!("{call}");
        self.calls.push(call);
    }
}

impl Renderer for RecordingRenderer {
    fn draw_territory(&mut self, territory: &Territory, color: &str, fill: FillStyle) {
        self.record(RenderCall::DrawTerritory {
            name: territory.name.clone(),
            color: color.to_string(),
            fill,
        });
    }

    fn draw_connector(&mut self, from: &Territory, to: &Territory, color: &str) {
        self.record(RenderCall::DrawConnector {
            from: from.name.clone(),
            to: to.name.clone(),
            color: color.to_string(),
        });
    }

    fn draw_arrow(
        &mut self,
        from: LngLat,
        to: LngLat,
        color: &str,
        style: ArrowStyle,
        labels: Option<ArrowLabels>,
    ) {
        self.record(RenderCall::DrawArrow {
            from,
            to,
            color: color.to_string(),
            style,
            labels,
        });
    }

    fn place_marker(&mut self, spec: MarkerSpec, at: LngLat, anchor: Anchor) -> MarkerId {
        let id = self.next_marker;
        self.next_marker += 1;
        self.markers.push((id, spec.clone()));
        self.record(RenderCall::PlaceMarker {
            id,
            spec,
            at,
            anchor,
        });
        id
    }

    fn remove_last_marker(&mut self) {
        self.markers.pop();
        self.record(RenderCall::RemoveLastMarker);
    }

    fn clear_connectors(&mut self) {
        self.record(RenderCall::ClearConnectors);
    }

    fn clear_symbol_markers(&mut self) {
        self.markers.retain(|(_, spec)| !spec.is_symbol());
        self.record(RenderCall::ClearSymbolMarkers);
    }

    fn show_year(&mut self, text: &str, highlight: bool) {
        self.record(RenderCall::ShowYear {
            text: text.to_string(),
            highlight,
        });
    }

    fn add_legend_entry(&mut self, label: &str, color: &str) {
        self.record(RenderCall::AddLegendEntry {
            label: label.to_string(),
            color: color.to_string(),
        });
    }

    fn show_auto_legend(&mut self, entries: &[LegendEntry]) {
        self.record(RenderCall::ShowAutoLegend {
            entries: entries.to_vec(),
        });
    }

    fn hide_legend(&mut self) {
        self.record(RenderCall::HideLegend);
    }

    fn pan_to(&mut self, lat: f64, lng: f64, zoom: f64) {
        self.camera.center = LngLat::new(lng, lat);
        self.camera.zoom = zoom;
        self.record(RenderCall::PanTo { lat, lng, zoom });
    }

    fn pan_to_bounds(&mut self, bounds: BoundingBox) {
        self.camera.center = bounds.center();
        self.record(RenderCall::PanToBounds { bounds });
    }

    fn cinematic_pan_to(&mut self, shot: CameraShot) {
        self.camera = Camera {
            center: LngLat::new(shot.lng, shot.lat),
            zoom: shot.zoom,
            pitch: shot.pitch,
            bearing: shot.bearing,
        };
        self.record(RenderCall::CinematicPanTo { shot });
    }

    fn clear_all(&mut self) {
        self.markers.clear();
        self.next_marker = 0;
        self.record(RenderCall::ClearAll);
    }

    fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    fn pitch(&self) -> f64 {
        self.camera.pitch
    }

    fn bearing(&self) -> f64 {
        self.camera.bearing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ast::Direction;

    fn bubble(text: &str) -> MarkerSpec {
        MarkerSpec::Bubble {
            text: text.into(),
            color: "#3742fa".into(),
        }
    }

    #[test]
    fn test_marker_stack() {
        let mut r = RecordingRenderer::new();
        let a = r.place_marker(bubble("a"), LngLat::new(0.0, 0.0), Anchor::Center);
        r.place_marker(
            MarkerSpec::Symbol {
                effect: "tank".into(),
                label: "Armor / Tank".into(),
                color: "#ff4757".into(),
                scale: 1.0,
            },
            LngLat::new(1.0, 1.0),
            Anchor::Center,
        );
        let c = r.place_marker(
            MarkerSpec::Callout {
                text: "c".into(),
                direction: Direction::Left,
                color: "#ffffff".into(),
            },
            LngLat::new(2.0, 2.0),
            Anchor::Right,
        );
        assert_eq!((a, c), (0, 2));

        r.clear_symbol_markers();
        assert_eq!(r.markers().count(), 2);
        r.remove_last_marker();
        assert_eq!(r.markers().collect::<Vec<_>>(), vec![&bubble("a")]);

        r.remove_last_marker();
        r.remove_last_marker();
        assert_eq!(r.markers().count(), 0);
    }

    #[test]
    fn test_since_last_clear() {
        let mut r = RecordingRenderer::new();
        r.show_year("1914", false);
        assert_eq!(r.since_last_clear().len(), 1);

        r.clear_all();
        assert!(r.since_last_clear().is_empty());
        r.hide_legend();
        assert_eq!(r.since_last_clear(), &[RenderCall::HideLegend]);
        assert_eq!(r.calls().len(), 3);
    }

    #[test]
    fn test_camera_tracking() {
        let mut r = RecordingRenderer::new();
        r.pan_to(48.8, 2.3, 5.0);
        assert_eq!(r.zoom(), 5.0);
        assert_eq!(r.center(), LngLat::new(2.3, 48.8));

        r.cinematic_pan_to(CameraShot {
            lat: 10.0,
            lng: 20.0,
            zoom: 4.0,
            pitch: 45.0,
            bearing: -10.0,
        });
        assert_eq!((r.zoom(), r.pitch(), r.bearing()), (4.0, 45.0, -10.0));
    }
}
