//! Plain data shared by every stage: geographic value types and the
//! read-only `Config` injected into the executor and the validator.

mod config;

pub use config::{CinematicDefaults, Config, EffectDef, SettleTimes};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point as `[lng, lat]`, the order GeoJSON and the renderer use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.lng, self.lat)
    }
}

/// `[[minLng, minLat], [maxLng, maxLat]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: LngLat,
    pub max: LngLat,
}

impl BoundingBox {
    /// Smallest box around `points`; `None` for an empty iterator.
    pub fn around<I: IntoIterator<Item = LngLat>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for p in points {
            bbox.min.lng = bbox.min.lng.min(p.lng);
            bbox.min.lat = bbox.min.lat.min(p.lat);
            bbox.max.lng = bbox.max.lng.max(p.lng);
            bbox.max.lat = bbox.max.lat.max(p.lat);
        }
        Some(bbox)
    }

    pub fn center(&self) -> LngLat {
        LngLat {
            lng: (self.min.lng + self.max.lng) / 2.0,
            lat: (self.min.lat + self.max.lat) / 2.0,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Linear ring of `[lng, lat]` pairs.
pub type Ring = Vec<[f64; 2]>;
/// Outer ring followed by its holes.
pub type Polygon = Vec<Ring>;
