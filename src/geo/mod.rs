//! Territory lookup as the executor sees it.
//!
//! The executor only talks to a `GeoResolver`; `GeoAtlas` is the bundled
//! implementation backed by GeoJSON feature collections.

mod atlas;

pub use atlas::{GeoAtlas, normalize};

use crate::model::{BoundingBox, LngLat, Polygon};

/// A named country or sub-region polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Territory {
    /// Canonical display name.
    pub name: String,
    /// Parent country for sub-regions.
    pub parent: Option<String>,
    pub polygons: Vec<Polygon>,
}

impl Territory {
    pub fn new(name: impl Into<String>, polygons: Vec<Polygon>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            polygons,
        }
    }

    /// Box around every ring; `None` when the territory has no coordinates.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::around(
            self.polygons
                .iter()
                .flatten()
                .flatten()
                .map(|&p| LngLat::from(p)),
        )
    }
}

/// Name → territory lookup.
///
/// Lookups never fail loudly: an unknown name is `None`, and the executor
/// turns that into a skipped command.
pub trait GeoResolver {
    /// Case-insensitive, alias-aware, falls back to prefix matches.
    fn find_territory(&self, name: &str) -> Option<&Territory>;

    /// Like `find_territory`, restricted to sub-regions of `parent`.
    fn find_subregion(&self, name: &str, parent: &str) -> Option<&Territory>;

    /// Where markers and arrows attach to the territory.
    fn representative_point(&self, territory: &Territory) -> LngLat {
        self.bounding_box(territory).center()
    }

    fn bounding_box(&self, territory: &Territory) -> BoundingBox {
        territory.bounds().unwrap_or(BoundingBox {
            min: LngLat::new(0.0, 0.0),
            max: LngLat::new(0.0, 0.0),
        })
    }
}
