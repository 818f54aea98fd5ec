use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use super::{GeoResolver, Territory};
use crate::model::{Config, LngLat, Polygon, Ring};

const COUNTRY_NAME_KEYS: [&str; 3] = ["NAME", "ADMIN", "NAME_LONG"];
const REGION_NAME_KEYS: [&str; 4] = ["name", "NAME", "name_en", "woe_name"];
const REGION_PARENT_KEYS: [&str; 3] = ["admin", "ADMIN", "sovereignt"];
/// Largest length difference for the containment fallback of region names.
const REGION_FUZZ: usize = 3;

/// Lower-case, `-`/`_` as spaces, no leading `the `.
pub fn normalize(name: &str) -> String {
    let lowered = name.to_lowercase().replace(['-', '_'], " ");
    let stripped = match lowered.strip_prefix("the") {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest,
        _ => lowered.as_str(),
    };
    stripped.trim().to_string()
}

struct Country {
    territory: Territory,
    /// Normalised NAME, ADMIN, NAME_LONG; empty when the property is missing.
    keys: [String; 3],
}

struct Region {
    territory: Territory,
    names: Vec<String>,
    parents: Vec<String>,
}

/// In-memory `GeoResolver` over Natural-Earth style feature collections.
pub struct GeoAtlas {
    countries: Vec<Country>,
    regions: Vec<Region>,
    aliases: HashMap<String, String>,
    fixed_centers: HashMap<String, [f64; 2]>,
}

impl GeoAtlas {
    /// An atlas that resolves nothing; every territory command becomes a no-op.
    pub fn empty(config: &Config) -> Self {
        Self {
            countries: Vec::new(),
            regions: Vec::new(),
            aliases: config.aliases.clone(),
            fixed_centers: config.fixed_centers.clone(),
        }
    }

    pub fn from_geojson(countries: &str, regions: Option<&str>, config: &Config) -> Result<Self> {
        let mut atlas = Self::empty(config);

        for feature in &features(countries).context("countries dataset")? {
            if let Some(country) = country_from_feature(feature)? {
                atlas.countries.push(country);
            }
        }

        if let Some(regions) = regions {
            for feature in &features(regions).context("regions dataset")? {
                if let Some(region) = region_from_feature(feature)? {
                    atlas.regions.push(region);
                }
            }
        }

        log::info!(
            "Atlas loaded: {} countries, {} regions",
            atlas.countries.len(),
            atlas.regions.len()
        );
        Ok(atlas)
    }

    pub fn load(countries: &Path, regions: Option<&Path>, config: &Config) -> Result<Self> {
        let countries_json = std::fs::read_to_string(countries)
            .with_context(|| format!("Reading {}", countries.display()))?;
        let regions_json = regions
            .map(|path| {
                std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))
            })
            .transpose()?;
        Self::from_geojson(&countries_json, regions_json.as_deref(), config)
    }

    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

impl GeoResolver for GeoAtlas {
    fn find_territory(&self, name: &str) -> Option<&Territory> {
        let normalized = normalize(name);
        if normalized.is_empty() {
            return None;
        }
        let search = self
            .aliases
            .get(&normalized)
            .map(String::as_str)
            .unwrap_or(&normalized);

        // NAME, then ADMIN, then NAME_LONG, each over the whole collection.
        for key in 0..COUNTRY_NAME_KEYS.len() {
            if let Some(c) = self
                .countries
                .iter()
                .find(|c| !c.keys[key].is_empty() && c.keys[key] == search)
            {
                return Some(&c.territory);
            }
        }

        let prefix_match = |key: &str| {
            !key.is_empty() && (key.starts_with(search) || search.starts_with(key))
        };
        self.countries
            .iter()
            .find(|c| prefix_match(c.keys[0].as_str()) || prefix_match(c.keys[1].as_str()))
            .map(|c| &c.territory)
    }

    fn find_subregion(&self, name: &str, parent: &str) -> Option<&Territory> {
        let n = normalize(name);
        let c = normalize(parent);
        if n.is_empty() || c.is_empty() {
            return None;
        }
        let ca = self.aliases.get(&c).map(String::as_str).unwrap_or(&c);

        let parent_match =
            |r: &Region| r.parents.iter().any(|p| *p == c || p == ca || p.contains(&c));

        let exact = self
            .regions
            .iter()
            .find(|r| r.names.iter().any(|x| *x == n) && parent_match(r));
        if let Some(r) = exact {
            return Some(&r.territory);
        }

        self.regions
            .iter()
            .find(|r| {
                r.names.iter().any(|x| {
                    x.len().abs_diff(n.len()) <= REGION_FUZZ && (x.contains(&n) || n.contains(x))
                }) && parent_match(r)
            })
            .map(|r| &r.territory)
    }

    fn representative_point(&self, territory: &Territory) -> LngLat {
        if let Some(&center) = self.fixed_centers.get(&territory.name.to_lowercase()) {
            return LngLat::from(center);
        }
        self.bounding_box(territory).center()
    }
}

// ─────────────────────────────────────────────────────
// GeoJSON walking

fn features(json: &str) -> Result<Vec<Value>> {
    let mut root: Value = serde_json::from_str(json)?;
    match root.get_mut("features").map(Value::take) {
        Some(Value::Array(features)) => Ok(features),
        _ => Err(anyhow!("file has no `features` array")),
    }
}

fn property<'a>(feature: &'a Value, key: &str) -> Option<&'a str> {
    feature
        .get("properties")
        .and_then(|p| p.get(key))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

fn country_from_feature(feature: &Value) -> Result<Option<Country>> {
    let Some(name) = property(feature, "NAME").or_else(|| property(feature, "ADMIN")) else {
        log::debug!("Skipping country feature without NAME/ADMIN");
        return Ok(None);
    };
    let keys = COUNTRY_NAME_KEYS.map(|k| property(feature, k).map(normalize).unwrap_or_default());
    let territory = Territory::new(name, polygons(feature).with_context(|| format!("country `{name}`"))?);

    Ok(Some(Country { territory, keys }))
}

fn region_from_feature(feature: &Value) -> Result<Option<Region>> {
    let raw_names: Vec<&str> = REGION_NAME_KEYS
        .iter()
        .filter_map(|k| property(feature, k))
        .collect();
    let Some(&name) = raw_names.first() else {
        log::debug!("Skipping region feature without a name");
        return Ok(None);
    };
    let raw_parents: Vec<&str> = REGION_PARENT_KEYS
        .iter()
        .filter_map(|k| property(feature, k))
        .collect();

    let mut territory =
        Territory::new(name, polygons(feature).with_context(|| format!("region `{name}`"))?);
    territory.parent = raw_parents.first().map(|p| p.to_string());

    Ok(Some(Region {
        territory,
        names: raw_names.into_iter().map(normalize).collect(),
        parents: raw_parents.into_iter().map(normalize).collect(),
    }))
}

/// Polygon and MultiPolygon geometries; anything else has no area to fill.
fn polygons(feature: &Value) -> Result<Vec<Polygon>> {
    let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
        return Ok(Vec::new());
    };
    let coordinates = geometry
        .get("coordinates")
        .ok_or_else(|| anyhow!("geometry missing `coordinates`"))?;

    match geometry.get("type").and_then(|t| t.as_str()) {
        Some("Polygon") => Ok(vec![polygon(coordinates)?]),
        Some("MultiPolygon") => coordinates
            .as_array()
            .ok_or_else(|| anyhow!("MultiPolygon coordinates must be an array"))?
            .iter()
            .map(polygon)
            .collect(),
        other => {
            log::debug!("Ignoring geometry type {other:?}");
            Ok(Vec::new())
        }
    }
}

fn polygon(value: &Value) -> Result<Polygon> {
    value
        .as_array()
        .ok_or_else(|| anyhow!("polygon must be an array of rings"))?
        .iter()
        .map(ring)
        .collect()
}

fn ring(value: &Value) -> Result<Ring> {
    value
        .as_array()
        .ok_or_else(|| anyhow!("ring must be an array of positions"))?
        .iter()
        .map(|pos| {
            // Positions may carry an altitude; only lng/lat are kept.
            match (
                pos.get(0).and_then(Value::as_f64),
                pos.get(1).and_then(Value::as_f64),
            ) {
                (Some(lng), Some(lat)) => Ok([lng, lat]),
                _ => Err(anyhow!("bad position {pos}")),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let test_cases = vec![
            ("France", "france"),
            ("The Gambia", "gambia"),
            ("Guinea-Bissau", "guinea bissau"),
            ("north_macedonia", "north macedonia"),
            ("  Chad ", "chad"),
            ("Theodoria", "theodoria"),
        ];

        for (input, expected) in test_cases {
            assert_eq!(normalize(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_polygon_and_multipolygon() {
        let feature = serde_json::json!({
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                    [[[5, 5, 100], [6, 5], [6, 6], [5, 5]]]
                ]
            }
        });
        let polys = polygons(&feature).unwrap();
        assert_eq!(polys.len(), 2);
        assert_eq!(polys[1][0][0], [5.0, 5.0]);

        let point = serde_json::json!({ "geometry": { "type": "Point", "coordinates": [1, 2] } });
        assert!(polygons(&point).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_missing_features() {
        let err = GeoAtlas::from_geojson(r#"{ "type": "Feature" }"#, None, &Config::default());
        assert!(err.is_err());
    }
}
