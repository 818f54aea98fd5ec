use std::fs;
use std::path::Path;

use mapscript::geo::{GeoAtlas, GeoResolver};
use mapscript::model::{BoundingBox, Config, LngLat};

fn atlas() -> GeoAtlas {
    GeoAtlas::load(
        Path::new("tests/fixtures/countries.geojson"),
        Some(Path::new("tests/fixtures/regions.geojson")),
        &Config::default(),
    )
    .expect("fixtures load")
}

#[test]
fn loads_named_features_only() {
    let atlas = atlas();
    // the unnamed lake feature is skipped
    assert_eq!(atlas.country_count(), 8);
    assert_eq!(atlas.region_count(), 4);
}

#[test]
fn finds_countries() {
    let atlas = atlas();
    let test_cases = vec![
        ("france", Some("France")),
        ("FRANCE", Some("France")),
        ("usa", Some("United States of America")),
        ("America", Some("United States of America")),
        ("The Gambia", Some("Gambia")),
        ("guinea_bissau", Some("Guinea-Bissau")),
        ("North Korea", Some("Dem. Rep. Korea")),
        ("democratic people's republic of korea", Some("Dem. Rep. Korea")),
        ("Azer", Some("Azerbaijan")),
        ("Germany Federal", Some("Germany")),
        ("Atlantis", None),
        // names with nothing left after normalising match no country
        ("-", None),
        ("  ", None),
        ("the -", None),
        ("The", None),
    ];

    for (query, expected) in test_cases {
        let found = atlas.find_territory(query).map(|t| t.name.as_str());
        assert_eq!(found, expected, "query: {query}");
    }
}

#[test]
fn finds_subregions_within_their_country() {
    let atlas = atlas();
    let test_cases = vec![
        ("Artsakh", "Azerbaijan", Some("Artsakh")),
        ("bavaria", "germany", Some("Bayern")),
        ("Texas", "usa", Some("Texas")),
        ("Texa", "United States", Some("Texas")),
        ("Kent", "Germany", None),
        ("Artsakh", "Armenia", None),
        ("Artsakh", "-", None),
        ("_", "Azerbaijan", None),
    ];

    for (name, parent, expected) in test_cases {
        let found = atlas.find_subregion(name, parent).map(|t| t.name.as_str());
        assert_eq!(found, expected, "query: {name} in {parent}");
    }

    let artsakh = atlas.find_subregion("artsakh", "azerbaijan").unwrap();
    assert_eq!(artsakh.parent.as_deref(), Some("Azerbaijan"));
}

#[test]
fn points_and_bounds() {
    let atlas = atlas();

    let france = atlas.find_territory("France").unwrap();
    assert_eq!(atlas.representative_point(france), LngLat::new(2.5, 46.6));

    let armenia = atlas.find_territory("Armenia").unwrap();
    assert_eq!(atlas.representative_point(armenia), LngLat::new(45.0, 40.0));

    let azerbaijan = atlas.find_territory("Azerbaijan").unwrap();
    assert_eq!(
        atlas.bounding_box(azerbaijan),
        BoundingBox {
            min: LngLat::new(44.0, 38.0),
            max: LngLat::new(51.0, 42.0),
        }
    );
}

#[test]
fn reads_geojson_strings() {
    let json = fs::read_to_string("tests/fixtures/countries.geojson").unwrap();
    let atlas = GeoAtlas::from_geojson(&json, None, &Config::default()).unwrap();
    assert_eq!(atlas.region_count(), 0);
    assert!(atlas.find_subregion("Texas", "usa").is_none());
    assert!(atlas.find_territory("germany").is_some());
}

#[test]
fn custom_aliases_come_from_config() {
    let config = Config::from_json(r#"{ "aliases": { "hayastan": "armenia" } }"#).unwrap();
    let json = fs::read_to_string("tests/fixtures/countries.geojson").unwrap();
    let atlas = GeoAtlas::from_geojson(&json, None, &config).unwrap();

    assert_eq!(
        atlas.find_territory("Hayastan").map(|t| t.name.as_str()),
        Some("Armenia")
    );
    // the built-in table was replaced as a whole
    assert!(atlas.find_territory("usa").is_none());
}
