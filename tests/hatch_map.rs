use map_hatch::config::{parse_features, MapStyle};
use map_hatch::prelude::*;

// Two toy "counties" on the Irish Grid that share an edge, and an island.
const WEST: &str = "POLYGON ((100000 200000, 150000 200000, 150000 260000, 100000 240000, 100000 200000))";
const EAST: &str = "POLYGON ((150000 200000, 210000 210000, 200000 270000, 150000 260000, 150000 200000))";
const ISLAND: &str = "POLYGON ((230000 220000, 240000 220000, 240000 230000, 230000 230000, 230000 220000))";

fn region(wkt: &str) -> Region {
    Region::from_wkt(wkt, Crs::irish_grid()).expect("valid wkt")
}

#[test]
fn province_hatch_stays_inside() {
    let province = Region::union_all(&[region(WEST), region(EAST)]).expect("union");
    assert_eq!(province.geometry().0.len(), 1);

    let hatch = generate(&province, 5000.0, Pattern::Right2Left).expect("hatch");
    assert!(!hatch.is_empty());
    assert_eq!(hatch.crs(), province.crs());

    // The midpoint of every merged line's first segment is strictly inside:
    // no province edge runs at 45 degrees, so no hatch line can lie along one.
    for line in hatch.lines() {
        let (first, second) = (line.0[0], line.0[1]);
        let mid = geo_types::Point::new((first.x + second.x) / 2.0, (first.y + second.y) / 2.0);
        assert!(province.contains(&mid), "{:?} outside", mid);
    }
}

#[test]
fn merged_lines_beat_raw_segments() {
    // One diagonal per cell, but touching cells' diagonals merge into long strokes.
    let square = region("POLYGON ((0 0, 100 0, 100 100, 0 100, 0 0))");
    let hatch = generate(&square, 10.0, Pattern::Left2Right).expect("hatch");
    assert!(hatch.len() < 100, "got {} parts", hatch.len());
    assert_eq!(hatch.len(), 19);
}

#[test]
fn batch_matches_single_calls() {
    let regions = vec![region(WEST), region(EAST), region(ISLAND)];
    let batch = generate_all(&regions, 4000.0, Pattern::Vertical);
    for (region, result) in regions.iter().zip(batch) {
        let single = generate(region, 4000.0, Pattern::Vertical).expect("single");
        assert_eq!(result.expect("batch"), single);
    }
}

#[test]
fn coarse_hatch_on_island_is_empty_not_error() {
    // A single huge cell: its rising diagonal starts on the island's corner and
    // cuts straight across, its falling diagonal misses the island altogether.
    let island = region(ISLAND);
    let rising = generate(&island, 1_000_000.0, Pattern::Right2Left).expect("hatch");
    assert_eq!(rising.len(), 1);
    let falling = generate(&island, 1_000_000.0, Pattern::Left2Right).expect("hatch");
    assert!(falling.is_empty());
    let diamond = region("POLYGON ((0 10, 10 0, 0 -10, -10 0, 0 10))");
    let hatch = generate(&diamond, 1_000_000.0, Pattern::Horizontal).expect("hatch");
    assert!(hatch.is_empty());
}

#[test]
fn choropleth_end_to_end() {
    let style = MapStyle::from_ron_str(
        r##"MapStyle(
            crs: "EPSG:29903",
            outline: Stroke(colour: "black", width: 0.4),
            lower: 0.0,
            bands: [
                Band(label: "under 50", upper: 50.0, fill: Some("#ffffcc")),
                Band(label: "50 to 500", upper: 500.0, fill: Some("#a1dab4"),
                     hatch: Some(HatchStyle(pattern: "left2right", scale: 3000.0))),
                Band(label: "500 plus", upper: 100000.0, fill: Some("#225ea8"),
                     hatch: Some(HatchStyle(pattern: "horizontal", scale: 3000.0, cross: true,
                                            stroke: Stroke(colour: "white", width: 0.2)))),
            ],
        )"##,
    )
    .expect("style");

    let features = parse_features(
        &format!(
            r#"[
                Feature(name: "West", wkt: "{WEST}", value: 30.0),
                Feature(name: "East", wkt: "{EAST}", value: 120.0),
                Feature(name: "Island", wkt: "{ISLAND}", value: 900.0),
            ]"#
        ),
        &style.crs,
    )
    .expect("features");

    let svg = render_choropleth(&features, &style).expect("map").to_string();
    // 3 fills, 1 hatch for East, 2 for the crosshatched island, 3 outlines.
    assert_eq!(svg.matches("<path").count(), 9);
    assert!(svg.contains("#225ea8"));
    assert!(svg.contains("50 to 500"));
}

#[test]
fn crosshatch_halves_are_perpendicular_patterns() {
    let square = region("POLYGON ((0 0, 40 0, 40 40, 0 40, 0 0))");
    let (a, b) = crosshatch(&square, 5.0, Pattern::Horizontal, Pattern::Horizontal.perpendicular())
        .expect("crosshatch");
    assert_eq!(a.len(), b.len());
    assert!((a.total_length() - b.total_length()).abs() < 1e-6);
}
