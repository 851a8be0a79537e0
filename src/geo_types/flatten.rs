use geo_types::{Geometry, LineString, MultiLineString, MultiPolygon};

pub trait FlattenPolygons {
    fn flatten_polys(&self) -> MultiPolygon<f64>;
}

impl FlattenPolygons for Geometry<f64> {
    fn flatten_polys(&self) -> MultiPolygon<f64> {
        match self {
            Geometry::Polygon(poly) => MultiPolygon::new(vec![poly.clone()]),
            Geometry::MultiPolygon(polys) => polys.clone(),
            Geometry::Rect(rect) => MultiPolygon::new(vec![rect.to_polygon()]),
            Geometry::Triangle(tri) => MultiPolygon::new(vec![tri.to_polygon()]),
            Geometry::GeometryCollection(gc) => {
                MultiPolygon::new(gc.iter().flat_map(|g| g.flatten_polys().0).collect())
            }
            _ => MultiPolygon::new(vec![]), // Lines and points have no area to keep
        }
    }
}

/// Pulls every line out of a Geometry into one MultiLineString. Points (which
/// is what a clip produces where a line only grazes a corner) and lines with
/// fewer than two distinct coordinates are dropped.
pub trait FlattenLines {
    fn flatten_lines(&self) -> MultiLineString<f64>;
}

impl FlattenLines for Geometry<f64> {
    fn flatten_lines(&self) -> MultiLineString<f64> {
        let mut out = MultiLineString::new(vec![]);
        collect_lines(self, &mut out);
        out
    }
}

fn collect_lines(geo: &Geometry<f64>, existing: &mut MultiLineString<f64>) {
    match geo {
        Geometry::GeometryCollection(collection) => {
            for geo in collection {
                collect_lines(geo, existing)
            }
        }
        Geometry::MultiLineString(mls) => {
            existing
                .0
                .extend(mls.0.iter().filter(|ls| !is_degenerate(ls)).cloned());
        }
        Geometry::LineString(ls) if !is_degenerate(ls) => existing.0.push(ls.clone()),
        Geometry::Line(line) if line.start != line.end => {
            existing.0.push(LineString::new(vec![line.start, line.end]))
        }
        _ => (),
    }
}

fn is_degenerate(ls: &LineString<f64>) -> bool {
    match ls.0.first() {
        Some(first) => ls.0.iter().all(|c| c == first),
        None => true,
    }
}
