use crate::errors::{HatchError, Result};
use geo_types::{coord, Geometry, LineString, MultiLineString, Polygon};
use geos::{CoordSeq, Geom};

/// Square grids with an explicit corner enumeration; the scaffold hatch
/// lines are built on.
pub mod grid;

/// Hatching! Fill your regions with lines, which is what a plotter (or a
/// black and white map) can actually draw.
pub mod hatch;

/// Trait to convert geometry into SVG path data, and the page transform
/// that puts a map extent onto paper.
pub mod svg;

/// Helpers to flatten Geometry into MultiPolygons or MultiLineStrings.
pub mod flatten;

/// Boolean ops for geo_types, courtesy of geos.
pub mod boolean;

/// Conversion from geo_types into geos, covering the cases the geos `geo`
/// feature leaves out (Line, Rect, MultiLineString, collections).
pub trait ToGeos {
    fn to_geos(&self) -> Result<geos::Geometry>;
}

impl ToGeos for Geometry<f64> {
    fn to_geos(&self) -> Result<geos::Geometry> {
        Ok(match self {
            Geometry::GeometryCollection(collection) => {
                let parts = collection
                    .iter()
                    .map(|item| item.to_geos())
                    .collect::<Result<Vec<geos::Geometry>>>()?;
                geos::Geometry::create_geometry_collection(parts)?
            }
            Geometry::Point(p) => geos::Geometry::try_from(p)?,
            Geometry::Line(line) => geos::Geometry::create_line_string(CoordSeq::new_from_vec(
                &[
                    vec![line.start.x, line.start.y],
                    vec![line.end.x, line.end.y],
                ],
            )?)?,
            Geometry::Rect(rect) => geos::Geometry::try_from(&Polygon::new(
                LineString::from(vec![
                    rect.min(),
                    coord! {x: rect.max().x, y: rect.min().y},
                    rect.max(),
                    coord! {x: rect.min().x, y: rect.max().y},
                    rect.min(),
                ]),
                vec![],
            ))?,
            Geometry::LineString(line) => geos::Geometry::try_from(line)?,
            Geometry::Polygon(poly) => geos::Geometry::try_from(poly)?,
            Geometry::MultiPolygon(polys) => geos::Geometry::try_from(polys)?,
            Geometry::MultiLineString(mls) => mls.to_geos()?,
            _ => {
                return Err(HatchError::Geometry(
                    "Unsupported geometry type for geos".into(),
                ))
            }
        })
    }
}

impl ToGeos for MultiLineString<f64> {
    fn to_geos(&self) -> Result<geos::Geometry> {
        let lines = self
            .0
            .iter()
            .filter(|line| line.0.len() >= 2)
            .map(geos::Geometry::try_from)
            .collect::<std::result::Result<Vec<geos::Geometry>, geos::Error>>()?;
        Ok(geos::Geometry::create_multiline_string(lines)?)
    }
}

/// Bring a geos result back into geo_types. Empty results come back as an
/// empty GeometryCollection rather than whatever flavour of EMPTY geos made.
pub fn from_geos(geometry: geos::Geometry) -> Result<Geometry<f64>> {
    if geometry.is_empty()? {
        return Ok(Geometry::GeometryCollection(Default::default()));
    }
    Geometry::<f64>::try_from(geometry).map_err(HatchError::from)
}
