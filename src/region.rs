//! Regions: polygons tagged with the coordinate reference system their
//! coordinates are in. Anything that combines two regions insists the CRSs match,
//! there is no reprojection here.
use std::fmt::{self, Display};
use std::str::FromStr;

use geo::{BoundingRect, Contains, HasDimensions};
use geo_types::{Geometry, MultiPolygon, Point, Polygon, Rect};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wkt::Wkt;

use crate::errors::{HatchError, Result};
use crate::geo_types::boolean::BooleanOp;
use crate::geo_types::flatten::FlattenPolygons;

/// A coordinate reference system identifier such as `EPSG:29903`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    authority: String,
    code: u32,
}

impl Crs {
    pub fn new(authority: &str, code: u32) -> Crs {
        Crs {
            authority: authority.to_ascii_uppercase(),
            code,
        }
    }

    pub fn epsg(code: u32) -> Crs {
        Crs::new("EPSG", code)
    }

    /// TM75 / Irish Grid.
    pub fn irish_grid() -> Crs {
        Crs::epsg(29903)
    }

    /// WGS 84 longitude/latitude.
    pub fn wgs84() -> Crs {
        Crs::epsg(4326)
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    /// Fails with [`HatchError::CrsMismatch`] unless both are the same system.
    pub fn ensure_same(&self, other: &Crs) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(HatchError::CrsMismatch {
                left: self.clone(),
                right: other.clone(),
            })
        }
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

impl FromStr for Crs {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (authority, code) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("Expected AUTHORITY:CODE, got {:?}", s))?;
        if authority.is_empty() || !authority.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("Invalid CRS authority in {:?}", s));
        }
        let code = code
            .parse::<u32>()
            .map_err(|e| format!("Invalid CRS code in {:?}: {}", s, e))?;
        Ok(Crs::new(authority, code))
    }
}

impl TryFrom<String> for Crs {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> String {
        crs.to_string()
    }
}

/// # Region
/// An immutable area on the map: one or more polygons (with holes as needed)
/// and the CRS they were drawn in.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    geometry: MultiPolygon<f64>,
    crs: Crs,
}

impl Region {
    pub fn new(geometry: impl Into<MultiPolygon<f64>>, crs: Crs) -> Region {
        Region {
            geometry: geometry.into(),
            crs,
        }
    }

    pub fn from_polygon(polygon: Polygon<f64>, crs: Crs) -> Region {
        Region::new(MultiPolygon::new(vec![polygon]), crs)
    }

    /// Reads a POLYGON, MULTIPOLYGON (or a collection of them) from WKT.
    /// Anything without area comes back as [`HatchError::EmptyRegion`].
    pub fn from_wkt(text: &str, crs: Crs) -> Result<Region> {
        let wkt = Wkt::<f64>::from_str(text).map_err(|e| HatchError::Geometry(e.to_string()))?;
        let geometry =
            Geometry::<f64>::try_from(wkt).map_err(|e| HatchError::Geometry(e.to_string()))?;
        let polys = geometry.flatten_polys();
        if polys.is_empty() {
            return Err(HatchError::EmptyRegion);
        }
        Ok(Region::new(polys, crs))
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }

    /// Strict containment: points on the boundary are not inside.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.geometry.contains(point)
    }

    /// Dissolve two regions into one.
    pub fn union(&self, other: &Region) -> Result<Region> {
        self.crs.ensure_same(&other.crs)?;
        let merged = Geometry::MultiPolygon(self.geometry.clone())
            .union(&Geometry::MultiPolygon(other.geometry.clone()))?;
        Ok(Region::new(merged.flatten_polys(), self.crs.clone()))
    }

    /// Dissolve a whole set of regions (counties into a province, say) in one
    /// geos unary union.
    pub fn union_all<'a>(regions: impl IntoIterator<Item = &'a Region>) -> Result<Region> {
        let mut regions = regions.into_iter();
        let first = regions.next().ok_or(HatchError::EmptyRegion)?;
        let mut parts = vec![Geometry::MultiPolygon(first.geometry.clone())];
        for region in regions {
            first.crs.ensure_same(&region.crs)?;
            parts.push(Geometry::MultiPolygon(region.geometry.clone()));
        }
        debug!(parts = parts.len(), crs = %first.crs, "Dissolving regions");
        let merged = Geometry::GeometryCollection(parts.into()).unary_union()?;
        Ok(Region::new(merged.flatten_polys(), first.crs.clone()))
    }
}
