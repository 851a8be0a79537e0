use crate::errors::{HatchError, Result};
use crate::geo_types::boolean::BooleanOp;
use crate::geo_types::flatten::FlattenLines;
use crate::region::{Crs, Region};
use geo::bounding_rect::BoundingRect;
use geo_types::{Geometry, MultiLineString, MultiPolygon, Polygon, Rect};
use rayon::prelude::*;
use std::fmt::Debug;
use tracing::{debug, info};

pub mod pattern;
pub use pattern::Pattern;

/// # HatchPattern
/// Returns a MultiLineString which draws a hatch pattern over the entire
/// bbox area, before any clipping. Set up as a trait so new patterns can be
/// added without touching the clipping and merging.
pub trait HatchPattern: Debug + Send + Sync {
    fn generate(&self, bbox: &Rect<f64>, scale: f64) -> Result<MultiLineString<f64>>;
}

/// # Hatch
/// Fill the interior of a shape with the lines of a [`HatchPattern`]. Scale is
/// the side of the square grid cells the pattern is drawn on, in the shape's
/// own units; smaller is denser.
///
/// The result is clipped to the shape (boundary included), has any stray
/// points from the clip thrown away, and is line-merged so touching pieces
/// come back as one LineString. An empty result is fine: nothing to draw.
///
/// # Example hatching
/// ```rust
/// use map_hatch::geo_types::hatch::{Hatch, Pattern};
/// use geo_types::{LineString, Polygon};
///
/// let square = Polygon::new(
///     LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
///     vec![],
/// );
/// let lines = square.hatch(&Pattern::Horizontal, 5.0).expect("hatched");
/// assert_eq!(lines.0.len(), 2);
/// ```
pub trait Hatch {
    fn hatch(&self, pattern: &dyn HatchPattern, scale: f64) -> Result<MultiLineString<f64>>;
}

impl Hatch for MultiPolygon<f64> {
    fn hatch(&self, pattern: &dyn HatchPattern, scale: f64) -> Result<MultiLineString<f64>> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(HatchError::InvalidScale(scale));
        }
        let bbox = self.bounding_rect().ok_or(HatchError::EmptyRegion)?;

        let raw = pattern.generate(&bbox, scale)?;
        if raw.0.is_empty() {
            return Ok(MultiLineString::new(vec![]));
        }
        let raw_count = raw.0.len();

        let clipped = Geometry::MultiLineString(raw)
            .intersection(&Geometry::MultiPolygon(self.clone()))?
            .flatten_lines();
        if clipped.0.is_empty() {
            debug!(raw_count, "Hatch missed the shape entirely");
            return Ok(clipped);
        }

        let merged = Geometry::MultiLineString(clipped)
            .line_merge()?
            .flatten_lines();
        debug!(raw_count, parts = merged.0.len(), "Hatched shape");
        Ok(merged)
    }
}

impl Hatch for Polygon<f64> {
    fn hatch(&self, pattern: &dyn HatchPattern, scale: f64) -> Result<MultiLineString<f64>> {
        MultiPolygon::new(vec![self.clone()]).hatch(pattern, scale)
    }
}

impl Hatch for Region {
    fn hatch(&self, pattern: &dyn HatchPattern, scale: f64) -> Result<MultiLineString<f64>> {
        self.geometry().hatch(pattern, scale)
    }
}

/// # HatchLines
/// The clipped, merged hatching for a region, still tagged with the region's
/// CRS so it can be drawn on the same map.
#[derive(Debug, Clone, PartialEq)]
pub struct HatchLines {
    lines: MultiLineString<f64>,
    crs: Crs,
}

impl HatchLines {
    pub fn new(lines: MultiLineString<f64>, crs: Crs) -> HatchLines {
        HatchLines { lines, crs }
    }

    pub fn lines(&self) -> &MultiLineString<f64> {
        &self.lines
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn is_empty(&self) -> bool {
        self.lines.0.is_empty()
    }

    /// Number of separate LineStrings after merging.
    pub fn len(&self) -> usize {
        self.lines.0.len()
    }

    pub fn total_length(&self) -> f64 {
        self.lines
            .iter()
            .flat_map(|ls| ls.lines())
            .map(|l| l.dx().hypot(l.dy()))
            .sum()
    }

    pub fn into_inner(self) -> MultiLineString<f64> {
        self.lines
    }
}

/// Hatch one region: grid over its bounding box, one segment per cell, clip,
/// drop anything that isn't a line, merge.
///
/// Fails with [`HatchError::InvalidScale`] for a scale that is not a positive
/// finite number and [`HatchError::EmptyRegion`] when there is nothing to
/// hatch. A scale too coarse to cross the region is not an error, it just
/// gives empty [`HatchLines`].
pub fn generate(region: &Region, scale: f64, pattern: Pattern) -> Result<HatchLines> {
    let lines = region.hatch(&pattern, scale)?;
    Ok(HatchLines::new(lines, region.crs().clone()))
}

/// Hatch a batch of regions in parallel. Each region is independent, so a
/// failure in one doesn't stop the rest; results come back in input order.
pub fn generate_all(regions: &[Region], scale: f64, pattern: Pattern) -> Vec<Result<HatchLines>> {
    info!(regions = regions.len(), scale, %pattern, "Hatching regions");
    regions
        .par_iter()
        .map(|region| generate(region, scale, pattern))
        .collect()
}

/// Crosshatching is just two hatches drawn over each other; this runs both.
pub fn crosshatch(
    region: &Region,
    scale: f64,
    first: Pattern,
    second: Pattern,
) -> Result<(HatchLines, HatchLines)> {
    Ok((
        generate(region, scale, first)?,
        generate(region, scale, second)?,
    ))
}
