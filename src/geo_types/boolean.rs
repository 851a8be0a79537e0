use crate::errors::Result;
use crate::geo_types::{from_geos, ToGeos};
use geo_types::Geometry;
use geos::Geom;

/// Boolean operations trait. Used to give boolean caps to geo_types
/// shapes. Basically just a wrapper on geos boolean ops.
pub trait BooleanOp
where
    Self: Sized,
{
    /// The combination of both other and self
    fn union(&self, other: &Self) -> Result<Self>;

    /// Returns only the portion of self that overlaps other
    fn intersection(&self, other: &Self) -> Result<Self>;

    /// Unary union; faster method of unioning a whole geometry collection
    fn unary_union(&self) -> Result<Self>;

    /// Merge touching lines into the longest strings possible.
    fn line_merge(&self) -> Result<Self>;
}

impl BooleanOp for Geometry<f64> {
    fn union(&self, other: &Self) -> Result<Self> {
        let geos_self = self.to_geos()?;
        let geos_other = other.to_geos()?;
        from_geos(geos_self.union(&geos_other)?)
    }

    fn intersection(&self, other: &Self) -> Result<Self> {
        let geos_self = self.to_geos()?;
        let geos_other = other.to_geos()?;
        from_geos(geos_self.intersection(&geos_other)?)
    }

    fn unary_union(&self) -> Result<Self> {
        from_geos(self.to_geos()?.unary_union()?)
    }

    fn line_merge(&self) -> Result<Self> {
        from_geos(self.to_geos()?.line_merge()?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo_types::flatten::{FlattenLines, FlattenPolygons};
    use geo::Area;
    use geo_types::{LineString, MultiLineString, Polygon};

    fn square(x0: f64, y0: f64, side: f64) -> Geometry<f64> {
        Geometry::Polygon(Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + side, y0),
                (x0 + side, y0 + side),
                (x0, y0 + side),
                (x0, y0),
            ]),
            vec![],
        ))
    }

    #[test]
    fn test_union_of_adjacent_squares() {
        let both = square(0.0, 0.0, 1.0)
            .union(&square(1.0, 0.0, 1.0))
            .expect("union");
        let polys = both.flatten_polys();
        assert_eq!(polys.0.len(), 1);
        assert!((polys.unsigned_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_intersection_clips_line() {
        let line = Geometry::LineString(LineString::from(vec![(-5.0, 0.5), (5.0, 0.5)]));
        let clipped = line
            .intersection(&square(0.0, 0.0, 1.0))
            .expect("intersection")
            .flatten_lines();
        assert_eq!(clipped.0.len(), 1);
        assert_eq!(clipped.0[0].0.len(), 2);
    }

    #[test]
    fn test_line_merge_joins_touching_segments() {
        let mls = Geometry::MultiLineString(MultiLineString::new(vec![
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]),
            LineString::from(vec![(1.0, 0.0), (2.0, 0.0)]),
            LineString::from(vec![(5.0, 0.0), (6.0, 0.0)]),
        ]));
        let merged = mls.line_merge().expect("merge").flatten_lines();
        assert_eq!(merged.0.len(), 2);
    }
}
