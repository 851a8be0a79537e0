use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Polygon, Rect};
use nalgebra::{Affine2, Matrix3, Point2};
use ::svg::node::element::path::Data;

/// Transform that fits a map extent into a page box (in millimetres), keeping
/// the aspect ratio, centring it, and flipping the y axis: maps count northings
/// up the page, SVG counts down. `None` if the extent has no size at all or
/// the page box has no room.
pub fn fit_extent(extent: &Rect<f64>, page: &Rect<f64>) -> Option<Affine2<f64>> {
    let (ew, eh) = (extent.width(), extent.height());
    let (pw, ph) = (page.width(), page.height());
    if pw <= 0.0 || ph <= 0.0 {
        return None;
    }
    let scale = match (ew > 0.0, eh > 0.0) {
        (true, true) => (pw / ew).min(ph / eh),
        (true, false) => pw / ew,
        (false, true) => ph / eh,
        (false, false) => return None,
    };
    let offset_x = page.min().x + (pw - ew * scale) / 2.0;
    let offset_y = page.min().y + (ph - eh * scale) / 2.0;
    let tx = offset_x - extent.min().x * scale;
    let ty = offset_y + extent.max().y * scale;
    Some(Affine2::from_matrix_unchecked(Matrix3::new(
        scale, 0.0, tx, //
        0.0, -scale, ty, //
        0.0, 0.0, 1.0,
    )))
}

fn apply(transform: &Affine2<f64>, c: &Coord<f64>) -> (f64, f64) {
    let p = transform.transform_point(&Point2::new(c.x, c.y));
    (p.x, p.y)
}

/// Geometry that can be written as SVG path data, after going through a page
/// transform. Returns `None` when there is nothing to draw.
pub trait ToSvg {
    fn to_path_data(&self, transform: &Affine2<f64>) -> Option<Data>;
}

// svg numbers are f32, plenty for millimetres on a page.
fn page_point(transform: &Affine2<f64>, c: &Coord<f64>) -> (f32, f32) {
    let (x, y) = apply(transform, c);
    (x as f32, y as f32)
}

fn line_data(data: Data, line: &LineString<f64>, transform: &Affine2<f64>, close: bool) -> Data {
    let mut coords = line.0.iter();
    let Some(first) = coords.next() else {
        return data;
    };
    let mut data = data.move_to(page_point(transform, first));
    for c in coords {
        data = data.line_to(page_point(transform, c));
    }
    if close {
        data = data.close();
    }
    data
}

impl ToSvg for LineString<f64> {
    fn to_path_data(&self, transform: &Affine2<f64>) -> Option<Data> {
        if self.0.len() < 2 {
            return None;
        }
        Some(line_data(Data::new(), self, transform, false))
    }
}

impl ToSvg for MultiLineString<f64> {
    fn to_path_data(&self, transform: &Affine2<f64>) -> Option<Data> {
        let lines: Vec<&LineString<f64>> = self.0.iter().filter(|l| l.0.len() >= 2).collect();
        if lines.is_empty() {
            return None;
        }
        Some(
            lines
                .into_iter()
                .fold(Data::new(), |data, line| line_data(data, line, transform, false)),
        )
    }
}

fn polygon_data(data: Data, poly: &Polygon<f64>, transform: &Affine2<f64>) -> Data {
    let data = line_data(data, poly.exterior(), transform, true);
    poly.interiors()
        .iter()
        .fold(data, |data, ring| line_data(data, ring, transform, true))
}

impl ToSvg for Polygon<f64> {
    fn to_path_data(&self, transform: &Affine2<f64>) -> Option<Data> {
        if self.exterior().0.len() < 3 {
            return None;
        }
        Some(polygon_data(Data::new(), self, transform))
    }
}

impl ToSvg for MultiPolygon<f64> {
    fn to_path_data(&self, transform: &Affine2<f64>) -> Option<Data> {
        let polys: Vec<&Polygon<f64>> = self
            .0
            .iter()
            .filter(|p| p.exterior().0.len() >= 3)
            .collect();
        if polys.is_empty() {
            return None;
        }
        Some(
            polys
                .into_iter()
                .fold(Data::new(), |data, poly| polygon_data(data, poly, transform)),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo_types::coord;

    #[test]
    fn test_fit_flips_and_centres() {
        let extent = Rect::new(coord! {x: 100.0, y: 200.0}, coord! {x: 300.0, y: 300.0});
        let page = Rect::new(coord! {x: 10.0, y: 10.0}, coord! {x: 110.0, y: 110.0});
        let t = fit_extent(&extent, &page).expect("fits");
        // 200 wide into 100mm: half scale, 50mm tall band centred vertically.
        let (x, y) = apply(&t, &coord! {x: 100.0, y: 300.0});
        assert!((x - 10.0).abs() < 1e-9 && (y - 35.0).abs() < 1e-9);
        let (x, y) = apply(&t, &coord! {x: 300.0, y: 200.0});
        assert!((x - 110.0).abs() < 1e-9 && (y - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_degenerate() {
        let point = Rect::new(coord! {x: 1.0, y: 1.0}, coord! {x: 1.0, y: 1.0});
        let page = Rect::new(coord! {x: 0.0, y: 0.0}, coord! {x: 10.0, y: 10.0});
        assert!(fit_extent(&point, &page).is_none());
        let flat = Rect::new(coord! {x: 0.0, y: 5.0}, coord! {x: 20.0, y: 5.0});
        assert!(fit_extent(&flat, &page).is_some());
    }

    #[test]
    fn test_path_data_skips_empty() {
        let t = Affine2::identity();
        assert!(MultiLineString::<f64>::new(vec![]).to_path_data(&t).is_none());
        assert!(LineString::from(vec![(0.0, 0.0)]).to_path_data(&t).is_none());
        let mls = MultiLineString::new(vec![
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]),
            LineString::from(vec![(0.0, 1.0), (1.0, 1.0)]),
        ]);
        let data = mls.to_path_data(&t).expect("data");
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_polygon_with_hole_closes_rings() {
        let poly = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
            vec![LineString::from(vec![
                (1.0, 1.0),
                (2.0, 1.0),
                (2.0, 2.0),
                (1.0, 1.0),
            ])],
        );
        let data = poly.to_path_data(&Affine2::identity()).expect("data");
        // exterior: M + 4 L + Z, hole: M + 3 L + Z
        assert_eq!(data.len(), 11);
    }
}
