//! Map styling, loaded from RON. A style picks the CRS the map is drawn in,
//! the page it goes on, and a fill (and optional hatch) for each value band.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bands::Bands;
use crate::errors::{HatchError, StyleError};
use crate::geo_types::hatch::Pattern;
use crate::region::{Crs, Region};
use crate::render::Feature;

/// A CSS colour name or hex string, and a line width in page millimetres.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Stroke {
    pub colour: String,
    pub width: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke {
            colour: "black".to_string(),
            width: 0.25,
        }
    }
}

impl Stroke {
    pub fn new(colour: &str, width: f64) -> Stroke {
        Stroke {
            colour: colour.to_string(),
            width,
        }
    }
}

/// Hatching for one band. `scale` is in map units (metres on the Irish Grid).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HatchStyle {
    pub pattern: Pattern,
    pub scale: f64,
    #[serde(default)]
    pub stroke: Stroke,
    /// Draw the perpendicular pattern over the top too.
    #[serde(default)]
    pub cross: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Band {
    pub label: String,
    /// Inclusive upper bound of the band; the lower bound is the previous
    /// band's `upper` (or the style's `lower` for the first band).
    pub upper: f64,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub hatch: Option<HatchStyle>,
}

/// Paper size and margin, in millimetres.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl Default for Canvas {
    /// A4 portrait.
    fn default() -> Self {
        Canvas {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 10.0,
        }
    }
}

/// # MapStyle
///
/// ```rust
/// use map_hatch::config::MapStyle;
///
/// let style = MapStyle::from_ron_str(r##"
///     MapStyle(
///         crs: "EPSG:29903",
///         lower: 0.0,
///         bands: [
///             Band(label: "quiet", upper: 50.0, fill: Some("#ffffcc")),
///             Band(label: "busy", upper: 5000.0, fill: Some("#41b6c4"),
///                  hatch: Some(HatchStyle(pattern: "right2left", scale: 2000.0))),
///         ],
///     )
/// "##).expect("valid style");
/// assert_eq!(style.bands().expect("bands").len(), 2);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MapStyle {
    pub crs: Crs,
    #[serde(default)]
    pub outline: Stroke,
    pub lower: f64,
    pub bands: Vec<Band>,
    #[serde(default)]
    pub canvas: Canvas,
}

impl MapStyle {
    /// Parse and validate.
    pub fn from_ron_str(text: &str) -> Result<MapStyle, StyleError> {
        let style: MapStyle = ron::from_str(text)?;
        style.validate()?;
        Ok(style)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<MapStyle, StyleError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        MapStyle::from_ron_str(&text)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// The band breaks and labels as a [`Bands`] classifier.
    pub fn bands(&self) -> Result<Bands, StyleError> {
        let breaks = std::iter::once(self.lower)
            .chain(self.bands.iter().map(|b| b.upper))
            .collect();
        let labels = self.bands.iter().map(|b| b.label.clone()).collect();
        Ok(Bands::new(breaks, labels)?)
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        self.bands()?;
        parse_colour(&self.outline.colour)?;
        for band in &self.bands {
            if let Some(fill) = &band.fill {
                parse_colour(fill)?;
            }
            if let Some(hatch) = &band.hatch {
                if !hatch.scale.is_finite() || hatch.scale <= 0.0 {
                    return Err(StyleError::BandHatch {
                        label: band.label.clone(),
                        source: HatchError::InvalidScale(hatch.scale),
                    });
                }
                parse_colour(&hatch.stroke.colour)?;
            }
        }
        let canvas = &self.canvas;
        if canvas.width_mm <= 2.0 * canvas.margin_mm || canvas.height_mm <= 2.0 * canvas.margin_mm
        {
            return Err(StyleError::EmptyMap(format!(
                "{}x{}mm page has no room inside a {}mm margin",
                canvas.width_mm, canvas.height_mm, canvas.margin_mm
            )));
        }
        Ok(())
    }
}

/// One feature as written in a features file: the geometry is WKT, in the
/// style's CRS.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename = "Feature")]
pub struct FeatureRecord {
    pub name: String,
    pub wkt: String,
    pub value: f64,
}

impl FeatureRecord {
    pub fn to_feature(&self, crs: &Crs) -> Result<Feature, StyleError> {
        let region = Region::from_wkt(&self.wkt, crs.clone()).map_err(|source| {
            StyleError::Feature {
                name: self.name.clone(),
                source,
            }
        })?;
        Ok(Feature {
            name: self.name.clone(),
            region,
            value: self.value,
        })
    }
}

/// Read a RON list of [`FeatureRecord`]s and turn them into regions in `crs`.
pub fn parse_features(text: &str, crs: &Crs) -> Result<Vec<Feature>, StyleError> {
    let records: Vec<FeatureRecord> = ron::from_str(text)?;
    records.iter().map(|r| r.to_feature(crs)).collect()
}

pub fn load_features(path: impl AsRef<Path>, crs: &Crs) -> Result<Vec<Feature>, StyleError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| StyleError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_features(&text, crs)
}

/// Check a colour with csscolorparser, handing back the normalised hex form
/// SVG viewers all agree on.
pub fn parse_colour(colour: &str) -> Result<String, StyleError> {
    csscolorparser::parse(colour)
        .map(|c| c.to_hex_string())
        .map_err(|e| StyleError::Colour {
            colour: colour.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod test {
    use super::*;

    const STYLE: &str = r##"
        MapStyle(
            crs: "EPSG:29903",
            outline: Stroke(colour: "black", width: 0.5),
            lower: 0.0,
            bands: [
                Band(label: "< 50", upper: 50.0, fill: Some("#ffffcc")),
                Band(label: "50-100", upper: 100.0, fill: Some("#a1dab4"),
                     hatch: Some(HatchStyle(pattern: "right2left", scale: 2000.0,
                                            stroke: Stroke(colour: "grey", width: 0.3)))),
                Band(label: "100+", upper: 10000.0,
                     hatch: Some(HatchStyle(pattern: "horizontal", scale: 1000.0, cross: true))),
            ],
            canvas: Canvas(width_mm: 210.0, height_mm: 297.0, margin_mm: 10.0),
        )
    "##;

    #[test]
    fn test_parse_style() {
        let style = MapStyle::from_ron_str(STYLE).expect("style");
        assert_eq!(style.crs, Crs::irish_grid());
        assert_eq!(style.bands.len(), 3);
        let hatch = style.bands[1].hatch.as_ref().expect("hatch");
        assert_eq!(hatch.pattern, Pattern::Right2Left);
        assert!(!hatch.cross);
        let hatch = style.bands[2].hatch.as_ref().expect("hatch");
        assert_eq!(hatch.stroke, Stroke::default());
        assert!(hatch.cross);
        assert_eq!(style.bands[2].fill, None);
    }

    #[test]
    fn test_bands_from_style() {
        let style = MapStyle::from_ron_str(STYLE).expect("style");
        let bands = style.bands().expect("bands");
        assert_eq!(bands.breaks(), &[0.0, 50.0, 100.0, 10000.0]);
        assert_eq!(bands.classify(75.0).map(|b| b.label), Some("50-100"));
    }

    #[test]
    fn test_defaults() {
        let style = MapStyle::from_ron_str(
            r#"MapStyle(crs: "EPSG:2157", lower: 0.0, bands: [Band(label: "all", upper: 1.0)])"#,
        )
        .expect("style");
        assert_eq!(style.canvas, Canvas::default());
        assert_eq!(style.outline, Stroke::default());
    }

    #[test]
    fn test_round_trip() {
        let style = MapStyle::from_ron_str(STYLE).expect("style");
        let text = style.to_ron_string().expect("ser");
        assert_eq!(MapStyle::from_ron_str(&text).expect("reparse"), style);
    }

    #[test]
    fn test_rejects_bad_pattern() {
        let text = STYLE.replace("right2left", "zigzag");
        assert!(matches!(
            MapStyle::from_ron_str(&text),
            Err(StyleError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_bad_colour() {
        let text = STYLE.replace("#a1dab4", "not-a-colour");
        assert!(matches!(
            MapStyle::from_ron_str(&text),
            Err(StyleError::Colour { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_scale_and_breaks() {
        let text = STYLE.replace("scale: 2000.0", "scale: 0.0");
        assert!(matches!(
            MapStyle::from_ron_str(&text),
            Err(StyleError::BandHatch { .. })
        ));
        let text = STYLE.replace("upper: 100.0", "upper: 20.0");
        assert!(matches!(
            MapStyle::from_ron_str(&text),
            Err(StyleError::Bands(_))
        ));
    }

    #[test]
    fn test_parse_colour() {
        assert_eq!(parse_colour("red").expect("red"), "#ff0000");
        assert!(parse_colour("nope").is_err());
    }

    #[test]
    fn test_parse_features() {
        let features = parse_features(
            r#"[
                Feature(name: "Carlow", wkt: "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))", value: 63.5),
                Feature(name: "Laois", wkt: "POLYGON ((10 0, 20 0, 20 10, 10 10, 10 0))", value: 49.1),
            ]"#,
            &Crs::irish_grid(),
        )
        .expect("features");
        assert_eq!(features.len(), 2);
        assert_eq!(features[1].name, "Laois");
        assert_eq!(features[0].region.crs(), &Crs::irish_grid());
    }

    #[test]
    fn test_parse_features_bad_wkt() {
        let err = parse_features(
            r#"[Feature(name: "Nowhere", wkt: "POINT (1 1)", value: 1.0)]"#,
            &Crs::irish_grid(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StyleError::Feature { name, source: HatchError::EmptyRegion } if name == "Nowhere"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            MapStyle::load("/definitely/not/here.ron"),
            Err(StyleError::Io { .. })
        ));
    }
}
