//! Putting it on paper: fills, hatches and outlines stacked into one SVG.
//!
//! A [`MapCanvas`] owns the page transform for one map extent. Layers are
//! drawn in the order given, so hatching goes after the fill it textures and
//! outlines go last.
use geo::BoundingRect;
use geo_types::{coord, Rect};
use nalgebra::Affine2;
use rayon::prelude::*;
use svg::node::element::{Element, Group, Path, Rectangle};
use svg::node::Text as TextNode;
use svg::{Document, Node};
use tracing::{debug, info, warn};

use crate::bands::Bands;
use crate::config::{parse_colour, Canvas, HatchStyle, MapStyle, Stroke};
use crate::errors::{HatchError, StyleError};
use crate::geo_types::hatch::{generate, HatchLines};
use crate::geo_types::svg::{fit_extent, ToSvg};
use crate::region::{Crs, Region};

/// Something to draw. Fills may also carry an edge stroke.
#[derive(Debug, Clone)]
pub enum Layer<'a> {
    Fill {
        region: &'a Region,
        fill: Option<String>,
        stroke: Option<Stroke>,
    },
    Hatch {
        lines: &'a HatchLines,
        stroke: Stroke,
    },
}

impl Layer<'_> {
    fn crs(&self) -> &Crs {
        match self {
            Layer::Fill { region, .. } => region.crs(),
            Layer::Hatch { lines, .. } => lines.crs(),
        }
    }
}

/// A named thing on the map with a value to classify it by.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub region: Region,
    pub value: f64,
}

/// # MapCanvas
/// A page, and the transform from map coordinates onto it.
#[derive(Debug, Clone)]
pub struct MapCanvas {
    transform: Affine2<f64>,
    canvas: Canvas,
    crs: Crs,
}

impl MapCanvas {
    pub fn new(extent: &Rect<f64>, canvas: Canvas, crs: Crs) -> Result<MapCanvas, StyleError> {
        let m = canvas.margin_mm;
        let page = Rect::new(
            coord! {x: m, y: m},
            coord! {x: canvas.width_mm - m, y: canvas.height_mm - m},
        );
        let transform = fit_extent(extent, &page).ok_or_else(|| {
            StyleError::EmptyMap(format!("extent {:?} cannot be fitted to the page", extent))
        })?;
        Ok(MapCanvas {
            transform,
            canvas,
            crs,
        })
    }

    /// A canvas sized to hold all the given regions.
    pub fn fit_regions<'a>(
        regions: impl IntoIterator<Item = &'a Region>,
        canvas: Canvas,
        crs: Crs,
    ) -> Result<MapCanvas, StyleError> {
        let mut extent: Option<Rect<f64>> = None;
        for region in regions {
            crs.ensure_same(region.crs())?;
            if let Some(bbox) = region.bounding_rect() {
                extent = Some(match extent {
                    None => bbox,
                    Some(e) => Rect::new(
                        coord! {x: e.min().x.min(bbox.min().x), y: e.min().y.min(bbox.min().y)},
                        coord! {x: e.max().x.max(bbox.max().x), y: e.max().y.max(bbox.max().y)},
                    ),
                });
            }
        }
        let extent = extent.ok_or_else(|| StyleError::EmptyMap("no regions to draw".into()))?;
        MapCanvas::new(&extent, canvas, crs)
    }

    pub fn transform(&self) -> &Affine2<f64> {
        &self.transform
    }

    fn document(&self) -> Document {
        let c = &self.canvas;
        Document::new()
            .set("viewBox", (0.0, 0.0, c.width_mm, c.height_mm))
            .set("width", format!("{}mm", c.width_mm))
            .set("height", format!("{}mm", c.height_mm))
    }

    fn layer_path(&self, layer: &Layer) -> Result<Option<Path>, StyleError> {
        match layer {
            Layer::Fill {
                region,
                fill,
                stroke,
            } => {
                let Some(data) = region.geometry().to_path_data(&self.transform) else {
                    return Ok(None);
                };
                let fill = match fill {
                    Some(colour) => parse_colour(colour)?,
                    None => "none".to_string(),
                };
                let path = Path::new()
                    .set("d", data)
                    .set("fill", fill)
                    .set("fill-rule", "evenodd");
                Ok(Some(match stroke {
                    Some(stroke) => stroked(path, stroke)?,
                    None => path.set("stroke", "none"),
                }))
            }
            Layer::Hatch { lines, stroke } => lines
                .lines()
                .to_path_data(&self.transform)
                .map(|data| stroked(Path::new().set("d", data).set("fill", "none"), stroke))
                .transpose(),
        }
    }

    /// Draw the layers, bottom first. Every layer must be in the canvas CRS.
    pub fn render(&self, layers: &[Layer]) -> Result<Document, StyleError> {
        let mut doc = self.document();
        let mut drawn = 0usize;
        for layer in layers {
            self.crs.ensure_same(layer.crs())?;
            if let Some(path) = self.layer_path(layer)? {
                doc = doc.add(path);
                drawn += 1;
            }
        }
        debug!(layers = layers.len(), drawn, "Rendered map");
        Ok(doc)
    }
}

fn stroked(path: Path, stroke: &Stroke) -> Result<Path, StyleError> {
    Ok(path
        .set("stroke", parse_colour(&stroke.colour)?)
        .set("stroke-width", stroke.width)
        .set("stroke-linecap", "round")
        .set("stroke-linejoin", "round"))
}

fn hatch_band(region: &Region, hatch: &HatchStyle) -> Result<Vec<HatchLines>, HatchError> {
    let mut out = vec![generate(region, hatch.scale, hatch.pattern)?];
    if hatch.cross {
        out.push(generate(region, hatch.scale, hatch.pattern.perpendicular())?);
    }
    Ok(out)
}

/// A banded (choropleth) map: each feature is filled by the band its value
/// falls in, hatched if that band has a hatch, and outlined on top. Features
/// outside every band are left off with a warning.
pub fn render_choropleth(features: &[Feature], style: &MapStyle) -> Result<Document, StyleError> {
    let bands = style.bands()?;
    let mut classified: Vec<(&Feature, usize)> = vec![];
    for feature in features {
        match bands.classify(feature.value) {
            Some(band) => classified.push((feature, band.code)),
            None => warn!(
                feature = %feature.name,
                value = feature.value,
                "Value outside every band, skipping"
            ),
        }
    }
    if classified.is_empty() {
        return Err(StyleError::EmptyMap(
            "no feature values fall inside the bands".into(),
        ));
    }
    info!(
        features = features.len(),
        drawn = classified.len(),
        "Rendering choropleth"
    );

    let canvas = MapCanvas::fit_regions(
        classified.iter().map(|(f, _)| &f.region),
        style.canvas,
        style.crs.clone(),
    )?;

    let hatches: Vec<(usize, Vec<HatchLines>)> = classified
        .par_iter()
        .enumerate()
        .filter_map(|(i, (feature, code))| {
            let band = &style.bands[*code];
            band.hatch.as_ref().map(|hatch| {
                hatch_band(&feature.region, hatch)
                    .map(|lines| (i, lines))
                    .map_err(|source| StyleError::BandHatch {
                        label: band.label.clone(),
                        source,
                    })
            })
        })
        .collect::<Result<Vec<_>, StyleError>>()?;

    let mut layers: Vec<Layer> = classified
        .iter()
        .map(|(feature, code)| Layer::Fill {
            region: &feature.region,
            fill: style.bands[*code].fill.clone(),
            stroke: None,
        })
        .collect();
    for (i, lines) in &hatches {
        let code = classified[*i].1;
        if let Some(hatch) = &style.bands[code].hatch {
            for l in lines {
                layers.push(Layer::Hatch {
                    lines: l,
                    stroke: hatch.stroke.clone(),
                });
            }
        }
    }
    for (feature, _) in &classified {
        layers.push(Layer::Fill {
            region: &feature.region,
            fill: None,
            stroke: Some(style.outline.clone()),
        });
    }

    let doc = canvas.render(&layers)?;
    Ok(doc.add(legend(&bands, style)?))
}

/// Swatches and labels down the left margin, one row per band.
fn legend(bands: &Bands, style: &MapStyle) -> Result<Group, StyleError> {
    let m = style.canvas.margin_mm;
    let size = (m * 0.4).max(1.0);
    let mut group = Group::new().set("class", "legend");
    for band in bands.labels() {
        let y = m + band.code as f64 * size * 1.5;
        let fill = match &style.bands[band.code].fill {
            Some(colour) => parse_colour(colour)?,
            None => "none".to_string(),
        };
        let swatch = Rectangle::new()
            .set("x", m * 0.25)
            .set("y", y)
            .set("width", size)
            .set("height", size)
            .set("fill", fill)
            .set("stroke", parse_colour(&style.outline.colour)?)
            .set("stroke-width", style.outline.width);
        let mut text = Element::new("text");
        text.assign("x", m * 0.25 + size * 1.3);
        text.assign("y", y + size * 0.8);
        text.assign("font-size", size);
        text.append(TextNode::new(band.label));
        group = group.add(swatch).add(text);
    }
    Ok(group)
}
