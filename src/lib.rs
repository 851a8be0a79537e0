//! Hatch fills for maps
//!
//! Plotters (and black-and-white print) can't do flat colour, they draw lines.
//! This crate textures map regions with evenly spaced hatch lines, clipped to
//! the region and merged into as few strokes as possible, and stacks them with
//! choropleth fills into plotter-ready SVG. Built on [`geo`]/[`geo_types`] for
//! the geometry types and [`geos`] for the heavy lifting (clipping, unions,
//! line merging).
//!
//! The core is [`geo_types::hatch::generate`]; everything else is plumbing
//! around it.

/// Error types for hatching, band definitions and map styles.
pub mod errors;

/// Regions and the coordinate reference systems they live in.
pub mod region;

/// Extensions/Traits for geo_types geometry: grids, hatching, boolean ops and
/// SVG path conversion.
pub mod geo_types;

/// Ordinal classes (bands) for choropleth values.
pub mod bands;

/// RON map styles.
pub mod config;

/// SVG composition of fills, hatches and outlines.
pub mod render;

/// Import prelude::* and get the common bits in one go.
pub mod prelude {
    pub use crate::bands::{Band, Bands};
    pub use crate::config::{Canvas, HatchStyle, MapStyle, Stroke};
    pub use crate::errors::{BandError, HatchError, StyleError};
    pub use crate::geo_types::hatch::{
        crosshatch, generate, generate_all, Hatch, HatchLines, HatchPattern, Pattern,
    };
    pub use crate::region::{Crs, Region};
    pub use crate::render::{render_choropleth, Feature, Layer, MapCanvas};
}
