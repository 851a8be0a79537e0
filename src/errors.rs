use thiserror::Error;

use crate::region::Crs;

/// # HatchError
/// The excuses the hatching and region code will throw.
/// InvalidScale, EmptyRegion and UnsupportedPattern are all bad arguments from
/// the caller; Geometry is GEOS (or a conversion to/from it) giving up on us.
#[derive(Debug, Error)]
pub enum HatchError {
    #[error("Invalid hatch scale: {0} (must be finite and > 0)")]
    InvalidScale(f64),

    #[error("Region is empty and has no bounding box")]
    EmptyRegion,

    #[error("Unsupported hatch pattern: {0:?}")]
    UnsupportedPattern(String),

    #[error("CRS mismatch: {left} vs {right}")]
    CrsMismatch { left: Crs, right: Crs },

    #[error("Geometry operation failed: {0}")]
    Geometry(String),
}

impl From<geos::Error> for HatchError {
    fn from(err: geos::Error) -> Self {
        HatchError::Geometry(err.to_string())
    }
}

/// Result type for hatching and region operations.
pub type Result<T> = std::result::Result<T, HatchError>;

/// Problems with a set of class breaks.
#[derive(Debug, Error, PartialEq)]
pub enum BandError {
    #[error("At least two breaks are needed, got {0}")]
    TooFewBreaks(usize),

    #[error("Break {0} is not a finite number")]
    NonFiniteBreak(f64),

    #[error("Breaks must be strictly increasing ({previous} then {next})")]
    UnsortedBreaks { previous: f64, next: f64 },

    #[error("Expected {expected} labels for the breaks, got {actual}")]
    LabelCount { expected: usize, actual: usize },
}

/// Everything that can go wrong loading or applying a [`crate::config::MapStyle`].
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Invalid colour {colour:?}: {reason}")]
    Colour { colour: String, reason: String },

    #[error("Invalid band definitions: {0}")]
    Bands(#[from] BandError),

    #[error("Band {label:?} has an invalid hatch: {source}")]
    BandHatch {
        label: String,
        #[source]
        source: HatchError,
    },

    #[error("Feature {name:?} has unusable geometry: {source}")]
    Feature {
        name: String,
        #[source]
        source: HatchError,
    },

    #[error("Could not parse style: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Nothing to draw: {0}")]
    EmptyMap(String),

    #[error(transparent)]
    Hatch(#[from] HatchError),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HatchError::InvalidScale(-1.5);
        assert!(format!("{err}").contains("-1.5"));

        let err = HatchError::UnsupportedPattern("zigzag".into());
        assert_eq!(format!("{err}"), "Unsupported hatch pattern: \"zigzag\"");

        let err = HatchError::CrsMismatch {
            left: Crs::epsg(29903),
            right: Crs::epsg(4326),
        };
        assert_eq!(format!("{err}"), "CRS mismatch: EPSG:29903 vs EPSG:4326");
    }

    #[test]
    fn test_band_error_into_style_error() {
        let err: StyleError = BandError::TooFewBreaks(1).into();
        assert!(matches!(err, StyleError::Bands(BandError::TooFewBreaks(1))));
    }
}
