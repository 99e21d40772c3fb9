use core::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A polygon or surface name is already registered.
    DuplicateName(String),
    /// The layer order names a layer with no registered polygon.
    UnknownLayer(String),
    DuplicateLayer(String),
    InvalidScale(f64),
    /// Fewer than three distinct vertices, or no enclosed area.
    DegeneratePolygon(String),
    /// Fewer than two distinct vertices.
    DegenerateSurface(String),
    NonFiniteCoordinate(String),
    MissingSurface(String),
    /// The ring closing pia and wm crosses itself at `edges`, or encloses no
    /// area when `edges` is `None`.
    InvalidEnvelope { edges: Option<(usize, usize)> },
    RasterTooLarge {
        width: usize,
        height: usize,
    },
    EmptyBounds,
    NoClaimedPixels,
    /// Two layers adjacent in the layer order share no boundary.
    MissingBoundary {
        upper: String,
        lower: String,
    },
    ImageOutput(String),
    Core(ls_core::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "name {name:?} is already registered"),
            Self::UnknownLayer(name) => {
                write!(f, "layer order names {name:?}, which has no polygon")
            }
            Self::DuplicateLayer(name) => write!(f, "layer {name:?} appears twice in the layer order"),
            Self::InvalidScale(s) => write!(f, "working scale must be positive and finite, got {s}"),
            Self::DegeneratePolygon(name) => {
                write!(f, "polygon {name:?} has fewer than 3 distinct vertices or encloses no area")
            }
            Self::DegenerateSurface(name) => {
                write!(f, "surface {name:?} has fewer than 2 distinct vertices")
            }
            Self::NonFiniteCoordinate(name) => {
                write!(f, "{name:?} has a NaN or infinite coordinate")
            }
            Self::MissingSurface(name) => write!(f, "surface {name:?} is not registered"),
            Self::InvalidEnvelope { edges: Some((i, j)) } => write!(
                f,
                "envelope between pia and wm crosses itself (edges {i} and {j}); do both surfaces run in the same direction?"
            ),
            Self::InvalidEnvelope { edges: None } => {
                write!(f, "pia and wm surfaces enclose no area")
            }
            Self::RasterTooLarge { width, height } => write!(
                f,
                "working raster of {width}x{height} pixels exceeds the pixel limit; lower the working scale"
            ),
            Self::EmptyBounds => write!(f, "nothing registered to rasterize"),
            Self::NoClaimedPixels => write!(f, "no layer claims any pixel at this working scale"),
            Self::MissingBoundary { upper, lower } => {
                write!(f, "layers {upper:?} and {lower:?} are adjacent in the layer order but share no boundary")
            }
            Self::ImageOutput(msg) => write!(f, "image output failed: {msg}"),
            Self::Core(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Core(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ls_core::Error> for Error {
    fn from(e: ls_core::Error) -> Self {
        match e {
            ls_core::Error::GridTooLarge { width, height } => Self::RasterTooLarge { width, height },
            other => Self::Core(other),
        }
    }
}
