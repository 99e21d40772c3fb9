use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch { expected: usize, actual: usize },
    GridTooLarge { width: usize, height: usize },
    NonFiniteCoordinate,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::GridTooLarge { width, height } => {
                write!(f, "grid of {width}x{height} pixels does not fit in memory")
            }
            Self::NonFiniteCoordinate => write!(f, "coordinate is NaN or infinite"),
        }
    }
}

impl std::error::Error for Error {}
