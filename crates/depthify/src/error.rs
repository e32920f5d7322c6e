//! Error taxonomy shared by the interpolation engine and the compositor.

/// Why an input was rejected as malformed.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidInputReason {
    /// Grid width or height is zero.
    EmptyGrid {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Grid side exceeds the supported coordinate range.
    GridTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Largest supported side.
        max_side: u32,
    },
    /// Raw grid data does not hold `width * height` values.
    DataLength {
        /// Expected number of values.
        expected: usize,
        /// Provided number of values.
        got: usize,
    },
    /// A sample lies outside `[0, width) x [0, height)`.
    OutOfBounds {
        /// Sample position `[x, y]`.
        position: [u32; 2],
        /// Grid size `[width, height]`.
        size: [u32; 2],
    },
    /// Two samples share the same pixel.
    DuplicatePosition {
        /// The shared position `[x, y]`.
        position: [u32; 2],
    },
    /// A sample depth is NaN or infinite.
    NonFiniteDepth {
        /// Sample position `[x, y]`.
        position: [u32; 2],
    },
    /// A depth grid cell is NaN or infinite.
    NonFiniteGridValue {
        /// Cell position `[x, y]`.
        position: [u32; 2],
    },
}

impl std::fmt::Display for InvalidInputReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyGrid { width, height } => {
                write!(f, "grid must be non-empty, got {}x{}", width, height)
            }
            Self::GridTooLarge {
                width,
                height,
                max_side,
            } => write!(
                f,
                "grid {}x{} exceeds the maximum side of {} px",
                width, height, max_side
            ),
            Self::DataLength { expected, got } => {
                write!(f, "grid data holds {} values, expected {}", got, expected)
            }
            Self::OutOfBounds { position, size } => write!(
                f,
                "sample ({}, {}) outside {}x{} grid",
                position[0], position[1], size[0], size[1]
            ),
            Self::DuplicatePosition { position } => {
                write!(f, "duplicate sample at ({}, {})", position[0], position[1])
            }
            Self::NonFiniteDepth { position } => write!(
                f,
                "sample at ({}, {}) has a non-finite depth",
                position[0], position[1]
            ),
            Self::NonFiniteGridValue { position } => write!(
                f,
                "depth grid value at ({}, {}) is not finite",
                position[0], position[1]
            ),
        }
    }
}

/// Errors returned by every fallible depthify operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DepthifyError {
    /// Malformed sample set or grid.
    InvalidInput(InvalidInputReason),
    /// Not enough samples to build a surface and no fallback configured.
    InsufficientSamples {
        /// Required minimum number of samples.
        needed: usize,
        /// Provided number of samples.
        got: usize,
    },
    /// Two grids that must line up have different sizes.
    DimensionMismatch {
        /// Expected size `[width, height]`.
        expected: [u32; 2],
        /// Actual size `[width, height]`.
        got: [u32; 2],
    },
    /// A configuration value cannot be used.
    InvalidConfig(String),
}

impl std::fmt::Display for DepthifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
            Self::InsufficientSamples { needed, got } => {
                write!(f, "insufficient samples: need {}, got {}", needed, got)
            }
            Self::DimensionMismatch { expected, got } => write!(
                f,
                "dimension mismatch: expected {}x{}, got {}x{}",
                expected[0], expected[1], got[0], got[1]
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for DepthifyError {}

impl From<InvalidInputReason> for DepthifyError {
    fn from(reason: InvalidInputReason) -> Self {
        Self::InvalidInput(reason)
    }
}
