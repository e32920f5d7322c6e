//! Channel composition: grayscale intensity + normalized depth.
//!
//! The composite is an RGB image laid out as
//! `[intensity, depth, fill_value]`: the grayscale value is copied unchanged,
//! depth is normalized into `[0, 255]`, and the last channel carries a
//! constant (zero by default).

use image::{GrayImage, Luma, RgbImage};

use crate::depth_grid::DepthGrid;
use crate::error::DepthifyError;

/// Depth byte written when every depth value is identical.
pub const DEPTH_MIDRANGE: u8 = 128;

/// How depth values are mapped into `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Min-max over the grid being composited.
    #[default]
    MinMax,
    /// Clamp to `[min, max]`, then scale. Stable across images.
    Fixed {
        /// Depth mapped to 0.
        min: f64,
        /// Depth mapped to 255.
        max: f64,
    },
}

impl Normalization {
    pub fn validate(&self) -> Result<(), DepthifyError> {
        match *self {
            Self::MinMax => Ok(()),
            Self::Fixed { min, max } => {
                if !min.is_finite() || !max.is_finite() || min >= max {
                    Err(DepthifyError::InvalidConfig(format!(
                        "fixed normalization needs finite min < max, got [{}, {}]",
                        min, max
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Compositor configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    /// Depth-to-byte mapping.
    pub normalization: Normalization,
    /// Write `255 - v` instead of `v` (swaps the near/far convention).
    pub invert_depth: bool,
    /// Constant written to the third channel.
    pub fill_value: u8,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            normalization: Normalization::MinMax,
            invert_depth: false,
            fill_value: 0,
        }
    }
}

/// Depth-to-unit-interval mapping resolved against one grid.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Quantizer {
    // Halved bounds keep `hi - lo` finite for extreme ranges.
    half_lo: f64,
    half_span: f64,
    invert: bool,
}

impl Quantizer {
    /// Resolve `normalization` against `grid`. The grid must be finite.
    pub(crate) fn new(grid: &DepthGrid, normalization: Normalization, invert: bool) -> Self {
        let (lo, hi) = match normalization {
            Normalization::MinMax => grid.min_max().unwrap_or((0.0, 0.0)),
            Normalization::Fixed { min, max } => (min, max),
        };
        Self {
            half_lo: lo * 0.5,
            half_span: hi * 0.5 - lo * 0.5,
            invert,
        }
    }

    /// Position of `d` in `[0, 1]`, or `None` for a flat range.
    #[inline]
    pub(crate) fn unit(&self, d: f64) -> Option<f64> {
        if self.half_span <= 0.0 {
            return None;
        }
        let t = ((d * 0.5 - self.half_lo) / self.half_span).clamp(0.0, 1.0);
        Some(if self.invert { 1.0 - t } else { t })
    }

    #[inline]
    pub(crate) fn to_u8(&self, d: f64) -> u8 {
        match self.unit(d) {
            Some(t) => (t * 255.0).round() as u8,
            None => DEPTH_MIDRANGE,
        }
    }
}

fn check_dimensions(gray: &GrayImage, depth: &DepthGrid) -> Result<(), DepthifyError> {
    let (w, h) = gray.dimensions();
    if depth.dimensions() != (w, h) {
        return Err(DepthifyError::DimensionMismatch {
            expected: [w, h],
            got: [depth.width(), depth.height()],
        });
    }
    Ok(())
}

/// Combine `gray` and `depth` into an `[intensity, depth, fill]` RGB image.
///
/// # Errors
/// - [`DepthifyError::DimensionMismatch`] when the grids differ in size.
/// - [`DepthifyError::InvalidInput`] when `depth` holds a non-finite value.
/// - [`DepthifyError::InvalidConfig`] for an unusable fixed range.
pub fn compose(
    gray: &GrayImage,
    depth: &DepthGrid,
    config: &ComposeConfig,
) -> Result<RgbImage, DepthifyError> {
    check_dimensions(gray, depth)?;
    config.normalization.validate()?;
    depth.ensure_finite()?;

    let q = Quantizer::new(depth, config.normalization, config.invert_depth);
    let (w, h) = gray.dimensions();
    let mut raw = Vec::with_capacity(w as usize * h as usize * 3);
    for (&g, &d) in gray.as_raw().iter().zip(depth.as_slice()) {
        raw.extend_from_slice(&[g, q.to_u8(d), config.fill_value]);
    }

    let out = RgbImage::from_raw(w, h, raw).ok_or(DepthifyError::DimensionMismatch {
        expected: [w, h],
        got: [depth.width(), depth.height()],
    })?;
    tracing::debug!("composed {}x{} image", w, h);
    Ok(out)
}

/// The normalized depth channel alone, as a grayscale image.
pub fn depth_to_gray(depth: &DepthGrid, config: &ComposeConfig) -> Result<GrayImage, DepthifyError> {
    config.normalization.validate()?;
    depth.ensure_finite()?;

    let q = Quantizer::new(depth, config.normalization, config.invert_depth);
    let (w, h) = depth.dimensions();
    Ok(GrayImage::from_fn(w, h, |x, y| {
        Luma([q.to_u8(depth.get(x, y).unwrap_or(0.0))])
    }))
}
