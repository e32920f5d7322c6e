//! End-to-end run: interpolate, then compose.

use image::{GrayImage, RgbImage};

use crate::compose::compose;
use crate::config::DepthifyConfig;
use crate::depth_grid::DepthGrid;
use crate::error::DepthifyError;
use crate::interpolate::{interpolate_with_report, InterpolationReport};
use crate::sample::SampleSet;

/// Products of one [`render`] call.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Dense, unnormalized depth surface.
    pub depth: DepthGrid,
    /// `[intensity, depth, fill]` composite.
    pub composite: RgbImage,
    /// How the surface was produced.
    pub report: InterpolationReport,
}

/// Interpolate `samples` over the extent of `gray` and compose the result.
///
/// Fails atomically: either both the depth grid and the composite are
/// produced, or an error is returned.
pub fn render(
    gray: &GrayImage,
    samples: &SampleSet,
    config: &DepthifyConfig,
) -> Result<RenderOutput, DepthifyError> {
    config.compose.normalization.validate()?;
    let (w, h) = gray.dimensions();
    let (depth, report) = interpolate_with_report(w, h, samples, &config.interpolation)?;
    let composite = compose(gray, &depth, &config.compose)?;
    Ok(RenderOutput {
        depth,
        composite,
        report,
    })
}
