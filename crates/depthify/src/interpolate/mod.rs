//! Scattered-point depth interpolation.
//!
//! Turns a sparse [`SampleSet`] into a dense [`DepthGrid`]:
//!
//! - no samples: error, or the explicitly configured fallback value;
//! - one sample: constant surface;
//! - collinear samples: nearest sample everywhere;
//! - otherwise: linear interpolation over a Delaunay triangulation inside
//!   the convex hull and the configured [`Extrapolation`] outside it.
//!
//! Values are never clamped or rounded here.

mod delaunay;
mod linear;
mod nearest;

use crate::depth_grid::DepthGrid;
use crate::error::{DepthifyError, InvalidInputReason};
use crate::sample::SampleSet;

use delaunay::{Triangulation, Vertex};

/// Largest supported grid side. Keeps the exact integer predicates in range.
pub const MAX_GRID_SIDE: u32 = 1 << 30;

/// How pixels are resolved when at least two samples exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    /// Barycentric interpolation over a Delaunay triangulation.
    #[default]
    Linear,
    /// Depth of the nearest sample for every pixel.
    Nearest,
}

/// Policy for pixels outside the convex hull of the samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Depth of the closest sample by Euclidean distance.
    #[default]
    Nearest,
    /// A fixed value.
    Constant {
        /// Value written outside the hull.
        value: f64,
    },
}

/// Interpolation engine configuration.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpolationConfig {
    /// Method used for two or more samples.
    pub method: InterpolationMethod,
    /// Outside-hull policy for [`InterpolationMethod::Linear`].
    pub extrapolation: Extrapolation,
    /// Constant surface returned for an empty sample set.
    ///
    /// `None` makes an empty sample set an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_fallback: Option<f64>,
}

impl InterpolationConfig {
    /// Reject non-finite fallback or extrapolation values.
    pub fn validate(&self) -> Result<(), DepthifyError> {
        if let Some(v) = self.empty_fallback {
            if !v.is_finite() {
                return Err(DepthifyError::InvalidConfig(format!(
                    "empty_fallback must be finite, got {}",
                    v
                )));
            }
        }
        if let Extrapolation::Constant { value } = self.extrapolation {
            if !value.is_finite() {
                return Err(DepthifyError::InvalidConfig(format!(
                    "constant extrapolation value must be finite, got {}",
                    value
                )));
            }
        }
        Ok(())
    }
}

/// Which rule produced the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceStrategy {
    /// No samples; configured fallback value.
    EmptyFallback,
    /// Single sample.
    Constant,
    /// Triangulated interpolation.
    Linear,
    /// Nearest sample by request.
    Nearest,
    /// Nearest sample because all samples are collinear.
    CollinearNearest,
}

/// Summary of one interpolation call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InterpolationReport {
    /// Rule that produced the surface.
    pub strategy: SurfaceStrategy,
    /// Number of input samples.
    pub n_samples: usize,
    /// Number of Delaunay triangles (0 when not triangulated).
    pub n_triangles: usize,
    /// Number of samples on the convex hull boundary (0 when not triangulated).
    pub n_hull_vertices: usize,
    /// Pixels resolved by barycentric interpolation.
    pub n_triangulated_px: usize,
    /// Pixels resolved by nearest-sample lookup.
    pub n_nearest_px: usize,
    /// Pixels set to a constant (single sample, fallback or constant extrapolation).
    pub n_constant_px: usize,
}

impl InterpolationReport {
    fn new(strategy: SurfaceStrategy, n_samples: usize) -> Self {
        Self {
            strategy,
            n_samples,
            n_triangles: 0,
            n_hull_vertices: 0,
            n_triangulated_px: 0,
            n_nearest_px: 0,
            n_constant_px: 0,
        }
    }
}

/// Interpolate a dense `width x height` depth surface from `samples`.
///
/// # Errors
/// - [`DepthifyError::InvalidInput`] for an empty or oversized grid, a sample
///   outside the grid, a non-finite depth or two samples on one pixel.
/// - [`DepthifyError::InsufficientSamples`] for an empty set without
///   [`InterpolationConfig::empty_fallback`].
/// - [`DepthifyError::InvalidConfig`] for non-finite configured values.
///
/// # Example
///
/// ```
/// use depthify::{interpolate, InterpolationConfig, SamplePoint, SampleSet};
///
/// let samples: SampleSet = vec![
///     SamplePoint::new(0, 0, 0.0),
///     SamplePoint::new(3, 0, 1.0),
///     SamplePoint::new(0, 3, 0.0),
///     SamplePoint::new(3, 3, 1.0),
/// ]
/// .into();
/// let depth = interpolate(4, 4, &samples, &InterpolationConfig::default()).unwrap();
/// assert_eq!(depth.get(3, 3), Some(1.0));
/// ```
pub fn interpolate(
    width: u32,
    height: u32,
    samples: &SampleSet,
    config: &InterpolationConfig,
) -> Result<DepthGrid, DepthifyError> {
    interpolate_with_report(width, height, samples, config).map(|(grid, _)| grid)
}

/// Like [`interpolate`], also returning how the surface was produced.
pub fn interpolate_with_report(
    width: u32,
    height: u32,
    samples: &SampleSet,
    config: &InterpolationConfig,
) -> Result<(DepthGrid, InterpolationReport), DepthifyError> {
    if width == 0 || height == 0 {
        return Err(InvalidInputReason::EmptyGrid { width, height }.into());
    }
    if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
        return Err(InvalidInputReason::GridTooLarge {
            width,
            height,
            max_side: MAX_GRID_SIDE,
        }
        .into());
    }
    config.validate()?;
    samples.validate(width, height)?;

    let n_px = width as usize * height as usize;
    let points = samples.points();

    let (grid, report) = match points {
        [] => {
            let Some(value) = config.empty_fallback else {
                return Err(DepthifyError::InsufficientSamples { needed: 1, got: 0 });
            };
            let mut report = InterpolationReport::new(SurfaceStrategy::EmptyFallback, 0);
            report.n_constant_px = n_px;
            (DepthGrid::filled(width, height, value), report)
        }
        [only] => {
            let mut report = InterpolationReport::new(SurfaceStrategy::Constant, 1);
            report.n_constant_px = n_px;
            (DepthGrid::filled(width, height, only.depth), report)
        }
        _ => match config.method {
            InterpolationMethod::Nearest => {
                nearest_surface(width, height, samples, SurfaceStrategy::Nearest)
            }
            InterpolationMethod::Linear => {
                let vertices: Vec<Vertex> =
                    points.iter().map(|p| [p.x as i64, p.y as i64]).collect();
                match Triangulation::build(vertices) {
                    Some(tri) => linear_surface(width, height, samples, &tri, config.extrapolation),
                    None => {
                        tracing::debug!(
                            "{} collinear samples, using nearest-sample surface",
                            points.len()
                        );
                        nearest_surface(width, height, samples, SurfaceStrategy::CollinearNearest)
                    }
                }
            }
        },
    };

    tracing::debug!(
        "interpolated {}x{} depth grid from {} samples ({:?})",
        width,
        height,
        report.n_samples,
        report.strategy
    );
    Ok((grid, report))
}

fn nearest_surface(
    width: u32,
    height: u32,
    samples: &SampleSet,
    strategy: SurfaceStrategy,
) -> (DepthGrid, InterpolationReport) {
    let mut grid = DepthGrid::filled(width, height, 0.0);
    let mut report = InterpolationReport::new(strategy, samples.len());
    report.n_nearest_px = nearest::fill_nearest(samples.points(), &mut grid, None);
    (grid, report)
}

fn linear_surface(
    width: u32,
    height: u32,
    samples: &SampleSet,
    tri: &Triangulation,
    extrapolation: Extrapolation,
) -> (DepthGrid, InterpolationReport) {
    let points = samples.points();
    let depths: Vec<f64> = points.iter().map(|p| p.depth).collect();

    let mut grid = DepthGrid::filled(width, height, 0.0);
    let mut covered = vec![false; width as usize * height as usize];
    let mut report = InterpolationReport::new(SurfaceStrategy::Linear, points.len());
    report.n_triangles = tri.triangles.len();
    report.n_hull_vertices = tri.hull.len();
    report.n_triangulated_px = linear::rasterize(tri, &depths, &mut grid, &mut covered);

    match extrapolation {
        Extrapolation::Nearest => {
            report.n_nearest_px = nearest::fill_nearest(points, &mut grid, Some(&covered));
        }
        Extrapolation::Constant { value } => {
            for (v, &c) in grid.as_mut_slice().iter_mut().zip(&covered) {
                if !c {
                    *v = value;
                    report.n_constant_px += 1;
                }
            }
        }
    }

    // Sample pixels carry their depth verbatim.
    for p in points {
        grid.set(p.x, p.y, p.depth);
    }

    tracing::debug!(
        "delaunay: {} triangles, {} hull vertices, {}/{} px inside hull",
        report.n_triangles,
        report.n_hull_vertices,
        report.n_triangulated_px,
        covered.len()
    );
    (grid, report)
}
