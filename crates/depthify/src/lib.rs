//! depthify — synthetic depth channels for grayscale images.
//!
//! A handful of user-placed `(x, y, depth)` samples is turned into a dense
//! per-pixel depth surface, which is then merged with the source image:
//!
//! 1. **Interpolate** – Delaunay triangulation of the samples, barycentric
//!    interpolation inside the convex hull, nearest-sample extrapolation
//!    outside it ([`interpolate`]).
//! 2. **Compose** – min-max normalize the surface and stack it next to the
//!    grayscale intensity in an RGB image ([`compose`]).
//!
//! Around that core sit a colorized preview ([`render_preview`]) and an
//! editing model ([`DepthSession`]) for interactive front ends. Both the
//! engine and the compositor are pure functions: inputs are borrowed,
//! outputs are freshly allocated, and every failure is a [`DepthifyError`].
//!
//! ```
//! use depthify::{compose, interpolate, ComposeConfig, InterpolationConfig, SampleSet, SamplePoint};
//! use image::GrayImage;
//!
//! let gray = GrayImage::new(32, 24);
//! let samples: SampleSet = vec![
//!     SamplePoint::new(2, 2, 0.0),
//!     SamplePoint::new(29, 3, 1.0),
//!     SamplePoint::new(16, 21, 0.5),
//! ]
//! .into();
//!
//! let depth = interpolate(32, 24, &samples, &InterpolationConfig::default()).unwrap();
//! let rgb = compose(&gray, &depth, &ComposeConfig::default()).unwrap();
//! assert_eq!(rgb.get_pixel(29, 3)[1], 255);
//! ```

mod compose;
mod config;
mod depth_grid;
mod error;
mod interpolate;
mod pipeline;
mod preview;
mod sample;
mod session;

#[cfg(test)]
mod test_utils;

pub use compose::{compose, depth_to_gray, ComposeConfig, Normalization, DEPTH_MIDRANGE};
pub use config::DepthifyConfig;
pub use depth_grid::DepthGrid;
pub use error::{DepthifyError, InvalidInputReason};
pub use interpolate::{
    interpolate, interpolate_with_report, Extrapolation, InterpolationConfig, InterpolationMethod,
    InterpolationReport, SurfaceStrategy, MAX_GRID_SIDE,
};
pub use pipeline::{render, RenderOutput};
pub use preview::{render_preview, viridis, PreviewConfig};
pub use sample::{SamplePoint, SampleSet};
pub use session::DepthSession;
