//! Colorized depth preview with sample markers.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};

use crate::compose::{Normalization, Quantizer};
use crate::depth_grid::DepthGrid;
use crate::error::DepthifyError;
use crate::sample::SampleSet;

/// Viridis control points, evenly spaced over `[0, 1]`.
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

/// Preview rendering options.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Depth-to-color mapping range.
    pub normalization: Normalization,
    /// Map high depth to the dark end of the colormap.
    pub high_is_dark: bool,
    /// Sample marker radius in pixels; 0 disables markers.
    pub marker_radius: u32,
    /// Marker outline color.
    pub marker_outline: [u8; 3],
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            normalization: Normalization::MinMax,
            high_is_dark: true,
            marker_radius: 3,
            marker_outline: [255, 255, 255],
        }
    }
}

/// Sample the viridis colormap at `t` in `[0, 1]` (clamped).
pub fn viridis(t: f64) -> Rgb<u8> {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (VIRIDIS.len() - 1) as f64;
    let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let f = pos - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    Rgb(std::array::from_fn(|c| {
        (a[c] as f64 + (b[c] as f64 - a[c] as f64) * f).round() as u8
    }))
}

/// Render `depth` through viridis and draw `samples` on top.
///
/// Markers take the color of their own depth under the same mapping, so a
/// sample that disagrees with its surroundings stands out.
pub fn render_preview(
    depth: &DepthGrid,
    samples: &SampleSet,
    config: &PreviewConfig,
) -> Result<RgbImage, DepthifyError> {
    config.normalization.validate()?;
    depth.ensure_finite()?;
    let (w, h) = depth.dimensions();
    samples.validate(w, h)?;

    let q = Quantizer::new(depth, config.normalization, config.high_is_dark);
    let color = |d: f64| viridis(q.unit(d).unwrap_or(0.5));

    let mut img = RgbImage::from_fn(w, h, |x, y| color(depth.get(x, y).unwrap_or(0.0)));

    if config.marker_radius > 0 {
        let r = config.marker_radius.min(i32::MAX as u32) as i32;
        let outline = Rgb(config.marker_outline);
        for s in samples {
            let center = (s.x as i32, s.y as i32);
            draw_filled_circle_mut(&mut img, center, r, color(s.depth));
            draw_hollow_circle_mut(&mut img, center, r, outline);
        }
    }

    tracing::debug!("rendered {}x{} preview with {} markers", w, h, samples.len());
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::samples;

    #[test]
    fn viridis_endpoints_and_clamping() {
        assert_eq!(viridis(0.0), Rgb([68, 1, 84]));
        assert_eq!(viridis(1.0), Rgb([253, 231, 37]));
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
        assert_eq!(viridis(0.5), Rgb([33, 144, 141]));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }

    #[test]
    fn high_depth_is_dark_by_default() {
        let depth = DepthGrid::from_vec(2, 1, vec![0.0, 1.0]).unwrap();
        let config = PreviewConfig {
            marker_radius: 0,
            ..Default::default()
        };
        let img = render_preview(&depth, &SampleSet::new(), &config).unwrap();
        assert_eq!(*img.get_pixel(0, 0), viridis(1.0));
        assert_eq!(*img.get_pixel(1, 0), viridis(0.0));
    }

    #[test]
    fn markers_are_drawn_at_samples() {
        let depth = DepthGrid::filled(21, 21, 0.5);
        let set = samples(&[(10, 10, 0.5)]);
        let config = PreviewConfig {
            marker_radius: 4,
            marker_outline: [255, 0, 0],
            ..Default::default()
        };
        let img = render_preview(&depth, &set, &config).unwrap();
        assert_eq!(*img.get_pixel(14, 10), Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(0, 0), viridis(0.5));
    }

    #[test]
    fn samples_outside_grid_are_rejected() {
        let depth = DepthGrid::filled(4, 4, 0.0);
        let set = samples(&[(4, 0, 1.0)]);
        assert!(matches!(
            render_preview(&depth, &set, &PreviewConfig::default()),
            Err(DepthifyError::InvalidInput(_))
        ));
    }
}
