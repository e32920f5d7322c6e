//! Nearest-sample lookup.

use crate::depth_grid::DepthGrid;
use crate::sample::SamplePoint;

/// Depth of the sample closest to `(x, y)`; ties go to the earlier sample.
///
/// Returns `None` only for an empty slice.
#[inline]
pub(crate) fn nearest_depth(samples: &[SamplePoint], x: u32, y: u32) -> Option<f64> {
    samples
        .iter()
        .min_by_key(|s| s.dist_sq(x, y))
        .map(|s| s.depth)
}

/// Fill every pixel not marked in `covered` (all pixels when `None`) with
/// the depth of its nearest sample. Returns the number of pixels written.
pub(crate) fn fill_nearest(
    samples: &[SamplePoint],
    grid: &mut DepthGrid,
    covered: Option<&[bool]>,
) -> usize {
    if samples.is_empty() {
        return 0;
    }
    let (w, h) = grid.dimensions();
    let mut n_written = 0;
    for y in 0..h {
        for x in 0..w {
            let i = y as usize * w as usize + x as usize;
            if covered.is_some_and(|c| c[i]) {
                continue;
            }
            if let Some(d) = nearest_depth(samples, x, y) {
                grid.set(x, y, d);
                n_written += 1;
            }
        }
    }
    n_written
}
