//! Piecewise-linear surface over a triangulation.

use nalgebra::Vector3;

use super::delaunay::{orient2d, Triangulation};
use crate::depth_grid::DepthGrid;

/// Write barycentric interpolants for every pixel inside or on a triangle.
///
/// `depths[i]` is the value at `tri.vertices[i]`. Pixels shared by several
/// triangles (edges, vertices) keep the first value written; the formula is
/// continuous across edges so the choice does not matter beyond rounding.
/// Marks written pixels in `covered` and returns how many were written.
pub(crate) fn rasterize(
    tri: &Triangulation,
    depths: &[f64],
    grid: &mut DepthGrid,
    covered: &mut [bool],
) -> usize {
    let width = grid.width() as usize;
    let x_limit = grid.width() as i64 - 1;
    let y_limit = grid.height() as i64 - 1;
    let mut n_written = 0;

    for (t, idx) in tri.triangles.iter().enumerate() {
        let [a, b, c] = tri.corners(t);
        let area = orient2d(a, b, c);
        if area <= 0 {
            continue;
        }
        let inv_area = 1.0 / area as f64;
        let values = Vector3::new(depths[idx[0]], depths[idx[1]], depths[idx[2]]);

        let x0 = a[0].min(b[0]).min(c[0]).max(0);
        let x1 = a[0].max(b[0]).max(c[0]).min(x_limit);
        let y0 = a[1].min(b[1]).min(c[1]).max(0);
        let y1 = a[1].max(b[1]).max(c[1]).min(y_limit);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let i = y as usize * width + x as usize;
                if covered[i] {
                    continue;
                }
                let p = [x, y];
                let wa = orient2d(b, c, p);
                let wb = orient2d(c, a, p);
                let wc = orient2d(a, b, p);
                if wa < 0 || wb < 0 || wc < 0 {
                    continue;
                }
                // At a vertex the weights are exactly (1, 0, 0) up to order.
                let weights = if wa == area {
                    Vector3::new(1.0, 0.0, 0.0)
                } else if wb == area {
                    Vector3::new(0.0, 1.0, 0.0)
                } else if wc == area {
                    Vector3::new(0.0, 0.0, 1.0)
                } else {
                    Vector3::new(wa as f64, wb as f64, wc as f64) * inv_area
                };
                grid.set(x as u32, y as u32, weights.dot(&values));
                covered[i] = true;
                n_written += 1;
            }
        }
    }
    n_written
}
