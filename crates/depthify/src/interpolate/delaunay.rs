//! Delaunay triangulation of integer pixel positions.
//!
//! Construction is a lexicographic sweep: every point added is outside the
//! current hull and gets joined to each hull edge it can see. The sweep
//! produces a triangulation of the exact convex hull, which Lawson edge
//! flips then turn into a Delaunay one. All predicates run on integer
//! coordinates in `i128`, so there is no tolerance anywhere.

use std::collections::HashMap;

/// Pixel position in signed integer coordinates.
pub(crate) type Vertex = [i64; 2];

/// Twice the signed area of `(a, b, c)`; positive when counter-clockwise.
#[inline]
pub(crate) fn orient2d(a: Vertex, b: Vertex, c: Vertex) -> i128 {
    let abx = (b[0] - a[0]) as i128;
    let aby = (b[1] - a[1]) as i128;
    let acx = (c[0] - a[0]) as i128;
    let acy = (c[1] - a[1]) as i128;
    abx * acy - aby * acx
}

/// Positive when `d` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `(a, b, c)`, zero when cocircular.
///
/// Exact for coordinate differences below 2^30.
#[inline]
pub(crate) fn in_circle(a: Vertex, b: Vertex, c: Vertex, d: Vertex) -> i128 {
    let adx = (a[0] - d[0]) as i128;
    let ady = (a[1] - d[1]) as i128;
    let bdx = (b[0] - d[0]) as i128;
    let bdy = (b[1] - d[1]) as i128;
    let cdx = (c[0] - d[0]) as i128;
    let cdy = (c[1] - d[1]) as i128;

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    ad * (bdx * cdy - cdx * bdy) - bd * (adx * cdy - cdx * ady) + cd * (adx * bdy - bdx * ady)
}

/// Triangulation over a fixed vertex list.
#[derive(Debug, Clone)]
pub(crate) struct Triangulation {
    /// Vertices in caller order; triangle indices point into this list.
    pub vertices: Vec<Vertex>,
    /// Counter-clockwise vertex index triples.
    pub triangles: Vec<[usize; 3]>,
    /// Counter-clockwise hull cycle, collinear boundary vertices included.
    pub hull: Vec<usize>,
}

impl Triangulation {
    /// Triangulate `vertices` (distinct positions).
    ///
    /// Returns `None` when fewer than three vertices are given or all of
    /// them are collinear.
    pub fn build(vertices: Vec<Vertex>) -> Option<Self> {
        let n = vertices.len();
        if n < 3 {
            return None;
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_unstable_by_key(|&i| vertices[i]);

        let p0 = vertices[order[0]];
        let p1 = vertices[order[1]];
        let apex_pos = (2..n).find(|&k| orient2d(p0, p1, vertices[order[k]]) != 0)?;
        let apex = order[apex_pos];

        // Seed: fan from the first off-line point to the collinear prefix.
        let chain = &order[..apex_pos];
        let left_turn = orient2d(p0, p1, vertices[apex]) > 0;
        let mut triangles = Vec::with_capacity(2 * n);
        for pair in chain.windows(2) {
            if left_turn {
                triangles.push([pair[0], pair[1], apex]);
            } else {
                triangles.push([pair[1], pair[0], apex]);
            }
        }
        let mut hull: Vec<usize> = if left_turn {
            chain.iter().copied().chain(std::iter::once(apex)).collect()
        } else {
            chain.iter().rev().copied().chain(std::iter::once(apex)).collect()
        };

        for &p in &order[apex_pos + 1..] {
            add_outside_point(&vertices, &mut hull, &mut triangles, p);
        }

        let mut tri = Self {
            vertices,
            triangles,
            hull,
        };
        tri.legalize();
        Some(tri)
    }

    /// Flip every locally non-Delaunay interior edge until none remain.
    fn legalize(&mut self) {
        let mut edges: HashMap<(usize, usize), usize> =
            HashMap::with_capacity(self.triangles.len() * 3);
        for (t, tri) in self.triangles.iter().enumerate() {
            for e in 0..3 {
                edges.insert((tri[e], tri[(e + 1) % 3]), t);
            }
        }

        let mut stack: Vec<(usize, usize)> =
            edges.keys().copied().filter(|&(a, b)| a < b).collect();
        let mut n_flips = 0usize;

        while let Some((a, b)) = stack.pop() {
            let (Some(&t1), Some(&t2)) = (edges.get(&(a, b)), edges.get(&(b, a))) else {
                continue;
            };
            let c = opposite(self.triangles[t1], a, b);
            let d = opposite(self.triangles[t2], a, b);
            let v = &self.vertices;
            if in_circle(v[a], v[b], v[c], v[d]) <= 0 {
                continue;
            }

            // (a, b, c) + (b, a, d)  ->  (a, d, c) + (d, b, c)
            for e in [(a, b), (b, c), (c, a), (b, a), (a, d), (d, b)] {
                edges.remove(&e);
            }
            self.triangles[t1] = [a, d, c];
            self.triangles[t2] = [d, b, c];
            for (e, t) in [
                ((a, d), t1),
                ((d, c), t1),
                ((c, a), t1),
                ((d, b), t2),
                ((b, c), t2),
                ((c, d), t2),
            ] {
                edges.insert(e, t);
            }
            stack.extend([(a, d), (d, b), (b, c), (c, a)]);
            n_flips += 1;
        }

        tracing::trace!(
            "delaunay: {} vertices, {} triangles, {} flips",
            self.vertices.len(),
            self.triangles.len(),
            n_flips
        );
    }

    /// Corner positions of triangle `t`.
    #[inline]
    pub fn corners(&self, t: usize) -> [Vertex; 3] {
        self.triangles[t].map(|i| self.vertices[i])
    }
}

/// Join `p` (outside the hull) to every hull edge it sees and update the hull.
fn add_outside_point(
    vertices: &[Vertex],
    hull: &mut Vec<usize>,
    triangles: &mut Vec<[usize; 3]>,
    p: usize,
) {
    let m = hull.len();
    let pv = vertices[p];
    let visible = |e: usize| orient2d(vertices[hull[e]], vertices[hull[(e + 1) % m]], pv) < 0;

    // First visible edge whose predecessor is hidden. Some edge is always
    // hidden because `p` is outside a non-degenerate convex polygon.
    let Some(start) = (0..m).find(|&e| visible(e) && !visible((e + m - 1) % m)) else {
        return;
    };
    hull.rotate_left(start);

    let mut n_visible = 0;
    while n_visible < m
        && orient2d(
            vertices[hull[n_visible]],
            vertices[hull[(n_visible + 1) % m]],
            pv,
        ) < 0
    {
        let a = hull[n_visible];
        let b = hull[(n_visible + 1) % m];
        triangles.push([b, a, p]);
        n_visible += 1;
    }

    // hull[1..n_visible] are now interior; p takes their place.
    hull.splice(1..n_visible, std::iter::once(p));
}

#[inline]
fn opposite(tri: [usize; 3], a: usize, b: usize) -> usize {
    tri.into_iter()
        .find(|&v| v != a && v != b)
        .unwrap_or(tri[0])
}
