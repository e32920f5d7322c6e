//! Shared fixtures for unit tests.

use std::collections::HashSet;

use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::Rng;

use crate::sample::{SamplePoint, SampleSet};

/// Build a sample set from `(x, y, depth)` triples.
pub(crate) fn samples(points: &[(u32, u32, f64)]) -> SampleSet {
    points
        .iter()
        .map(|&(x, y, depth)| SamplePoint::new(x, y, depth))
        .collect()
}

/// `n` samples at distinct random positions with depths in `[0, 1)`.
pub(crate) fn random_samples(rng: &mut StdRng, n: usize, w: u32, h: u32) -> SampleSet {
    assert!(n <= (w * h) as usize);
    let mut seen = HashSet::new();
    let mut out = SampleSet::new();
    while out.len() < n {
        let x = rng.gen_range(0..w);
        let y = rng.gen_range(0..h);
        if seen.insert((x, y)) {
            out.push(SamplePoint::new(x, y, rng.gen::<f64>()));
        }
    }
    out
}

/// Horizontal intensity ramp from 0 on the left to 255 on the right.
pub(crate) fn gradient_image(w: u32, h: u32) -> GrayImage {
    GrayImage::from_fn(w, h, |x, _| {
        let v = if w > 1 { x * 255 / (w - 1) } else { 0 };
        Luma([v as u8])
    })
}
