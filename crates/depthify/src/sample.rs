//! Sparse depth samples.

use std::collections::HashSet;

use crate::error::{DepthifyError, InvalidInputReason};

/// A single user-placed depth sample at an integer pixel.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplePoint {
    /// Column in pixels.
    pub x: u32,
    /// Row in pixels.
    pub y: u32,
    /// Depth value. Unit and near/far convention are chosen by the caller.
    pub depth: f64,
}

impl SamplePoint {
    pub fn new(x: u32, y: u32, depth: f64) -> Self {
        Self { x, y, depth }
    }

    /// Position as `[x, y]`.
    #[inline]
    pub fn position(&self) -> [u32; 2] {
        [self.x, self.y]
    }

    /// Squared Euclidean distance to pixel `(px, py)`, computed exactly.
    #[inline]
    pub fn dist_sq(&self, px: u32, py: u32) -> u64 {
        let dx = self.x.abs_diff(px) as u64;
        let dy = self.y.abs_diff(py) as u64;
        dx * dx + dy * dy
    }
}

/// An ordered collection of samples.
///
/// Order carries no meaning for the surface except as the tie-break between
/// equidistant samples during nearest-sample lookup (earlier wins).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SampleSet {
    points: Vec<SamplePoint>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: SamplePoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &SamplePoint> + '_ {
        self.points.iter()
    }

    /// Check every sample against a `width x height` grid.
    ///
    /// Rejects out-of-bounds positions, non-finite depths and duplicate
    /// positions, in that order per sample.
    pub fn validate(&self, width: u32, height: u32) -> Result<(), DepthifyError> {
        let mut seen = HashSet::with_capacity(self.points.len());
        for p in &self.points {
            if p.x >= width || p.y >= height {
                return Err(InvalidInputReason::OutOfBounds {
                    position: p.position(),
                    size: [width, height],
                }
                .into());
            }
            if !p.depth.is_finite() {
                return Err(InvalidInputReason::NonFiniteDepth {
                    position: p.position(),
                }
                .into());
            }
            if !seen.insert(p.position()) {
                return Err(InvalidInputReason::DuplicatePosition {
                    position: p.position(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl From<Vec<SamplePoint>> for SampleSet {
    fn from(points: Vec<SamplePoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<SamplePoint> for SampleSet {
    fn from_iter<I: IntoIterator<Item = SamplePoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a SamplePoint;
    type IntoIter = std::slice::Iter<'a, SamplePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
