//! Dense per-pixel depth surface.

use image::{ImageBuffer, Luma};

use crate::error::{DepthifyError, InvalidInputReason};

/// Row-major `width x height` grid of depth values.
///
/// Values are stored unclamped in `f64`; normalization into pixel range is
/// done by the compositor.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthGrid {
    width: u32,
    height: u32,
    data: Vec<f64>,
}

impl DepthGrid {
    /// Grid filled with a single value.
    pub fn filled(width: u32, height: u32, value: f64) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Wrap raw row-major data.
    pub fn from_vec(width: u32, height: u32, data: Vec<f64>) -> Result<Self, DepthifyError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(InvalidInputReason::DataLength {
                expected,
                got: data.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`, mirroring `ImageBuffer::dimensions`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Value at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.data[self.index(x, y)])
        } else {
            None
        }
    }

    /// Panics if `(x, y)` is outside the grid.
    pub(crate) fn set(&mut self, x: u32, y: u32, value: f64) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Iterate `(x, y, value)` in row-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = (u32, u32, f64)> + '_ {
        let w = self.width as usize;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| ((i % w) as u32, (i / w) as u32, v))
    }

    /// Minimum and maximum over the whole grid.
    ///
    /// Returns `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let (&first, rest) = self.data.split_first()?;
        Some(
            rest.iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    /// Fail on the first NaN or infinite cell.
    pub fn ensure_finite(&self) -> Result<(), DepthifyError> {
        match self.enumerate().find(|(_, _, v)| !v.is_finite()) {
            Some((x, y, _)) => Err(InvalidInputReason::NonFiniteGridValue { position: [x, y] }.into()),
            None => Ok(()),
        }
    }

    /// Lossy conversion to an `f32` luma buffer for `image`/`imageproc` consumers.
    pub fn to_luma32f(&self) -> ImageBuffer<Luma<f32>, Vec<f32>> {
        let raw = self.data.iter().map(|&v| v as f32).collect();
        // Length matches by construction.
        ImageBuffer::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| ImageBuffer::new(self.width, self.height))
    }
}
