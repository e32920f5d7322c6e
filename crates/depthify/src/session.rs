//! Point-editing session.
//!
//! Holds the sample list behind an interactive editor: add (with overwrite),
//! undo, clear. Rendering snapshots the list and runs the pure pipeline, so
//! nothing the session owns is ever visible to the engine.

use image::GrayImage;

use crate::config::DepthifyConfig;
use crate::depth_grid::DepthGrid;
use crate::error::{DepthifyError, InvalidInputReason};
use crate::interpolate::{interpolate, InterpolationConfig, MAX_GRID_SIDE};
use crate::pipeline::{render, RenderOutput};
use crate::sample::{SamplePoint, SampleSet};

/// Editable sample list bound to an image size.
#[derive(Debug, Clone)]
pub struct DepthSession {
    width: u32,
    height: u32,
    history: Vec<SamplePoint>,
}

impl DepthSession {
    pub fn new(width: u32, height: u32) -> Result<Self, DepthifyError> {
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
        Ok(Self {
            width,
            height,
            history: Vec::new(),
        })
    }

    /// Session sized to an image.
    pub fn for_image(gray: &GrayImage) -> Result<Self, DepthifyError> {
        let (w, h) = gray.dimensions();
        Self::new(w, h)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Place a sample. A sample already at `(x, y)` is replaced and
    /// returned; the new one becomes the most recent entry.
    pub fn add(&mut self, x: u32, y: u32, depth: f64) -> Result<Option<SamplePoint>, DepthifyError> {
        if x >= self.width || y >= self.height {
            return Err(InvalidInputReason::OutOfBounds {
                position: [x, y],
                size: [self.width, self.height],
            }
            .into());
        }
        if !depth.is_finite() {
            return Err(InvalidInputReason::NonFiniteDepth { position: [x, y] }.into());
        }

        let replaced = self
            .history
            .iter()
            .position(|p| p.x == x && p.y == y)
            .map(|i| self.history.remove(i));
        if let Some(old) = replaced {
            tracing::debug!("replacing sample at ({}, {}): {} -> {}", x, y, old.depth, depth);
        }
        self.history.push(SamplePoint::new(x, y, depth));
        Ok(replaced)
    }

    /// Remove the most recent sample.
    pub fn undo(&mut self) -> Option<SamplePoint> {
        self.history.pop()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Owned snapshot of the current samples, oldest first.
    pub fn samples(&self) -> SampleSet {
        self.history.iter().copied().collect()
    }

    /// Depth surface for the current samples.
    pub fn interpolate(&self, config: &InterpolationConfig) -> Result<DepthGrid, DepthifyError> {
        interpolate(self.width, self.height, &self.samples(), config)
    }

    /// Depth surface and composite for `gray`, which must match the session size.
    pub fn render(
        &self,
        gray: &GrayImage,
        config: &DepthifyConfig,
    ) -> Result<RenderOutput, DepthifyError> {
        let (w, h) = gray.dimensions();
        if (w, h) != (self.width, self.height) {
            return Err(DepthifyError::DimensionMismatch {
                expected: [self.width, self.height],
                got: [w, h],
            });
        }
        render(gray, &self.samples(), config)
    }
}
