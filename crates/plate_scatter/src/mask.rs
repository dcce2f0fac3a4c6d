//! Circular alpha mask that turns the square canvas into a round plate.
use image::{GrayImage, Luma, RgbaImage};

/// Alpha mask for the circle inscribed in the canvas.
///
/// With `feather == 0` the edge is hard: 255 when the pixel center is within half the canvas
/// side of the canvas center, 0 otherwise. A positive `feather` ramps alpha down linearly over
/// that many pixels just inside the edge; pixels beyond the circle stay fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircularMask {
    pub feather: f32,
}

impl CircularMask {
    /// Hard-edged mask.
    pub fn hard() -> Self {
        Self { feather: 0.0 }
    }

    /// Mask with a linear ramp of `feather` pixels at the edge.
    pub fn smoothed(feather: f32) -> Self {
        Self {
            feather: feather.max(0.0),
        }
    }

    /// Alpha for pixel `(x, y)` of a `width` × `height` canvas.
    pub fn alpha_at(&self, x: u32, y: u32, width: u32, height: u32) -> u8 {
        let radius = width.min(height) as f32 * 0.5;
        let dx = x as f32 + 0.5 - width as f32 * 0.5;
        let dy = y as f32 + 0.5 - height as f32 * 0.5;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance > radius {
            return 0;
        }
        if self.feather <= 0.0 || distance <= radius - self.feather {
            return 255;
        }
        ((radius - distance) / self.feather * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8
    }

    /// The mask for a square canvas of `side` pixels.
    pub fn alpha(&self, side: u32) -> GrayImage {
        GrayImage::from_fn(side, side, |x, y| Luma([self.alpha_at(x, y, side, side)]))
    }

    /// Replaces the alpha channel of `canvas` with the mask.
    pub fn apply(&self, canvas: &mut RgbaImage) {
        let (w, h) = canvas.dimensions();
        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            pixel.0[3] = self.alpha_at(x, y, w, h);
        }
    }
}

/// Hard-edged alpha mask for a square canvas of `side` pixels.
///
/// Distances are measured from pixel centers `(x + 0.5, y + 0.5)`, so an edge pixel whose
/// corner lies past `side / 2` can still be opaque.
pub fn circular_alpha(side: u32) -> GrayImage {
    CircularMask::hard().alpha(side)
}

/// Applies the hard-edged circular mask to `canvas` in place.
pub fn apply_circular_mask(canvas: &mut RgbaImage) {
    CircularMask::hard().apply(canvas);
}
