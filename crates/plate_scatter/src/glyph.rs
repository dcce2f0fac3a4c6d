//! Glyph coverage masks and the text-rasterization boundary.
//!
//! The packer only needs a [`GlyphMask`]: a boolean grid marking the pixels that must carry a
//! priority disc. Masks come from a [`GlyphSource`] (text in, mask out), from any grayscale
//! coverage image via [`GlyphMask::from_luma`], or from explicit points.
use image::GrayImage;

use crate::error::{Error, Result};

/// Boolean coverage grid in canvas pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl GlyphMask {
    /// Creates a mask with no covered pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Covers the given points. Points outside the mask are dropped.
    pub fn from_points<I>(width: u32, height: u32, points: I) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut mask = Self::new(width, height);
        for (x, y) in points {
            mask.set(x, y, true);
        }
        mask
    }

    /// Covers every pixel with a non-zero value.
    pub fn from_luma(image: &GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            cells: image.pixels().map(|p| p.0[0] > 0).collect(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Whether `(x, y)` is covered. Outside the mask reads as uncovered.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    /// Sets coverage at `(x, y)`; ignored outside the mask.
    pub fn set(&mut self, x: i32, y: i32, covered: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = covered;
        }
    }

    /// Number of covered pixels.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// True when no pixel is covered.
    pub fn is_blank(&self) -> bool {
        !self.cells.iter().any(|c| *c)
    }

    /// Covered pixels in row-major order: top row first, left to right within a row.
    pub fn points(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(move |(i, _)| ((i % width) as i32, (i / width) as i32))
    }

    /// Keeps only covered pixels on a `step` × `step` lattice. A step of 0 or 1 is a copy.
    pub fn thinned(&self, step: u32) -> Self {
        if step <= 1 {
            return self.clone();
        }
        let step = step as i32;
        Self::from_points(
            self.width,
            self.height,
            self.points().filter(|(x, y)| x % step == 0 && y % step == 0),
        )
    }

    /// Grayscale view of the mask: 255 where covered, 0 elsewhere.
    pub fn to_luma(&self) -> GrayImage {
        let data = self.cells.iter().map(|c| if *c { 255 } else { 0 }).collect();
        GrayImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }
}

/// Renders text into a coverage mask for a square canvas.
pub trait GlyphSource: Send + Sync {
    fn rasterize(&self, text: &str, side: u32) -> Result<GlyphMask>;
}

/// Built-in 5×7 bitmap digits.
///
/// Text is scaled so its height is about a third of the canvas and centered on it. Supports
/// the digits `0`-`9` and spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapDigits;

impl BitmapDigits {
    const COLS: u32 = 5;
    const ROWS: u32 = 7;
    const ADVANCE: u32 = Self::COLS + 1;

    pub fn new() -> Self {
        Self
    }

    fn rows(ch: char) -> Result<[u8; 7]> {
        let rows = match ch {
            '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
            '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
            '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
            '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
            '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
            '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
            '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
            '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
            '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
            '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
            ' ' => [0; 7],
            other => return Err(Error::UnsupportedGlyph { ch: other }),
        };
        Ok(rows)
    }
}

impl GlyphSource for BitmapDigits {
    fn rasterize(&self, text: &str, side: u32) -> Result<GlyphMask> {
        let glyphs = text.chars().map(Self::rows).collect::<Result<Vec<_>>>()?;
        let mut mask = GlyphMask::new(side, side);
        if glyphs.is_empty() {
            return Ok(mask);
        }

        let scale = (side / 3 / Self::ROWS).max(1);
        let text_w = (glyphs.len() as u32 * Self::ADVANCE - 1) * scale;
        let text_h = Self::ROWS * scale;
        let origin_x = (side as i64 - text_w as i64) / 2;
        let origin_y = (side as i64 - text_h as i64) / 2;

        for (i, rows) in glyphs.iter().enumerate() {
            let glyph_x = origin_x + (i as u32 * Self::ADVANCE * scale) as i64;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..Self::COLS {
                    if bits & (1 << (Self::COLS - 1 - col)) == 0 {
                        continue;
                    }
                    let x0 = glyph_x + (col * scale) as i64;
                    let y0 = origin_y + (row as u32 * scale) as i64;
                    for y in y0..y0 + scale as i64 {
                        for x in x0..x0 + scale as i64 {
                            mask.set(x as i32, y as i32, true);
                        }
                    }
                }
            }
        }
        Ok(mask)
    }
}
