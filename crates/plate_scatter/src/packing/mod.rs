//! Disc packing: placing non-overlapping discs of decreasing size onto a square canvas.
//!
//! Placement is driven by [`packer::DiscPacker`] and collision checks go through an
//! [`occupancy::OccupancyIndex`], either the conservative cell grid or the exact pairwise test.
use image::Rgb;

use crate::color::ColorCategory;

pub mod occupancy;
pub mod packer;

pub use occupancy::{ExactOccupancy, GridOccupancy, OccupancyIndex, OccupancyStrategy};
pub use packer::{
    DiscPacker, GlyphPolicy, PackConfig, PackPhase, PackResult, PackStats, PhaseOrder,
};

/// A placed disc. Discs never change after placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disc {
    /// Center in canvas pixels.
    pub x: i32,
    pub y: i32,
    pub radius: u32,
    pub category: ColorCategory,
    /// Jittered fill color chosen at placement.
    pub color: Rgb<u8>,
}

impl Disc {
    /// True when the two discs share interior area. Touching discs do not overlap.
    pub fn overlaps(&self, other: &Disc) -> bool {
        discs_overlap(
            (self.x, self.y, self.radius),
            (other.x, other.y, other.radius),
        )
    }

    /// True when the disc lies fully inside a square canvas of `side` pixels.
    pub fn fits_in(&self, side: u32) -> bool {
        let r = self.radius as i64;
        let (x, y, s) = (self.x as i64, self.y as i64, side as i64);
        x - r >= 0 && y - r >= 0 && x + r <= s && y + r <= s
    }
}

/// Integer overlap test: `hypot(dx, dy) < r1 + r2` without floating point.
#[inline]
pub(crate) fn discs_overlap(a: (i32, i32, u32), b: (i32, i32, u32)) -> bool {
    let dx = a.0 as i64 - b.0 as i64;
    let dy = a.1 as i64 - b.1 as i64;
    let reach = a.2 as i64 + b.2 as i64;
    dx * dx + dy * dy < reach * reach
}

/// Discs in placement order: priority discs first, then background discs by descending
/// radius class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedSet {
    discs: Vec<Disc>,
    priority_len: usize,
}

impl PackedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.discs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discs.is_empty()
    }

    pub fn as_slice(&self) -> &[Disc] {
        &self.discs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Disc> {
        self.discs.iter()
    }

    /// Discs placed during the priority (glyph) phase.
    pub fn priority(&self) -> &[Disc] {
        &self.discs[..self.priority_len]
    }

    /// Discs placed during the background phase.
    pub fn background(&self) -> &[Disc] {
        &self.discs[self.priority_len..]
    }

    pub(crate) fn push_priority(&mut self, disc: Disc) {
        debug_assert_eq!(self.priority_len, self.discs.len());
        self.discs.push(disc);
        self.priority_len += 1;
    }

    pub(crate) fn push_background(&mut self, disc: Disc) {
        self.discs.push(disc);
    }

    /// First pair of overlapping discs, if any. Quadratic; meant for checks and tests.
    pub fn find_overlap(&self) -> Option<(usize, usize)> {
        for i in 0..self.discs.len() {
            for j in (i + 1)..self.discs.len() {
                if self.discs[i].overlaps(&self.discs[j]) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a PackedSet {
    type Item = &'a Disc;
    type IntoIter = std::slice::Iter<'a, Disc>;

    fn into_iter(self) -> Self::IntoIter {
        self.discs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(x: i32, y: i32, radius: u32) -> Disc {
        Disc {
            x,
            y,
            radius,
            category: ColorCategory::Primary,
            color: Rgb([0, 0, 0]),
        }
    }

    #[test]
    fn tangent_discs_do_not_overlap() {
        assert!(!disc(0, 0, 5).overlaps(&disc(10, 0, 5)));
        assert!(!disc(0, 0, 3).overlaps(&disc(3, 4, 2)));
        assert!(disc(0, 0, 5).overlaps(&disc(9, 0, 5)));
        assert!(disc(0, 0, 3).overlaps(&disc(3, 4, 3)));
    }

    #[test]
    fn fits_in_checks_all_edges() {
        assert!(disc(5, 5, 5).fits_in(10));
        assert!(!disc(4, 5, 5).fits_in(10));
        assert!(!disc(5, 6, 5).fits_in(10));
        assert!(!disc(0, 0, 1).fits_in(0));
    }

    #[test]
    fn priority_and_background_split() {
        let mut set = PackedSet::new();
        set.push_priority(disc(10, 10, 5));
        set.push_background(disc(30, 30, 5));
        set.push_background(disc(50, 50, 5));
        assert_eq!(set.len(), 3);
        assert_eq!(set.priority().len(), 1);
        assert_eq!(set.background().len(), 2);
        assert_eq!(set.find_overlap(), None);

        set.push_background(disc(52, 50, 5));
        assert_eq!(set.find_overlap(), Some((2, 3)));
    }
}
