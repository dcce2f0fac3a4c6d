//! Base colors for the two disc categories of a plate.
use image::Rgb;

use crate::color::cvd::DeficiencyKind;
use crate::error::{Error, Result};

/// Which base color a disc is painted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorCategory {
    Primary,
    Secondary,
}

/// Pair of base colors that jittered discs are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlatePalette {
    pub primary: [u8; 3],
    pub secondary: [u8; 3],
}

impl PlatePalette {
    pub const RED: [u8; 3] = [255, 0, 0];
    pub const DARK_GREEN: [u8; 3] = [0, 100, 0];
    pub const DARK_BLUE: [u8; 3] = [0, 0, 100];

    pub fn new(primary: [u8; 3], secondary: [u8; 3]) -> Self {
        Self { primary, secondary }
    }

    /// Red against the confusion color of `kind`: dark green for deuteranopia,
    /// dark blue for protanopia.
    pub fn for_kind(kind: DeficiencyKind) -> Result<Self> {
        match kind {
            DeficiencyKind::Deuteranopia => Ok(Self::new(Self::RED, Self::DARK_GREEN)),
            DeficiencyKind::Protanopia => Ok(Self::new(Self::RED, Self::DARK_BLUE)),
            other => Err(Error::UnsupportedDeficiencyKind {
                kind: other.to_string(),
            }),
        }
    }

    pub fn base(&self, category: ColorCategory) -> Rgb<u8> {
        match category {
            ColorCategory::Primary => Rgb(self.primary),
            ColorCategory::Secondary => Rgb(self.secondary),
        }
    }
}
