//! Simulation of how an image appears to a viewer with a color vision deficiency.
//!
//! [`ColorAppearanceTransform`] is the boundary the plate pipeline depends on: a pure function
//! from an RGBA image and a [`DeficiencySpec`] to an image of the same size, alpha untouched.
//! [`MachadoTransform`] is the built-in model. It works on linear RGB with the simulation
//! matrices published by Machado, Oliveira and Fernandes (2009), interpolating between the
//! tabulated severities.
use std::fmt;
use std::str::FromStr;

use glam::{Mat3, Vec3};
use image::RgbaImage;

use crate::error::{Error, Result};

/// Named color vision deficiencies.
///
/// `Tritanopia` is recognized so it can be parsed and reported, but neither the built-in
/// transform nor the built-in palettes support it.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeficiencyKind {
    Deuteranopia,
    Protanopia,
    Tritanopia,
}

impl DeficiencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeficiencyKind::Deuteranopia => "deuteranopia",
            DeficiencyKind::Protanopia => "protanopia",
            DeficiencyKind::Tritanopia => "tritanopia",
        }
    }
}

impl fmt::Display for DeficiencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeficiencyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deuteranopia" => Ok(DeficiencyKind::Deuteranopia),
            "protanopia" => Ok(DeficiencyKind::Protanopia),
            "tritanopia" => Ok(DeficiencyKind::Tritanopia),
            _ => Err(Error::UnsupportedDeficiencyKind { kind: s.to_owned() }),
        }
    }
}

/// A deficiency and how strongly to simulate it, `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeficiencySpec {
    pub kind: DeficiencyKind,
    pub severity: u8,
}

impl DeficiencySpec {
    pub const MAX_SEVERITY: u8 = 100;

    pub fn new(kind: DeficiencyKind, severity: u8) -> Self {
        Self { kind, severity }
    }

    /// Full-strength simulation of `kind`.
    pub fn full(kind: DeficiencyKind) -> Self {
        Self::new(kind, Self::MAX_SEVERITY)
    }

    /// Validates the severity range, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.severity > Self::MAX_SEVERITY {
            return Err(Error::InvalidConfig(format!(
                "severity must be in 0..=100, got {}",
                self.severity
            )));
        }
        Ok(())
    }
}

/// Maps a true-color image to its simulated appearance under a deficiency.
///
/// Implementations must be pure: identical inputs give identical outputs, the input is not
/// modified, the output has the input's dimensions and alpha channel, and severity 0 returns
/// the input colors unchanged. Kinds the model cannot simulate fail with
/// [`Error::UnsupportedDeficiencyKind`].
pub trait ColorAppearanceTransform: Send + Sync {
    fn simulate(&self, image: &RgbaImage, spec: &DeficiencySpec) -> Result<RgbaImage>;
}

/// Linear-RGB simulation with the Machado et al. (2009) matrices.
#[derive(Debug, Clone, Copy, Default)]
pub struct MachadoTransform;

impl MachadoTransform {
    pub fn new() -> Self {
        Self
    }

    /// Simulation matrix for `kind` at `severity` (0..=100), acting on linear RGB column
    /// vectors.
    pub fn matrix(kind: DeficiencyKind, severity: u8) -> Result<Mat3> {
        let table = match kind {
            DeficiencyKind::Protanopia => &PROTANOMALY,
            DeficiencyKind::Deuteranopia => &DEUTERANOMALY,
            other => {
                return Err(Error::UnsupportedDeficiencyKind {
                    kind: other.to_string(),
                })
            }
        };

        let severity = severity.min(DeficiencySpec::MAX_SEVERITY) as usize;
        let step = severity / 10;
        let low = rows_to_mat(&table[step]);
        let remainder = severity % 10;
        if remainder == 0 {
            return Ok(low);
        }

        let t = remainder as f32 / 10.0;
        let high = rows_to_mat(&table[step + 1]);
        Ok(low * (1.0 - t) + high * t)
    }
}

impl ColorAppearanceTransform for MachadoTransform {
    fn simulate(&self, image: &RgbaImage, spec: &DeficiencySpec) -> Result<RgbaImage> {
        spec.validate()?;
        let matrix = Self::matrix(spec.kind, spec.severity)?;
        if spec.severity == 0 {
            return Ok(image.clone());
        }

        let decode = srgb_decode_table();
        let mut out = image.clone();
        for pixel in out.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            let linear = Vec3::new(decode[r as usize], decode[g as usize], decode[b as usize]);
            let simulated = matrix * linear;
            pixel.0 = [
                srgb_encode(simulated.x),
                srgb_encode(simulated.y),
                srgb_encode(simulated.z),
                a,
            ];
        }
        Ok(out)
    }
}

type Rows = [[f32; 3]; 3];

fn rows_to_mat(rows: &Rows) -> Mat3 {
    // glam reads nested arrays as columns.
    Mat3::from_cols_array_2d(rows).transpose()
}

fn srgb_decode_table() -> [f32; 256] {
    let mut table = [0.0f32; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        let c = i as f32 / 255.0;
        *slot = if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        };
    }
    table
}

fn srgb_encode(linear: f32) -> u8 {
    let c = linear.clamp(0.0, 1.0);
    let encoded = if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round().clamp(0.0, 255.0) as u8
}

const IDENTITY: Rows = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

#[rustfmt::skip]
const PROTANOMALY: [Rows; 11] = [
    IDENTITY,
    [[0.856167, 0.182038, -0.038205], [0.029342, 0.955115, 0.015544], [-0.002880, -0.001563, 1.004443]],
    [[0.734766, 0.334872, -0.069637], [0.051840, 0.919198, 0.028963], [-0.004928, -0.004209, 1.009137]],
    [[0.630323, 0.465641, -0.095964], [0.069181, 0.890046, 0.040773], [-0.006308, -0.007724, 1.014032]],
    [[0.539009, 0.579343, -0.118352], [0.082546, 0.866121, 0.051332], [-0.007136, -0.011959, 1.019095]],
    [[0.458064, 0.679578, -0.137642], [0.092785, 0.846313, 0.060902], [-0.007494, -0.016807, 1.024301]],
    [[0.385450, 0.769005, -0.154455], [0.100526, 0.829802, 0.069673], [-0.007442, -0.022190, 1.029632]],
    [[0.319627, 0.849633, -0.169261], [0.106241, 0.815969, 0.077790], [-0.007025, -0.028051, 1.035076]],
    [[0.259411, 0.923008, -0.182420], [0.110296, 0.804340, 0.085364], [-0.006276, -0.034346, 1.040622]],
    [[0.203876, 0.990338, -0.194214], [0.112975, 0.794542, 0.092483], [-0.005222, -0.041043, 1.046265]],
    [[0.152286, 1.052583, -0.204868], [0.114503, 0.786281, 0.099216], [-0.003882, -0.048116, 1.051998]],
];

#[rustfmt::skip]
const DEUTERANOMALY: [Rows; 11] = [
    IDENTITY,
    [[0.866435, 0.177704, -0.044139], [0.049567, 0.939063, 0.011370], [-0.003453, 0.007233, 0.996220]],
    [[0.760729, 0.319078, -0.079807], [0.090568, 0.889315, 0.020117], [-0.006027, 0.013325, 0.992702]],
    [[0.675425, 0.433850, -0.109275], [0.125303, 0.847755, 0.026942], [-0.007950, 0.018572, 0.989378]],
    [[0.605511, 0.528560, -0.134071], [0.155318, 0.812366, 0.032316], [-0.009376, 0.023176, 0.986200]],
    [[0.547494, 0.607765, -0.155259], [0.181692, 0.781742, 0.036566], [-0.010410, 0.027275, 0.983136]],
    [[0.498864, 0.674741, -0.173604], [0.205199, 0.754872, 0.039929], [-0.011131, 0.030969, 0.980162]],
    [[0.457771, 0.731899, -0.189670], [0.226409, 0.731012, 0.042579], [-0.011595, 0.034333, 0.977261]],
    [[0.422823, 0.781057, -0.203881], [0.245752, 0.709602, 0.044646], [-0.011843, 0.037423, 0.974421]],
    [[0.392952, 0.823610, -0.216562], [0.263559, 0.690210, 0.046232], [-0.011910, 0.040281, 0.971630]],
    [[0.367322, 0.860646, -0.227968], [0.280085, 0.672501, 0.047413], [-0.011820, 0.042940, 0.968881]],
];
