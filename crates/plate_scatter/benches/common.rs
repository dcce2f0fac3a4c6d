use std::time::Duration;

use criterion::{Criterion, Throughput};
use plate_scatter::glyph::{BitmapDigits, GlyphMask, GlyphSource};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

pub const SIDES: [u32; 3] = [300, 600, 900];

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Two-digit glyph thinned to every `step`-th pixel, so priority discs mostly fit.
pub fn digits_mask(side: u32, step: u32) -> GlyphMask {
    BitmapDigits
        .rasterize("74", side)
        .map(|mask| mask.thinned(step))
        .unwrap_or_else(|_| GlyphMask::new(side, side))
}
