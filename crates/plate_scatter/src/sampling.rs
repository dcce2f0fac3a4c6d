//! Random draws shared by the packer and the color jitter.
//!
//! Everything here consumes `next_u32` from a caller-supplied [`RngCore`], so a seeded
//! generator replays the exact same plate.
use rand::Rng as RngCore;

/// Generate a random float in the range [0, 1).
///
/// Uses the top 24 bits of the draw so the result is exact in `f32` and never reaches 1.0.
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
}

/// Draw a uniform integer in `lo..=hi` using one `next_u32`.
///
/// Returns `lo` when the range is empty or a single value; the draw is still consumed so
/// that callers advance the sequence the same way regardless of the range.
#[inline]
pub(crate) fn rand_int(rng: &mut dyn RngCore, lo: i64, hi: i64) -> i64 {
    let draw = rng.next_u32();
    if hi <= lo {
        return lo;
    }
    let span = (hi - lo) as u128 + 1;
    lo + ((draw as u128 * span) >> 32) as i64
}

/// Draw `true` with probability `ratio`.
#[inline]
pub(crate) fn chance(rng: &mut dyn RngCore, ratio: f32) -> bool {
    rand01(rng) < ratio
}

/// Draw a disc center so that a disc of `radius` lies fully inside a square of `side`.
///
/// Returns `None` (without drawing) when the disc cannot fit at all.
pub(crate) fn center_inside(rng: &mut dyn RngCore, side: u32, radius: u32) -> Option<(i32, i32)> {
    let r = radius as i64;
    let max = side as i64 - r;
    if max < r {
        return None;
    }
    let x = rand_int(rng, r, max);
    let y = rand_int(rng, r, max);
    Some((x as i32, y as i32))
}
