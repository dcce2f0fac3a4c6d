//! Bounded random perturbation of a base color.
use image::Rgb;
use rand::Rng as RngCore;

use crate::sampling::rand_int;

/// Per-channel spread used when nothing else is configured.
pub const DEFAULT_JITTER_SPREAD: u32 = 30;

/// Offset every channel of `base` by a uniform integer in `[-spread, spread]` and clamp
/// the result to `[0, 255]`.
///
/// Consumes exactly three draws from `rng`, one per channel in R, G, B order.
pub fn jitter(base: Rgb<u8>, spread: u32, rng: &mut dyn RngCore) -> Rgb<u8> {
    let spread = spread as i64;
    let mut out = base;
    for channel in out.0.iter_mut() {
        let offset = rand_int(rng, -spread, spread);
        *channel = (*channel as i64 + offset).clamp(0, 255) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::tests::FixedRng;

    struct CountingRng {
        inner: StdRng,
        draws: usize,
    }

    impl rand::TryRng for CountingRng {
        type Error = core::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            self.draws += 1;
            Ok(self.inner.next_u32())
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            self.draws += 1;
            Ok(self.inner.next_u64())
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
            self.draws += 1;
            self.inner.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn zero_spread_keeps_color() {
        let mut rng = StdRng::seed_from_u64(1);
        let base = Rgb([12, 200, 99]);
        assert_eq!(jitter(base, 0, &mut rng), base);
    }

    #[test]
    fn output_is_clamped_for_extreme_spread() {
        let mut rng = StdRng::seed_from_u64(5);
        for base in [Rgb([0, 0, 0]), Rgb([255, 255, 255]), Rgb([255, 0, 100])] {
            for spread in [1, 30, 255, 10_000, u32::MAX] {
                // u8 channels cannot leave [0, 255]; this checks the clamp path does not wrap.
                let out = jitter(base, spread, &mut rng);
                for (o, b) in out.0.iter().zip(base.0.iter()) {
                    let delta = (*o as i64 - *b as i64).abs();
                    assert!(delta <= spread as i64);
                }
            }
        }
    }

    #[test]
    fn extreme_draws_saturate_instead_of_wrapping() {
        let mut high = FixedRng { value: u32::MAX };
        assert_eq!(jitter(Rgb([250, 0, 128]), 30, &mut high), Rgb([255, 30, 158]));

        let mut low = FixedRng { value: 0 };
        assert_eq!(jitter(Rgb([250, 10, 128]), 30, &mut low), Rgb([220, 0, 98]));
    }

    #[test]
    fn consumes_three_draws() {
        let mut rng = CountingRng {
            inner: StdRng::seed_from_u64(9),
            draws: 0,
        };
        jitter(Rgb([1, 2, 3]), 30, &mut rng);
        assert_eq!(rng.draws, 3);
        jitter(Rgb([1, 2, 3]), 0, &mut rng);
        assert_eq!(rng.draws, 6);
    }
}
