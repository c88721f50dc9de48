//! Uniform draws on top of an explicitly passed [`Rng`].
//!
//! Every random quantity in the crate is drawn through these helpers from a generator
//! owned by the caller, so identical generator state always reproduces identical worlds.
use rand::Rng;

/// Generate a random float in the half-open range [0, 1) with 53 bits of precision.
#[inline]
pub(crate) fn rand01<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Generate a random float in [low, high).
#[inline]
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + (high - low) * rand01(rng)
}

/// Generate a random integer in the closed range [low, high].
///
/// Uses a widening multiply of a 32-bit draw; the bias for the small spans used by the
/// generator is below 2^-28.
#[inline]
pub(crate) fn uniform_int<R: Rng + ?Sized>(rng: &mut R, low: i32, high: i32) -> i32 {
    debug_assert!(low <= high, "uniform_int requires low <= high");
    let span = (high as i64 - low as i64 + 1) as u64;
    let offset = ((rng.next_u32() as u64 * span) >> 32) as i64;
    (low as i64 + offset) as i32
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct FixedRng {
        value: u64,
    }

    impl rand::TryRng for FixedRng {
        type Error = core::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Ok((self.value >> 32) as u32)
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Ok(self.value)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 8];
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_stays_below_one_for_max_input() {
        let mut rng = FixedRng { value: u64::MAX };
        let result = rand01(&mut rng);
        assert!(result < 1.0);
        assert!(result > 0.999_999);
    }

    #[test]
    fn uniform_int_covers_both_bounds() {
        let mut low = FixedRng { value: 0 };
        assert_eq!(uniform_int(&mut low, -7, 7), -7);

        let mut high = FixedRng { value: u64::MAX };
        assert_eq!(uniform_int(&mut high, -7, 7), 7);
    }

    #[test]
    fn uniform_int_hits_every_value() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = [false; 15];
        for _ in 0..2_000 {
            let v = uniform_int(&mut rng, -7, 7);
            assert!((-7..=7).contains(&v));
            seen[(v + 7) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn uniform_respects_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1_000 {
            let v = uniform(&mut rng, 1280.0, 2816.0);
            assert!((1280.0..2816.0).contains(&v));
        }
    }
}
