//! Injectable random perturbation sources.
//!
//! The advancer and the dashboard feeds never touch a random generator
//! directly; they draw from a [`Perturbation`] so tests can pin the noise.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of bounded symmetric noise.
pub trait Perturbation {
    /// Draws a value from the interval `[-half_width, half_width]`.
    ///
    /// Returns `0.0` for a non-positive or non-finite `half_width`.
    fn sample(&mut self, half_width: f32) -> f32;
}

impl<P: Perturbation + ?Sized> Perturbation for &mut P {
    fn sample(&mut self, half_width: f32) -> f32 {
        (**self).sample(half_width)
    }
}

impl<P: Perturbation + ?Sized> Perturbation for Box<P> {
    fn sample(&mut self, half_width: f32) -> f32 {
        (**self).sample(half_width)
    }
}

fn usable(half_width: f32) -> bool {
    half_width.is_finite() && half_width > 0.0
}

/// Uniform noise from a seedable `StdRng`.
///
/// # Examples
///
/// ```
/// use dc_sim::sim::perturbation::{Perturbation, SeededPerturbation};
///
/// let mut a = SeededPerturbation::new(7);
/// let mut b = SeededPerturbation::new(7);
/// assert_eq!(a.sample(50.0), b.sample(50.0));
/// ```
#[derive(Debug, Clone)]
pub struct SeededPerturbation {
    rng: StdRng,
}

impl SeededPerturbation {
    /// Creates a reproducible source from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Perturbation for SeededPerturbation {
    fn sample(&mut self, half_width: f32) -> f32 {
        if !usable(half_width) {
            return 0.0;
        }
        self.rng.random_range(-half_width..=half_width)
    }
}

/// Always returns zero; makes every advance exactly `baseline × multiplier`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPerturbation;

impl Perturbation for NoPerturbation {
    fn sample(&mut self, _half_width: f32) -> f32 {
        0.0
    }
}

/// Returns a fixed fraction of the requested half-width.
///
/// `fraction` is clamped to `[-1.0, 1.0]`, so `FixedPerturbation::new(1.0)`
/// always lands on the upper edge of each interval.
#[derive(Debug, Clone, Copy)]
pub struct FixedPerturbation {
    fraction: f32,
}

impl FixedPerturbation {
    /// Creates a source returning `fraction × half_width` on every draw.
    pub fn new(fraction: f32) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(-1.0, 1.0)
        };
        Self { fraction }
    }
}

impl Perturbation for FixedPerturbation {
    fn sample(&mut self, half_width: f32) -> f32 {
        if !usable(half_width) {
            return 0.0;
        }
        self.fraction * half_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_samples_stay_inside_interval() {
        let mut p = SeededPerturbation::new(42);
        for _ in 0..1000 {
            let v = p.sample(2.5);
            assert!((-2.5..=2.5).contains(&v));
        }
    }

    #[test]
    fn seeded_is_deterministic() {
        let mut a = SeededPerturbation::new(99);
        let mut b = SeededPerturbation::new(99);
        for _ in 0..32 {
            assert_eq!(a.sample(50.0), b.sample(50.0));
        }
    }

    #[test]
    fn degenerate_half_width_yields_zero() {
        let mut p = SeededPerturbation::new(1);
        assert_eq!(p.sample(0.0), 0.0);
        assert_eq!(p.sample(-1.0), 0.0);
        assert_eq!(p.sample(f32::NAN), 0.0);
        assert_eq!(p.sample(f32::INFINITY), 0.0);
    }

    #[test]
    fn fixed_fraction_is_clamped() {
        let mut p = FixedPerturbation::new(3.0);
        assert_eq!(p.sample(50.0), 50.0);
        let mut n = FixedPerturbation::new(-0.5);
        assert_eq!(n.sample(0.25), -0.125);
    }

    #[test]
    fn no_perturbation_is_zero() {
        let mut p = NoPerturbation;
        assert_eq!(p.sample(50.0), 0.0);
    }

    #[test]
    fn boxed_and_borrowed_sources_delegate() {
        let mut boxed: Box<dyn Perturbation + Send> = Box::new(FixedPerturbation::new(1.0));
        assert_eq!(boxed.sample(2.0), 2.0);

        let mut inner = FixedPerturbation::new(-1.0);
        let mut borrowed = &mut inner;
        assert_eq!(borrowed.sample(2.0), -2.0);
    }
}
