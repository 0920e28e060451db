// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Finite-Channel Noise
// ─────────────────────────────────────────────────────────────────────
//! Diffusion approximation to channel-number fluctuations.
//!
//! A population of N two-state channels at open fraction p relaxing
//! toward p_inf has per-step variance
//!
//!   σ² = (Δt/τ) · (p_inf + p − 2·p_inf·p) / N
//!
//! The Gaussian increment comes from the trigonometric two-draw method
//! spread across two consecutive steps: the cosine phase draws u₀, the
//! sine phase draws u₁ and reuses the u₀ of the preceding cosine phase.
//! Both phases scale by sqrt(−2σ²·ln u₁), so the cosine phase uses the
//! u₁ left over from the previous pair.

use std::f64::consts::TAU;

use rand::distributions::Open01;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Which half of the paired draw the next sample takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoisePhase {
    /// Next sample draws slot 0 and uses `cos(2π·u₀)`.
    #[default]
    AwaitingCosine,
    /// Next sample draws slot 1 and uses `sin(2π·u₀)`.
    AwaitingSine,
}

impl NoisePhase {
    fn flip(self) -> Self {
        match self {
            Self::AwaitingCosine => Self::AwaitingSine,
            Self::AwaitingSine => Self::AwaitingCosine,
        }
    }
}

/// Pending draws at run start. ln(1) = 0, so the first sample of a run
/// is exactly zero.
const INITIAL_DRAWS: [f64; 2] = [1.0, 1.0];

/// Seedable, instance-owned channel noise source.
#[derive(Debug, Clone)]
pub struct ChannelNoise {
    rng: ChaCha8Rng,
    phase: NoisePhase,
    pending: [f64; 2],
}

impl ChannelNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: NoisePhase::AwaitingCosine,
            pending: INITIAL_DRAWS,
        }
    }

    /// Restart the stream from `seed` and return to the run-start phase.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    pub fn phase(&self) -> NoisePhase {
        self.phase
    }

    pub fn pending_draws(&self) -> [f64; 2] {
        self.pending
    }

    /// Uniform in the open interval (0, 1): never 0, so ln is finite.
    #[inline]
    fn draw(&mut self) -> f64 {
        self.rng.sample(Open01)
    }

    /// Draw the next uniform into the phase's slot and return the
    /// trigonometric factor x₁.
    #[inline]
    fn advance_phase(&mut self) -> f64 {
        let x1 = match self.phase {
            NoisePhase::AwaitingCosine => {
                self.pending[0] = self.draw();
                (TAU * self.pending[0]).cos()
            }
            NoisePhase::AwaitingSine => {
                self.pending[1] = self.draw();
                (TAU * self.pending[0]).sin()
            }
        };
        self.phase = self.phase.flip();
        x1
    }

    /// Stochastic open-fraction increment for one step.
    ///
    /// `step_ratio` is Δt/τ; `p_inf` and `p` must lie in [0, 1] and
    /// `channel_count` must be non-zero (both guaranteed by parameter
    /// validation).
    #[inline]
    pub fn sample(&mut self, step_ratio: f64, p_inf: f64, p: f64, channel_count: u32) -> f64 {
        let x1 = self.advance_phase();
        let x2 = -2.0 * diffusion_variance(step_ratio, p_inf, p, channel_count);
        x1 * (x2 * self.pending[1].ln()).sqrt()
    }
}

/// Per-step variance σ² of the open-fraction increment.
#[inline]
fn diffusion_variance(step_ratio: f64, p_inf: f64, p: f64, channel_count: u32) -> f64 {
    // p_inf + p − 2·p_inf·p = p_inf(1−p) + p(1−p_inf) ≥ 0; floor guards rounding.
    let binomial = (p_inf + p - 2.0 * p_inf * p).max(0.0);
    step_ratio * binomial / channel_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_std(seed: u64, n: u32, trials: usize) -> f64 {
        let mut noise = ChannelNoise::new(seed);
        let xs: Vec<f64> = (0..trials).map(|_| noise.sample(0.01, 0.5, 0.5, n)).collect();
        let mean = xs.iter().sum::<f64>() / trials as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (trials - 1) as f64;
        var.sqrt()
    }

    #[test]
    fn test_phase_alternates() {
        let mut noise = ChannelNoise::new(1);
        assert_eq!(noise.phase(), NoisePhase::AwaitingCosine);
        noise.sample(0.01, 0.5, 0.5, 100);
        assert_eq!(noise.phase(), NoisePhase::AwaitingSine);
        noise.sample(0.01, 0.5, 0.5, 100);
        assert_eq!(noise.phase(), NoisePhase::AwaitingCosine);
    }

    #[test]
    fn test_first_sample_of_run_is_zero() {
        let mut noise = ChannelNoise::new(99);
        assert_eq!(noise.sample(0.01, 0.5, 0.2, 10), 0.0);
        assert_eq!(noise.pending_draws()[1], 1.0);
    }

    #[test]
    fn test_cosine_phase_fills_slot_zero_only() {
        let mut noise = ChannelNoise::new(5);
        noise.sample(0.01, 0.5, 0.5, 10);
        let [u0, u1] = noise.pending_draws();
        assert!(u0 > 0.0 && u0 < 1.0);
        assert_eq!(u1, 1.0);
    }

    #[test]
    fn test_sine_phase_reuses_slot_zero() {
        let mut noise = ChannelNoise::new(21);
        noise.sample(0.01, 0.5, 0.5, 10);
        let u0 = noise.pending_draws()[0];
        let dp = noise.sample(0.01, 0.5, 0.5, 10);
        let [u0_after, u1] = noise.pending_draws();
        assert_eq!(u0, u0_after, "sine phase must not redraw slot 0");
        let x2 = -2.0 * diffusion_variance(0.01, 0.5, 0.5, 10);
        let expected = (TAU * u0).sin() * (x2 * u1.ln()).sqrt();
        assert_eq!(dp, expected);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = ChannelNoise::new(13);
        let mut b = ChannelNoise::new(13);
        for _ in 0..1000 {
            assert_eq!(a.sample(0.02, 0.3, 0.6, 50), b.sample(0.02, 0.3, 0.6, 50));
        }
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let mut noise = ChannelNoise::new(13);
        let first: Vec<f64> = (0..10).map(|_| noise.sample(0.02, 0.3, 0.6, 50)).collect();
        noise.reseed(13);
        let again: Vec<f64> = (0..10).map(|_| noise.sample(0.02, 0.3, 0.6, 50)).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_samples_finite() {
        let mut noise = ChannelNoise::new(3);
        for i in 0..100_000 {
            let p = (i % 101) as f64 / 100.0;
            let x = noise.sample(1.0, 1.0 - p, p, 1);
            assert!(x.is_finite(), "non-finite sample at i={i}");
        }
    }

    #[test]
    fn test_zero_variance_gives_zero() {
        // p = p_inf = 0: no channel can flip.
        let mut noise = ChannelNoise::new(8);
        for _ in 0..10 {
            assert_eq!(noise.sample(0.01, 0.0, 0.0, 10).abs(), 0.0);
        }
    }

    #[test]
    fn test_std_matches_diffusion_variance() {
        let expected = diffusion_variance(0.01, 0.5, 0.5, 100).sqrt();
        let got = sample_std(42, 100, 40_000);
        assert!(
            (got / expected - 1.0).abs() < 0.05,
            "std {got} vs expected {expected}"
        );
    }

    #[test]
    fn test_std_scales_inverse_sqrt_channel_count() {
        let s1 = sample_std(7, 100, 40_000);
        let s4 = sample_std(8, 400, 40_000);
        let ratio = s1 / s4;
        assert!((ratio - 2.0).abs() < 0.1, "std ratio {ratio}, expected 2");
    }
}
