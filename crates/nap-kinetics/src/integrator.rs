// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Channel State Integrator
// ─────────────────────────────────────────────────────────────────────
//! Exponential-relaxation integrator for the persistent sodium open
//! fraction, with optional finite-channel noise:
//!
//!   p ← clamp(p + (p_inf − p)(1 − e^{−Δt/τ}) + η, 0, p_max)
//!   I = g_max · p · (E_Na − V)
//!
//! Δt/τ and the relaxation factor are cached whenever parameters or the
//! step period change, so the step itself only evaluates p_inf.

use nap_types::{clamp_fraction, ChannelStep, KineticParameters, NapError, NapResult};

use crate::gating::{channel_current, relaxation_factor, steady_state_open_fraction};
use crate::noise::{ChannelNoise, NoisePhase};

/// Δt/τ and 1 − e^{−Δt/τ} for a validated parameter record.
///
/// Rejects ratios that overflow or are so small the relaxation factor
/// rounds to 0 (the state would never move).
fn step_constants(params: &KineticParameters) -> NapResult<(f64, f64)> {
    let step_ratio = params.step_ratio();
    let relaxation = relaxation_factor(step_ratio);
    if !step_ratio.is_finite() || relaxation <= 0.0 {
        return Err(NapError::Numerical(format!(
            "step_period/time_constant = {step_ratio} gives no usable relaxation"
        )));
    }
    Ok((step_ratio, relaxation))
}

/// Owns the open-fraction state of one channel population.
#[derive(Debug, Clone)]
pub struct ChannelStateIntegrator {
    params: KineticParameters,
    open_fraction: f64,
    step_ratio: f64,
    relaxation: f64,
    noise: ChannelNoise,
    step_count: u64,
}

impl ChannelStateIntegrator {
    /// Validate `params` and start a run with the open fraction at 0.
    pub fn new(params: KineticParameters) -> NapResult<Self> {
        params.validate()?;
        let (step_ratio, relaxation) = step_constants(&params)?;
        Ok(Self {
            noise: ChannelNoise::new(params.random_seed),
            relaxation,
            step_ratio,
            params,
            open_fraction: 0.0,
            step_count: 0,
        })
    }

    /// Integrator with default parameters.
    pub fn default_params() -> Self {
        Self::new(KineticParameters::default()).expect("default parameters are valid")
    }

    /// Advance one step and return the channel current (pA).
    #[inline]
    pub fn step(&mut self, voltage: f64) -> f64 {
        self.advance(voltage).current
    }

    /// Advance one step and return the full breakdown.
    ///
    /// `voltage` is in mV, already junction-corrected. A non-finite
    /// sample leaves the state untouched and yields zero current.
    pub fn advance(&mut self, voltage: f64) -> ChannelStep {
        if !voltage.is_finite() {
            log::warn!("non-finite voltage sample {voltage}, step skipped");
            return ChannelStep {
                voltage,
                open_fraction: self.open_fraction,
                ..Default::default()
            };
        }

        let p = self.open_fraction;
        let p_inf = steady_state_open_fraction(
            voltage,
            self.params.max_open_fraction,
            self.params.half_activation_voltage,
            self.params.activation_slope,
        );
        let dp_det = (p_inf - p) * self.relaxation;
        let dp_rnd = if self.params.noise_enabled {
            self.noise
                .sample(self.step_ratio, p_inf, p, self.params.channel_count)
        } else {
            0.0
        };

        self.open_fraction = clamp_fraction(p + dp_det + dp_rnd, self.params.max_open_fraction);
        self.step_count += 1;

        let conductance = self.params.max_conductance * self.open_fraction; // nS
        let current = channel_current(conductance, self.params.sodium_reversal_potential, voltage); // pA

        ChannelStep {
            voltage,
            p_inf,
            dp_det,
            dp_rnd,
            open_fraction: self.open_fraction,
            conductance,
            current,
        }
    }

    /// Step through a voltage trace, returning the current trace.
    pub fn run(&mut self, voltages: &[f64]) -> Vec<f64> {
        voltages.iter().map(|&v| self.step(v)).collect()
    }

    /// Start a new run: open fraction to 0, noise stream restarted from
    /// the configured seed.
    pub fn reset(&mut self) {
        self.open_fraction = 0.0;
        self.step_count = 0;
        self.noise.reseed(self.params.random_seed);
        log::info!(
            "NaP integrator reset (seed={}, noise={})",
            self.params.random_seed,
            self.params.noise_enabled
        );
    }

    /// Swap in a new parameter record without restarting the run.
    ///
    /// The open fraction carries over, clamped to the new upper bound.
    /// The noise stream restarts only if the seed changed. On error the
    /// previous parameters stay installed.
    pub fn reconfigure(&mut self, params: KineticParameters) -> NapResult<()> {
        params.validate()?;
        let (step_ratio, relaxation) = step_constants(&params)?;
        let reseed = params.random_seed != self.params.random_seed;
        self.step_ratio = step_ratio;
        self.relaxation = relaxation;
        self.open_fraction = clamp_fraction(self.open_fraction, params.max_open_fraction);
        self.params = params;
        if reseed {
            self.noise.reseed(self.params.random_seed);
        }
        log::info!(
            "NaP integrator reconfigured (g_max={} nS, N={}, tau={}, noise={})",
            self.params.max_conductance,
            self.params.channel_count,
            self.params.time_constant,
            self.params.noise_enabled
        );
        Ok(())
    }

    /// Change the integration step (PERIOD event).
    pub fn set_step_period(&mut self, step_period: f64) -> NapResult<()> {
        KineticParameters::validate_step_period(step_period)?;
        let candidate = KineticParameters {
            step_period,
            ..self.params.clone()
        };
        let (step_ratio, relaxation) = step_constants(&candidate)?;
        self.params = candidate;
        self.step_ratio = step_ratio;
        self.relaxation = relaxation;
        log::info!("NaP integrator step period set to {step_period}");
        Ok(())
    }

    pub fn open_fraction(&self) -> f64 {
        self.open_fraction
    }

    pub fn parameters(&self) -> &KineticParameters {
        &self.params
    }

    pub fn noise_phase(&self) -> NoisePhase {
        self.noise.phase()
    }

    /// Steps taken since the run started.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}
