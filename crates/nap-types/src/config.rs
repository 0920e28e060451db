// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Kinetic Parameters
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{NapError, NapResult};

/// Kinetic parameters for one configuration epoch.
///
/// Immutable while a run is stepping; the host swaps in a new record on
/// MODIFY and updates `step_period` alone on PERIOD. `time_constant`
/// and `step_period` must be expressed in the same time unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KineticParameters {
    /// Sodium reversal potential E_Na (mV).
    /// Default: 55.0.
    pub sodium_reversal_potential: f64,

    /// Maximum channel conductance (nS).
    /// Default: 0.0 (channel inert until the host sets it).
    pub max_conductance: f64,

    /// Number of channels represented by the noise model.
    /// Default: 1200.
    pub channel_count: u32,

    /// Upper bound of the open fraction, in (0, 1].
    /// Default: 1.0.
    pub max_open_fraction: f64,

    /// Relaxation time constant τ.
    /// Default: 0.15.
    pub time_constant: f64,

    /// Half-activation voltage V½ (mV).
    /// Default: -45.9.
    pub half_activation_voltage: f64,

    /// Slope factor of the Boltzmann activation curve (mV).
    /// Default: 3.2.
    pub activation_slope: f64,

    /// Inject finite-channel noise on every step.
    /// Default: false.
    pub noise_enabled: bool,

    /// Seed for the integrator-owned noise generator.
    /// Default: 13.
    pub random_seed: u64,

    /// Fixed integration step, in the unit of `time_constant`.
    /// Default: 1e-4.
    pub step_period: f64,
}

impl Default for KineticParameters {
    fn default() -> Self {
        Self {
            sodium_reversal_potential: 55.0,
            max_conductance: 0.0,
            channel_count: 1200,
            max_open_fraction: 1.0,
            time_constant: 0.15,
            half_activation_voltage: -45.9,
            activation_slope: 3.2,
            noise_enabled: false,
            random_seed: 13,
            step_period: 1e-4,
        }
    }
}

impl KineticParameters {
    /// Validate every parameter the step path divides by or takes a
    /// logarithm of. Called before a record is ever installed.
    pub fn validate(&self) -> NapResult<()> {
        let finite = [
            ("sodium_reversal_potential", self.sodium_reversal_potential),
            ("max_conductance", self.max_conductance),
            ("max_open_fraction", self.max_open_fraction),
            ("time_constant", self.time_constant),
            ("half_activation_voltage", self.half_activation_voltage),
            ("activation_slope", self.activation_slope),
            ("step_period", self.step_period),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(NapError::Config(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.channel_count < 1 {
            return Err(NapError::Config(format!(
                "channel_count must be >= 1, got {}",
                self.channel_count
            )));
        }
        if self.activation_slope == 0.0 {
            return Err(NapError::Config(
                "activation_slope must be non-zero".to_string(),
            ));
        }
        if self.time_constant <= 0.0 {
            return Err(NapError::Config(format!(
                "time_constant must be > 0, got {}",
                self.time_constant
            )));
        }
        // p_inf + p - 2·p_inf·p stays non-negative only for fractions <= 1.
        if !(self.max_open_fraction > 0.0 && self.max_open_fraction <= 1.0) {
            return Err(NapError::Config(format!(
                "max_open_fraction must be in (0, 1], got {}",
                self.max_open_fraction
            )));
        }
        if self.max_conductance < 0.0 {
            return Err(NapError::Config(format!(
                "max_conductance must be >= 0, got {}",
                self.max_conductance
            )));
        }
        Self::validate_step_period(self.step_period)
    }

    /// Validate a step period on its own (PERIOD events).
    pub fn validate_step_period(step_period: f64) -> NapResult<()> {
        if !(step_period.is_finite() && step_period > 0.0) {
            return Err(NapError::Config(format!(
                "step_period must be finite and > 0, got {step_period}"
            )));
        }
        Ok(())
    }

    /// Ratio Δt/τ used by both the relaxation and the noise variance.
    #[inline]
    pub fn step_ratio(&self) -> f64 {
        self.step_period / self.time_constant
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> NapResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| NapError::Config(format!("JSON parse error: {e}")))
    }

    /// Serialise to a JSON string.
    pub fn to_json(&self) -> NapResult<String> {
        serde_json::to_string(self)
            .map_err(|e| NapError::Config(format!("JSON encode error: {e}")))
    }
}
