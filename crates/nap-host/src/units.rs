// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Boundary Unit Conventions
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use nap_types::{NapError, NapResult};

/// Conversions between host signal units and integrator units.
///
/// Defaults match a host that samples membrane voltage in volts, emits
/// current in amperes, reports its period in nanoseconds, and a channel
/// whose τ is given in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostUnits {
    /// Host voltage → mV.
    /// Default: 1e3 (V → mV).
    pub input_to_mv: f64,

    /// Liquid junction potential subtracted after scaling (mV).
    /// Default: 10.0.
    pub junction_offset_mv: f64,

    /// Integrator current (pA) → host current.
    /// Default: 1e-12 (pA → A).
    pub output_scale: f64,

    /// Host period (ns) → integrator time unit.
    /// Default: 1e-6 (ns → ms).
    pub period_scale: f64,
}

impl Default for HostUnits {
    fn default() -> Self {
        Self {
            input_to_mv: 1e3,
            junction_offset_mv: 10.0,
            output_scale: 1e-12,
            period_scale: 1e-6,
        }
    }
}

impl HostUnits {
    /// Identity conversions: host already speaks mV, pA, and τ units.
    pub fn identity() -> Self {
        Self {
            input_to_mv: 1.0,
            junction_offset_mv: 0.0,
            output_scale: 1.0,
            period_scale: 1.0,
        }
    }

    pub fn validate(&self) -> NapResult<()> {
        let fields = [
            ("input_to_mv", self.input_to_mv),
            ("junction_offset_mv", self.junction_offset_mv),
            ("output_scale", self.output_scale),
            ("period_scale", self.period_scale),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(NapError::Config(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.input_to_mv == 0.0 {
            return Err(NapError::Config("input_to_mv must be non-zero".to_string()));
        }
        if self.period_scale <= 0.0 {
            return Err(NapError::Config(format!(
                "period_scale must be > 0, got {}",
                self.period_scale
            )));
        }
        Ok(())
    }

    /// Host voltage sample → junction-corrected mV.
    #[inline]
    pub fn voltage_to_mv(&self, host_voltage: f64) -> f64 {
        host_voltage * self.input_to_mv - self.junction_offset_mv
    }

    /// Integrator current (pA) → host current.
    #[inline]
    pub fn current_to_host(&self, current_pa: f64) -> f64 {
        current_pa * self.output_scale
    }

    /// Host period (ns) → integration step.
    #[inline]
    pub fn period_to_step(&self, period_ns: u64) -> f64 {
        period_ns as f64 * self.period_scale
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> NapResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| NapError::Config(format!("JSON parse error: {e}")))
    }
}
