// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Step Records
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Clamp an open fraction to [0, hi], mapping NaN to 0 and Inf to the
/// nearest bound.
#[inline]
pub fn clamp_fraction(value: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_fraction: NaN detected, clamping to 0");
        return 0.0;
    }
    if value > hi {
        return hi;
    }
    if value < 0.0 {
        return 0.0;
    }
    value
}

/// Full breakdown of one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelStep {
    /// Membrane voltage used for the step (mV, junction-corrected).
    pub voltage: f64,
    /// Steady-state open fraction at `voltage`.
    pub p_inf: f64,
    /// Deterministic relaxation increment.
    pub dp_det: f64,
    /// Stochastic increment (0 with noise disabled).
    pub dp_rnd: f64,
    /// Open fraction after the increments and the clamp.
    pub open_fraction: f64,
    /// Channel conductance (nS).
    pub conductance: f64,
    /// Channel current (pA): nS × mV.
    pub current: f64,
}
