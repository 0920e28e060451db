// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Activation Curve and Relaxation
// ─────────────────────────────────────────────────────────────────────
//! Boltzmann steady-state activation and the exact exponential update
//! for first-order gating:
//!
//!   p_inf(V) = p_max / (1 + exp((V½ − V) / k))
//!   dp/dt    = (p_inf − p) / τ
//!
//! With p_inf held over one step of length Δt the ODE solves exactly to
//! `p + (p_inf − p)(1 − exp(−Δt/τ))`.

/// Steady-state open fraction at voltage `v` (mV).
///
/// Tends to `max_open_fraction` as `v → +∞` and to 0 as `v → −∞`
/// (for a positive slope). Overflow of the exponential yields exactly 0.
#[inline]
pub fn steady_state_open_fraction(
    v: f64,
    max_open_fraction: f64,
    half_activation_voltage: f64,
    activation_slope: f64,
) -> f64 {
    max_open_fraction / (1.0 + ((half_activation_voltage - v) / activation_slope).exp())
}

/// Fraction of the gap to steady state closed in one step: 1 − exp(−Δt/τ).
#[inline]
pub fn relaxation_factor(step_ratio: f64) -> f64 {
    1.0 - (-step_ratio).exp()
}

/// Electrochemical driving force E_rev − V (mV).
#[inline]
pub fn driving_force(reversal_potential: f64, v: f64) -> f64 {
    reversal_potential - v
}

/// Channel current g·(E_rev − V) in pA, for `conductance` in nS.
///
/// A closed population carries no current whatever the driving force.
/// A product that overflows saturates at `±f64::MAX`.
#[inline]
pub fn channel_current(conductance: f64, reversal_potential: f64, v: f64) -> f64 {
    if conductance == 0.0 {
        return 0.0;
    }
    let current = conductance * driving_force(reversal_potential, v);
    if current.is_finite() {
        return current;
    }
    log::warn!("channel_current: {current} at V={v} mV, saturating");
    if current.is_nan() {
        0.0
    } else {
        current.clamp(-f64::MAX, f64::MAX)
    }
}
