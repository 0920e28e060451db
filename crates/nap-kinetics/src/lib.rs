// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Gating Kinetics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Per-step integrator for a population of persistent sodium channels.
//!
//! Each real-time tick the integrator relaxes the open fraction toward
//! the Boltzmann steady state, optionally adds finite-channel noise,
//! clamps, and returns the channel current.
//!
//! # Real-time Invariants
//!
//! 1. **Bounded state**: after every step the open fraction lies in
//!    `[0, max_open_fraction]`, whatever the voltage sequence.
//!
//! 2. **No failure on the hot path**: parameters are validated when
//!    installed. Uniform draws come from the open interval (0, 1) so the
//!    noise logarithm is always finite, and a non-finite voltage sample
//!    leaves the state untouched.
//!
//! 3. **No allocations, no locks**: `step()` is arithmetic on owned
//!    scalars plus one ChaCha draw.
//!
//! 4. **Reproducible**: the noise generator is owned by the integrator
//!    and seeded from `random_seed`; same seed, same trajectory.

pub mod gating;
pub mod integrator;
pub mod noise;

pub use gating::{channel_current, driving_force, relaxation_factor, steady_state_open_fraction};
pub use integrator::ChannelStateIntegrator;
pub use noise::{ChannelNoise, NoisePhase};
