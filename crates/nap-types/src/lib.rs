// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Kinetic parameters, error hierarchy, and per-step records for the
//! persistent sodium (NaP) channel kernel.

pub mod config;
pub mod error;
pub mod step;

pub use config::KineticParameters;
pub use error::{NapError, NapResult};
pub use step::{clamp_fraction, ChannelStep};
