// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Host Boundary
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Boundary between the channel integrator and the real-time host that
//! schedules it.
//!
//! The host owns the scheduler, the parameter widgets, and the signal
//! channels. This crate sees it only through [`HostAdapter`]: read an
//! input sample, write an output sample, read or write a named
//! parameter string, query the period. [`PersistentSodiumModule`]
//! consumes the host's lifecycle events (INIT, MODIFY, PERIOD) and runs
//! one integrator step per [`PersistentSodiumModule::execute`] call.
//!
//! # Boundary Invariants
//!
//! 1. **Configuration errors never reach the tick**: parameter strings
//!    are parsed and validated on MODIFY. A rejected MODIFY leaves the
//!    previous configuration running.
//!
//! 2. **Units convert only here**: the integrator works in mV, nS, pA,
//!    and the τ time unit; [`HostUnits`] maps host V, A, and ns.
//!
//! 3. **Parameter edits cross threads, samples do not**: the
//!    [`ParameterStore`] is lock-guarded and read only on lifecycle
//!    events. `execute()` takes no lock.

pub mod adapter;
pub mod module;
pub mod parameters;
pub mod units;

pub use adapter::{HostAdapter, InMemoryHost, ParameterStore};
pub use module::{LifecycleEvent, ModuleState, PersistentSodiumModule, MODULE_NAME};
pub use parameters::{ChannelSpec, Parameter, ParameterKind, INPUT_CHANNELS, OUTPUT_CHANNELS};
pub use units::HostUnits;
