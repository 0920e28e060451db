// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Persistent Sodium Host Module
// ─────────────────────────────────────────────────────────────────────
//! Lifecycle driver between a real-time host and one
//! [`ChannelStateIntegrator`].
//!
//! States:
//! - `Uninitialized` — before the first INIT; `execute()` outputs 0.
//! - `Running` — integrator exists and steps once per `execute()`.
//!
//! Events:
//! - INIT: publish defaults to the host, read its period, start a fresh
//!   run (open fraction 0, noise stream from the seed).
//! - MODIFY: re-read the parameter table; the run continues.
//! - PERIOD: re-read the host period; only the step length changes.

use nap_kinetics::ChannelStateIntegrator;
use nap_types::{KineticParameters, NapError, NapResult};

use crate::adapter::HostAdapter;
use crate::parameters::{read_parameters, write_parameters, INPUT_CHANNELS, OUTPUT_CHANNELS};
use crate::units::HostUnits;

/// Display name the host lists the module under.
pub const MODULE_NAME: &str = "Persistent Sodium";

/// Lifecycle events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Init,
    Modify,
    Period,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Uninitialized,
    Running,
}

/// Persistent sodium conductance as a host-scheduled module.
#[derive(Debug, Clone)]
pub struct PersistentSodiumModule {
    defaults: KineticParameters,
    units: HostUnits,
    integrator: Option<ChannelStateIntegrator>,
}

impl Default for PersistentSodiumModule {
    fn default() -> Self {
        Self {
            defaults: KineticParameters::default(),
            units: HostUnits::default(),
            integrator: None,
        }
    }
}

impl PersistentSodiumModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Module with custom INIT defaults and boundary units.
    pub fn with_config(defaults: KineticParameters, units: HostUnits) -> NapResult<Self> {
        defaults.validate()?;
        units.validate()?;
        Ok(Self {
            defaults,
            units,
            integrator: None,
        })
    }

    pub fn state(&self) -> ModuleState {
        match self.integrator {
            Some(_) => ModuleState::Running,
            None => ModuleState::Uninitialized,
        }
    }

    pub fn integrator(&self) -> Option<&ChannelStateIntegrator> {
        self.integrator.as_ref()
    }

    pub fn units(&self) -> &HostUnits {
        &self.units
    }

    /// Dispatch a host lifecycle event.
    pub fn update<H: HostAdapter + ?Sized>(
        &mut self,
        host: &mut H,
        event: LifecycleEvent,
    ) -> NapResult<()> {
        match event {
            LifecycleEvent::Init => self.on_init(host),
            LifecycleEvent::Modify => self.on_modify(host),
            LifecycleEvent::Period => self.on_period_change(host),
        }
    }

    /// Publish defaults, take the host period, start a fresh run.
    pub fn on_init<H: HostAdapter + ?Sized>(&mut self, host: &mut H) -> NapResult<()> {
        let params = KineticParameters {
            step_period: self.units.period_to_step(host.period_ns()),
            ..self.defaults.clone()
        };
        let integrator = ChannelStateIntegrator::new(params).map_err(|e| {
            log::error!("{MODULE_NAME}: INIT rejected: {e}");
            e
        })?;
        write_parameters(host, integrator.parameters());
        host.set_output(0, 0.0);
        log::info!(
            "{MODULE_NAME}: INIT (step={}, seed={}, {} -> {})",
            integrator.parameters().step_period,
            integrator.parameters().random_seed,
            INPUT_CHANNELS[0].name,
            OUTPUT_CHANNELS[0].name
        );
        self.integrator = Some(integrator);
        Ok(())
    }

    /// Re-read the parameter table. On error the previous configuration
    /// keeps running.
    pub fn on_modify<H: HostAdapter + ?Sized>(&mut self, host: &mut H) -> NapResult<()> {
        let integrator = self.integrator.as_mut().ok_or(NapError::Uninitialized)?;
        read_parameters(host, integrator.parameters())
            .and_then(|params| integrator.reconfigure(params))
            .map_err(|e| {
                log::error!("{MODULE_NAME}: MODIFY rejected, keeping previous parameters: {e}");
                e
            })
    }

    /// Re-read the host period.
    pub fn on_period_change<H: HostAdapter + ?Sized>(&mut self, host: &mut H) -> NapResult<()> {
        let integrator = self.integrator.as_mut().ok_or(NapError::Uninitialized)?;
        integrator
            .set_step_period(self.units.period_to_step(host.period_ns()))
            .map_err(|e| {
                log::error!("{MODULE_NAME}: PERIOD rejected: {e}");
                e
            })
    }

    /// One real-time tick: read Vm, step, write Iapp.
    ///
    /// Returns the current written to the host.
    pub fn execute<H: HostAdapter + ?Sized>(&mut self, host: &mut H) -> f64 {
        let out = match self.integrator.as_mut() {
            Some(integrator) => {
                let v_mv = self.units.voltage_to_mv(host.input(0));
                self.units.current_to_host(integrator.step(v_mv))
            }
            None => 0.0,
        };
        host.set_output(0, out);
        out
    }
}
