// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Host Adapter Interface
// ─────────────────────────────────────────────────────────────────────
//! Capability trait for the real-time host, plus an in-memory host for
//! tests, benchmarks and embedding.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// What the integrator module needs from its host.
pub trait HostAdapter {
    /// Current sample on input channel `index`, in host units.
    fn input(&self, index: usize) -> f64;

    /// Publish a sample on output channel `index`, in host units.
    fn set_output(&mut self, index: usize, value: f64);

    /// Raw string value of a named parameter.
    /// Returns `None` if the host holds no value for it.
    fn parameter(&self, name: &str) -> Option<String>;

    /// Write a named parameter back to the host (defaults on INIT).
    fn set_parameter(&mut self, name: &str, value: String);

    /// Scheduler period in nanoseconds.
    fn period_ns(&self) -> u64;
}

/// Named parameter strings shared between a UI thread and the module.
///
/// Cloning yields another handle on the same table. Reads and writes
/// take a `parking_lot::RwLock`, so edits may come from any thread; the
/// module only reads on MODIFY.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    pub fn set(&self, name: &str, value: impl Into<String>) {
        self.values.write().insert(name.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

/// In-memory host: fixed channel vectors, a shared parameter table, and
/// a settable period.
#[derive(Debug, Clone)]
pub struct InMemoryHost {
    parameters: ParameterStore,
    inputs: Vec<f64>,
    outputs: Vec<f64>,
    period_ns: u64,
}

impl Default for InMemoryHost {
    /// One input, one output, 100 µs period.
    fn default() -> Self {
        Self::new(1, 1, 100_000)
    }
}

impl InMemoryHost {
    pub fn new(n_inputs: usize, n_outputs: usize, period_ns: u64) -> Self {
        Self {
            parameters: ParameterStore::new(),
            inputs: vec![0.0; n_inputs],
            outputs: vec![0.0; n_outputs],
            period_ns,
        }
    }

    /// Another handle on this host's parameter table.
    pub fn parameters(&self) -> ParameterStore {
        self.parameters.clone()
    }

    pub fn set_input(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.inputs.get_mut(index) {
            *slot = value;
        }
    }

    pub fn output(&self, index: usize) -> f64 {
        self.outputs.get(index).copied().unwrap_or(0.0)
    }

    pub fn set_period_ns(&mut self, period_ns: u64) {
        self.period_ns = period_ns;
    }
}

impl HostAdapter for InMemoryHost {
    fn input(&self, index: usize) -> f64 {
        self.inputs.get(index).copied().unwrap_or(0.0)
    }

    fn set_output(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.outputs.get_mut(index) {
            *slot = value;
        }
    }

    fn parameter(&self, name: &str) -> Option<String> {
        self.parameters.get(name)
    }

    fn set_parameter(&mut self, name: &str, value: String) {
        self.parameters.set(name, value);
    }

    fn period_ns(&self) -> u64 {
        self.period_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_out_of_range() {
        let mut host = InMemoryHost::default();
        host.set_input(3, 1.0);
        host.set_output(3, 1.0);
        assert_eq!(host.input(3), 0.0);
        assert_eq!(host.output(3), 0.0);
    }

    #[test]
    fn test_channels_roundtrip() {
        let mut host = InMemoryHost::default();
        host.set_input(0, -0.065);
        assert_eq!(host.input(0), -0.065);
        host.set_output(0, 1e-10);
        assert_eq!(host.output(0), 1e-10);
    }

    #[test]
    fn test_store_handles_share_table() {
        let host = InMemoryHost::default();
        let ui = host.parameters();
        ui.set("Vna", "50");
        assert_eq!(host.parameter("Vna").as_deref(), Some("50"));
        assert_eq!(ui.len(), 1);
        assert!(!ui.is_empty());
    }

    #[test]
    fn test_store_cross_thread_edit() {
        let store = ParameterStore::new();
        let ui = store.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..100 {
                ui.set("Nnap", i.to_string());
            }
        });
        handle.join().unwrap();
        assert_eq!(store.get("Nnap").as_deref(), Some("99"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_default_period() {
        assert_eq!(InMemoryHost::default().period_ns(), 100_000);
    }
}
