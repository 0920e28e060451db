// ─────────────────────────────────────────────────────────────────────
// NaP Kernel — Host Parameter Table
// ─────────────────────────────────────────────────────────────────────
//! Host-visible parameter names, their value kinds, and the mapping
//! onto [`KineticParameters`] fields.
//!
//! The host stores every parameter as a string. INIT writes the
//! defaults out with [`write_parameters`]; MODIFY parses them back
//! with [`read_parameters`].

use nap_types::{KineticParameters, NapError, NapResult};

use crate::adapter::HostAdapter;

/// Value kind the host's parameter widget accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Integer,
    UInteger,
    Double,
}

/// A host string parsed according to its [`ParameterKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
enum HostValue {
    Integer(i128),
    Double(f64),
}

impl HostValue {
    fn integer(self) -> i128 {
        match self {
            HostValue::Integer(n) => n,
            HostValue::Double(x) => x as i128,
        }
    }

    fn double(self) -> f64 {
        match self {
            HostValue::Integer(n) => n as f64,
            HostValue::Double(x) => x,
        }
    }
}

/// Integer literal, or a double holding an exact integer ("13.0"):
/// hosts that keep every parameter as a double write integers that way.
fn parse_integral(raw: &str) -> Option<i128> {
    raw.parse::<i128>().ok().or_else(|| {
        let x: f64 = raw.parse().ok()?;
        let in_range = x.is_finite() && x.fract() == 0.0 && x.abs() <= u64::MAX as f64;
        in_range.then_some(x as i128)
    })
}

/// A signal channel exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    pub name: &'static str,
    pub description: &'static str,
}

pub const INPUT_CHANNELS: [ChannelSpec; 1] = [ChannelSpec {
    name: "Vm",
    description: "Membrane voltage (V)",
}];

pub const OUTPUT_CHANNELS: [ChannelSpec; 1] = [ChannelSpec {
    name: "Iapp",
    description: "Injected current (A)",
}];

/// Host-configurable kinetic parameters. The step period is not here:
/// it follows the host clock via PERIOD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    RandomSeed,
    NoiseOn,
    ReversalPotential,
    MaxConductance,
    ChannelCount,
    MaxOpenFraction,
    TimeConstant,
    HalfActivation,
    Slope,
}

impl Parameter {
    pub const ALL: [Parameter; 9] = [
        Parameter::RandomSeed,
        Parameter::NoiseOn,
        Parameter::ReversalPotential,
        Parameter::MaxConductance,
        Parameter::ChannelCount,
        Parameter::MaxOpenFraction,
        Parameter::TimeConstant,
        Parameter::HalfActivation,
        Parameter::Slope,
    ];

    /// Name under which the host stores the value.
    pub fn name(self) -> &'static str {
        match self {
            Parameter::RandomSeed => "Random Seed",
            Parameter::NoiseOn => "Noise On",
            Parameter::ReversalPotential => "Vna",
            Parameter::MaxConductance => "Gnap_max",
            Parameter::ChannelCount => "Nnap",
            Parameter::MaxOpenFraction => "pmax",
            Parameter::TimeConstant => "tau_p",
            Parameter::HalfActivation => "Vp_half",
            Parameter::Slope => "dV",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Parameter::RandomSeed => "Seed for random number generator",
            Parameter::NoiseOn => "1 for stochastic channel, 0 for deterministic",
            Parameter::ReversalPotential => "Sodium reversal potential (mV)",
            Parameter::MaxConductance => "Maximum channel conductance (nS)",
            Parameter::ChannelCount => "Number of persistent Na channels",
            Parameter::MaxOpenFraction => "Maximum fraction of open channels",
            Parameter::TimeConstant => "Persistent Na channel time constant (ms)",
            Parameter::HalfActivation => "Half activation voltage (mV)",
            Parameter::Slope => "Slope factor of the activation curve (mV)",
        }
    }

    pub fn kind(self) -> ParameterKind {
        match self {
            Parameter::RandomSeed | Parameter::ChannelCount => ParameterKind::Integer,
            Parameter::NoiseOn => ParameterKind::UInteger,
            _ => ParameterKind::Double,
        }
    }

    /// Current value of this parameter in host string form.
    pub fn format(self, params: &KineticParameters) -> String {
        match self {
            Parameter::RandomSeed => params.random_seed.to_string(),
            Parameter::NoiseOn => u32::from(params.noise_enabled).to_string(),
            Parameter::ReversalPotential => params.sodium_reversal_potential.to_string(),
            Parameter::MaxConductance => params.max_conductance.to_string(),
            Parameter::ChannelCount => params.channel_count.to_string(),
            Parameter::MaxOpenFraction => params.max_open_fraction.to_string(),
            Parameter::TimeConstant => params.time_constant.to_string(),
            Parameter::HalfActivation => params.half_activation_voltage.to_string(),
            Parameter::Slope => params.activation_slope.to_string(),
        }
    }

    /// Parse `raw` and store it in the matching field. Range checks are
    /// left to [`KineticParameters::validate`].
    ///
    /// The seed takes any value in `[i64::MIN, u64::MAX]`; negative
    /// seeds wrap to their two's-complement `u64`.
    pub fn apply(self, params: &mut KineticParameters, raw: &str) -> NapResult<()> {
        let value = self.parse(raw)?;
        match self {
            Parameter::RandomSeed => {
                let n = value.integer();
                params.random_seed = u64::try_from(n)
                    .or_else(|_| i64::try_from(n).map(|s| s as u64))
                    .map_err(|_| self.invalid(raw))?;
            }
            Parameter::NoiseOn => params.noise_enabled = value.integer() != 0,
            Parameter::ReversalPotential => params.sodium_reversal_potential = value.double(),
            Parameter::MaxConductance => params.max_conductance = value.double(),
            Parameter::ChannelCount => {
                params.channel_count =
                    u32::try_from(value.integer()).map_err(|_| self.invalid(raw))?;
            }
            Parameter::MaxOpenFraction => params.max_open_fraction = value.double(),
            Parameter::TimeConstant => params.time_constant = value.double(),
            Parameter::HalfActivation => params.half_activation_voltage = value.double(),
            Parameter::Slope => params.activation_slope = value.double(),
        }
        Ok(())
    }

    fn parse(self, raw: &str) -> NapResult<HostValue> {
        let text = raw.trim();
        let value = match self.kind() {
            ParameterKind::Integer => parse_integral(text).map(HostValue::Integer),
            ParameterKind::UInteger => parse_integral(text)
                .filter(|n| *n >= 0)
                .map(HostValue::Integer),
            ParameterKind::Double => text.parse().ok().map(HostValue::Double),
        };
        value.ok_or_else(|| self.invalid(raw))
    }

    fn invalid(self, raw: &str) -> NapError {
        NapError::Parameter {
            name: self.name(),
            value: raw.to_string(),
        }
    }
}

/// Publish every parameter of `params` to the host.
pub fn write_parameters<H: HostAdapter + ?Sized>(host: &mut H, params: &KineticParameters) {
    for p in Parameter::ALL {
        host.set_parameter(p.name(), p.format(params));
    }
}

/// Read every parameter from the host on top of `base`, then validate.
///
/// Fields not in the table (the step period) are carried from `base`.
pub fn read_parameters<H: HostAdapter + ?Sized>(
    host: &H,
    base: &KineticParameters,
) -> NapResult<KineticParameters> {
    let mut params = base.clone();
    for p in Parameter::ALL {
        let raw = host
            .parameter(p.name())
            .ok_or(NapError::MissingParameter(p.name()))?;
        p.apply(&mut params, &raw).map_err(|e| {
            log::warn!("{} ({}): {e}", p.name(), p.description());
            e
        })?;
    }
    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryHost;

    #[test]
    fn test_names_unique() {
        for (i, a) in Parameter::ALL.iter().enumerate() {
            for b in &Parameter::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_descriptions_present() {
        for p in Parameter::ALL {
            assert!(!p.description().is_empty(), "{} has no description", p.name());
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Parameter::RandomSeed.kind(), ParameterKind::Integer);
        assert_eq!(Parameter::NoiseOn.kind(), ParameterKind::UInteger);
        assert_eq!(Parameter::Slope.kind(), ParameterKind::Double);
    }

    #[test]
    fn test_write_defaults() {
        let mut host = InMemoryHost::default();
        write_parameters(&mut host, &KineticParameters::default());
        let store = host.parameters();
        assert_eq!(store.len(), Parameter::ALL.len());
        assert_eq!(store.get("Random Seed").as_deref(), Some("13"));
        assert_eq!(store.get("Noise On").as_deref(), Some("0"));
        assert_eq!(store.get("Vna").as_deref(), Some("55"));
        assert_eq!(store.get("Nnap").as_deref(), Some("1200"));
        assert_eq!(store.get("Vp_half").as_deref(), Some("-45.9"));
    }

    #[test]
    fn test_write_then_read_preserves_record() {
        let params = KineticParameters {
            max_conductance: 1200.0,
            noise_enabled: true,
            random_seed: 99,
            ..Default::default()
        };
        let mut host = InMemoryHost::default();
        write_parameters(&mut host, &params);
        let back = read_parameters(&host, &KineticParameters::default()).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_read_trims_and_parses_flags() {
        let mut host = InMemoryHost::default();
        write_parameters(&mut host, &KineticParameters::default());
        host.parameters().set("Noise On", " 2 ");
        host.parameters().set("Gnap_max", "1200");
        let p = read_parameters(&host, &KineticParameters::default()).unwrap();
        assert!(p.noise_enabled);
        assert_eq!(p.max_conductance, 1200.0);
    }

    #[test]
    fn test_read_carries_step_period() {
        let mut host = InMemoryHost::default();
        write_parameters(&mut host, &KineticParameters::default());
        let base = KineticParameters {
            step_period: 0.05,
            ..Default::default()
        };
        assert_eq!(read_parameters(&host, &base).unwrap().step_period, 0.05);
    }

    #[test]
    fn test_read_unparsable() {
        let mut host = InMemoryHost::default();
        write_parameters(&mut host, &KineticParameters::default());
        host.parameters().set("Nnap", "many");
        let err = read_parameters(&host, &KineticParameters::default()).unwrap_err();
        assert_eq!(
            err,
            NapError::Parameter {
                name: "Nnap",
                value: "many".into()
            }
        );
    }

    #[test]
    fn test_read_negative_count_unparsable() {
        let mut host = InMemoryHost::default();
        write_parameters(&mut host, &KineticParameters::default());
        host.parameters().set("Nnap", "-5");
        assert!(matches!(
            read_parameters(&host, &KineticParameters::default()),
            Err(NapError::Parameter { name: "Nnap", .. })
        ));
    }

    #[test]
    fn test_seed_accepts_negative_and_integral_double() {
        let mut params = KineticParameters::default();
        Parameter::RandomSeed.apply(&mut params, "-1").unwrap();
        assert_eq!(params.random_seed, u64::MAX);
        Parameter::RandomSeed.apply(&mut params, "13.0").unwrap();
        assert_eq!(params.random_seed, 13);
        Parameter::RandomSeed.apply(&mut params, "18446744073709551615").unwrap();
        assert_eq!(params.random_seed, u64::MAX);
        assert!(Parameter::RandomSeed.apply(&mut params, "1.5").is_err());
        assert_eq!(params.random_seed, u64::MAX);
    }

    #[test]
    fn test_negative_seed_survives_modify() {
        let mut host = InMemoryHost::default();
        write_parameters(&mut host, &KineticParameters::default());
        host.parameters().set("Random Seed", "-1");
        let p = read_parameters(&host, &KineticParameters::default()).unwrap();
        assert_eq!(p.random_seed, u64::MAX);
        write_parameters(&mut host, &p);
        assert_eq!(read_parameters(&host, &p).unwrap(), p);
    }

    #[test]
    fn test_integer_kinds_accept_integral_doubles() {
        let mut params = KineticParameters::default();
        Parameter::ChannelCount.apply(&mut params, "40.0").unwrap();
        assert_eq!(params.channel_count, 40);
        Parameter::NoiseOn.apply(&mut params, "1.0").unwrap();
        assert!(params.noise_enabled);
        assert!(Parameter::NoiseOn.apply(&mut params, "-1").is_err());
        assert!(Parameter::ChannelCount.apply(&mut params, "2.5").is_err());
    }

    #[test]
    fn test_read_missing() {
        let host = InMemoryHost::default();
        let err = read_parameters(&host, &KineticParameters::default()).unwrap_err();
        assert_eq!(err, NapError::MissingParameter("Random Seed"));
    }

    #[test]
    fn test_read_validates() {
        let mut host = InMemoryHost::default();
        write_parameters(&mut host, &KineticParameters::default());
        host.parameters().set("dV", "0");
        assert!(matches!(
            read_parameters(&host, &KineticParameters::default()),
            Err(NapError::Config(_))
        ));
    }
}
