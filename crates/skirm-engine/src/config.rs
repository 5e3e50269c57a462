//! Engine configuration and validation.

use skirm_core::{ClassProfiles, Turn};
use skirm_field::FieldError;
use std::error::Error;
use std::fmt;

/// Errors detected during [`EngineConfig::validate()`] or engine
/// construction.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// `max_decision_passes` is zero — the decision loop would never run.
    ZeroDecisionPasses,
    /// The "critical" time threshold exceeds the "low" one.
    TimeThresholdsInverted {
        /// Configured low-time threshold (ms).
        low_time_ms: u32,
        /// Configured critical-time threshold (ms).
        critical_time_ms: u32,
    },
    /// `transport_capacity` is zero — transports could never board anyone.
    ZeroTransportCapacity,
    /// The map dimensions are unusable.
    InvalidMap(FieldError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDecisionPasses => write!(f, "max_decision_passes must be at least 1"),
            Self::TimeThresholdsInverted {
                low_time_ms,
                critical_time_ms,
            } => write!(
                f,
                "critical_time_ms {critical_time_ms} exceeds low_time_ms {low_time_ms}"
            ),
            Self::ZeroTransportCapacity => write!(f, "transport_capacity must be at least 1"),
            Self::InvalidMap(e) => write!(f, "invalid map dimensions: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidMap(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FieldError> for ConfigError {
    fn from(e: FieldError) -> Self {
        Self::InvalidMap(e)
    }
}

/// Tuning knobs for the turn engine.
///
/// Everything here is plain data: a config can be built per test without
/// touching global state, and two engines with equal configs and equal
/// inputs produce equal turns.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Seed for the engine's RNG (auction tie tokens, attack sampling).
    /// Turns are reproducible given the same seed and snapshots.
    pub seed: u64,
    /// Hard cap on decision-loop iterations per turn. The loop normally
    /// exits when a full pass commits nothing; the cap bounds worst-case
    /// turn latency if it never settles.
    pub max_decision_passes: u32,
    /// Below this many remaining milliseconds, skip search-driven
    /// movement for the rest of the turn.
    pub low_time_ms: u32,
    /// Below this many remaining milliseconds, skip everything except
    /// mandatory minimal actions.
    pub critical_time_ms: u32,
    /// Garrison slots per transport.
    pub transport_capacity: usize,
    /// Transports launch no later than this turn even when not full.
    pub departure_deadline: Turn,
    /// Per-class configuration numbers.
    pub profiles: ClassProfiles,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_decision_passes: 10,
            low_time_ms: 2000,
            critical_time_ms: 500,
            transport_capacity: 8,
            departure_deadline: Turn(600),
            profiles: ClassProfiles::default(),
        }
    }
}

impl EngineConfig {
    /// Check structural invariants. Called by engine construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_decision_passes == 0 {
            return Err(ConfigError::ZeroDecisionPasses);
        }
        if self.critical_time_ms > self.low_time_ms {
            return Err(ConfigError::TimeThresholdsInverted {
                low_time_ms: self.low_time_ms,
                critical_time_ms: self.critical_time_ms,
            });
        }
        if self.transport_capacity == 0 {
            return Err(ConfigError::ZeroTransportCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_passes_rejected() {
        let config = EngineConfig {
            max_decision_passes: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDecisionPasses));
    }

    #[test]
    fn inverted_time_thresholds_rejected() {
        let config = EngineConfig {
            low_time_ms: 100,
            critical_time_ms: 200,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TimeThresholdsInverted { .. })
        ));
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = EngineConfig {
            transport_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTransportCapacity));
    }
}
