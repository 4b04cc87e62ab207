//! Simulation parameters and their validation.

use crate::{Error, Result};

/// Number of departures from the network that ends a run unless the caller
/// overrides it.
pub const DEFAULT_COMPLETION_TARGET: u64 = 10_000;

/// The full parameter set for one simulation run.
///
/// Rates and means describe exponential distributions, so each must be a
/// strictly positive finite number; [`SimulationConfig::validate`] enforces
/// this before a run starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    /// External arrivals per unit of simulated time.
    pub arrival_rate: f64,
    /// Mean service duration at the processing station.
    pub processing_mean_service: f64,
    /// Mean service duration at the storage station.
    pub storage_mean_service: f64,
    /// Number of network departures after which the run stops.
    pub completion_target: u64,
}

impl SimulationConfig {
    /// Describe a run with the default completion target.
    pub fn new(
        arrival_rate: f64,
        processing_mean_service: f64,
        storage_mean_service: f64,
    ) -> Self {
        Self {
            arrival_rate,
            processing_mean_service,
            storage_mean_service,
            completion_target: DEFAULT_COMPLETION_TARGET,
        }
    }

    /// Stop the run after `completion_target` jobs have left the network.
    pub fn with_completion_target(mut self, completion_target: u64) -> Self {
        self.completion_target = completion_target;
        self
    }

    /// Check that every parameter can drive the generators.
    ///
    /// Each rate or mean must be strictly positive and finite, and at least
    /// one completion must be requested, or the run could not terminate.
    pub fn validate(&self) -> Result<()> {
        let positive_finite = [
            ("arrival_rate", self.arrival_rate),
            ("processing_mean_service", self.processing_mean_service),
            ("storage_mean_service", self.storage_mean_service),
        ];
        for (name, value) in positive_finite {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        if self.completion_target == 0 {
            return Err(Error::InvalidParameter {
                name: "completion_target",
                value: 0.0,
            });
        }
        Ok(())
    }
}
