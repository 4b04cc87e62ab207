//! # Overview
//!
//! stagesim is a discrete-event simulator of a two-stage service network. A
//! single-server processing stage feeds, with fixed probability, a
//! single-server storage stage whose output loops back into the processing
//! wait line; a job cycles between the stages until the routing test at a
//! processing departure sends it out of the network. The model describes a
//! process alternating bursts of computation with trips to storage until it
//! finishes, but nothing in the simulator is specific to that reading.
//!
//! The simulator is built from a few deliberately small parts:
//!
//! * [`Simulation`] drives a run from its external arrivals: each step
//!   generates one arrival, advances the clock to it, and resolves every
//!   station departure the new clock has made due. Runs end after a
//!   configured number of jobs have left the network and close with a
//!   [`Report`] of turnaround, throughput, utilization, and queue length
//!   statistics.
//! * Every delay in the model is an exponential variate produced by inverse
//!   transform from a uniform draw, and every draw comes from a
//!   [`VariateSource`]. Handing a seeded [`PcgStream`] to a run makes it
//!   exactly reproducible; handing it a scripted stream turns the model's
//!   event cascades into plain unit tests.
//! * [`run_replications`] runs independent copies of a configuration on
//!   separate threads, one derived seed per replication, for experiments that
//!   need variance estimates rather than a single trajectory. Each
//!   replication owns all of its state, so replications cannot contaminate
//!   one another.
//!
//! # Example
//!
//! ```
//! use stagesim::{PcgStream, Simulation, SimulationConfig};
//!
//! # fn main() -> stagesim::Result<()> {
//! let config = SimulationConfig::new(2.25, 0.02, 0.06).with_completion_target(500);
//! let report = Simulation::new(config, PcgStream::seeded(42))?.run()?;
//!
//! // The last drain may resolve several departures at once, so a run can
//! // overshoot its target, never stop short of it.
//! assert!(report.completions >= 500);
//! assert!(report.throughput > 0.0);
//! # Ok(())
//! # }
//! ```

mod arrivals;
mod config;
mod driver;
mod error;
mod job;
mod report;
mod station;
mod variates;

pub use arrivals::ArrivalQueue;
pub use config::{SimulationConfig, DEFAULT_COMPLETION_TARGET};
pub use driver::{run_replications, Simulation};
pub use error::{Error, Result};
pub use job::Job;
pub use report::Report;
pub use station::{Station, StationKind, STORAGE_ROUTING_THRESHOLD};
pub use variates::{interarrival_delay, service_duration, PcgStream, VariateSource};
