use crate::arrivals::ArrivalQueue;
use crate::config::SimulationConfig;
use crate::report::Report;
use crate::station::{Station, StationKind};
use crate::variates::{interarrival_delay, PcgStream, VariateSource};
use crate::Job;

use std::thread;
use tracing::{debug, info};

/// Run-wide accounting threaded through departure resolution.
///
/// The clock holds the arrival time of the latest external arrival; departure
/// resolution reads it but never advances it.
#[derive(Debug)]
pub(crate) struct SimContext {
    pub(crate) clock: f64,
    pub(crate) arrival_rate: f64,
    pub(crate) arrivals_generated: u64,
    pub(crate) completions: u64,
    pub(crate) turnaround_total: f64,
}

impl SimContext {
    fn new(arrival_rate: f64) -> Self {
        Self {
            clock: 0.0,
            arrival_rate,
            arrivals_generated: 0,
            completions: 0,
            turnaround_total: 0.0,
        }
    }

    /// Count a job leaving the network, accumulating its turnaround.
    pub(crate) fn record_completion(&mut self, turnaround: f64) {
        self.completions += 1;
        self.turnaround_total += turnaround;
    }
}

/// A single run of the two-stage network.
///
/// The run is driven by external arrivals: each step generates the next
/// arrival, advances the clock to it, admits it to the processing wait line,
/// and then resolves every departure the new clock has made due. Departures
/// happening between two arrivals are therefore resolved in a batch once the
/// later arrival lands, which reproduces the model's accounting exactly.
///
/// A simulation is built from a validated [`SimulationConfig`] and a uniform
/// draw stream, runs to its completion target, and yields a [`Report`].
/// Identical configurations with identical draw streams yield identical
/// reports.
pub struct Simulation<V: VariateSource> {
    processing: Station,
    storage: Station,
    pending: ArrivalQueue,
    ctx: SimContext,
    variates: V,
    completion_target: u64,
    next_job_id: u64,
    processing_queue_len_total: f64,
    storage_queue_len_total: f64,
}

impl<V: VariateSource> Simulation<V> {
    /// Set up a run of the network described by `config`, drawing every
    /// variate from `variates`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the configuration fails
    /// validation, with no run started.
    ///
    /// [`Error::InvalidParameter`]: crate::Error::InvalidParameter
    pub fn new(config: SimulationConfig, variates: V) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            processing: Station::new(StationKind::Processing, config.processing_mean_service),
            storage: Station::new(StationKind::Storage, config.storage_mean_service),
            pending: ArrivalQueue::new(),
            ctx: SimContext::new(config.arrival_rate),
            variates,
            completion_target: config.completion_target,
            next_job_id: 0,
            processing_queue_len_total: 0.0,
            storage_queue_len_total: 0.0,
        })
    }

    /// Run the simulation until the completion target is reached, consuming
    /// it and returning the run's [`Report`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfOrderArrival`] if the arrival process ever
    /// schedules a job before one it already admitted. The exponential
    /// interarrival delays are strictly positive, so this indicates a broken
    /// [`VariateSource`] rather than an expected outcome.
    ///
    /// [`Error::OutOfOrderArrival`]: crate::Error::OutOfOrderArrival
    pub fn run(mut self) -> crate::Result<Report> {
        self.seed_first_job()?;
        while !self.target_reached() {
            self.step()?;
        }
        Ok(self.finalize())
    }

    /// Generate the next external arrival, scheduled an exponential delay
    /// after the current clock.
    fn next_arrival(&mut self) -> Job {
        let delay = interarrival_delay(self.ctx.arrival_rate, self.variates.draw());
        let job = Job::new(self.next_job_id, self.ctx.clock + delay);
        self.next_job_id += 1;
        self.ctx.arrivals_generated += 1;
        job
    }

    /// Admit the first arrival of the run straight into processing service,
    /// anchored at its own arrival time.
    fn seed_first_job(&mut self) -> crate::Result<()> {
        let job = self.next_arrival();
        self.ctx.clock = job.arrival_time;
        self.pending.push(job)?;
        let job = self.pending.pop().expect("a job was just scheduled");
        self.processing.start(job, &mut self.variates);
        debug!(job = job.id, time = self.ctx.clock, "first job seated");
        Ok(())
    }

    /// Advance the run by one external arrival.
    ///
    /// Wait line lengths are sampled before the arrival is generated, so the
    /// sample reflects the state the previous step settled into.
    fn step(&mut self) -> crate::Result<()> {
        self.processing_queue_len_total += self.processing.queue_len() as f64;
        self.storage_queue_len_total += self.storage.queue_len() as f64;

        let job = self.next_arrival();
        self.ctx.clock = job.arrival_time;
        self.pending.push(job)?;
        let job = self.pending.pop().expect("a job was just scheduled");
        self.processing.admit(job, &mut self.variates);

        self.drain_due_departures();
        Ok(())
    }

    /// Resolve every departure the current clock has made due, earliest
    /// first.
    ///
    /// While the storage station is idle only processing departures are
    /// considered. Equal due departure times dispatch neither station; the
    /// loop exits instead.
    fn drain_due_departures(&mut self) {
        loop {
            let clock = self.ctx.clock;
            if self.storage.is_idle() {
                if clock >= self.processing.departure_time() {
                    self.processing
                        .resolve_departure(&mut self.storage, &mut self.ctx, &mut self.variates);
                } else {
                    break;
                }
            } else if clock >= self.processing.departure_time()
                && self.processing.departure_time() < self.storage.departure_time()
            {
                self.processing
                    .resolve_departure(&mut self.storage, &mut self.ctx, &mut self.variates);
            } else if clock >= self.storage.departure_time()
                && self.storage.departure_time() < self.processing.departure_time()
            {
                self.storage
                    .resolve_departure(&mut self.processing, &mut self.ctx, &mut self.variates);
            } else {
                break;
            }
        }
    }

    fn target_reached(&self) -> bool {
        self.ctx.completions >= self.completion_target
    }

    /// Close the run's accounting and derive its statistics.
    ///
    /// The clock is moved up to the processing station's final scheduled
    /// departure before any ratio is taken.
    fn finalize(&mut self) -> Report {
        self.ctx.clock = self.processing.departure_time();
        let final_clock = self.ctx.clock;
        let completions = self.ctx.completions as f64;
        let report = Report {
            average_turnaround: self.ctx.turnaround_total / final_clock,
            throughput: completions / final_clock,
            processing_utilization: self.processing.busy_time() / final_clock,
            storage_utilization: self.storage.busy_time() / final_clock,
            average_processing_queue_len: self.processing_queue_len_total / completions,
            average_storage_queue_len: self.storage_queue_len_total / completions,
            completions: self.ctx.completions,
            arrivals_generated: self.ctx.arrivals_generated,
            final_clock,
        };
        info!(
            completions = report.completions,
            final_clock = report.final_clock,
            throughput = report.throughput,
            "run complete"
        );
        report
    }
}

/// Run `replications` independent copies of the configured simulation, one
/// thread each, seeding replication `i` with `base_seed + i`.
///
/// Reports come back in replication order. The same configuration, base seed,
/// and replication count reproduce the same reports.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] before spawning anything if the
/// configuration fails validation, or the first replication error otherwise.
///
/// [`Error::InvalidParameter`]: crate::Error::InvalidParameter
pub fn run_replications(
    config: SimulationConfig,
    base_seed: u64,
    replications: u64,
) -> crate::Result<Vec<Report>> {
    config.validate()?;
    let mut handles = Vec::with_capacity(replications as usize);
    for index in 0..replications {
        let seed = base_seed.wrapping_add(index);
        handles.push(thread::spawn(move || {
            Simulation::new(config, PcgStream::seeded(seed))?.run()
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.join().expect("replication thread should not panic")?);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::collections::VecDeque;
    use std::f64::consts::LN_2;

    struct Constant(f64);

    impl VariateSource for Constant {
        fn draw(&mut self) -> f64 {
            self.0
        }
    }

    struct Script(VecDeque<f64>);

    impl Script {
        fn new(draws: &[f64]) -> Self {
            Self(draws.iter().copied().collect())
        }
    }

    impl VariateSource for Script {
        fn draw(&mut self) -> f64 {
            self.0.pop_front().expect("script ran out of draws")
        }
    }

    fn near(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn construction_rejects_invalid_parameters() {
        let config = SimulationConfig::new(0.0, 1.0, 1.0);
        let result = Simulation::new(config, PcgStream::seeded(1));
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { name: "arrival_rate", .. })
        ));
    }

    #[test]
    fn seeding_anchors_the_first_service_at_its_arrival() {
        let config = SimulationConfig::new(1.0, 0.02, 0.06);
        let mut sim = Simulation::new(config, Constant(0.5)).unwrap();
        sim.seed_first_job().unwrap();

        assert!(near(sim.ctx.clock, LN_2));
        assert!(near(sim.processing.departure_time(), LN_2 + 0.02 * LN_2));
        assert_eq!(sim.ctx.arrivals_generated, 1);
        assert_eq!(sim.ctx.completions, 0);
        assert!(!sim.processing.is_idle());
        assert!(sim.storage.is_idle());
        assert!(sim.pending.is_empty());
    }

    #[test]
    fn target_is_reached_at_the_ten_thousandth_completion() {
        let config = SimulationConfig::new(1.0, 0.02, 0.06);
        let mut sim = Simulation::new(config, Constant(0.5)).unwrap();

        sim.ctx.completions = 9_999;
        assert!(!sim.target_reached());
        sim.ctx.completions = 10_000;
        assert!(sim.target_reached());
    }

    #[test]
    fn run_stops_at_the_completion_target() {
        // A constant 0.5 draw sends every job out of the network on its first
        // departure, one completion per step.
        let config = SimulationConfig::new(1.0, 0.02, 0.06).with_completion_target(3);
        let report = Simulation::new(config, Constant(0.5)).unwrap().run().unwrap();

        assert_eq!(report.completions, 3);
        assert_eq!(report.arrivals_generated, 4);
        assert_eq!(report.storage_utilization, 0.0);
    }

    #[test]
    fn scripted_draws_replay_a_full_cascade() {
        let config = SimulationConfig::new(1.0, 1.0, 1.0).with_completion_target(100);
        let mut sim = Simulation::new(
            config,
            Script::new(&[
                (-2.0f64).exp(),  // seed interarrival: job 0 at t=2
                (-0.5f64).exp(),  // job 0 service: departs at 2.5
                (-3.0f64).exp(),  // job 1 arrives at t=5
                0.5,              // job 0 routing: 0.5 > 0.4, completes
                (-0.25f64).exp(), // job 1 service: departs at 5.25
                (-10.0f64).exp(), // job 2 arrives at t=15
                0.3,              // job 1 routing: 0.3 <= 0.4, to storage
                (-2.0f64).exp(),  // job 1 storage service: departs at 7.25
                (-1.0f64).exp(),  // job 2 service: departs at 16
            ]),
        )
        .unwrap();

        sim.seed_first_job().unwrap();
        assert!(near(sim.ctx.clock, 2.0));
        assert!(near(sim.processing.departure_time(), 2.5));

        sim.step().unwrap();
        assert!(near(sim.ctx.clock, 5.0));
        assert_eq!(sim.ctx.completions, 1);
        assert!(near(sim.ctx.turnaround_total, 0.5));
        assert!(near(sim.processing.departure_time(), 5.25));
        assert!(sim.storage.is_idle());

        // Job 1 routes to storage, departs it inside the same drain, and
        // lands in the processing line behind the arrival that was admitted
        // first.
        sim.step().unwrap();
        assert!(near(sim.ctx.clock, 15.0));
        assert_eq!(sim.ctx.completions, 1);
        assert!(near(sim.processing.departure_time(), 16.0));
        assert!(near(sim.processing.busy_time(), 1.75));
        assert!(sim.storage.is_idle());
        assert!(near(sim.storage.departure_time(), 7.25));
        assert!(near(sim.storage.busy_time(), 2.0));
        assert_eq!(sim.processing.queue_len(), 1);
        assert_eq!(sim.ctx.arrivals_generated, 3);

        // Lengths are sampled before each arrival; both lines were empty at
        // both sampling instants.
        assert_eq!(sim.processing_queue_len_total, 0.0);
        assert_eq!(sim.storage_queue_len_total, 0.0);
    }

    #[test]
    fn jobs_are_conserved_and_time_runs_forward() {
        let config = SimulationConfig::new(1.0, 0.5, 0.5);
        let mut sim = Simulation::new(config, PcgStream::seeded(11)).unwrap();
        sim.seed_first_job().unwrap();

        let mut last_clock = sim.ctx.clock;
        let mut last_processing_departure = sim.processing.departure_time();
        let mut last_storage_departure = sim.storage.departure_time();
        for _ in 0..300 {
            sim.step().unwrap();

            assert!(sim.ctx.clock >= last_clock);
            assert!(sim.processing.departure_time() >= last_processing_departure);
            assert!(sim.storage.departure_time() >= last_storage_departure);
            last_clock = sim.ctx.clock;
            last_processing_departure = sim.processing.departure_time();
            last_storage_departure = sim.storage.departure_time();

            let in_service = 1 + u64::from(!sim.storage.is_idle());
            let waiting = (sim.processing.queue_len() + sim.storage.queue_len()) as u64;
            assert_eq!(
                sim.ctx.arrivals_generated,
                sim.ctx.completions + waiting + in_service
            );
        }
    }

    #[test]
    fn replications_replay_their_seeds() {
        let config = SimulationConfig::new(1.0, 0.2, 0.2).with_completion_target(50);
        let reports = run_replications(config, 7, 3).unwrap();
        assert_eq!(reports.len(), 3);

        for (index, report) in reports.iter().enumerate() {
            let solo = Simulation::new(config, PcgStream::seeded(7 + index as u64))
                .unwrap()
                .run()
                .unwrap();
            assert_eq!(*report, solo);
        }
    }
}
