use crate::driver::SimContext;
use crate::variates::{service_duration, VariateSource};
use crate::Job;

use std::collections::VecDeque;
use tracing::trace;

/// Routing bound for the completion test at a processing departure.
///
/// When the fresh uniform draw plus the departing job's retained mark is at or
/// below this value, the job continues to the storage station; otherwise it
/// leaves the network.
pub const STORAGE_ROUTING_THRESHOLD: f64 = 0.4;

/// Which of the two service stations a [`Station`] value models.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StationKind {
    /// First stage. Every job in the network, newly arrived or handed back
    /// from storage, waits in this station's line.
    Processing,
    /// Second stage. A served job always returns to the processing wait line.
    Storage,
}

/// A single-server service stage with a FIFO wait line.
///
/// The two kinds share their bookkeeping but differ in how work reaches the
/// server. The processing station admits jobs to its wait line only and picks
/// the next one up when a departure resolves; once it has started its first
/// job it never reports idle again, keeping the departed job in the slot when
/// the line is empty so its departure time stays in place. The storage
/// station seats an admitted job immediately when idle and goes back to idle
/// whenever its line empties.
///
/// Departure times are schedules, not events: a station's departure time may
/// sit in the past until the driver's clock catches up and resolves it.
#[derive(Debug)]
pub struct Station {
    kind: StationKind,
    mean_service: f64,
    busy_time: f64,
    departure_time: f64,
    current_job: Option<Job>,
    wait_queue: VecDeque<Job>,
}

impl Station {
    /// Construct an idle station of the given kind with no time on the books.
    pub fn new(kind: StationKind, mean_service: f64) -> Self {
        Self {
            kind,
            mean_service,
            busy_time: 0.0,
            departure_time: 0.0,
            current_job: None,
            wait_queue: VecDeque::new(),
        }
    }

    /// The station's role in the network.
    pub fn kind(&self) -> StationKind {
        self.kind
    }

    /// Whether the server slot is unoccupied.
    pub fn is_idle(&self) -> bool {
        self.current_job.is_none()
    }

    /// Simulated time at which the job in service departs. Stale while the
    /// station is idle or holding a departed job.
    pub fn departure_time(&self) -> f64 {
        self.departure_time
    }

    /// Total simulated time of all service the station has committed to.
    pub fn busy_time(&self) -> f64 {
        self.busy_time
    }

    /// Number of jobs in the wait line, excluding any job in service.
    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    /// Seat a job directly in the server slot, anchoring its service at the
    /// job's arrival time. Used once, for the first job of a run.
    pub(crate) fn start<V: VariateSource>(&mut self, job: Job, variates: &mut V) {
        let service = service_duration(self.mean_service, variates.draw());
        self.busy_time += service;
        self.departure_time = job.arrival_time + service;
        self.current_job = Some(job);
    }

    /// Hand a job to the station.
    ///
    /// The processing station always appends to its wait line. The storage
    /// station does so only while busy; when idle it seats the job at once,
    /// starting service at the later of the job's handoff time and the
    /// station's own last departure.
    pub(crate) fn admit<V: VariateSource>(&mut self, job: Job, variates: &mut V) {
        match self.kind {
            StationKind::Processing => self.wait_queue.push_back(job),
            StationKind::Storage => {
                if self.current_job.is_some() {
                    self.wait_queue.push_back(job);
                } else {
                    let service = service_duration(self.mean_service, variates.draw());
                    self.busy_time += service;
                    self.departure_time = if job.prev_departure > self.departure_time {
                        job.prev_departure + service
                    } else {
                        self.departure_time + service
                    };
                    self.current_job = Some(job);
                }
            }
        }
    }

    /// Resolve the scheduled departure of the job in service.
    ///
    /// For the processing station this runs the routing test on the departing
    /// job, forwards it to `sibling` (the storage station) or records its
    /// completion, resolves a storage departure that is already due, and then
    /// seats the next waiting job. For the storage station it hands the job
    /// back to the processing wait line and seats its own next waiting job.
    pub(crate) fn resolve_departure<V: VariateSource>(
        &mut self,
        sibling: &mut Station,
        ctx: &mut SimContext,
        variates: &mut V,
    ) {
        match self.kind {
            StationKind::Processing => {
                let mut job = self
                    .current_job
                    .expect("departure resolved on a station with no job in service");

                // The draw is compared against the mark retained from the
                // job's previous departure, then replaces it.
                let draw = variates.draw();
                let to_storage = draw + job.branch_mark <= STORAGE_ROUTING_THRESHOLD;
                job.branch_mark = draw;
                if to_storage {
                    job.prev_departure = self.departure_time;
                    trace!(job = job.id, time = self.departure_time, "routed to storage");
                    sibling.admit(job, variates);
                } else {
                    let turnaround = self.departure_time - job.arrival_time;
                    trace!(job = job.id, turnaround, "left the network");
                    ctx.record_completion(turnaround);
                }

                if ctx.clock >= sibling.departure_time && !sibling.is_idle() {
                    sibling.hand_back(&mut self.wait_queue, variates);
                }

                if let Some(next) = self.wait_queue.pop_front() {
                    let service = service_duration(self.mean_service, variates.draw());
                    self.busy_time += service;
                    self.departure_time = if next.arrival_time >= self.departure_time {
                        next.arrival_time + service
                    } else {
                        self.departure_time + service
                    };
                    self.current_job = Some(next);
                } else {
                    // An empty line keeps the departed job in the slot, mark
                    // and all; the station stays busy with its departure time
                    // unchanged.
                    self.current_job = Some(job);
                }
            }
            StationKind::Storage => {
                self.hand_back(&mut sibling.wait_queue, variates);
            }
        }
    }

    /// Complete the storage visit of the job in service: return it to the
    /// processing wait line stamped with this departure time, then seat the
    /// next waiting job or go idle.
    fn hand_back<V: VariateSource>(&mut self, processing_line: &mut VecDeque<Job>, variates: &mut V) {
        let mut job = self
            .current_job
            .take()
            .expect("departure resolved on a station with no job in service");
        job.prev_departure = self.departure_time;
        trace!(job = job.id, time = self.departure_time, "returned to the processing line");
        processing_line.push_back(job);

        if let Some(next) = self.wait_queue.pop_front() {
            let service = service_duration(self.mean_service, variates.draw());
            self.busy_time += service;
            self.departure_time += service;
            self.current_job = Some(next);
        }
    }
}
