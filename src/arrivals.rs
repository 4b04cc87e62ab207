use crate::{Error, Job};

use ordered_float::NotNan;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Helper struct for the arrival queue. Holds a pending [`Job`] alongside the data necessary to sort arrivals within
/// the priority queue, namely the arrival time and a record of the job's insertion sequence.
///
/// The implementation of [`Ord`] on this struct cares first about the arrival time, comparing the insertion sequences
/// only to break ties.
#[derive(Debug)]
struct ArrivalHolder {
    arrival_time: NotNan<f64>,
    job: Job,
    insertion_sequence: usize,
}

impl PartialEq<Self> for ArrivalHolder {
    fn eq(&self, other: &Self) -> bool {
        self.insertion_sequence == other.insertion_sequence && self.arrival_time == other.arrival_time
    }
}

impl Eq for ArrivalHolder {}

impl PartialOrd<Self> for ArrivalHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ArrivalHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        let comparison = self.arrival_time.cmp(&other.arrival_time);
        match comparison {
            Ordering::Equal => self.insertion_sequence.cmp(&other.insertion_sequence),
            _ => comparison,
        }
    }
}

/// Priority queue of jobs that have been generated but not yet admitted to the network.
///
/// Jobs leave the queue in ascending order of arrival time, with ties broken by the order in which they were pushed.
/// The tiebreaker stabilizes the observed admission order when two arrivals coincide exactly.
///
/// Popping a job advances the queue's notion of the latest admitted arrival time, and every push is compared against
/// that time: attempting to push a job whose arrival time is already past returns an [`Error::OutOfOrderArrival`]
/// without modifying the queue. This error indicates that the arrival generator probably has a logical error, as an
/// arrival process never runs backwards.
#[derive(Debug, Default)]
pub struct ArrivalQueue {
    pending: BinaryHeap<Reverse<ArrivalHolder>>,
    last_admitted_time: f64,
    jobs_added: usize,
}

impl ArrivalQueue {
    /// Construct an [`ArrivalQueue`] with no pending jobs and the latest admitted arrival time at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job to the pending set, keyed by its arrival time.
    ///
    /// # Errors
    ///
    /// If the job's arrival time is less than the latest admitted arrival time, or is NaN, returns an
    /// [`Error::OutOfOrderArrival`] with no modifications to the queue.
    pub fn push(&mut self, job: Job) -> crate::Result<()> {
        // Written with a negated >= so a NaN arrival time also lands here.
        if !(job.arrival_time >= self.last_admitted_time) {
            return Err(Error::OutOfOrderArrival);
        }

        let arrival_time =
            NotNan::new(job.arrival_time).expect("NaN arrival time was rejected by the ordering guard");
        let insertion_sequence = self.jobs_added;
        self.jobs_added += 1;
        self.pending.push(Reverse(ArrivalHolder {
            arrival_time,
            job,
            insertion_sequence,
        }));
        Ok(())
    }

    /// Remove and return the pending job with the earliest arrival time, advancing the latest admitted arrival time to
    /// match. Returns [`None`] if no jobs are pending.
    pub fn pop(&mut self) -> Option<Job> {
        let holder = self.pending.pop()?;
        self.last_admitted_time = holder.0.arrival_time.into_inner();
        Some(holder.0.job)
    }

    /// Number of jobs waiting to be admitted.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether any jobs are waiting to be admitted.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Arrival time of the most recently popped job, or zero before the first pop.
    pub fn last_admitted_time(&self) -> f64 {
        self.last_admitted_time
    }
}

impl std::fmt::Display for ArrivalQueue {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            formatter,
            "ArrivalQueue with {} pending jobs, last admission at time {:?}",
            self.pending.len(),
            self.last_admitted_time
        )
    }
}
