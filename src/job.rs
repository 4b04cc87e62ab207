/// One unit of work moving through the service network.
///
/// A job is created by an external arrival, holds a seat at the processing
/// station, and then either leaves the network or detours through the storage
/// station and rejoins the processing wait line, repeating until the routing
/// test at a processing departure sends it out. Stations hand jobs to each
/// other by value; the record is small enough that copying is the natural
/// transfer.
///
/// At any simulated instant a job is in exactly one of three places: in
/// service at a station, waiting in exactly one station's wait line, or
/// departed from the network.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Job {
    /// Monotonically increasing identifier, informational only.
    pub id: u64,
    /// Simulated time the job arrived from outside the network.
    pub arrival_time: f64,
    /// Simulated time the job departed the station it last visited. Anchors
    /// the start of service when the destination station has sat idle.
    pub prev_departure: f64,
    /// The most recent uniform draw consumed for this job's routing decision
    /// at a processing departure, retained until its next visit.
    pub branch_mark: f64,
}

impl Job {
    /// Create a job arriving from outside the network at `arrival_time`.
    pub fn new(id: u64, arrival_time: f64) -> Self {
        Self {
            id,
            arrival_time,
            prev_departure: 0.0,
            branch_mark: 0.0,
        }
    }
}
