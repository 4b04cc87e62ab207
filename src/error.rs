/// Errors that may be encountered while configuring
/// or executing a simulation.
///
/// The [`InvalidParameter`] variant originates from
/// configuration intake: the arrival rate and both mean
/// service times feed inverse-CDF transforms, so a zero,
/// negative, or non-finite value would produce degenerate
/// or sign-inverted delays. Rejecting it up front is the
/// only recoverable failure in the crate; everything that
/// can go wrong after a valid configuration is a broken
/// causal-ordering invariant and treated as fatal.
///
/// The [`OutOfOrderArrival`] variant originates from the
/// safe interface of the [`ArrivalQueue`] to indicate that
/// a job's arrival time is prior to the latest arrival the
/// queue already admitted (or is NaN and therefore cannot
/// be ordered at all). This error likely corresponds to a
/// logical bug on the caller's side, e.g. anchoring a new
/// interarrival increment at the wrong clock value.
///
/// [`ArrivalQueue`]: crate::ArrivalQueue
/// [`InvalidParameter`]: Error::InvalidParameter
/// [`OutOfOrderArrival`]: Error::OutOfOrderArrival
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// A simulation parameter was zero, negative, NaN, or
    /// infinite. Carries the parameter's name and the
    /// rejected value for reporting.
    InvalidParameter {
        /// Which parameter failed validation.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// The pending-arrival queue rejected a job whose
    /// arrival time has already passed, or that carried a
    /// NaN arrival time.
    OutOfOrderArrival,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let descriptor = match self {
            Self::InvalidParameter { name, value } => {
                format!("simulation parameter '{name}' must be a strictly positive finite number, got {value}")
            },
            Self::OutOfOrderArrival => {
                "job arrival time is less than the latest admitted arrival time".into()
            },
        };
        write!(f, "{descriptor}")
    }
}

impl std::error::Error for Error {}

/// [`std::result::Result`] with this crate's [`Error`] as
/// the failure type.
///
/// A type alias that simplifies the signatures of various
/// functions in the crate.
pub type Result<T> = std::result::Result<T, Error>;
