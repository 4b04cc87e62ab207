/// Summary statistics from one completed simulation run.
///
/// All ratios follow the model's own accounting: the final clock is the
/// processing station's last scheduled departure, turnaround and utilizations
/// are normalized by that clock, and the queue length averages divide the
/// per-arrival samples by the number of completions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report {
    /// Total turnaround of completed jobs divided by the final clock.
    pub average_turnaround: f64,
    /// Completions per unit of simulated time.
    pub throughput: f64,
    /// Fraction of the run the processing station spent serving. Counts
    /// committed service, so it can nudge past 1 under saturation.
    pub processing_utilization: f64,
    /// Fraction of the run the storage station spent serving.
    pub storage_utilization: f64,
    /// Mean length of the processing wait line, sampled at each arrival.
    pub average_processing_queue_len: f64,
    /// Mean length of the storage wait line, sampled at each arrival.
    pub average_storage_queue_len: f64,
    /// Jobs that left the network.
    pub completions: u64,
    /// Jobs generated by the arrival process, including any still in flight.
    pub arrivals_generated: u64,
    /// Simulated time at which the run's accounting closed.
    pub final_clock: f64,
}

impl Report {
    /// Field-wise mean of a set of reports, or [`None`] for an empty set.
    ///
    /// Counter fields use the integer mean.
    pub fn mean_of(reports: &[Report]) -> Option<Report> {
        if reports.is_empty() {
            return None;
        }
        let count = reports.len() as f64;
        let mean = |field: fn(&Report) -> f64| reports.iter().map(field).sum::<f64>() / count;
        Some(Report {
            average_turnaround: mean(|report| report.average_turnaround),
            throughput: mean(|report| report.throughput),
            processing_utilization: mean(|report| report.processing_utilization),
            storage_utilization: mean(|report| report.storage_utilization),
            average_processing_queue_len: mean(|report| report.average_processing_queue_len),
            average_storage_queue_len: mean(|report| report.average_storage_queue_len),
            completions: reports.iter().map(|report| report.completions).sum::<u64>()
                / reports.len() as u64,
            arrivals_generated: reports
                .iter()
                .map(|report| report.arrivals_generated)
                .sum::<u64>()
                / reports.len() as u64,
            final_clock: mean(|report| report.final_clock),
        })
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            formatter,
            "{} completions of {} arrivals in {:.6} time units",
            self.completions, self.arrivals_generated, self.final_clock
        )?;
        writeln!(formatter, "average turnaround time:       {:.6}", self.average_turnaround)?;
        writeln!(formatter, "throughput:                    {:.6}", self.throughput)?;
        writeln!(formatter, "processing utilization:        {:.6}", self.processing_utilization)?;
        writeln!(formatter, "storage utilization:           {:.6}", self.storage_utilization)?;
        writeln!(formatter, "average processing queue size: {:.6}", self.average_processing_queue_len)?;
        write!(formatter, "average storage queue size:    {:.6}", self.average_storage_queue_len)
    }
}
