use super::types::SimTime;
use serde::{Deserialize, Serialize};

/// Running counters written by the dispatcher's completion path.
#[derive(Debug, Clone, Default)]
pub struct StatisticsCollector {
    total_vehicles: usize,
    attended_vehicles: usize,
    mechanics_hired: usize,
    priority_serviced: usize,
    priority_attended: usize,
    service_durations: Vec<SimTime>,
    wait_times: Vec<SimTime>,
}

impl StatisticsCollector {
    pub fn new(total_vehicles: usize) -> Self {
        Self {
            total_vehicles,
            ..Self::default()
        }
    }

    pub fn record_service_duration(&mut self, duration: SimTime) {
        self.service_durations.push(duration);
    }

    /// Time a job spent queued before a mechanic took it
    pub fn record_wait(&mut self, wait: SimTime) {
        self.wait_times.push(wait);
    }

    pub fn record_vehicle_attended(&mut self, is_priority: bool) {
        self.attended_vehicles += 1;
        if is_priority {
            self.priority_attended += 1;
        }
    }

    /// A priority vehicle had its first incident completed
    pub fn record_priority_serviced(&mut self) {
        self.priority_serviced += 1;
    }

    pub fn record_hire(&mut self) {
        self.mechanics_hired += 1;
    }

    /// Freeze the counters into a read-only snapshot
    pub fn snapshot(&self, final_time: SimTime) -> StatisticsSnapshot {
        StatisticsSnapshot {
            total_vehicles: self.total_vehicles,
            attended_vehicles: self.attended_vehicles,
            mechanics_hired: self.mechanics_hired,
            priority_vehicles_serviced: self.priority_serviced,
            priority_vehicles_attended: self.priority_attended,
            service_durations: self.service_durations.clone(),
            wait_times: self.wait_times.clone(),
            final_time,
        }
    }
}

/// Aggregate results of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub total_vehicles: usize,
    pub attended_vehicles: usize,
    /// Mechanics added beyond the initial roster
    pub mechanics_hired: usize,
    /// Priority vehicles with at least one completed incident
    pub priority_vehicles_serviced: usize,
    pub priority_vehicles_attended: usize,
    /// Individual service durations in completion order
    pub service_durations: Vec<SimTime>,
    pub wait_times: Vec<SimTime>,
    /// Simulated time when the run stopped
    pub final_time: SimTime,
}

impl StatisticsSnapshot {
    /// Attended vehicles as a percentage of all vehicles; 0.0 for an empty run.
    pub fn efficiency(&self) -> f64 {
        if self.total_vehicles == 0 {
            return 0.0;
        }
        self.attended_vehicles as f64 / self.total_vehicles as f64 * 100.0
    }

    pub fn jobs_completed(&self) -> usize {
        self.service_durations.len()
    }

    pub fn pending_vehicles(&self) -> usize {
        self.total_vehicles - self.attended_vehicles
    }

    /// Arithmetic mean of the recorded service durations, if any
    pub fn mean_service_duration(&self) -> Option<f64> {
        mean(&self.service_durations)
    }

    /// Arithmetic mean of the recorded waiting times, if any
    pub fn mean_wait_time(&self) -> Option<f64> {
        mean(&self.wait_times)
    }
}

fn mean(values: &[SimTime]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_run_has_zero_efficiency_and_no_mean() {
        let snapshot = StatisticsCollector::new(0).snapshot(0);
        assert_eq!(snapshot.total_vehicles, 0);
        assert_eq!(snapshot.attended_vehicles, 0);
        assert_eq!(snapshot.efficiency(), 0.0);
        assert_eq!(snapshot.mean_service_duration(), None);
        assert_eq!(snapshot.mean_wait_time(), None);
    }

    #[test]
    fn test_efficiency_is_attended_over_total() {
        let mut stats = StatisticsCollector::new(4);
        stats.record_vehicle_attended(false);
        stats.record_vehicle_attended(true);
        stats.record_vehicle_attended(false);

        let snapshot = stats.snapshot(10);
        assert_eq!(snapshot.efficiency(), 75.0);
        assert_eq!(snapshot.pending_vehicles(), 1);
        assert_eq!(snapshot.priority_vehicles_attended, 1);
        assert_eq!(snapshot.final_time, 10);
    }

    #[test]
    fn test_mean_service_duration() {
        let mut stats = StatisticsCollector::new(2);
        for d in [2, 3, 7] {
            stats.record_service_duration(d);
        }
        stats.record_wait(0);
        stats.record_wait(5);

        let snapshot = stats.snapshot(12);
        assert_eq!(snapshot.service_durations, vec![2, 3, 7]);
        assert_eq!(snapshot.jobs_completed(), 3);
        assert_eq!(snapshot.mean_service_duration(), Some(4.0));
        assert_eq!(snapshot.mean_wait_time(), Some(2.5));
    }

    #[test]
    fn test_hires_and_priority_counters() {
        let mut stats = StatisticsCollector::new(1);
        stats.record_hire();
        stats.record_hire();
        stats.record_priority_serviced();

        let snapshot = stats.snapshot(0);
        assert_eq!(snapshot.mechanics_hired, 2);
        assert_eq!(snapshot.priority_vehicles_serviced, 1);
    }
}
