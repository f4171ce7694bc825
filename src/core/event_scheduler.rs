use super::models::Assignment;
use super::types::SimTime;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A service completion waiting on the simulated timeline
#[derive(Debug)]
pub struct ScheduledCompletion {
    pub delay: SimTime,
    pub sequence_num: u64,
    pub assignment: Assignment,
}

impl PartialEq for ScheduledCompletion {
    fn eq(&self, other: &Self) -> bool {
        self.delay == other.delay && self.sequence_num == other.sequence_num
    }
}

impl Eq for ScheduledCompletion {}

impl PartialOrd for ScheduledCompletion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledCompletion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .delay
            .cmp(&self.delay)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Pending completions ordered by remaining delay, then by scheduling order.
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledCompletion>,
    sequence_counter: u64,
}

impl EventScheduler {
    /// Create a new EventScheduler
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Schedule the completion of `assignment` after its service duration
    pub fn schedule_completion(&mut self, assignment: Assignment) {
        let scheduled = ScheduledCompletion {
            delay: assignment.job.duration,
            sequence_num: self.sequence_counter,
            assignment,
        };

        self.event_queue.push(scheduled);
        self.sequence_counter += 1;
    }

    /// Pop every completion due at the next time step (minimum delay)
    pub fn get_next_time_events(&mut self) -> Vec<Assignment> {
        let mut events = Vec::new();

        if let Some(next_delay) = self.peek_next_delay() {
            while self
                .event_queue
                .peek()
                .map_or(false, |scheduled| scheduled.delay == next_delay)
            {
                if let Some(scheduled) = self.event_queue.pop() {
                    events.push(scheduled.assignment);
                }
            }
        }

        events
    }

    /// Check if there are any completions remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    /// Number of completions still pending
    pub fn len(&self) -> usize {
        self.event_queue.len()
    }

    /// Get the next completion delay without removing anything
    pub fn peek_next_delay(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|scheduled| scheduled.delay)
    }

    /// Advance time by reducing all delays by the specified amount
    pub fn advance_time(&mut self, units: SimTime) {
        let mut temp_events = Vec::with_capacity(self.event_queue.len());

        while let Some(mut scheduled) = self.event_queue.pop() {
            scheduled.delay = scheduled.delay.saturating_sub(units);
            temp_events.push(scheduled);
        }

        self.event_queue.extend(temp_events);
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Job;
    use crate::core::specialty::Specialty;
    use crate::core::types::{IncidentId, JobId, MechanicId, VehicleId};

    fn assignment(id: u64, duration: SimTime) -> Assignment {
        Assignment {
            job: Job {
                id: JobId(id),
                vehicle: VehicleId(0),
                incident: IncidentId(id as u32),
                specialty: Specialty::Mechanical,
                duration,
                priority: false,
                enqueued_at: 0,
            },
            mechanic: MechanicId(id as u32),
            started_at: 0,
        }
    }

    #[test]
    fn test_events_come_out_in_delay_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_completion(assignment(1, 5));
        scheduler.schedule_completion(assignment(2, 2));
        scheduler.schedule_completion(assignment(3, 9));

        assert_eq!(scheduler.peek_next_delay(), Some(2));
        let first = scheduler.get_next_time_events();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].job.id, JobId(2));
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_simultaneous_events_keep_scheduling_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_completion(assignment(1, 3));
        scheduler.schedule_completion(assignment(2, 3));
        scheduler.schedule_completion(assignment(3, 4));

        let batch: Vec<u64> = scheduler
            .get_next_time_events()
            .iter()
            .map(|a| a.job.id.0)
            .collect();
        assert_eq!(batch, vec![1, 2]);
    }

    #[test]
    fn test_advance_time_reduces_delays() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_completion(assignment(1, 3));
        scheduler.schedule_completion(assignment(2, 7));

        scheduler.advance_time(3);
        assert_eq!(scheduler.peek_next_delay(), Some(0));
        assert_eq!(scheduler.get_next_time_events().len(), 1);
        assert_eq!(scheduler.peek_next_delay(), Some(4));

        scheduler.advance_time(10);
        assert_eq!(scheduler.peek_next_delay(), Some(0));
        scheduler.get_next_time_events();
        assert!(!scheduler.has_events());
    }
}
