//! Two-tier FIFO queue of jobs awaiting a mechanic.

use super::models::Job;
use super::specialty::Specialty;
use super::types::JobId;
use std::collections::VecDeque;

/// Jobs waiting for service. Priority jobs always come before normal jobs;
/// each tier keeps insertion order.
#[derive(Debug, Default)]
pub struct JobQueue {
    priority: VecDeque<Job>,
    normal: VecDeque<Job>,
}

impl JobQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job to the back of its tier
    pub fn enqueue(&mut self, job: Job) {
        if job.priority {
            self.priority.push_back(job);
        } else {
            self.normal.push_back(job);
        }
    }

    /// The job that would be dispatched first, without removing it
    pub fn peek_next(&self) -> Option<&Job> {
        self.priority.front().or_else(|| self.normal.front())
    }

    /// Remove a job by id, wherever it sits in the queue
    pub fn remove(&mut self, id: JobId) -> Option<Job> {
        for tier in [&mut self.priority, &mut self.normal] {
            if let Some(pos) = tier.iter().position(|job| job.id == id) {
                return tier.remove(pos);
            }
        }
        None
    }

    /// All queued jobs in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.priority.iter().chain(self.normal.iter())
    }

    /// Number of queued jobs needing `specialty`
    pub fn waiting_for(&self, specialty: Specialty) -> usize {
        self.iter().filter(|job| job.specialty == specialty).count()
    }

    pub fn len(&self) -> usize {
        self.priority.len() + self.normal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priority.is_empty() && self.normal.is_empty()
    }
}
