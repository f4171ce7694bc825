//! Matching of queued jobs to idle, specialty-compatible mechanics.
//!
//! A drain walks the queue in dispatch order (priority tier first, arrival
//! order within a tier). The first job of each specialty gets the lowest-id
//! idle mechanic of that specialty. When none is idle the hiring policy
//! decides whether to add one; otherwise the specialty is blocked until the
//! next drain. Because blocked specialties stay blocked for the rest of the
//! pass, a later job can never overtake an earlier one of the same specialty.

use super::config::HiringPolicy;
use super::job_queue::JobQueue;
use super::models::{Assignment, Job, Mechanic, Vehicle};
use super::specialty::Specialty;
use super::statistics::{StatisticsCollector, StatisticsSnapshot};
use super::types::{MechanicId, SimTime, VehicleId};
use super::worker_pool::WorkerPool;
use log::{debug, warn};
use std::collections::HashMap;

/// Service progress of one vehicle
#[derive(Debug, Clone)]
struct VehicleProgress {
    priority: bool,
    remaining: usize,
    serviced: bool,
    attended: bool,
}

/// Result of a single drain pass
#[derive(Debug, Default)]
pub struct DrainOutcome {
    pub assignments: Vec<Assignment>,
    pub hires: Vec<(MechanicId, Specialty)>,
}

impl DrainOutcome {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.hires.is_empty()
    }
}

pub struct Dispatcher {
    queue: JobQueue,
    pool: WorkerPool,
    stats: StatisticsCollector,
    hiring: HiringPolicy,
    vehicles: HashMap<VehicleId, VehicleProgress>,
    next_job_id: u64,
}

impl Dispatcher {
    pub fn new(roster: Vec<Mechanic>, total_vehicles: usize, hiring: HiringPolicy) -> Self {
        Self {
            queue: JobQueue::new(),
            pool: WorkerPool::new(roster),
            stats: StatisticsCollector::new(total_vehicles),
            hiring,
            vehicles: HashMap::new(),
            next_job_id: 0,
        }
    }

    /// Enqueue one job per incident of `vehicle`.
    ///
    /// A vehicle without incidents has nothing pending and is recorded as
    /// attended straight away.
    pub fn admit(&mut self, vehicle: &Vehicle, now: SimTime) {
        let jobs = Job::for_vehicle(vehicle, &mut self.next_job_id, now);
        let attended = jobs.is_empty();
        self.vehicles.insert(
            vehicle.id,
            VehicleProgress {
                priority: vehicle.priority,
                remaining: jobs.len(),
                serviced: false,
                attended,
            },
        );

        if attended {
            debug!("{} arrived with no incidents", vehicle.id);
            self.stats.record_vehicle_attended(vehicle.priority);
        }
        for job in jobs {
            self.queue.enqueue(job);
        }
    }

    /// Assign as many queued jobs as the pool (and the hiring policy) allow.
    pub fn drain(&mut self, now: SimTime) -> DrainOutcome {
        let mut outcome = DrainOutcome::default();
        let mut blocked = [false; 3];

        let candidates: Vec<(_, Specialty)> =
            self.queue.iter().map(|job| (job.id, job.specialty)).collect();

        for (job_id, specialty) in candidates {
            if blocked.iter().all(|b| *b) {
                break;
            }
            if blocked[specialty.index()] {
                continue;
            }

            let mechanic = match self.pool.find_idle(specialty) {
                Some(id) => id,
                None => match self.try_hire(specialty) {
                    Some(id) => {
                        outcome.hires.push((id, specialty));
                        id
                    }
                    None => {
                        blocked[specialty.index()] = true;
                        continue;
                    }
                },
            };

            let Some(job) = self.queue.remove(job_id) else {
                continue;
            };
            let claimed = self.pool.mark_busy(mechanic, job.id);
            debug_assert!(claimed, "{} handed out while busy", mechanic);
            self.stats.record_wait(now.saturating_sub(job.enqueued_at));
            debug!(
                "t={} {} ({} for {}) -> {}{}",
                now,
                job.id,
                specialty,
                job.vehicle,
                mechanic,
                if job.priority { " [priority]" } else { "" }
            );
            outcome.assignments.push(Assignment {
                job,
                mechanic,
                started_at: now,
            });
        }

        outcome
    }

    fn try_hire(&mut self, specialty: Specialty) -> Option<MechanicId> {
        let waiting = self.queue.waiting_for(specialty);
        let staffed = self.pool.count(specialty);
        let hired = self.pool.hired_for(specialty);
        if !self.hiring.should_hire(waiting, staffed, hired) {
            return None;
        }
        let id = self.pool.hire(specialty)?;
        self.stats.record_hire();
        Some(id)
    }

    /// Record a finished job and free its mechanic.
    ///
    /// Returns true when this completion was the vehicle's last pending
    /// incident. A completion whose mechanic is not busy with that job is
    /// ignored.
    pub fn complete(&mut self, assignment: &Assignment, now: SimTime) -> bool {
        match self.pool.release(assignment.mechanic) {
            Some(job) if job == assignment.job.id => {}
            other => {
                warn!(
                    "Ignoring completion of {} by {}: mechanic held {:?}",
                    assignment.job.id, assignment.mechanic, other
                );
                return false;
            }
        }

        self.stats.record_service_duration(assignment.job.duration);
        debug!(
            "t={} {} done by {} after {}",
            now, assignment.job.id, assignment.mechanic, assignment.job.duration
        );

        let Some(progress) = self.vehicles.get_mut(&assignment.job.vehicle) else {
            return false;
        };
        progress.remaining = progress.remaining.saturating_sub(1);

        if progress.priority && !progress.serviced {
            progress.serviced = true;
            self.stats.record_priority_serviced();
        }

        if progress.remaining == 0 && !progress.attended {
            progress.attended = true;
            self.stats.record_vehicle_attended(progress.priority);
            debug!("t={} {} attended", now, assignment.job.vehicle);
            return true;
        }
        false
    }

    /// Jobs currently being serviced
    pub fn in_flight(&self) -> usize {
        self.pool.busy_count()
    }

    /// True when nothing is queued and nothing is in service
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.in_flight() == 0
    }

    /// Queued work that no drain can ever start: nothing in service to free
    /// a mechanic and no hire allowed.
    pub fn is_stalled(&self) -> bool {
        !self.queue.is_empty() && self.in_flight() == 0
    }

    pub fn is_attended(&self, vehicle: VehicleId) -> bool {
        self.vehicles.get(&vehicle).map_or(false, |p| p.attended)
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn snapshot(&self, final_time: SimTime) -> StatisticsSnapshot {
        self.stats.snapshot(final_time)
    }
}
