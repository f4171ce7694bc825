//! Domain entities the scheduler works on.

use super::specialty::Specialty;
use super::types::{IncidentId, JobId, MechanicId, SimTime, VehicleId};

/// Whether a mechanic can take a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MechanicStatus {
    Idle,
    Busy(JobId),
}

#[derive(Debug, Clone)]
pub struct Mechanic {
    pub id: MechanicId,
    pub name: String,
    pub specialty: Specialty,
    pub status: MechanicStatus,
    /// Added by the hiring policy during the run
    pub hired: bool,
}

impl Mechanic {
    pub fn new(id: MechanicId, name: impl Into<String>, specialty: Specialty) -> Self {
        Self {
            id,
            name: name.into(),
            specialty,
            status: MechanicStatus::Idle,
            hired: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == MechanicStatus::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub id: IncidentId,
    pub specialty: Specialty,
    /// Service time in simulated units, always at least 1
    pub duration: SimTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub priority: bool,
    /// Position in the arrival sequence
    pub arrival: usize,
    pub incidents: Vec<Incident>,
}

impl Vehicle {
    pub fn new(id: VehicleId, arrival: usize, priority: bool, incidents: Vec<Incident>) -> Self {
        Self {
            id,
            priority,
            arrival,
            incidents,
        }
    }
}

/// One incident of one vehicle waiting for a compatible mechanic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub vehicle: VehicleId,
    pub incident: IncidentId,
    pub specialty: Specialty,
    pub duration: SimTime,
    pub priority: bool,
    pub enqueued_at: SimTime,
}

impl Job {
    /// Build the jobs for every incident of `vehicle`, numbering them from `next_id`.
    pub fn for_vehicle(vehicle: &Vehicle, next_id: &mut u64, enqueued_at: SimTime) -> Vec<Job> {
        vehicle
            .incidents
            .iter()
            .map(|incident| {
                let id = JobId(*next_id);
                *next_id += 1;
                Job {
                    id,
                    vehicle: vehicle.id,
                    incident: incident.id,
                    specialty: incident.specialty,
                    duration: incident.duration,
                    priority: vehicle.priority,
                    enqueued_at,
                }
            })
            .collect()
    }
}

/// A job handed to a mechanic, as returned by a dispatcher drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub job: Job,
    pub mechanic: MechanicId,
    pub started_at: SimTime,
}

impl Assignment {
    pub fn finishes_at(&self) -> SimTime {
        self.started_at.saturating_add(self.job.duration)
    }
}
