//! Specialty-partitioned pool of mechanics with on-demand hiring.

use super::models::{Mechanic, MechanicStatus};
use super::specialty::Specialty;
use super::types::{JobId, MechanicId};
use log::{info, warn};

pub struct WorkerPool {
    mechanics: Vec<Mechanic>,
    initial_size: usize,
    hired_by_specialty: [usize; 3],
    /// Id for the next hire; `None` once the id space above the roster is used up
    next_id: Option<u32>,
}

impl WorkerPool {
    /// Create a pool from the initial roster. Every mechanic starts idle.
    pub fn new(roster: Vec<Mechanic>) -> Self {
        let next_id = match roster.iter().map(|m| m.id.0).max() {
            Some(highest) => highest.checked_add(1),
            None => Some(0),
        };
        let mechanics: Vec<Mechanic> = roster
            .into_iter()
            .map(|mut m| {
                m.status = MechanicStatus::Idle;
                m
            })
            .collect();
        Self {
            initial_size: mechanics.len(),
            mechanics,
            hired_by_specialty: [0; 3],
            next_id,
        }
    }

    /// Lowest-id idle mechanic of `specialty`
    pub fn find_idle(&self, specialty: Specialty) -> Option<MechanicId> {
        self.mechanics
            .iter()
            .filter(|m| m.specialty == specialty && m.is_idle())
            .map(|m| m.id)
            .min()
    }

    /// Mark a mechanic busy with `job`. Returns false if the mechanic is
    /// unknown or already busy.
    pub fn mark_busy(&mut self, id: MechanicId, job: JobId) -> bool {
        match self.get_mut(id) {
            Some(m) if m.is_idle() => {
                m.status = MechanicStatus::Busy(job);
                true
            }
            _ => false,
        }
    }

    /// Find an idle mechanic of `specialty` and mark it busy in one step.
    pub fn claim_idle(&mut self, specialty: Specialty, job: JobId) -> Option<MechanicId> {
        let id = self.find_idle(specialty)?;
        let claimed = self.mark_busy(id, job);
        debug_assert!(claimed, "{} was reported idle but could not be claimed", id);
        Some(id)
    }

    /// Return a mechanic to the idle set, yielding the job it was working on.
    pub fn release(&mut self, id: MechanicId) -> Option<JobId> {
        let mechanic = self.get_mut(id)?;
        match mechanic.status {
            MechanicStatus::Busy(job) => {
                mechanic.status = MechanicStatus::Idle;
                Some(job)
            }
            MechanicStatus::Idle => None,
        }
    }

    /// Add an idle mechanic of `specialty` and return its id.
    ///
    /// Returns `None` when no mechanic id above the roster is left.
    pub fn hire(&mut self, specialty: Specialty) -> Option<MechanicId> {
        let Some(next) = self.next_id else {
            warn!("Cannot hire a {} mechanic: mechanic ids exhausted", specialty);
            return None;
        };
        let id = MechanicId(next);
        self.next_id = next.checked_add(1);
        self.hired_by_specialty[specialty.index()] += 1;

        let mut mechanic = Mechanic::new(
            id,
            format!("hired {} mechanic #{}", specialty, self.hired_by_specialty[specialty.index()]),
            specialty,
        );
        mechanic.hired = true;
        info!(
            "Hired {} '{}', pool size now {}",
            id,
            mechanic.name,
            self.mechanics.len() + 1
        );
        self.mechanics.push(mechanic);
        Some(id)
    }

    pub fn get(&self, id: MechanicId) -> Option<&Mechanic> {
        self.mechanics.iter().find(|m| m.id == id)
    }

    fn get_mut(&mut self, id: MechanicId) -> Option<&mut Mechanic> {
        self.mechanics.iter_mut().find(|m| m.id == id)
    }

    pub fn size(&self) -> usize {
        self.mechanics.len()
    }

    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    pub fn hired(&self) -> usize {
        self.hired_by_specialty.iter().sum()
    }

    pub fn hired_for(&self, specialty: Specialty) -> usize {
        self.hired_by_specialty[specialty.index()]
    }

    /// Mechanics of `specialty`, idle or busy
    pub fn count(&self, specialty: Specialty) -> usize {
        self.mechanics.iter().filter(|m| m.specialty == specialty).count()
    }

    pub fn idle_count(&self, specialty: Specialty) -> usize {
        self.mechanics
            .iter()
            .filter(|m| m.specialty == specialty && m.is_idle())
            .count()
    }

    pub fn busy_count(&self) -> usize {
        self.mechanics.iter().filter(|m| !m.is_idle()).count()
    }
}
