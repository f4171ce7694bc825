//! Read-only view of the manually managed workshop records.
//!
//! The record store belongs to the caller and is passed into a run by
//! reference; a run reads it and never writes back. Specialties arrive as
//! free text and are checked against the catalog when the run is resolved.

use super::config::{DurationPolicy, MAX_SERVICE_DURATION};
use super::errors::WorkshopError;
use super::models::{Incident, Mechanic, Vehicle};
use super::specialty::Specialty;
use super::types::{IncidentId, MechanicId, VehicleId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicRecord {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    /// Unavailable mechanics are left out of the roster
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub id: u32,
    pub description: String,
    pub specialty: String,
    /// Service time in simulated units, clamped to `1..=MAX_SERVICE_DURATION`;
    /// sampled from the duration policy when absent
    pub estimated_duration: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: u32,
    pub plate: String,
    pub priority: bool,
    pub incidents: Vec<IncidentRecord>,
}

/// The mechanics and vehicles currently held by the record store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkshopRecords {
    pub mechanics: Vec<MechanicRecord>,
    pub vehicles: Vec<VehicleRecord>,
}

impl WorkshopRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mechanic(&mut self, id: u32, name: &str, specialty: &str, available: bool) -> &mut Self {
        self.mechanics.push(MechanicRecord {
            id,
            name: name.to_string(),
            specialty: specialty.to_string(),
            available,
        });
        self
    }

    pub fn add_vehicle(&mut self, vehicle: VehicleRecord) -> &mut Self {
        self.vehicles.push(vehicle);
        self
    }

    /// Build the initial roster from the available mechanics.
    pub fn roster(&self) -> Result<Vec<Mechanic>, WorkshopError> {
        let mut seen = HashSet::new();
        let mut roster = Vec::new();
        for record in self.mechanics.iter().filter(|m| m.available) {
            if !seen.insert(record.id) {
                return Err(WorkshopError::InvalidConfig(format!(
                    "duplicate mechanic id {}",
                    record.id
                )));
            }
            let specialty = Specialty::for_incident(&record.specialty)?;
            roster.push(Mechanic::new(MechanicId(record.id), record.name.clone(), specialty));
        }
        if roster.is_empty() {
            return Err(WorkshopError::NoMechanics);
        }
        Ok(roster)
    }

    /// Build the vehicles in record order, drawing missing durations from `durations`.
    pub fn vehicles<R: Rng>(
        &self,
        durations: &DurationPolicy,
        rng: &mut R,
    ) -> Result<Vec<Vehicle>, WorkshopError> {
        if self.vehicles.is_empty() {
            return Err(WorkshopError::NoVehicles);
        }

        let mut seen = HashSet::new();
        let mut vehicles = Vec::with_capacity(self.vehicles.len());
        for (arrival, record) in self.vehicles.iter().enumerate() {
            if !seen.insert(record.id) {
                return Err(WorkshopError::InvalidConfig(format!(
                    "duplicate vehicle id {}",
                    record.id
                )));
            }
            let mut incidents = Vec::with_capacity(record.incidents.len());
            for incident in &record.incidents {
                let specialty = Specialty::for_incident(&incident.specialty)?;
                let duration = match incident.estimated_duration {
                    Some(estimate) => estimate.clamp(1, MAX_SERVICE_DURATION),
                    None => durations.sample(rng),
                };
                incidents.push(Incident {
                    id: IncidentId(incident.id),
                    specialty,
                    duration,
                });
            }
            vehicles.push(Vehicle::new(VehicleId(record.id), arrival, record.priority, incidents));
        }
        Ok(vehicles)
    }
}
