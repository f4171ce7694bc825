//! Run sources: the five synthetic presets, custom presets, and stored records.

use super::config::SimulationConfig;
use super::errors::WorkshopError;
use super::models::{Incident, Mechanic, Vehicle};
use super::records::WorkshopRecords;
use super::specialty::Specialty;
use super::types::{IncidentId, MechanicId, VehicleId};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::specialty::Specialty::{Bodywork, Electrical, Mechanical};

/// Number of built-in presets, numbered from 1
pub const PRESET_COUNT: u32 = 5;

/// A synthetic workshop: roster size per specialty and a stream of vehicles.
///
/// Incident specialties are taken from `incident_mix` in a repeating cycle, so
/// a preset keeps its mix exactly regardless of the seed. The seed only
/// decides priority flags and service durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPreset {
    pub name: String,
    pub description: String,
    /// Mechanics per specialty, indexed by `Specialty::index`
    pub roster: [usize; 3],
    pub vehicle_count: usize,
    pub incident_mix: Vec<Specialty>,
    pub incidents_per_vehicle: usize,
}

impl ScenarioPreset {
    /// A balanced preset: one incident per vehicle, specialties in catalog order.
    pub fn new(name: impl Into<String>, roster: [usize; 3], vehicle_count: usize) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            roster,
            vehicle_count,
            incident_mix: Specialty::ALL.to_vec(),
            incidents_per_vehicle: 1,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_incident_mix(mut self, mix: Vec<Specialty>) -> Self {
        self.incident_mix = mix;
        self
    }

    pub fn with_incidents_per_vehicle(mut self, count: usize) -> Self {
        self.incidents_per_vehicle = count;
        self
    }

    /// Look up a built-in preset by its number (1..=5)
    pub fn by_id(id: u32) -> Result<Self, WorkshopError> {
        let preset = match id {
            1 => ScenarioPreset::new("base", [1, 1, 1], 8)
                .with_description("Reference run: one mechanic per specialty, 8 balanced vehicles"),
            2 => ScenarioPreset::new("double vehicles", [2, 1, 1], 16)
                .with_description("Load test: twice the vehicles of the base run"),
            3 => ScenarioPreset::new("mechanical-heavy roster", [3, 1, 1], 15)
                .with_description("Three mechanical per electrical/bodywork mechanic, mostly electrical and bodywork demand")
                .with_incident_mix(vec![Electrical, Bodywork, Electrical, Bodywork, Mechanical]),
            4 => ScenarioPreset::new("double roster", [2, 2, 2], 12)
                .with_description("Resource test: two mechanics per specialty, 12 balanced vehicles"),
            5 => ScenarioPreset::new("extreme 1-3-3", [1, 3, 3], 10)
                .with_description("One mechanical per three electrical and three bodywork mechanics, two incidents per vehicle")
                .with_incident_mix(vec![Electrical, Bodywork, Mechanical, Electrical, Bodywork])
                .with_incidents_per_vehicle(2),
            other => return Err(WorkshopError::UnknownScenario(other)),
        };
        Ok(preset)
    }

    /// All built-in presets in order
    pub fn all() -> Vec<Self> {
        (1..=PRESET_COUNT).filter_map(|id| Self::by_id(id).ok()).collect()
    }

    pub fn roster_size(&self) -> usize {
        self.roster.iter().sum()
    }

    pub fn validate(&self) -> Result<(), WorkshopError> {
        if self.incidents_per_vehicle > 0 && self.incident_mix.is_empty() && self.vehicle_count > 0 {
            return Err(WorkshopError::InvalidConfig(format!(
                "preset '{}' has incidents but an empty incident mix",
                self.name
            )));
        }
        Ok(())
    }

    /// Mechanics numbered from 0, grouped by specialty in catalog order
    pub fn build_roster(&self) -> Vec<Mechanic> {
        let mut roster = Vec::with_capacity(self.roster_size());
        for specialty in Specialty::ALL {
            for n in 0..self.roster[specialty.index()] {
                let id = MechanicId(roster.len() as u32);
                roster.push(Mechanic::new(id, format!("{} mechanic {}", specialty, n + 1), specialty));
            }
        }
        roster
    }

    /// Generate the vehicle stream. Draws, per vehicle: the priority flag,
    /// then one duration per incident.
    pub fn build_vehicles(&self, config: &SimulationConfig, rng: &mut StdRng) -> Vec<Vehicle> {
        let mut vehicles = Vec::with_capacity(self.vehicle_count);
        let mut incident_seq = 0usize;

        for arrival in 0..self.vehicle_count {
            let priority = rng.gen_bool(config.priority_ratio);
            let mut incidents = Vec::with_capacity(self.incidents_per_vehicle);
            for _ in 0..self.incidents_per_vehicle {
                let specialty = self.incident_mix[incident_seq % self.incident_mix.len()];
                incidents.push(Incident {
                    id: IncidentId(incident_seq as u32),
                    specialty,
                    duration: config.durations.sample(rng),
                });
                incident_seq += 1;
            }
            vehicles.push(Vehicle::new(VehicleId(arrival as u32), arrival, priority, incidents));
        }
        vehicles
    }
}

/// Where a run takes its roster and vehicles from
#[derive(Debug, Clone)]
pub enum RunSource<'a> {
    /// Built-in preset by number
    Preset(u32),
    Custom(ScenarioPreset),
    /// The caller's current records
    Records(&'a WorkshopRecords),
}

/// A run source turned into concrete entities
#[derive(Debug, Clone)]
pub struct ResolvedScenario {
    pub name: String,
    pub roster: Vec<Mechanic>,
    pub vehicles: Vec<Vehicle>,
}

impl RunSource<'_> {
    pub fn resolve(
        &self,
        config: &SimulationConfig,
        rng: &mut StdRng,
    ) -> Result<ResolvedScenario, WorkshopError> {
        match self {
            RunSource::Preset(id) => resolve_preset(&ScenarioPreset::by_id(*id)?, config, rng),
            RunSource::Custom(preset) => resolve_preset(preset, config, rng),
            RunSource::Records(records) => Ok(ResolvedScenario {
                name: "current records".to_string(),
                roster: records.roster()?,
                vehicles: records.vehicles(&config.durations, rng)?,
            }),
        }
    }
}

fn resolve_preset(
    preset: &ScenarioPreset,
    config: &SimulationConfig,
    rng: &mut StdRng,
) -> Result<ResolvedScenario, WorkshopError> {
    preset.validate()?;
    Ok(ResolvedScenario {
        name: preset.name.clone(),
        roster: preset.build_roster(),
        vehicles: preset.build_vehicles(config, rng),
    })
}
