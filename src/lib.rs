pub mod core;

// Re-export commonly used types
pub use crate::core::batch::run_presets;
pub use crate::core::config::{ClockMode, ConcurrencyMode, DurationPolicy, HiringPolicy, SimulationConfig};
pub use crate::core::errors::WorkshopError;
pub use crate::core::records::{IncidentRecord, MechanicRecord, VehicleRecord, WorkshopRecords};
pub use crate::core::scenario::{RunSource, ScenarioPreset};
pub use crate::core::simulation_engine::{
    run_simulation, EngineState, RunReport, SimulationEngine, SimulationObserver, StopReason,
};
pub use crate::core::specialty::Specialty;
pub use crate::core::statistics::StatisticsSnapshot;
