use std::fmt;

/// Errors raised while resolving a run configuration.
///
/// Every variant is produced before any simulation work begins; a run that
/// has started never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkshopError {
    /// Preset scenario number outside the known range
    UnknownScenario(u32),
    /// Records mode with no available mechanic
    NoMechanics,
    /// Records mode with no vehicle
    NoVehicles,
    /// A record names a specialty outside the catalog
    UnknownSpecialty(String),
    /// Configuration values that cannot drive a run
    InvalidConfig(String),
    /// Engine asked to run outside the `Initialized` state
    InvalidState(String),
}

impl fmt::Display for WorkshopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkshopError::UnknownScenario(id) => write!(f, "unknown scenario '{}'", id),
            WorkshopError::NoMechanics => write!(f, "no mechanics available in the records"),
            WorkshopError::NoVehicles => write!(f, "no vehicles in the records"),
            WorkshopError::UnknownSpecialty(name) => write!(f, "unknown specialty '{}'", name),
            WorkshopError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            WorkshopError::InvalidState(msg) => write!(f, "invalid engine state: {}", msg),
        }
    }
}

impl std::error::Error for WorkshopError {}
