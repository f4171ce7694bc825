//! The closed catalog of mechanic specialties.

use super::errors::WorkshopError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A mechanic's skill category. An incident requires exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Specialty {
    Mechanical,
    Electrical,
    Bodywork,
}

impl Specialty {
    /// Every specialty, in catalog order
    pub const ALL: [Specialty; 3] = [
        Specialty::Mechanical,
        Specialty::Electrical,
        Specialty::Bodywork,
    ];

    /// Position in `ALL`, used to index per-specialty tables
    pub fn index(self) -> usize {
        match self {
            Specialty::Mechanical => 0,
            Specialty::Electrical => 1,
            Specialty::Bodywork => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Specialty::Mechanical => "mechanical",
            Specialty::Electrical => "electrical",
            Specialty::Bodywork => "bodywork",
        }
    }

    /// Map an incident's declared category onto the catalog.
    ///
    /// Matching ignores case and surrounding whitespace. Anything outside the
    /// catalog is a configuration error rather than a skipped incident.
    pub fn for_incident(category: &str) -> Result<Self, WorkshopError> {
        category.parse()
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Specialty {
    type Err = WorkshopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mechanical" | "mechanics" => Ok(Specialty::Mechanical),
            "electrical" | "electric" => Ok(Specialty::Electrical),
            "bodywork" | "body" => Ok(Specialty::Bodywork),
            _ => Err(WorkshopError::UnknownSpecialty(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_catalog_order() {
        for (i, specialty) in Specialty::ALL.iter().enumerate() {
            assert_eq!(specialty.index(), i);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Specialty::for_incident(" Electrical ").unwrap(), Specialty::Electrical);
        assert_eq!(Specialty::for_incident("BODYWORK").unwrap(), Specialty::Bodywork);
        assert_eq!("mechanical".parse::<Specialty>().unwrap(), Specialty::Mechanical);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = Specialty::for_incident("upholstery").unwrap_err();
        assert_eq!(err, WorkshopError::UnknownSpecialty("upholstery".to_string()));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for specialty in Specialty::ALL {
            assert_eq!(specialty.to_string().parse::<Specialty>().unwrap(), specialty);
        }
    }
}
