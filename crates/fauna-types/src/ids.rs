use std::fmt;

use serde::{Deserialize, Serialize};

/// Surrogate key for a municipality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MunicipalityId(pub u32);

/// Surrogate key for a settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementId(pub u32);

/// Surrogate key for a species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u32);

/// Surrogate key for a user account (volunteer or employee).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for MunicipalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mun:{}", self.0)
    }
}

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stl:{}", self.0)
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spc:{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "usr:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(format!("{}", MunicipalityId(3)), "mun:3");
        assert_eq!(format!("{}", SettlementId(7)), "stl:7");
        assert_eq!(format!("{}", SpeciesId(1)), "spc:1");
        assert_eq!(format!("{}", UserId(42)), "usr:42");
    }

    #[test]
    fn ids_are_transparent_in_json() {
        let json = serde_json::to_string(&SettlementId(5)).unwrap();
        assert_eq!(json, "5");
        let parsed: SettlementId = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, SettlementId(5));
    }

    #[test]
    fn ids_of_different_kinds_do_not_compare() {
        // Compile-time property: SettlementId(1) == SpeciesId(1) must not
        // typecheck. Runtime assertion covers ordering within a kind.
        assert!(SettlementId(1) < SettlementId(2));
    }
}
