//! UML stereotype classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stereotypes for UML definitions
///
/// Drives both the importer's dispatch and which branch of the code
/// generator renders a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stereotype {
    #[default]
    Class,
    Interface,
    Implements,
    Extends,
    Enumeration,
    Package,
    Attribute,
    Method,
    Model,
}

impl Stereotype {
    /// Get the token used in diagrams and JSON artifacts
    pub fn as_str(&self) -> &'static str {
        match self {
            Stereotype::Class => "class",
            Stereotype::Interface => "interface",
            Stereotype::Implements => "implements",
            Stereotype::Extends => "extends",
            Stereotype::Enumeration => "enumeration",
            Stereotype::Package => "package",
            Stereotype::Attribute => "attribute",
            Stereotype::Method => "method",
            Stereotype::Model => "model",
        }
    }

    /// Get all stereotypes
    pub fn all() -> &'static [Stereotype] {
        &[
            Stereotype::Class,
            Stereotype::Interface,
            Stereotype::Implements,
            Stereotype::Extends,
            Stereotype::Enumeration,
            Stereotype::Package,
            Stereotype::Attribute,
            Stereotype::Method,
            Stereotype::Model,
        ]
    }

    /// True for stereotypes that describe a connector between two definitions
    pub fn is_association(&self) -> bool {
        matches!(self, Stereotype::Implements | Stereotype::Extends)
    }
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stereotype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .iter()
            .find(|st| st.as_str() == lower)
            .copied()
            .ok_or_else(|| format!("Unknown stereotype: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Class".parse::<Stereotype>().unwrap(), Stereotype::Class);
        assert_eq!("INTERFACE".parse::<Stereotype>().unwrap(), Stereotype::Interface);
        assert!("widget".parse::<Stereotype>().is_err());
    }

    #[test]
    fn test_all_roundtrip_through_display() {
        for st in Stereotype::all() {
            assert_eq!(st.to_string().parse::<Stereotype>().unwrap(), *st);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Stereotype::Enumeration).unwrap();
        assert_eq!(json, "\"enumeration\"");
    }
}
