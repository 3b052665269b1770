//! State catalog
//!
//! Fixed lookup table of U.S. states plus the District of Columbia, each an
//! immutable pair of full name and two-letter code. Used when expanding
//! stored addresses for display and when resolving a state-name filter to
//! its abbreviation.

use serde::Serialize;

use crate::types::{Result, SignpostError};

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct State {
    pub name: &'static str,
    pub abbreviation: &'static str,
}

const fn state(name: &'static str, abbreviation: &'static str) -> State {
    State { name, abbreviation }
}

/// The 50 states plus the District of Columbia
pub const STATES: [State; 51] = [
    state("Alabama", "AL"),
    state("Alaska", "AK"),
    state("Arizona", "AZ"),
    state("Arkansas", "AR"),
    state("California", "CA"),
    state("Colorado", "CO"),
    state("Connecticut", "CT"),
    state("Delaware", "DE"),
    state("District of Columbia", "DC"),
    state("Florida", "FL"),
    state("Georgia", "GA"),
    state("Hawaii", "HI"),
    state("Idaho", "ID"),
    state("Illinois", "IL"),
    state("Indiana", "IN"),
    state("Iowa", "IA"),
    state("Kansas", "KS"),
    state("Kentucky", "KY"),
    state("Louisiana", "LA"),
    state("Maine", "ME"),
    state("Montana", "MT"),
    state("Nebraska", "NE"),
    state("Nevada", "NV"),
    state("New Hampshire", "NH"),
    state("New Jersey", "NJ"),
    state("New Mexico", "NM"),
    state("New York", "NY"),
    state("North Carolina", "NC"),
    state("North Dakota", "ND"),
    state("Ohio", "OH"),
    state("Oklahoma", "OK"),
    state("Oregon", "OR"),
    state("Maryland", "MD"),
    state("Massachusetts", "MA"),
    state("Michigan", "MI"),
    state("Minnesota", "MN"),
    state("Mississippi", "MS"),
    state("Missouri", "MO"),
    state("Pennsylvania", "PA"),
    state("Rhode Island", "RI"),
    state("South Carolina", "SC"),
    state("South Dakota", "SD"),
    state("Tennessee", "TN"),
    state("Texas", "TX"),
    state("Utah", "UT"),
    state("Vermont", "VT"),
    state("Virginia", "VA"),
    state("Washington", "WA"),
    state("West Virginia", "WV"),
    state("Wisconsin", "WI"),
    state("Wyoming", "WY"),
];

/// Resolve a two-letter code to its catalog entry
///
/// Fails with [`SignpostError::UnknownState`] when the code matches no
/// entry.
pub fn lookup(code: &str) -> Result<&'static State> {
    STATES
        .iter()
        .find(|s| s.abbreviation == code)
        .ok_or_else(|| SignpostError::UnknownState(code.to_string()))
}

/// Resolve a full state name (case-insensitive) to its catalog entry
pub fn find_by_name(name: &str) -> Option<&'static State> {
    STATES.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_resolves() {
        for entry in &STATES {
            let found = lookup(entry.abbreviation).unwrap();
            assert_eq!(found.name, entry.name);
        }
    }

    #[test]
    fn test_unknown_code_fails() {
        assert!(matches!(lookup("ZZ"), Err(SignpostError::UnknownState(_))));
        // Codes are two-letter uppercase; no case folding on lookup
        assert!(lookup("al").is_err());
    }

    #[test]
    fn test_catalog_has_51_entries() {
        assert_eq!(STATES.len(), 51);
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        assert_eq!(find_by_name("california").unwrap().abbreviation, "CA");
        assert_eq!(
            find_by_name("District of Columbia").unwrap().abbreviation,
            "DC"
        );
        assert!(find_by_name("Atlantis").is_none());
    }
}
