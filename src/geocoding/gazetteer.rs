//! In-memory place table backed by configuration entries

use crate::core::Coordinate;
use crate::geocoding::lookup::{GeocodeResult, Geocoder};
use crate::utils::config::PlaceEntry;
use crate::validation::error::Result;
use log::debug;
use std::collections::HashMap;

/// Case-insensitive gazetteer
///
/// Besides named places it understands literal `"lat, lng"` or `"lat lng"`
/// queries, so any point can be entered without a table entry.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    places: HashMap<String, Coordinate>,
}

impl Gazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration entries, validating every coordinate
    pub fn from_places(entries: &[PlaceEntry]) -> Result<Self> {
        let mut gazetteer = Self::new();
        for entry in entries {
            gazetteer.insert(&entry.name, Coordinate::new(entry.latitude, entry.longitude)?);
        }
        Ok(gazetteer)
    }

    /// Add or replace a place
    pub fn insert(&mut self, name: &str, coordinate: Coordinate) {
        self.places.insert(normalize_place_name(name), coordinate);
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Place names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.places.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Geocoder for Gazetteer {
    fn lookup(&self, query: &str) -> GeocodeResult<Option<Coordinate>> {
        let key = normalize_place_name(query);
        if key.is_empty() {
            return Ok(None);
        }

        if let Some(coordinate) = self.places.get(&key) {
            return Ok(Some(*coordinate));
        }

        let literal = parse_literal(&key);
        if literal.is_none() {
            debug!("No gazetteer match for '{}'", query);
        }
        Ok(literal)
    }
}

/// Lookup key for a place name: lowercase, single-spaced, trimmed
pub fn normalize_place_name(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn parse_literal(text: &str) -> Option<Coordinate> {
    let parts: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    match parts.as_slice() {
        [lat, lon] => {
            let latitude = lat.parse::<f64>().ok()?;
            let longitude = lon.parse::<f64>().ok()?;
            Coordinate::new(latitude, longitude).ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Gazetteer {
        Gazetteer::from_places(&[
            PlaceEntry {
                name: "New Delhi".to_string(),
                latitude: 28.6139,
                longitude: 77.2090,
            },
            PlaceEntry {
                name: "Mumbai".to_string(),
                latitude: 19.0760,
                longitude: 72.8777,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_is_case_and_space_insensitive() {
        let gazetteer = sample();
        let hit = gazetteer.lookup("  new   DELHI ").unwrap().unwrap();
        assert_eq!(hit, Coordinate::new(28.6139, 77.2090).unwrap());
        assert_eq!(gazetteer.names(), vec!["mumbai", "new delhi"]);
    }

    #[test]
    fn test_unknown_place_is_none() {
        assert_eq!(sample().lookup("Atlantis").unwrap(), None);
        assert_eq!(sample().lookup("   ").unwrap(), None);
    }

    #[test]
    fn test_literal_coordinates() {
        let gazetteer = Gazetteer::new();
        assert_eq!(
            gazetteer.lookup("12.5, -7.25").unwrap(),
            Some(Coordinate::new(12.5, -7.25).unwrap())
        );
        assert_eq!(
            gazetteer.lookup("12.5 -7.25").unwrap(),
            Some(Coordinate::new(12.5, -7.25).unwrap())
        );
        assert_eq!(gazetteer.lookup("95, 0").unwrap(), None);
        assert_eq!(gazetteer.lookup("1, 2, 3").unwrap(), None);
    }

    #[test]
    fn test_normalized_names_share_a_key() {
        assert_eq!(normalize_place_name("  New   DELHI "), "new delhi");
        assert_eq!(normalize_place_name("new delhi"), normalize_place_name("New\tDelhi"));
    }

    #[test]
    fn test_invalid_entry_rejected() {
        let result = Gazetteer::from_places(&[PlaceEntry {
            name: "Nowhere".to_string(),
            latitude: 120.0,
            longitude: 0.0,
        }]);
        assert!(result.is_err());
    }
}
