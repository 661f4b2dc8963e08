pub mod io;
pub mod line;
pub mod loader;
pub mod station;
pub mod weight;

use std::collections::HashMap;

use crate::{
    error::NetworkError,
    network::{
        line::{Line, LineId},
        station::{Station, StationId},
    },
};

/// Registry of every station and line in the network.
#[derive(Debug, Default)]
pub struct SystemMap {
    pub stations: HashMap<StationId, Station>,
    pub lines: HashMap<LineId, Line>,
}

impl SystemMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `station`, or merges it into the station already registered under
    /// the same id. A station carrying an unusable weight leaves the registry
    /// untouched.
    pub fn add_station(&mut self, station: Station) -> Result<(), NetworkError> {
        station.validate()?;

        let merged = match self.stations.remove(&station.id) {
            Some(existing) => existing.merge(station)?,
            None => station,
        };
        self.stations.insert(merged.id.clone(), merged);
        Ok(())
    }

    /// Stores `line`, replacing any line with the same id, and merges each of its
    /// stations into the registry in position order.
    pub fn add_line(&mut self, line: Line) -> Result<(), NetworkError> {
        for station in line.stations.values().flatten() {
            self.add_station(station.clone())?;
        }
        self.lines.insert(line.id.clone(), line);
        Ok(())
    }

    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }
}
