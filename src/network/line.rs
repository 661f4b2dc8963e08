use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    error::NetworkError,
    network::{
        station::{Station, StationId},
        weight::edge_weight,
    },
};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    pub fn new(str: &str) -> Self {
        Self(str.to_owned())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    /// km/h
    pub operating_speed: f64,
    /// Connections made on this line go into the express adjacency maps.
    pub express: bool,
    /// Stations keyed by sequence position. Several stations may share a position.
    pub stations: BTreeMap<i32, Vec<Station>>,
}

impl Line {
    pub fn new(id: LineId, name: String, operating_speed: f64, express: bool) -> Self {
        Self {
            id,
            name,
            operating_speed,
            express,
            stations: BTreeMap::new(),
        }
    }

    pub fn add_station(&mut self, station: Station, position: i32) {
        self.stations.entry(position).or_default().push(station);
    }

    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.values().flatten().find(|s| &s.id == id)
    }

    fn station_mut(&mut self, id: &StationId) -> Option<&mut Station> {
        self.stations.values_mut().flatten().find(|s| &s.id == id)
    }

    /// Makes `a` and `b` mutual neighbours, weighted by distance or, with
    /// `use_time`, by travel time at this line's speed. Returns the weight.
    pub fn connect(
        &mut self,
        a: &StationId,
        b: &StationId,
        use_time: bool,
    ) -> Result<f64, NetworkError> {
        if use_time && !(self.operating_speed > 0.0) {
            return Err(NetworkError::InvalidSpeed {
                line: self.id.clone(),
                speed: self.operating_speed,
            });
        }

        let pos_a = self.position_of(a)?;
        let pos_b = self.position_of(b)?;
        let weight = edge_weight(pos_a, pos_b, self.operating_speed, use_time);
        let express = self.express;

        if let Some(station) = self.station_mut(a) {
            station.add_neighbour(b.clone(), weight, express)?;
        }
        if let Some(station) = self.station_mut(b) {
            station.add_neighbour(a.clone(), weight, express)?;
        }

        Ok(weight)
    }

    fn position_of(&self, id: &StationId) -> Result<geo_types::Point<f64>, NetworkError> {
        self.station(id)
            .map(|s| s.position)
            .ok_or_else(|| NetworkError::StationNotOnLine {
                line: self.id.clone(),
                station: id.clone(),
            })
    }
}
