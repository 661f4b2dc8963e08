use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use geo_types::Point;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    error::NetworkError,
    network::{line::LineId, weight::checked_weight},
};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(str: &str) -> Self {
        Self(str.to_owned())
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node of the network.
///
/// Standard and express adjacency are kept apart so that a query can decide
/// per search whether the express sub-network is usable.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub lines: HashSet<LineId>,
    pub name: String,
    /// `x` is longitude, `y` is latitude.
    pub position: Point<f64>,
    pub neighbours: HashMap<StationId, f64>,
    pub express_neighbours: HashMap<StationId, f64>,
}

impl Station {
    pub fn new(line: LineId, id: StationId, name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            lines: HashSet::from([line]),
            name,
            position: Point::new(longitude, latitude),
            neighbours: HashMap::new(),
            express_neighbours: HashMap::new(),
        }
    }

    pub fn add_line(&mut self, line: LineId) {
        self.lines.insert(line);
    }

    /// Records the weight to `other`, replacing any previous weight in the same map.
    /// Negative and non-finite weights are rejected.
    pub fn add_neighbour(
        &mut self,
        other: StationId,
        weight: f64,
        express: bool,
    ) -> Result<(), NetworkError> {
        let weight = checked_weight(&self.id, &other, weight)?;

        if other == self.id {
            log::warn!("Ignoring self-loop on {}", self.id);
            return Ok(());
        }

        if express {
            self.express_neighbours.insert(other, weight);
        } else {
            self.neighbours.insert(other, weight);
        }
        Ok(())
    }

    /// Express lookups prefer the express map and fall back to the standard one.
    pub fn get_weight(&self, other: &StationId, express: bool) -> Result<f64, NetworkError> {
        let weight = if express {
            self.express_neighbours
                .get(other)
                .or_else(|| self.neighbours.get(other))
        } else {
            self.neighbours.get(other)
        };

        weight.copied().ok_or_else(|| NetworkError::NeighbourNotFound {
            from: self.id.clone(),
            to: other.clone(),
            express,
        })
    }

    /// Neighbours reachable under the given mode, each listed once.
    pub fn neighbour_ids(&self, express: bool) -> impl Iterator<Item = &StationId> {
        let express_ids = self.express_neighbours.keys().filter(move |_| express);
        self.neighbours.keys().chain(express_ids).unique()
    }

    /// Fails on the first adjacency entry that is not a usable weight.
    pub fn validate(&self) -> Result<(), NetworkError> {
        self.neighbours
            .iter()
            .chain(self.express_neighbours.iter())
            .try_for_each(|(other, weight)| checked_weight(&self.id, other, *weight).map(|_| ()))
    }

    /// Unions `incoming` into `self`. Line memberships accumulate; for a neighbour
    /// known to both, the incoming weight wins. Nothing is merged if `incoming`
    /// carries an unusable weight.
    pub fn merge(mut self, incoming: Station) -> Result<Station, NetworkError> {
        incoming.validate()?;

        let Station {
            lines,
            neighbours,
            express_neighbours,
            ..
        } = incoming;

        for line in lines {
            self.add_line(line);
        }
        for (other, weight) in neighbours {
            self.add_neighbour(other, weight, false)?;
        }
        for (other, weight) in express_neighbours {
            self.add_neighbour(other, weight, true)?;
        }

        Ok(self)
    }
}
