use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use crate::{
    error::NetworkError,
    network::{station::StationId, weight::checked_weight, SystemMap},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Station ids from source to destination inclusive, `None` when unreachable.
    pub path: Option<Vec<StationId>>,
    /// Settled distance at the destination, in the unit the edges were built with.
    pub weight: f64,
}

impl ShortestPath {
    fn unreachable() -> Self {
        Self {
            path: None,
            weight: 0.0,
        }
    }
}

/// Frontier entry. `station` is `None` only for the sentinel.
#[derive(Debug, PartialEq)]
struct Candidate {
    distance: f64,
    station: Option<StationId>,
    previous: Option<StationId>,
}

impl Candidate {
    fn sentinel() -> Self {
        Self {
            distance: f64::INFINITY,
            station: None,
            previous: None,
        }
    }
}

impl Eq for Candidate {}

// Reversed so that `BinaryHeap` pops the smallest distance first. The sentinel
// pops after every station at the same distance.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.station.is_none().cmp(&self.station.is_none()))
            .then_with(|| other.station.cmp(&self.station))
            .then_with(|| other.previous.cmp(&self.previous))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl SystemMap {
    /// Dijkstra search from `source` to `destination`, stopping as soon as the
    /// destination is settled. Express edges are only traversed when
    /// `allow_express` is set.
    ///
    /// The frontier has no decrease-key: a station may be queued several times
    /// and every entry after the first settled one is dropped when popped.
    ///
    /// Returns a path of `None` with weight 0 when neither endpoint is known or the
    /// destination cannot be reached. A single unknown endpoint is an
    /// [`NetworkError::UnknownStation`] error.
    pub fn shortest_path(
        &self,
        source: &StationId,
        destination: &StationId,
        allow_express: bool,
    ) -> Result<ShortestPath, NetworkError> {
        match (
            self.stations.contains_key(source),
            self.stations.contains_key(destination),
        ) {
            (false, false) => return Ok(ShortestPath::unreachable()),
            (false, true) => return Err(NetworkError::UnknownStation(source.clone())),
            (true, false) => return Err(NetworkError::UnknownStation(destination.clone())),
            (true, true) => {}
        }

        let mut frontier = BinaryHeap::new();
        frontier.push(Candidate {
            distance: 0.0,
            station: Some(source.clone()),
            previous: None,
        });
        frontier.push(Candidate::sentinel());

        // Settled distance and predecessor per station
        let mut visited: HashMap<StationId, (f64, Option<StationId>)> = HashMap::new();

        while let Some(Candidate {
            distance,
            station,
            previous,
        }) = frontier.pop()
        {
            let Some(station) = station else {
                break;
            };

            if visited.contains_key(&station) {
                continue;
            }
            visited.insert(station.clone(), (distance, previous));

            if station == *destination {
                log::debug!(
                    "Settled {} stations reaching {destination} from {source}",
                    visited.len()
                );
                return Ok(ShortestPath {
                    path: Some(reconstruct(&visited, destination)),
                    weight: distance,
                });
            }

            let current = self
                .stations
                .get(&station)
                .ok_or_else(|| NetworkError::UnknownStation(station.clone()))?;

            for next in current.neighbour_ids(allow_express) {
                let neighbour = self
                    .stations
                    .get(next)
                    .ok_or_else(|| NetworkError::UnknownStation(next.clone()))?;

                // Read from the neighbour's side; edges are recorded on both ends.
                let weight = neighbour.get_weight(&station, allow_express)?;
                let weight = checked_weight(next, &station, weight)?;

                frontier.push(Candidate {
                    distance: distance + weight,
                    station: Some(next.clone()),
                    previous: Some(station.clone()),
                });
            }
        }

        log::debug!(
            "No path from {source} to {destination} after settling {} stations",
            visited.len()
        );
        Ok(ShortestPath::unreachable())
    }
}

fn reconstruct(
    visited: &HashMap<StationId, (f64, Option<StationId>)>,
    destination: &StationId,
) -> Vec<StationId> {
    let mut path = vec![destination.clone()];
    let mut previous = visited.get(destination).and_then(|(_, p)| p.as_ref());
    while let Some(station) = previous {
        path.push(station.clone());
        previous = visited.get(station).and_then(|(_, p)| p.as_ref());
    }
    path.reverse();
    path
}
