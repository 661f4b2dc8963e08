use std::collections::HashSet;

use itertools::Itertools;

use crate::{
    config::NetworkConfig,
    error::NetworkError,
    network::{
        line::{Line, LineId},
        station::{Station, StationId},
        SystemMap,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub id: LineId,
    pub name: String,
    pub operating_speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    pub line: LineId,
    pub station: StationId,
    pub name: String,
    pub position: i32,
    pub latitude: f64,
    pub longitude: f64,
}

/// Links every station at each occupied position to every station at the next
/// position, when that position is occupied too. Stations in `no_connect` are
/// never linked from the preceding group.
pub fn create_connections(
    line: &mut Line,
    use_time: bool,
    no_connect: &HashSet<StationId>,
) -> Result<usize, NetworkError> {
    let pairs: Vec<(StationId, StationId)> = line
        .stations
        .iter()
        .filter_map(|(position, group)| {
            position
                .checked_add(1)
                .and_then(|next| line.stations.get(&next))
                .map(|next| (group, next))
        })
        .flat_map(|(group, next)| {
            group
                .iter()
                .cartesian_product(next.iter())
                .filter(|(_, b)| !no_connect.contains(&b.id))
                .map(|(a, b)| (a.id.clone(), b.id.clone()))
        })
        .collect();

    for (a, b) in pairs.iter() {
        line.connect(a, b, use_time)?;
    }

    Ok(pairs.len())
}

/// Builds the network from loader records. Lines are merged one at a time in
/// record order so that conflicting weights resolve the same way on every run.
pub fn build_system(
    lines: Vec<LineRecord>,
    placements: Vec<PlacementRecord>,
    config: &NetworkConfig,
    use_time: bool,
) -> Result<SystemMap, NetworkError> {
    let mut built: Vec<Line> = lines
        .into_iter()
        .filter(|r| {
            let accepted = config.accepts_line(&r.id);
            if !accepted {
                log::warn!("Skipping line {} missing from the line catalogue", r.id);
            }
            accepted
        })
        .map(|r| {
            let express = config.is_express(&r.id);
            Line::new(r.id, r.name, r.operating_speed, express)
        })
        .collect();

    let mut seen = HashSet::new();
    for p in placements.into_iter() {
        if !seen.insert((p.line.clone(), p.station.clone())) {
            log::debug!("Ignoring repeated placement of {} on {}", p.station, p.line);
            continue;
        }

        let line = built
            .iter_mut()
            .find(|l| l.id == p.line)
            .ok_or_else(|| NetworkError::UnknownLine(p.line.clone()))?;

        let position = config
            .position_overrides
            .get(&p.station)
            .copied()
            .unwrap_or(p.position);

        let name = config.fix_name(&p.name);
        let station = Station::new(p.line, p.station, name, p.latitude, p.longitude);
        line.add_station(station, position);
    }

    let mut system = SystemMap::new();
    for mut line in built.into_iter() {
        let connections = create_connections(&mut line, use_time, &config.no_connect)?;
        log::debug!("{} ({}) has {} connections", line.name, line.id, connections);
        system.add_line(line)?;
    }

    log::info!(
        "Built network of {} stations on {} lines",
        system.stations.len(),
        system.lines.len()
    );

    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_record(id: &str) -> LineRecord {
        LineRecord {
            id: LineId::new(id),
            name: format!("{id} Line"),
            operating_speed: 80.0,
        }
    }

    fn placement(line: &str, station: &str, position: i32, latitude: f64) -> PlacementRecord {
        PlacementRecord {
            line: LineId::new(line),
            station: StationId::new(station),
            name: station.to_owned(),
            position,
            latitude,
            longitude: 114.2,
        }
    }

    fn open_config() -> NetworkConfig {
        NetworkConfig {
            lines: vec![],
            express_line: None,
            position_overrides: Default::default(),
            no_connect: Default::default(),
            name_fixes: Default::default(),
        }
    }

    fn neighbours(system: &SystemMap, id: &str) -> Vec<String> {
        system.stations[&StationId::new(id)]
            .neighbours
            .keys()
            .map(|s| s.to_string())
            .sorted()
            .collect()
    }

    #[test]
    fn branch_positions_connect_fully() {
        let placements = vec![
            placement("EAL", "A", 1, 22.30),
            placement("EAL", "B", 2, 22.31),
            placement("EAL", "C", 2, 22.32),
            placement("EAL", "D", 3, 22.33),
        ];

        let system =
            build_system(vec![line_record("EAL")], placements, &open_config(), false).unwrap();

        assert_eq!(neighbours(&system, "A"), vec!["B", "C"]);
        assert_eq!(neighbours(&system, "D"), vec!["B", "C"]);
        assert!(neighbours(&system, "B").contains(&"D".to_owned()));
    }

    #[test]
    fn gaps_in_positions_are_not_bridged() {
        let placements = vec![placement("EAL", "A", 1, 22.30), placement("EAL", "B", 3, 22.31)];

        let system =
            build_system(vec![line_record("EAL")], placements, &open_config(), false).unwrap();

        assert!(neighbours(&system, "A").is_empty());
    }

    #[test]
    fn overrides_move_and_exclusions_skip_stations() {
        let mut config = open_config();
        config.position_overrides.insert(StationId::new("X"), 2);
        config.no_connect.insert(StationId::new("X"));

        let placements = vec![
            placement("TKL", "A", 1, 22.30),
            placement("TKL", "B", 2, 22.31),
            placement("TKL", "X", 7, 22.31),
            placement("TKL", "C", 3, 22.32),
        ];

        let system = build_system(vec![line_record("TKL")], placements, &config, false).unwrap();

        assert_eq!(neighbours(&system, "A"), vec!["B"]);
        assert_eq!(neighbours(&system, "X"), vec!["C"]);
        assert_eq!(system.lines[&LineId::new("TKL")].stations[&2].len(), 2);
    }

    #[test]
    fn interchange_collects_both_lines() {
        let placements = vec![
            placement("TWL", "A", 1, 22.30),
            placement("TWL", "ADM", 2, 22.31),
            placement("ISL", "ADM", 5, 22.31),
            placement("ISL", "B", 6, 22.32),
        ];

        let system = build_system(
            vec![line_record("TWL"), line_record("ISL")],
            placements,
            &open_config(),
            false,
        )
        .unwrap();

        let adm = &system.stations[&StationId::new("ADM")];
        assert_eq!(adm.lines.len(), 2);
        assert_eq!(neighbours(&system, "ADM"), vec!["A", "B"]);
    }

    #[test]
    fn express_line_builds_express_edges() {
        let mut config = open_config();
        config.express_line = Some(LineId::new("AEL"));

        let placements = vec![placement("AEL", "HOK", 1, 22.28), placement("AEL", "KOW", 2, 22.30)];

        let system = build_system(vec![line_record("AEL")], placements, &config, true).unwrap();

        let hok = &system.stations[&StationId::new("HOK")];
        assert!(hok.neighbours.is_empty());
        assert!(hok.express_neighbours.contains_key(&StationId::new("KOW")));
    }

    #[test]
    fn repeated_placements_are_ignored() {
        let placements = vec![
            placement("EAL", "A", 1, 22.30),
            placement("EAL", "B", 2, 22.31),
            placement("EAL", "B", 2, 22.31),
        ];

        let system =
            build_system(vec![line_record("EAL")], placements, &open_config(), false).unwrap();

        assert_eq!(system.lines[&LineId::new("EAL")].stations[&2].len(), 1);
    }

    #[test]
    fn last_representable_position_connects_backwards() {
        let placements = vec![
            placement("EAL", "A", i32::MAX - 1, 22.30),
            placement("EAL", "B", i32::MAX, 22.31),
        ];

        let system =
            build_system(vec![line_record("EAL")], placements, &open_config(), false).unwrap();

        assert_eq!(neighbours(&system, "A"), vec!["B"]);
        assert_eq!(neighbours(&system, "B"), vec!["A"]);
    }

    #[test]
    fn lone_station_at_last_position_has_no_neighbours() {
        let placements = vec![placement("EAL", "A", i32::MAX, 22.30)];

        let system =
            build_system(vec![line_record("EAL")], placements, &open_config(), false).unwrap();

        assert!(neighbours(&system, "A").is_empty());
    }

    #[test]
    fn station_without_coordinates_fails_the_build() {
        let placements = vec![
            placement("EAL", "A", 1, 22.30),
            placement("EAL", "B", 2, f64::NAN),
        ];

        let result = build_system(vec![line_record("EAL")], placements, &open_config(), false);

        assert!(matches!(result, Err(NetworkError::InvalidWeight { .. })));
    }

    #[test]
    fn placement_on_unknown_line_fails() {
        let result = build_system(
            vec![line_record("EAL")],
            vec![placement("XRL", "A", 1, 22.30)],
            &open_config(),
            false,
        );

        assert_eq!(
            result.unwrap_err(),
            NetworkError::UnknownLine(LineId::new("XRL"))
        );
    }
}
