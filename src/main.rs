use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use geo_types::Point;
use serde::Serialize;

use crate::{
    config::NetworkConfig,
    network::{io, loader::build_system, station::StationId, weight::WeightUnit, SystemMap},
};
mod config;
mod dijkstra;
mod error;
mod network;

#[derive(Parser)]
struct Args {
    /// Path to lines CSV (line code, speed, name)
    lines_path: String,
    /// Path to stations CSV
    stations_path: String,
    /// Station code of origin
    origin: String,
    /// Station code of destination
    destination: String,
    /// Weight edges by travel time instead of distance
    #[arg(long)]
    time: bool,
    /// Allow the express line
    #[arg(long)]
    express: bool,
    /// TOML network config, defaults to the MTR network
    #[arg(long)]
    config: Option<String>,
    /// Print the route as GeoJSON
    #[arg(long)]
    geojson: bool,
}

#[derive(Serialize)]
struct RouteStop {
    id: StationId,
    name: String,
    #[serde(serialize_with = "geojson::ser::serialize_geometry")]
    geometry: Point,
    weight: f64,
}

fn route_stops(
    system: &SystemMap,
    path: &[StationId],
    express: bool,
) -> anyhow::Result<Vec<RouteStop>> {
    let mut stops = Vec::with_capacity(path.len());
    let mut weight = 0.0;
    for (i, id) in path.iter().enumerate() {
        let station = system
            .station(id)
            .with_context(|| format!("Route passes unknown station {id}"))?;
        if i > 0 {
            weight += station.get_weight(&path[i - 1], express)?;
        }
        stops.push(RouteStop {
            id: id.clone(),
            name: station.name.clone(),
            geometry: station.position,
            weight,
        });
    }
    Ok(stops)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => NetworkConfig::read(path)?,
        None => NetworkConfig::default(),
    };

    let now = Instant::now();
    let lines = io::read_lines(&args.lines_path)?;
    let placements = io::read_placements(&args.stations_path)?;
    let system = build_system(lines, placements, &config, args.time)?;
    log::info!("Built network in {:?}", now.elapsed());

    let origin = StationId::new(&args.origin);
    let destination = StationId::new(&args.destination);
    let unit = WeightUnit::from_use_time(args.time);

    let now = Instant::now();
    let result = system.shortest_path(&origin, &destination, args.express)?;
    log::info!("Searched in {:?}", now.elapsed());

    let Some(path) = result.path else {
        println!("No route from {origin} to {destination}");
        return Ok(());
    };

    let stops = route_stops(&system, &path, args.express)?;

    if args.geojson {
        let collection =
            geojson::ser::to_feature_collection_string(&stops).context("Failed to serialize")?;
        println!("{collection}");
        return Ok(());
    }

    for stop in stops.iter() {
        println!("{:>8.2} {unit}  {} ({})", stop.weight, stop.name, stop.id);
    }
    println!("Total: {:.2} {unit}", result.weight);

    Ok(())
}
