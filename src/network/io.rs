use std::{fs::File, io::Read, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::network::{
    line::LineId,
    loader::{LineRecord, PlacementRecord},
    station::StationId,
};

// Line code, operating speed in km/h, English name. Header names vary between
// exports so columns are read by position.
type LineRow = (String, f64, String);

// Header of the MTR "lines and stations" export, extended with coordinates.
#[derive(Deserialize)]
struct StationRow {
    #[serde(rename = "Line Code")]
    line_code: String,
    #[serde(rename = "Station Code")]
    station_code: String,
    #[serde(rename = "English Name")]
    english_name: String,
    #[serde(rename = "Sequence")]
    sequence: f64,
    #[serde(rename = "Lat")]
    lat: f64,
    #[serde(rename = "Long")]
    long: f64,
}

pub fn read_lines<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<LineRecord>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    parse_lines(f)
}

pub fn read_placements<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<PlacementRecord>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    parse_placements(f)
}

fn parse_lines<R: Read>(rdr: R) -> anyhow::Result<Vec<LineRecord>> {
    let mut rdr = csv::Reader::from_reader(rdr);

    let mut lines = vec![];
    for row in rdr.deserialize::<LineRow>() {
        let (line_code, operating_speed, english_name) = row.context("Malformed line record")?;
        lines.push(LineRecord {
            id: LineId::new(line_code.trim()),
            name: english_name.trim().to_owned(),
            operating_speed,
        });
    }

    Ok(lines)
}

fn parse_placements<R: Read>(rdr: R) -> anyhow::Result<Vec<PlacementRecord>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);

    let mut placements = vec![];
    for row in rdr.deserialize::<StationRow>() {
        let row = row.context("Malformed station record")?;
        placements.push(PlacementRecord {
            line: LineId::new(row.line_code.trim()),
            station: StationId::new(row.station_code.trim()),
            name: row.english_name.trim().to_owned(),
            // Sequences are exported as "2.00"
            position: row.sequence as i32,
            latitude: row.lat,
            longitude: row.long,
        });
    }

    Ok(placements)
}
