use crate::network::{line::LineId, station::StationId};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NetworkError {
    #[error("{from} has no neighbour {to} (express allowed: {express})")]
    NeighbourNotFound {
        from: StationId,
        to: StationId,
        express: bool,
    },
    #[error("Weight {weight} from {from} to {to} is not a non-negative finite number")]
    InvalidWeight {
        from: StationId,
        to: StationId,
        weight: f64,
    },
    #[error("Unknown station: {0}")]
    UnknownStation(StationId),
    #[error("Unknown line: {0}")]
    UnknownLine(LineId),
    #[error("Station {station} is not placed on line {line}")]
    StationNotOnLine { line: LineId, station: StationId },
    #[error("Line {line} has a non-positive operating speed: {speed}")]
    InvalidSpeed { line: LineId, speed: f64 },
}
