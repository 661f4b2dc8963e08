use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use anyhow::Context;
use serde::Deserialize;

use crate::network::{line::LineId, station::StationId};

/// Network-specific knowledge the loader needs but the source data does not carry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Line codes accepted from the line records. Empty accepts every line.
    pub lines: Vec<LineId>,
    /// Connections on this line become express-only edges.
    pub express_line: Option<LineId>,
    /// Replacement sequence positions for stations whose source position is wrong.
    pub position_overrides: HashMap<StationId, i32>,
    /// Stations never connected back to the preceding position group.
    pub no_connect: HashSet<StationId>,
    /// Substring replacements applied to station display names.
    pub name_fixes: HashMap<String, String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let lines = [
            "AEL", "DRL", "EAL", "ISL", "KTL", "TML", "TCL", "TKL", "TWL", "WRL", "SIL",
        ]
        .into_iter()
        .map(LineId::new)
        .collect();

        Self {
            lines,
            express_line: Some(LineId::new("AEL")),
            position_overrides: HashMap::from([(StationId::new("LHP"), 2)]),
            no_connect: HashSet::from([StationId::new("LHP")]),
            name_fixes: HashMap::from([("Whampo".to_owned(), "Whampoa".to_owned())]),
        }
    }
}

impl NetworkConfig {
    pub fn read<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn accepts_line(&self, line: &LineId) -> bool {
        self.lines.is_empty() || self.lines.contains(line)
    }

    pub fn is_express(&self, line: &LineId) -> bool {
        self.express_line.as_ref() == Some(line)
    }

    pub fn fix_name(&self, name: &str) -> String {
        self.name_fixes
            .iter()
            .fold(name.to_owned(), |name, (wrong, right)| {
                if name.contains(right.as_str()) {
                    name
                } else {
                    name.replace(wrong.as_str(), right)
                }
            })
    }
}
