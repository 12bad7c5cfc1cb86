use serde::{Deserialize, Serialize};
use std::fmt;

/// Right-inclusive month bin edges: (0,2], (2,5], (5,8], (8,11], (11,12].
pub const SEASON_BIN_EDGES: [u32; 6] = [0, 2, 5, 8, 11, 12];

/// Season assigned to each bin of [`SEASON_BIN_EDGES`]. December and
/// January-February share Summer, so the label appears twice.
pub const SEASON_BIN_LABELS: [Season; 5] = [
    Season::Summer,
    Season::Autumn,
    Season::Winter,
    Season::Spring,
    Season::Summer,
];

/// Southern-Hemisphere meteorological season.
///
/// Ordering follows the calendar year starting in January.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Summer, Season::Autumn, Season::Winter, Season::Spring];

    /// Map a month number onto its season.
    ///
    /// Returns `None` for anything outside 1-12.
    pub fn from_month(month: u32) -> Option<Season> {
        SEASON_BIN_EDGES
            .windows(2)
            .zip(SEASON_BIN_LABELS.iter())
            .find(|(edges, _)| edges[0] < month && month <= edges[1])
            .map(|(_, season)| *season)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
