use serde::Serialize;

use crate::error::RaterError;
use crate::schema::Schema;

/// The eight player metrics every dataset must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    MapsPlayed,
    KillDeathRatio,
    DamagePerRound,
    KillsPerRound,
    SavedTeammatesPerRound,
    Impact,
    Rating,
    Kast,
}

/// Required column names, post-normalization, in report order.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "MapsPlayed",
    "Kill_Death_Ratio",
    "DamagePerRound",
    "KillsPerRound",
    "SavedTeamatesPerRound",
    "Impact",
    "Rating_2_0",
    "KAST",
];

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::MapsPlayed,
        Metric::KillDeathRatio,
        Metric::DamagePerRound,
        Metric::KillsPerRound,
        Metric::SavedTeammatesPerRound,
        Metric::Impact,
        Metric::Rating,
        Metric::Kast,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column that holds this metric in a normalized dataset.
    pub fn field(self) -> &'static str {
        REQUIRED_FIELDS[self.index()]
    }

    pub fn from_field(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.field() == name)
    }

    /// Name used when reporting the average of this metric.
    pub fn average_label(self) -> &'static str {
        match self {
            Metric::MapsPlayed => "Avg_MapsPlayed",
            Metric::KillDeathRatio => "Avg_Kill_Death_Ratio",
            Metric::DamagePerRound => "Avg_DamagePerRound",
            Metric::KillsPerRound => "Avg_KillsPerRound",
            Metric::SavedTeammatesPerRound => "Avg_SavedTeammatesPerRound",
            Metric::Impact => "Avg_Impact",
            Metric::Rating => "Avg_Rating_2_0",
            Metric::Kast => "Avg_KAST",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}

/// One value per [`Metric`]. Used for a player's row, for averages and for
/// threshold floors alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricValues {
    #[serde(rename = "MapsPlayed")]
    pub maps_played: f64,
    #[serde(rename = "Kill_Death_Ratio")]
    pub kill_death_ratio: f64,
    #[serde(rename = "DamagePerRound")]
    pub damage_per_round: f64,
    #[serde(rename = "KillsPerRound")]
    pub kills_per_round: f64,
    #[serde(rename = "SavedTeamatesPerRound")]
    pub saved_teammates_per_round: f64,
    #[serde(rename = "Impact")]
    pub impact: f64,
    #[serde(rename = "Rating_2_0")]
    pub rating: f64,
    #[serde(rename = "KAST")]
    pub kast: f64,
}

impl MetricValues {
    pub fn from_fn(mut f: impl FnMut(Metric) -> f64) -> Self {
        Self {
            maps_played: f(Metric::MapsPlayed),
            kill_death_ratio: f(Metric::KillDeathRatio),
            damage_per_round: f(Metric::DamagePerRound),
            kills_per_round: f(Metric::KillsPerRound),
            saved_teammates_per_round: f(Metric::SavedTeammatesPerRound),
            impact: f(Metric::Impact),
            rating: f(Metric::Rating),
            kast: f(Metric::Kast),
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::MapsPlayed => self.maps_played,
            Metric::KillDeathRatio => self.kill_death_ratio,
            Metric::DamagePerRound => self.damage_per_round,
            Metric::KillsPerRound => self.kills_per_round,
            Metric::SavedTeammatesPerRound => self.saved_teammates_per_round,
            Metric::Impact => self.impact,
            Metric::Rating => self.rating,
            Metric::Kast => self.kast,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::MapsPlayed => &mut self.maps_played,
            Metric::KillDeathRatio => &mut self.kill_death_ratio,
            Metric::DamagePerRound => &mut self.damage_per_round,
            Metric::KillsPerRound => &mut self.kills_per_round,
            Metric::SavedTeammatesPerRound => &mut self.saved_teammates_per_round,
            Metric::Impact => &mut self.impact,
            Metric::Rating => &mut self.rating,
            Metric::Kast => &mut self.kast,
        };
        *slot = value;
    }

    pub fn to_array(&self) -> [f64; 8] {
        Metric::ALL.map(|m| self.get(m))
    }

    /// True when every metric is at or above the matching floor.
    pub fn dominates(&self, floor: &MetricValues) -> bool {
        Metric::ALL.iter().all(|&m| self.get(m) >= floor.get(m))
    }
}

/// Positions of the required metric columns inside a validated schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricColumns([usize; 8]);

impl MetricColumns {
    /// Validates `schema` and records where each metric lives.
    pub fn locate(schema: &Schema) -> Result<Self, RaterError> {
        crate::analyzers::validate::validate_required(schema, &REQUIRED_FIELDS)?;

        let mut positions = [0usize; 8];
        for metric in Metric::ALL {
            // Presence was checked above.
            positions[metric.index()] = schema.position(metric.field()).unwrap_or_default();
        }
        Ok(Self(positions))
    }

    pub fn position(&self, metric: Metric) -> usize {
        self.0[metric.index()]
    }
}

/// A typed, read-only view of one player row.
///
/// `cells` keeps every column of the source row so results can be persisted
/// in full; `metrics` holds the parsed values of the eight required columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub row: usize,
    pub cells: Vec<String>,
    pub metrics: MetricValues,
    /// Metrics whose cell was blank and was taken as zero.
    pub defaulted: Vec<Metric>,
}

impl PlayerRecord {
    /// Builds a record from a raw row.
    ///
    /// A blank metric cell is a record-level gap and counts as 0; the column
    /// itself is guaranteed present by [`MetricColumns::locate`]. A non-blank
    /// cell that does not parse as a number is rejected.
    pub fn from_row(
        row: usize,
        cells: Vec<String>,
        columns: &MetricColumns,
    ) -> Result<Self, RaterError> {
        let mut metrics = MetricValues::default();
        let mut defaulted = Vec::new();

        for metric in Metric::ALL {
            let raw = cells
                .get(columns.position(metric))
                .map(|c| c.trim())
                .unwrap_or("");
            match Cell::parse(raw, metric) {
                Cell::Value(value) => metrics.set(metric, value),
                Cell::Blank => defaulted.push(metric),
                Cell::Invalid => {
                    return Err(RaterError::MalformedValue {
                        line: csv_line(row),
                        column: metric.field().to_string(),
                        value: raw.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            row,
            cells,
            metrics,
            defaulted,
        })
    }

    pub fn rating(&self) -> f64 {
        self.metrics.rating
    }

    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(String::as_str)
    }
}

/// CSV line holding data row `row`: one for the header, one for 1-based counting.
fn csv_line(row: usize) -> usize {
    row + 2
}

enum Cell {
    Blank,
    Value(f64),
    Invalid,
}

impl Cell {
    fn parse(raw: &str, metric: Metric) -> Self {
        if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
            return Cell::Blank;
        }
        // Percent-formatted KAST exports ("72.5%").
        let raw = match metric {
            Metric::Kast => raw.strip_suffix('%').unwrap_or(raw),
            _ => raw,
        };
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Value(v),
            _ => Cell::Invalid,
        }
    }
}
