//! Site-specific constants for the three sources, gathered into one value
//! that is handed to every adapter.

use std::collections::BTreeMap;
use std::path::Path;

use outing_model::correlate::MIN_GAP_HOURS;
use outing_model::Day;
use serde::{Deserialize, Serialize};

use crate::error::AcquireError;

/// Selectors, identifiers and credentials for the start page, calendar,
/// cinema and restaurant. `Default` describes the known target site; a JSON
/// file may override any subset of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Keys the start page's links are classified under, in priority order.
    pub start_keys: Vec<String>,
    pub link_selector: String,

    /// People whose calendars are consulted, matched against link URLs.
    pub people: Vec<String>,
    pub calendar_cell_selector: String,
    /// Day represented by each calendar cell, by position.
    pub calendar_columns: Vec<Day>,
    /// Lower-case text marking a cell as free.
    pub free_marker: String,

    pub movie_option_selector: String,
    /// Cinema movie identifiers, in the order shows are reported.
    pub movies: Vec<String>,
    pub day_codes: BTreeMap<Day, String>,
    pub available_status: i64,

    pub dinner_username: String,
    pub dinner_password: String,
    pub table_selector: String,
    pub table_day_prefixes: BTreeMap<Day, String>,

    pub min_gap_hours: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            start_keys: strings(&["calendar", "cinema", "dinner"]),
            link_selector: "a[href]".to_string(),
            people: strings(&["paul", "peter", "mary"]),
            calendar_cell_selector: "td".to_string(),
            calendar_columns: Day::ALL.to_vec(),
            free_marker: "ok".to_string(),
            movie_option_selector: "#movie option".to_string(),
            movies: strings(&["01", "02", "03"]),
            day_codes: day_table(["05", "06", "07"]),
            available_status: 1,
            dinner_username: "zeke".to_string(),
            dinner_password: "coys".to_string(),
            table_selector: "input[type=radio]".to_string(),
            table_day_prefixes: day_table(["fri", "sat", "sun"]),
            min_gap_hours: MIN_GAP_HOURS,
        }
    }
}

impl SourceConfig {
    /// Load a JSON override file. Fields it omits keep their defaults.
    pub fn load(path: &Path) -> Result<Self, AcquireError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AcquireError::Config(format!("{}: {e}", path.display())))?;
        let config: SourceConfig = serde_json::from_str(&text)
            .map_err(|e| AcquireError::Config(format!("{}: {e}", path.display())))?;
        config.check()?;
        Ok(config)
    }

    /// Reject configurations the adapters cannot work with.
    pub fn check(&self) -> Result<(), AcquireError> {
        if self.people.is_empty() {
            return Err(AcquireError::Config("no people configured".into()));
        }
        if self.movies.is_empty() {
            return Err(AcquireError::Config("no movies configured".into()));
        }
        for key in ["calendar", "cinema", "dinner"] {
            if !self.start_keys.iter().any(|k| k == key) {
                return Err(AcquireError::Config(format!("start_keys is missing '{key}'")));
            }
        }
        for day in &self.calendar_columns {
            if !self.day_codes.contains_key(day) {
                return Err(AcquireError::Config(format!("no cinema day code for {day}")));
            }
            if !self.table_day_prefixes.contains_key(day) {
                return Err(AcquireError::Config(format!("no table prefix for {day}")));
            }
        }
        Ok(())
    }

    pub fn day_code(&self, day: Day) -> Result<&str, AcquireError> {
        self.day_codes
            .get(&day)
            .map(String::as_str)
            .ok_or_else(|| AcquireError::Config(format!("no cinema day code for {day}")))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn day_table(values: [&str; 3]) -> BTreeMap<Day, String> {
    Day::ALL
        .into_iter()
        .zip(values)
        .map(|(day, v)| (day, v.to_string()))
        .collect()
}
