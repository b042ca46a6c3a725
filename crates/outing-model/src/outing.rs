use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::day::Day;
use crate::error::ModelError;

/// Fixed-width table encoding: 3-letter day prefix, start hour, end hour.
static TABLE_SLOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{3})(\d{2})(\d{2})$").expect("valid regex"));

/// A screening of a movie on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub title: String,
    pub day: Day,
    pub time: NaiveTime,
}

impl Show {
    /// Build a show from the `HH:MM` time string the cinema reports.
    pub fn parse(title: &str, day: Day, time: &str) -> Result<Self, ModelError> {
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map_err(|_| ModelError::InvalidTime(time.to_string()))?;
        Ok(Self {
            title: title.to_string(),
            day,
            time,
        })
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }
}

/// A reservable restaurant interval, whole hours only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSlot {
    pub day: Day,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TableSlot {
    /// Decode a restaurant form value such as `fri1416`.
    ///
    /// `prefixes` maps each day onto the 3-letter prefix the restaurant uses;
    /// matching is case-insensitive. The start hour must be below 24, the end
    /// hour at most 24 and after the start.
    pub fn decode(value: &str, prefixes: &BTreeMap<Day, String>) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidTableSlot(value.to_string());

        let caps = TABLE_SLOT_RE.captures(value.trim()).ok_or_else(invalid)?;
        let prefix = &caps[1];
        let day = prefixes
            .iter()
            .find(|(_, p)| p.eq_ignore_ascii_case(prefix))
            .map(|(day, _)| *day)
            .ok_or_else(invalid)?;
        let start_hour: u32 = caps[2].parse().map_err(|_| invalid())?;
        let end_hour: u32 = caps[3].parse().map_err(|_| invalid())?;

        if start_hour >= 24 || end_hour > 24 || end_hour <= start_hour {
            return Err(invalid());
        }

        Ok(Self {
            day,
            start_hour,
            end_hour,
        })
    }
}

impl fmt::Display for TableSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start_hour, self.end_hour)
    }
}

/// A bookable outing: a show followed by a table at least the minimum gap later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub day: Day,
    pub title: String,
    pub show_time: NaiveTime,
    pub table: TableSlot,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "* On {}, \"{}\" begins at {}, and there is a free table to book between {}.",
            self.day,
            self.title,
            self.show_time.format("%H:%M"),
            self.table
        )
    }
}
