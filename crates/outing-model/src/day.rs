use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A day of the outing weekend.
///
/// Parsed case-insensitively, always displayed in its canonical form
/// (`Friday`, `Saturday`, `Sunday`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 3] = [Day::Friday, Day::Saturday, Day::Sunday];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Day::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownDay(s.to_string()))
    }
}
