// Availability correlation: cross the free days with the shows and free
// tables scraped for those days.
//
// The gap check works on whole hours only. A show at 18:45 and a table at
// 20:00 count as two hours apart.

use std::collections::HashMap;

use crate::day::Day;
use crate::outing::{Show, Suggestion, TableSlot};

/// Default minimum number of hours between a show starting and the table.
pub const MIN_GAP_HOURS: u32 = 2;

/// Produce every (day, show, table) combination with a large enough gap.
///
/// Iterates free days, then that day's shows (already grouped movie by
/// movie), then that day's tables, emitting a suggestion whenever
/// `table.start_hour - show.hour() >= min_gap_hours`. Output order follows
/// input order; nothing is sorted or deduplicated. Days absent from either
/// map contribute nothing.
pub fn correlate(
    free_days: &[Day],
    shows_by_day: &HashMap<Day, Vec<Show>>,
    tables_by_day: &HashMap<Day, Vec<TableSlot>>,
    min_gap_hours: u32,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for day in free_days {
        let (Some(shows), Some(tables)) = (shows_by_day.get(day), tables_by_day.get(day)) else {
            continue;
        };

        for show in shows {
            for table in tables {
                let gap = i64::from(table.start_hour) - i64::from(show.hour());
                if gap >= i64::from(min_gap_hours) {
                    suggestions.push(Suggestion {
                        day: *day,
                        title: show.title.clone(),
                        show_time: show.time,
                        table: *table,
                    });
                }
            }
        }
    }

    suggestions
}
