use std::collections::{BTreeMap, BTreeSet};

use crate::day::Day;

/// Days on which every person is free.
///
/// `per_person` holds one entry per tracked person with the days that person
/// marked free. Each person's days are deduplicated, then tallied; a day
/// qualifies only when its tally equals the number of people. An empty input
/// yields an empty set.
pub fn free_for_all<P, D>(per_person: P) -> BTreeSet<Day>
where
    P: IntoIterator<Item = D>,
    D: IntoIterator<Item = Day>,
{
    let mut people = 0usize;
    let mut tally: BTreeMap<Day, usize> = BTreeMap::new();

    for days in per_person {
        people += 1;
        let unique: BTreeSet<Day> = days.into_iter().collect();
        for day in unique {
            *tally.entry(day).or_default() += 1;
        }
    }

    tally
        .into_iter()
        .filter(|&(_, count)| people > 0 && count == people)
        .map(|(day, _)| day)
        .collect()
}
