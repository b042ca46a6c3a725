use std::collections::HashMap;

use futures::future::try_join_all;
use outing_model::correlate::correlate;
use outing_model::{Day, StartUrl, Suggestion};

use crate::calendar::Calendar;
use crate::cinema::Cinema;
use crate::config::SourceConfig;
use crate::dinner::Dinner;
use crate::error::AcquireError;
use crate::fetch::Fetcher;
use crate::start_page;

/// Run the whole scrape and return bookable outing suggestions.
///
/// Sources are discovered from the start page, the free days come from the
/// calendar, and the cinema and restaurant are then queried concurrently for
/// those days only. The first failure aborts the run.
pub async fn plan(
    fetcher: &Fetcher,
    start: &StartUrl,
    config: &SourceConfig,
) -> Result<Vec<Suggestion>, AcquireError> {
    config.check()?;
    let links = start_page::discover(fetcher, start, config).await?;

    let calendar = Calendar::new(fetcher, config, links.require("calendar")?);
    let free_days: Vec<Day> = calendar.free_days().await?.into_iter().collect();
    if free_days.is_empty() {
        tracing::info!("Nobody shares a free day");
        return Ok(Vec::new());
    }

    let cinema = Cinema::new(fetcher, config, links.require("cinema")?);
    let dinner = Dinner::new(fetcher, config, links.require("dinner")?);

    let dinner = &dinner;
    let tables = try_join_all(free_days.iter().map(move |&day| async move {
        Ok::<_, AcquireError>((day, dinner.tables_on(day).await?))
    }));
    let (shows_by_day, tables) = tokio::try_join!(cinema.shows_on(&free_days), tables)?;
    let tables_by_day: HashMap<Day, _> = tables.into_iter().collect();

    let suggestions = correlate(&free_days, &shows_by_day, &tables_by_day, config.min_gap_hours);
    tracing::info!(suggestions = suggestions.len(), "Correlated availability");
    Ok(suggestions)
}
