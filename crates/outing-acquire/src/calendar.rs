//! Calendar source: which days are all friends free?

use std::collections::BTreeSet;

use futures::future::try_join_all;
use outing_model::{as_directory, free_for_all, Day, LinkSet};
use url::Url;

use crate::config::SourceConfig;
use crate::error::AcquireError;
use crate::extract;
use crate::fetch::Fetcher;

pub struct Calendar<'a> {
    fetcher: &'a Fetcher,
    config: &'a SourceConfig,
    url: Url,
}

impl<'a> Calendar<'a> {
    pub fn new(fetcher: &'a Fetcher, config: &'a SourceConfig, url: &Url) -> Self {
        Self {
            fetcher,
            config,
            url: as_directory(url),
        }
    }

    /// Days on which every configured person is free.
    ///
    /// Person pages are fetched concurrently; the result is tallied once all
    /// have arrived.
    pub async fn free_days(&self) -> Result<BTreeSet<Day>, AcquireError> {
        let people = self.person_links().await?;

        let per_person = try_join_all(
            self.config
                .people
                .iter()
                .map(|person| self.person_free_days(person, &people)),
        )
        .await?;

        let free = free_for_all(per_person);
        tracing::info!(days = ?free, "Days everyone is free");
        Ok(free)
    }

    async fn person_links(&self) -> Result<LinkSet, AcquireError> {
        let page = self.fetcher.get(&self.url).await?;
        let links = extract::scrape_links(&page, &self.config.link_selector)?;
        Ok(LinkSet::classify(&page.url, links, &self.config.people))
    }

    async fn person_free_days(
        &self,
        person: &str,
        links: &LinkSet,
    ) -> Result<Vec<Day>, AcquireError> {
        let url = links.require(person)?;
        let page = self.fetcher.get(url).await?;
        let cells = extract::scrape_texts(&page, &self.config.calendar_cell_selector)?;
        let days = free_in_cells(&cells, &self.config.calendar_columns, &self.config.free_marker);
        tracing::debug!(person = %person, days = ?days, "Person is free");
        Ok(days)
    }
}

/// Map table cells onto days by position; a day is free when its cell,
/// lower-cased, contains `marker`. Cells past the last column are ignored.
pub fn free_in_cells(cells: &[String], columns: &[Day], marker: &str) -> Vec<Day> {
    let marker = marker.to_lowercase();
    cells
        .iter()
        .zip(columns)
        .filter(|(cell, _)| cell.to_lowercase().contains(&marker))
        .map(|(_, day)| *day)
        .collect()
}
