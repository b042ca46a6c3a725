//! Cinema source: titles from the booking page, show times from the JSON
//! `check` endpoint.

use std::collections::HashMap;

use futures::future::try_join_all;
use outing_model::{as_directory, Day, Show};
use serde::Deserialize;
use url::Url;

use crate::config::SourceConfig;
use crate::error::AcquireError;
use crate::extract;
use crate::fetch::Fetcher;

/// One record of the `check` endpoint. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct ShowRecord {
    status: i64,
    time: String,
}

pub struct Cinema<'a> {
    fetcher: &'a Fetcher,
    config: &'a SourceConfig,
    url: Url,
}

impl<'a> Cinema<'a> {
    pub fn new(fetcher: &'a Fetcher, config: &'a SourceConfig, url: &Url) -> Self {
        Self {
            fetcher,
            config,
            url: as_directory(url),
        }
    }

    /// `(movie id, title)` for every configured movie, in configured order.
    pub async fn titles(&self) -> Result<Vec<(String, String)>, AcquireError> {
        let page = self.fetcher.get(&self.url).await?;
        let options = extract::scrape_options(&page, &self.config.movie_option_selector)?;

        self.config
            .movies
            .iter()
            .map(|id| {
                options
                    .iter()
                    .find(|(value, _)| value == id)
                    .map(|(_, title)| (id.clone(), title.clone()))
                    .ok_or_else(|| AcquireError::MissingElement {
                        selector: format!("{} [value=\"{id}\"]", self.config.movie_option_selector),
                        page: page.url.to_string(),
                    })
            })
            .collect()
    }

    /// Available shows for each of `days`, grouped movie by movie.
    ///
    /// The title lookup and every (day, movie) query run concurrently.
    pub async fn shows_on(&self, days: &[Day]) -> Result<HashMap<Day, Vec<Show>>, AcquireError> {
        let queries = days.iter().flat_map(move |&day| {
            self.config.movies.iter().map(move |movie| async move {
                let times = self.available_times(day, movie).await?;
                Ok::<_, AcquireError>((day, movie.as_str(), times))
            })
        });

        let (titles, results) = tokio::try_join!(self.titles(), try_join_all(queries))?;
        let titles: HashMap<String, String> = titles.into_iter().collect();

        let mut shows: HashMap<Day, Vec<Show>> = days.iter().map(|&d| (d, Vec::new())).collect();
        for (day, movie, times) in results {
            let title = titles.get(movie).map(String::as_str).unwrap_or(movie);
            let day_shows = shows.entry(day).or_default();
            for time in times {
                day_shows.push(Show::parse(title, day, &time)?);
            }
        }

        tracing::info!(
            shows = shows.values().map(Vec::len).sum::<usize>(),
            days = days.len(),
            "Collected available shows"
        );
        Ok(shows)
    }

    async fn available_times(&self, day: Day, movie: &str) -> Result<Vec<String>, AcquireError> {
        let mut url = self
            .url
            .join("check")
            .map_err(|e| AcquireError::Config(format!("cinema endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair("day", self.config.day_code(day)?)
            .append_pair("movie", movie);

        let page = self.fetcher.get(&url).await?;
        let records: Vec<ShowRecord> =
            serde_json::from_str(&page.body).map_err(|source| AcquireError::Data {
                url: url.to_string(),
                source,
            })?;

        let times: Vec<String> = records
            .into_iter()
            .filter(|r| r.status == self.config.available_status)
            .map(|r| r.time)
            .collect();
        tracing::debug!(day = %day, movie = %movie, times = ?times, "Available show times");
        Ok(times)
    }
}
