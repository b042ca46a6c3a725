//! Restaurant source: log in once, then read free tables off the booking
//! page's radio buttons.

use outing_model::{as_directory, Day, TableSlot};
use tokio::sync::OnceCell;
use url::Url;

use crate::config::SourceConfig;
use crate::error::AcquireError;
use crate::extract;
use crate::fetch::{FetchOptions, Fetcher};

pub struct Dinner<'a> {
    fetcher: &'a Fetcher,
    config: &'a SourceConfig,
    url: Url,
    /// Every decoded slot from the booking page, filled by the first caller.
    slots: OnceCell<Vec<TableSlot>>,
}

impl<'a> Dinner<'a> {
    pub fn new(fetcher: &'a Fetcher, config: &'a SourceConfig, url: &Url) -> Self {
        Self {
            fetcher,
            config,
            url: as_directory(url),
            slots: OnceCell::new(),
        }
    }

    /// Free tables on `day`, in booking-page order.
    ///
    /// The authenticated fetch happens at most once per adapter, even when
    /// several days are requested concurrently.
    pub async fn tables_on(&self, day: Day) -> Result<Vec<TableSlot>, AcquireError> {
        let slots = self.slots.get_or_try_init(|| self.fetch_slots()).await?;
        Ok(slots.iter().filter(|s| s.day == day).copied().collect())
    }

    async fn fetch_slots(&self) -> Result<Vec<TableSlot>, AcquireError> {
        let login = self
            .url
            .join("login")
            .map_err(|e| AcquireError::Config(format!("dinner login endpoint: {e}")))?;
        tracing::info!(url = %login, "Logging in to restaurant");

        let options = FetchOptions::post_form([
            ("username", self.config.dinner_username.as_str()),
            ("password", self.config.dinner_password.as_str()),
        ]);
        let page = self.fetcher.fetch(&login, &options).await?;

        let slots = extract::scrape_values(&page, &self.config.table_selector)?
            .iter()
            .map(|value| TableSlot::decode(value, &self.config.table_day_prefixes))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(slots = slots.len(), "Decoded free tables");
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BOOKING_PAGE: &str = r#"<form>
        <h2>Friday</h2>
        <input type="radio" name="group1" value="fri1416"> 14-16
        <input type="radio" name="group1" value="fri2022"> 20-22
        <h2>Saturday</h2>
        <input type="radio" name="group1" value="sat1820"> 18-20
        <h2>Sunday</h2>
        <input type="radio" name="group1" value="sun1214"> 12-14
    </form>"#;

    async fn dinner_server(booking: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dinner/login"))
            .and(body_string_contains("username=zeke"))
            .and(body_string_contains("password=coys"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", "./login/booking")
                    .insert_header("Set-Cookie", "PHPSESSID=s3cr3t; path=/"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dinner/login/booking"))
            .and(header("cookie", "PHPSESSID=s3cr3t"))
            .respond_with(ResponseTemplate::new(200).set_body_string(booking.to_string()))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_tables_per_day_with_single_login() {
        let server = dinner_server(BOOKING_PAGE).await;
        let fetcher = Fetcher::new().unwrap();
        let config = SourceConfig::default();
        let url = Url::parse(&format!("{}/dinner", server.uri())).unwrap();
        let dinner = Dinner::new(&fetcher, &config, &url);

        let friday = dinner.tables_on(Day::Friday).await.unwrap();
        let saturday = dinner.tables_on(Day::Saturday).await.unwrap();

        assert_eq!(
            friday.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["14:00-16:00", "20:00-22:00"]
        );
        assert_eq!(
            saturday,
            vec![TableSlot {
                day: Day::Saturday,
                start_hour: 18,
                end_hour: 20
            }]
        );
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_login() {
        let server = dinner_server(BOOKING_PAGE).await;
        let fetcher = Fetcher::new().unwrap();
        let config = SourceConfig::default();
        let url = Url::parse(&format!("{}/dinner/", server.uri())).unwrap();
        let dinner = Dinner::new(&fetcher, &config, &url);

        let (fri, sat, sun) = tokio::try_join!(
            dinner.tables_on(Day::Friday),
            dinner.tables_on(Day::Saturday),
            dinner.tables_on(Day::Sunday),
        )
        .unwrap();

        assert_eq!((fri.len(), sat.len(), sun.len()), (2, 1, 1));
    }

    #[tokio::test]
    async fn test_undecodable_slot_fails() {
        let server = dinner_server(r#"<input type="radio" value="friday-evening">"#).await;
        let fetcher = Fetcher::new().unwrap();
        let config = SourceConfig::default();
        let url = Url::parse(&format!("{}/dinner/", server.uri())).unwrap();

        let err = Dinner::new(&fetcher, &config, &url)
            .tables_on(Day::Friday)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("friday-evening"));
    }
}
