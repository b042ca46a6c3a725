use outing_model::{LinkSet, StartUrl};

use crate::config::SourceConfig;
use crate::error::AcquireError;
use crate::extract;
use crate::fetch::Fetcher;

/// Fetch the start page and classify its links into the calendar, cinema
/// and dinner sources. All three must be present.
pub async fn discover(
    fetcher: &Fetcher,
    start: &StartUrl,
    config: &SourceConfig,
) -> Result<LinkSet, AcquireError> {
    tracing::info!(url = %start, "Discovering sources from start page");
    let page = fetcher.get(start.url()).await?;
    let links = extract::scrape_links(&page, &config.link_selector)?;
    let set = LinkSet::classify(&page.url, links, &config.start_keys);

    for key in &config.start_keys {
        let url = set.require(key)?;
        tracing::debug!(key = %key, url = %url, "Classified source link");
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use outing_model::ModelError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve_start(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_discover_all_sources() {
        let body = r#"<ol>
            <li><a href="./calendar/">Calendar</a></li>
            <li><a href="./cinema/">Cinema</a></li>
            <li><a href="./dinner/">Dinner</a></li>
        </ol>"#;
        let server = serve_start(body).await;
        let start = StartUrl::parse(&format!("{}/", server.uri())).unwrap();

        let set = discover(&Fetcher::new().unwrap(), &start, &SourceConfig::default())
            .await
            .unwrap();

        assert_eq!(set.get("cinema").unwrap().as_str(), format!("{}/cinema/", server.uri()));
        assert_eq!(set.len(), 3);
    }

    #[tokio::test]
    async fn test_discover_missing_source() {
        let body = r#"<a href="./calendar/">Calendar</a><a href="./cinema/">Cinema</a>"#;
        let server = serve_start(body).await;
        let start = StartUrl::parse(&format!("{}/", server.uri())).unwrap();

        let err = discover(&Fetcher::new().unwrap(), &start, &SourceConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AcquireError::Model(ModelError::MissingLink { ref key, .. }) if key == "dinner"
        ));
    }
}
