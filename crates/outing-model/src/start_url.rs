use std::fmt;

use url::Url;

use crate::error::ModelError;

/// The absolute `http`/`https` URL the planner starts scraping from.
///
/// Construction is the only validation point: holding a `StartUrl` means the
/// URL parsed and uses a web scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartUrl(Url);

impl StartUrl {
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        let url = Url::parse(input.trim()).map_err(|source| ModelError::InvalidUrl {
            url: input.to_string(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(ModelError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for StartUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Return `url` with a trailing `/` on its path so that relative joins land
/// beneath it rather than replacing its last segment.
pub fn as_directory(url: &Url) -> Url {
    let mut dir = url.clone();
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(StartUrl::parse("https://courselab.lnu.se/scraper-site-1").is_ok());
        assert!(StartUrl::parse("http://localhost:8080/").is_ok());
    }

    #[test]
    fn test_rejects_malformed_and_non_web_urls() {
        assert!(matches!(
            StartUrl::parse("not a url"),
            Err(ModelError::InvalidUrl { .. })
        ));
        assert!(matches!(
            StartUrl::parse("ftp://example.com/"),
            Err(ModelError::UnsupportedScheme(s)) if s == "ftp"
        ));
    }

    #[test]
    fn test_as_directory() {
        let url = Url::parse("http://example.com/cinema").unwrap();
        assert_eq!(as_directory(&url).as_str(), "http://example.com/cinema/");
        let url = Url::parse("http://example.com/cinema/").unwrap();
        assert_eq!(as_directory(&url).as_str(), "http://example.com/cinema/");
        assert_eq!(
            as_directory(&url).join("check").unwrap().as_str(),
            "http://example.com/cinema/check"
        );
    }
}
