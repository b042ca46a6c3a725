//! HTTP page fetching with a single, session-preserving redirect hop.
//!
//! The transport never follows redirects on its own. A 301/302 answer is
//! followed exactly once, carrying any `Set-Cookie` session values along as a
//! `Cookie` header, which is the shape of the restaurant's login handoff.

use reqwest::header::{HeaderMap, COOKIE, LOCATION, SET_COOKIE};
use reqwest::{Method, Response, StatusCode};
use url::Url;

use crate::error::AcquireError;

const USER_AGENT: &str = concat!("outing/", env!("CARGO_PKG_VERSION"), " (outing planner)");

/// A fetched document: the URL it was finally served from and its body.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

/// Method, body and headers for a single fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Method,
    /// Url-encoded form fields sent as the request body.
    pub form: Option<Vec<(String, String)>>,
    pub headers: Vec<(String, String)>,
}

impl FetchOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post_form<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: Method::POST,
            form: Some(
                fields
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

enum Outcome {
    Success,
    Redirect,
    Failure,
}

fn classify(status: StatusCode) -> Outcome {
    if status.is_success() {
        Outcome::Success
    } else if status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND {
        Outcome::Redirect
    } else {
        Outcome::Failure
    }
}

/// Page fetcher shared by every source adapter. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, AcquireError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(AcquireError::Client)?;
        Ok(Self { client })
    }

    /// Fetch `url`, following at most one 301/302 redirect.
    ///
    /// Whatever the follow-up request returns is final: a second redirect is
    /// handed back as the page rather than followed, while a 4xx/5xx still
    /// fails with [`AcquireError::Http`].
    pub async fn fetch(&self, url: &Url, options: &FetchOptions) -> Result<Page, AcquireError> {
        tracing::debug!(method = %options.method, url = %url, "Fetching page");
        let response = self.send(url, options).await?;

        match classify(response.status()) {
            Outcome::Success => read_page(response).await,
            Outcome::Failure => Err(http_error(&response)),
            Outcome::Redirect => {
                let location = redirect_location(&response)?;
                let mut follow_up = FetchOptions::get();
                let cookie = session_cookie(response.headers());
                tracing::debug!(
                    from = %response.url(),
                    to = %location,
                    session = cookie.is_some(),
                    "Following redirect"
                );
                if let Some(cookie) = cookie {
                    follow_up = follow_up.header(COOKIE.as_str(), cookie);
                }

                let response = self.send(&location, &follow_up).await?;
                match classify(response.status()) {
                    Outcome::Failure => Err(http_error(&response)),
                    Outcome::Success => read_page(response).await,
                    Outcome::Redirect => {
                        tracing::debug!(url = %response.url(), "Not following second redirect");
                        read_page(response).await
                    }
                }
            }
        }
    }

    /// Convenience for a plain GET.
    pub async fn get(&self, url: &Url) -> Result<Page, AcquireError> {
        self.fetch(url, &FetchOptions::get()).await
    }

    async fn send(&self, url: &Url, options: &FetchOptions) -> Result<Response, AcquireError> {
        let mut request = self.client.request(options.method.clone(), url.clone());
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(form) = &options.form {
            request = request.form(form);
        }
        request
            .send()
            .await
            .map_err(|e| AcquireError::transport(url, e))
    }
}

async fn read_page(response: Response) -> Result<Page, AcquireError> {
    let url = response.url().clone();
    let body = response
        .text()
        .await
        .map_err(|e| AcquireError::transport(&url, e))?;
    Ok(Page { url, body })
}

fn http_error(response: &Response) -> AcquireError {
    let status = response.status();
    AcquireError::Http {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        url: response.url().to_string(),
    }
}

fn redirect_location(response: &Response) -> Result<Url, AcquireError> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|location| response.url().join(location).ok())
        .ok_or_else(|| AcquireError::MissingLocation(response.url().to_string()))
}

/// Collapse every `Set-Cookie` header into one `Cookie` header value,
/// keeping only the `name=value` part of each.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
