// Link classification: maps a page's outgoing links onto a fixed, ordered set
// of semantic keys by substring match.

use url::Url;

use crate::error::ModelError;

/// Absolute URLs keyed by the semantic key they were classified under.
///
/// Keys keep the order they were declared in, which is also the order in
/// which a link is tested against them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSet {
    /// Page the links were scraped from, for error reporting.
    page: String,
    entries: Vec<(String, Option<Url>)>,
}

impl LinkSet {
    /// Classify `links` against `keys`.
    ///
    /// A link goes to the first key (in `keys` order) its URL contains; links
    /// matching no key are dropped. When several links match the same key the
    /// first one encountered is kept.
    pub fn classify<I, K>(page: &Url, links: I, keys: K) -> Self
    where
        I: IntoIterator<Item = Url>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        let mut entries: Vec<(String, Option<Url>)> = keys
            .into_iter()
            .map(|k| (k.as_ref().to_string(), None))
            .collect();

        for link in links {
            let Some((_, slot)) = entries
                .iter_mut()
                .find(|(key, _)| link.as_str().contains(key.as_str()))
            else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(link);
            }
        }

        Self {
            page: page.to_string(),
            entries,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Url> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, url)| url.as_ref())
    }

    /// Like [`LinkSet::get`], but a key that was never matched is an error.
    pub fn require(&self, key: &str) -> Result<&Url, ModelError> {
        self.get(key).ok_or_else(|| ModelError::MissingLink {
            key: key.to_string(),
            page: self.page.clone(),
        })
    }

    /// Matched keys with their URLs, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Url)> {
        self.entries
            .iter()
            .filter_map(|(k, url)| url.as_ref().map(|u| (k.as_str(), u)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
