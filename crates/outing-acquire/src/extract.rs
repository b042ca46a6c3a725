//! Structural extraction from fetched HTML.
//!
//! Everything here is synchronous and works on a parsed [`Html`] that never
//! crosses an `.await`; adapters parse, extract owned strings, then drop the
//! document.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::AcquireError;
use crate::fetch::Page;

pub fn parse_selector(selector: &str) -> Result<Selector, AcquireError> {
    Selector::parse(selector).map_err(|_| AcquireError::Selector(selector.to_string()))
}

/// Lazily yield every element of `document` matching `selector`.
pub fn select<'a>(
    document: &'a Html,
    selector: &'a Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    document.select(selector)
}

/// Raw `href` attributes of the matched elements.
pub fn hrefs<'a>(document: &'a Html, selector: &'a Selector) -> impl Iterator<Item = &'a str> + 'a {
    select(document, selector).filter_map(|el| el.value().attr("href"))
}

/// Text content of the matched elements.
pub fn texts<'a>(document: &'a Html, selector: &'a Selector) -> impl Iterator<Item = String> + 'a {
    select(document, selector).map(|el| el.text().collect::<String>())
}

/// `value` attributes of the matched elements (form state).
pub fn values<'a>(document: &'a Html, selector: &'a Selector) -> impl Iterator<Item = &'a str> + 'a {
    select(document, selector).filter_map(|el| el.value().attr("value"))
}

/// `(value, label)` pairs of matched `<option>` elements. Options without a
/// `value` attribute (placeholders) are skipped.
pub fn options<'a>(
    document: &'a Html,
    selector: &'a Selector,
) -> impl Iterator<Item = (&'a str, String)> + 'a {
    select(document, selector).filter_map(|el| {
        let value = el.value().attr("value")?;
        Some((value, el.text().collect::<String>().trim().to_string()))
    })
}

/// Resolve a scraped `href` against the page it came from.
///
/// Absolute `http(s)://` links are taken as-is and `./`-relative links are
/// joined onto `base`. Any other shape, or a result that is not a valid
/// URL, is a [`AcquireError::MalformedLink`].
pub fn resolve_link(base: &Url, href: &str) -> Result<Url, AcquireError> {
    let malformed = || AcquireError::MalformedLink {
        href: href.to_string(),
        page: base.to_string(),
    };
    let href = href.trim();

    let resolved = if href.starts_with("http://") || href.starts_with("https://") {
        Url::parse(href)
    } else if href.starts_with("./") {
        base.join(href)
    } else {
        return Err(malformed());
    };

    match resolved {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        _ => Err(malformed()),
    }
}

/// Every link on `page` matched by `selector`, resolved to absolute URLs.
/// Fails on the first malformed link.
pub fn scrape_links(page: &Page, selector: &str) -> Result<Vec<Url>, AcquireError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(&page.body);
    hrefs(&document, &selector)
        .map(|href| resolve_link(&page.url, href))
        .collect()
}

/// Text of every element on `page` matched by `selector`.
pub fn scrape_texts(page: &Page, selector: &str) -> Result<Vec<String>, AcquireError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(&page.body);
    Ok(texts(&document, &selector).collect())
}

/// `value` attribute of every element on `page` matched by `selector`.
pub fn scrape_values(page: &Page, selector: &str) -> Result<Vec<String>, AcquireError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(&page.body);
    Ok(values(&document, &selector).map(str::to_string).collect())
}

/// `(value, label)` of every `<option>` on `page` matched by `selector`.
pub fn scrape_options(page: &Page, selector: &str) -> Result<Vec<(String, String)>, AcquireError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(&page.body);
    Ok(options(&document, &selector)
        .map(|(value, label)| (value.to_string(), label))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, body: &str) -> Page {
        Page {
            url: Url::parse(url).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_scrape_links_resolves_relative() {
        let page = page(
            "http://site.test/calendar/",
            r#"<html><body>
                <a href="./paul.html">Paul</a>
                <a href="https://other.test/peter.html">Peter</a>
            </body></html>"#,
        );

        let links = scrape_links(&page, "a[href]").unwrap();

        assert_eq!(
            links.iter().map(Url::as_str).collect::<Vec<_>>(),
            vec!["http://site.test/calendar/paul.html", "https://other.test/peter.html"]
        );
    }

    #[test]
    fn test_scrape_links_rejects_malformed() {
        let page = page(
            "http://site.test/",
            r#"<a href="http://site.test/calendar/">ok</a><a href="/cinema/">root-relative</a>"#,
        );

        let err = scrape_links(&page, "a[href]").unwrap_err();
        assert!(matches!(err, AcquireError::MalformedLink { ref href, .. } if href == "/cinema/"));
    }

    #[test]
    fn test_resolve_link() {
        let base = Url::parse("http://site.test/dinner/").unwrap();
        assert!(resolve_link(&base, "mailto:someone@site.test").is_err());
        assert!(resolve_link(&base, "../up.html").is_err());
        assert!(resolve_link(&base, "http://").is_err());
        assert_eq!(
            resolve_link(&base, "./login").unwrap().as_str(),
            "http://site.test/dinner/login"
        );
    }

    #[test]
    fn test_scrape_texts_and_values() {
        let page = page(
            "http://site.test/",
            r#"<table><tr><td>ok</td><td> -- </td><td>OK</td></tr></table>
               <form>
                 <input type="radio" name="group1" value="fri1416">
                 <input type="radio" name="group1" value="sat1618">
                 <input type="text" value="ignored">
               </form>"#,
        );

        assert_eq!(scrape_texts(&page, "td").unwrap(), vec!["ok", " -- ", "OK"]);
        assert_eq!(
            scrape_values(&page, "input[type=radio]").unwrap(),
            vec!["fri1416", "sat1618"]
        );
    }

    #[test]
    fn test_scrape_options_skips_placeholder() {
        let page = page(
            "http://site.test/cinema/",
            r#"<select id="movie">
                 <option disabled selected>--- Pick a movie ---</option>
                 <option value="01">The Flying Deuces</option>
                 <option value="02"> Keep Your Seats, Please </option>
               </select>"#,
        );

        assert_eq!(
            scrape_options(&page, "#movie option").unwrap(),
            vec![
                ("01".to_string(), "The Flying Deuces".to_string()),
                ("02".to_string(), "Keep Your Seats, Please".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_selector() {
        let page = page("http://site.test/", "<p></p>");
        assert!(matches!(scrape_texts(&page, "td[["), Err(AcquireError::Selector(_))));
    }
}
