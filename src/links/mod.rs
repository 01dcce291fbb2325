//! Story link discovery on a news listing page.
//!
//! A listing page is a sequence of story containers, each wrapping the story's
//! title anchor. [`LinkExtractor`] walks those containers in document order and
//! returns the first `limit` hrefs it can resolve to absolute http(s) URLs.

use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

pub const HACKER_NEWS_URL: &str = "https://news.ycombinator.com/";
pub const HACKER_NEWS_CONTAINER: &str = "span.titleline";
pub const HACKER_NEWS_ITEM_PREFIX: &str = "item?";
pub const DEFAULT_LINK_LIMIT: usize = 5;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("listing markup is not valid utf-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("invalid container selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid listing url {url}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Structural conventions of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLayout {
    pub listing_url: String,
    pub container_selector: String,
    /// Href prefix of the site's own discussion pages, which are always relative.
    pub item_prefix: String,
}

impl ListingLayout {
    pub fn hacker_news() -> Self {
        Self {
            listing_url: HACKER_NEWS_URL.to_string(),
            container_selector: HACKER_NEWS_CONTAINER.to_string(),
            item_prefix: HACKER_NEWS_ITEM_PREFIX.to_string(),
        }
    }

    pub fn with_listing_url(mut self, listing_url: impl Into<String>) -> Self {
        self.listing_url = listing_url.into();
        self
    }
}

impl Default for ListingLayout {
    fn default() -> Self {
        Self::hacker_news()
    }
}

#[derive(Debug, Clone)]
pub struct LinkExtractor {
    layout: ListingLayout,
    base: Url,
    containers: Selector,
    anchor: Selector,
}

impl LinkExtractor {
    pub fn new(layout: ListingLayout) -> Result<Self, ParseError> {
        let base = Url::parse(&layout.listing_url).map_err(|source| ParseError::BaseUrl {
            url: layout.listing_url.clone(),
            source,
        })?;
        let containers =
            Selector::parse(&layout.container_selector).map_err(|e| ParseError::Selector {
                selector: layout.container_selector.clone(),
                reason: e.to_string(),
            })?;
        let anchor = Selector::parse("a").map_err(|e| ParseError::Selector {
            selector: "a".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            layout,
            base,
            containers,
            anchor,
        })
    }

    pub fn layout(&self) -> &ListingLayout {
        &self.layout
    }

    /// Containers without a usable anchor are skipped and do not count toward `limit`.
    #[instrument(skip_all, fields(base = %self.layout.listing_url, limit = limit))]
    pub fn extract_top_links(&self, markup: &[u8], limit: usize) -> Result<Vec<String>, ParseError> {
        let markup = std::str::from_utf8(markup)?;
        let document = Html::parse_document(markup);

        let mut links = Vec::with_capacity(limit);
        for (position, container) in document.select(&self.containers).enumerate() {
            if links.len() >= limit {
                break;
            }

            let href = container
                .select(&self.anchor)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::trim)
                .filter(|href| !href.is_empty());

            match href {
                Some(href) => links.push(self.resolve(href)),
                None => debug!(position, "story container without a link, skipping"),
            }
        }

        debug!(found = links.len(), "extracted story links");
        Ok(links)
    }

    /// Returns an absolute http(s) URL for any href. Relative hrefs always stay on the
    /// listing's own host.
    pub fn resolve(&self, href: &str) -> String {
        if has_http_scheme(href) {
            return href.to_string();
        }

        if href.starts_with(&self.layout.item_prefix) {
            return self.append_to_base(href);
        }

        match self.base.join(href) {
            Ok(joined)
                if matches!(joined.scheme(), "http" | "https")
                    && joined.host() == self.base.host() =>
            {
                joined.to_string()
            }
            _ => self.append_to_base(href),
        }
    }

    fn append_to_base(&self, href: &str) -> String {
        let base = self.base.as_str();
        let base = base.strip_suffix('/').unwrap_or(base);
        format!("{}/{}", base, href.trim_start_matches('/'))
    }
}

fn has_http_scheme(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new(ListingLayout::hacker_news()).unwrap()
    }

    fn listing(rows: &[&str]) -> String {
        let rows: String = rows
            .iter()
            .map(|row| format!(r#"<tr class="athing"><td class="title">{row}</td></tr>"#))
            .collect();
        format!("<html><body><table>{rows}</table></body></html>")
    }

    fn story(href: &str, title: &str) -> String {
        format!(r#"<span class="titleline"><a href="{href}">{title}</a></span>"#)
    }

    #[test]
    fn test_absolute_links_pass_through_in_order() {
        let html = listing(&[
            &story("https://a.example/one", "One"),
            &story("http://b.example/two", "Two"),
        ]);

        let links = extractor().extract_top_links(html.as_bytes(), 5).unwrap();
        assert_eq!(links, vec!["https://a.example/one", "http://b.example/two"]);
    }

    #[test]
    fn test_item_links_are_resolved_against_site() {
        let html = listing(&[&story("item?id=42", "Ask HN")]);

        let links = extractor().extract_top_links(html.as_bytes(), 5).unwrap();
        assert_eq!(links, vec!["https://news.ycombinator.com/item?id=42"]);
    }

    #[test]
    fn test_relative_paths_are_resolved() {
        let ex = extractor();
        assert_eq!(
            ex.resolve("from?site=x.com"),
            "https://news.ycombinator.com/from?site=x.com"
        );
        assert_eq!(ex.resolve("/newest"), "https://news.ycombinator.com/newest");
        assert_eq!(
            ex.resolve("//cdn.example/x"),
            "https://news.ycombinator.com/cdn.example/x"
        );
        assert_eq!(
            ex.resolve("//news.ycombinator.com/news?p=2"),
            "https://news.ycombinator.com/news?p=2"
        );
        assert_eq!(
            ex.resolve("mailto:someone@example.com"),
            "https://news.ycombinator.com/mailto:someone@example.com"
        );
    }

    #[test]
    fn test_limit_caps_results() {
        let stories: Vec<String> = (0..8)
            .map(|i| story(&format!("https://example.com/{i}"), "s"))
            .collect();
        let refs: Vec<&str> = stories.iter().map(String::as_str).collect();
        let html = listing(&refs);

        let links = extractor().extract_top_links(html.as_bytes(), 5).unwrap();
        assert_eq!(links.len(), 5);
        assert_eq!(links[4], "https://example.com/4");
    }

    #[test]
    fn test_fewer_containers_than_limit() {
        let html = listing(&[
            &story("https://example.com/1", "1"),
            &story("https://example.com/2", "2"),
            &story("https://example.com/3", "3"),
        ]);

        let links = extractor().extract_top_links(html.as_bytes(), 5).unwrap();
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_containers_without_links_do_not_count() {
        let html = listing(&[
            r#"<span class="titleline">No anchor here</span>"#,
            r#"<span class="titleline"><a>No href</a></span>"#,
            r#"<span class="titleline"><a href="  ">Blank href</a></span>"#,
            &story("https://example.com/1", "1"),
            &story("https://example.com/2", "2"),
        ]);

        let links = extractor().extract_top_links(html.as_bytes(), 2).unwrap();
        assert_eq!(links, vec!["https://example.com/1", "https://example.com/2"]);
    }

    #[test]
    fn test_page_without_containers_is_empty_not_error() {
        let links = extractor()
            .extract_top_links(b"<html><body><p>We changed the layout</p></body></html>", 5)
            .unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_zero_limit() {
        let html = listing(&[&story("https://example.com/1", "1")]);
        assert!(extractor().extract_top_links(html.as_bytes(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_non_utf8_markup_is_parse_error() {
        let result = extractor().extract_top_links(b"<span class=\"titleline\">\xff\xfe</span>", 5);
        assert!(matches!(result, Err(ParseError::Encoding(_))));
    }

    #[test]
    fn test_invalid_layout_is_rejected() {
        let bad_selector = ListingLayout {
            container_selector: "span[".to_string(),
            ..ListingLayout::hacker_news()
        };
        assert!(matches!(
            LinkExtractor::new(bad_selector),
            Err(ParseError::Selector { .. })
        ));

        let bad_url = ListingLayout::hacker_news().with_listing_url("not a url");
        assert!(matches!(
            LinkExtractor::new(bad_url),
            Err(ParseError::BaseUrl { .. })
        ));
    }

    #[test]
    fn test_every_link_is_absolute() {
        let html = listing(&[
            &story("item?id=1", "a"),
            &story("newest", "b"),
            &story("HTTPS://Example.com/x", "c"),
            &story("ftp://files.example/y", "d"),
        ]);

        let links = extractor().extract_top_links(html.as_bytes(), 10).unwrap();
        assert_eq!(links.len(), 4);
        assert_eq!(links[2], "https://example.com/x");
        for link in links {
            assert!(
                link.starts_with("http://") || link.starts_with("https://"),
                "{link}"
            );
        }
    }
}
