use std::{sync::Arc, time::Duration};

use tracing::{info, instrument};

use crate::{
    digest::{DEFAULT_CONCURRENCY, Digest, DigestAggregator, fetch_document},
    errors::PipelineError,
    fetcher::{DEFAULT_TIMEOUT, Fetch, HttpFetcher},
    links::{DEFAULT_LINK_LIMIT, LinkExtractor, ListingLayout},
    normalizer::Normalizer,
    summary::{DEFAULT_SUMMARY_CHARS, summarize},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSettings {
    pub timeout: Duration,
    pub summary_chars: usize,
    pub top_links: usize,
    pub concurrency: usize,
    pub layout: ListingLayout,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            summary_chars: DEFAULT_SUMMARY_CHARS,
            top_links: DEFAULT_LINK_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
            layout: ListingLayout::hacker_news(),
        }
    }
}

/// The three pipeline operations over injected fetch, normalize and extract stages.
#[derive(Clone)]
pub struct HackerDigest {
    fetcher: Arc<dyn Fetch>,
    normalizer: Normalizer,
    extractor: LinkExtractor,
    aggregator: DigestAggregator,
    summary_chars: usize,
    top_links: usize,
}

impl HackerDigest {
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        normalizer: Normalizer,
        extractor: LinkExtractor,
        settings: &DigestSettings,
    ) -> Self {
        let aggregator = DigestAggregator::new(fetcher.clone(), normalizer, settings.concurrency);
        Self {
            fetcher,
            normalizer,
            extractor,
            aggregator,
            summary_chars: settings.summary_chars,
            top_links: settings.top_links,
        }
    }

    /// Wires up the reqwest fetcher and the configured listing layout.
    pub fn from_settings(settings: &DigestSettings) -> Result<Self, PipelineError> {
        let fetcher = HttpFetcher::new(settings.timeout)?;
        let extractor = LinkExtractor::new(settings.layout.clone())?;
        Ok(Self::new(
            Arc::new(fetcher),
            Normalizer::default(),
            extractor,
            settings,
        ))
    }

    pub fn listing_url(&self) -> &str {
        &self.extractor.layout().listing_url
    }

    /// Preview of the page behind `link`.
    #[instrument(skip(self))]
    pub async fn summarize_link(&self, link: &str) -> Result<String, PipelineError> {
        let document = fetch_document(self.fetcher.as_ref(), &self.normalizer, link).await?;
        let preview = summarize(&document.text, self.summary_chars);
        info!(chars = document.text.chars().count(), "summarized");
        Ok(preview)
    }

    /// The first stories on the listing page, as absolute URLs.
    #[instrument(skip(self), fields(listing = %self.listing_url()))]
    pub async fn top_links(&self) -> Result<Vec<String>, PipelineError> {
        let page = self.fetcher.fetch(self.listing_url()).await?;
        let links = self
            .extractor
            .extract_top_links(page.body_utf8.as_bytes(), self.top_links)?;
        info!(found = links.len(), "listing parsed");
        Ok(links)
    }

    pub async fn digest(&self, links: &[String]) -> Digest {
        self.aggregator.build(links).await
    }
}
