//! Fan-out of fetch + normalize over a caller supplied list of links.
//!
//! Every link gets its own task, bounded by a semaphore. The task handles sit in
//! a slot vector indexed by input position, so sections come back in input
//! order no matter which fetch finishes first, and a failing or panicking link
//! only ever affects its own slot.

use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinHandle};
use tracing::{Instrument, info, info_span, instrument, warn};

use crate::{
    errors::PipelineError,
    fetcher::Fetch,
    normalizer::{NormalizedDocument, Normalizer},
};

pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug)]
pub struct DigestSection {
    /// 1-based position of the link in the input.
    pub index: usize,
    pub source_url: String,
    pub outcome: Result<String, PipelineError>,
}

#[derive(Debug, Default)]
pub struct Digest {
    pub sections: Vec<DigestSection>,
}

impl Digest {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.sections.iter().filter(|s| s.outcome.is_err()).count()
    }
}

/// Fetch `url` and normalize its body.
pub async fn fetch_document(
    fetcher: &dyn Fetch,
    normalizer: &Normalizer,
    url: &str,
) -> Result<NormalizedDocument, PipelineError> {
    let page = fetcher.fetch(url).await?;
    let document = normalizer.normalize(url, page.body_utf8.as_bytes())?;
    Ok(document)
}

#[derive(Clone)]
pub struct DigestAggregator {
    fetcher: Arc<dyn Fetch>,
    normalizer: Normalizer,
    concurrency: usize,
}

impl DigestAggregator {
    pub fn new(fetcher: Arc<dyn Fetch>, normalizer: Normalizer, concurrency: usize) -> Self {
        Self {
            fetcher,
            normalizer,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// One section per input link, in input order. Returns once every link was attempted.
    #[instrument(skip_all, fields(links = links.len(), concurrency = self.concurrency))]
    pub async fn build(&self, links: &[String]) -> Digest {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let slots: Vec<JoinHandle<Result<String, PipelineError>>> = links
            .iter()
            .enumerate()
            .map(|(position, link)| {
                let fetcher = self.fetcher.clone();
                let normalizer = self.normalizer;
                let semaphore = semaphore.clone();
                let link = link.clone();

                tokio::spawn(
                    async move {
                        let _permit = semaphore.acquire_owned().await.map_err(|e| {
                            PipelineError::Aborted {
                                url: link.clone(),
                                reason: e.to_string(),
                            }
                        })?;

                        let document =
                            fetch_document(fetcher.as_ref(), &normalizer, &link).await?;
                        Ok::<_, PipelineError>(document.text)
                    }
                    .instrument(info_span!("digest_link", index = position + 1)),
                )
            })
            .collect();

        let mut sections = Vec::with_capacity(links.len());
        for (position, (link, slot)) in links.iter().zip(slots).enumerate() {
            let outcome = match slot.await {
                Ok(outcome) => outcome,
                Err(join_error) => Err(PipelineError::Aborted {
                    url: link.clone(),
                    reason: join_error.to_string(),
                }),
            };

            if let Err(e) = &outcome {
                warn!(index = position + 1, url = %link, error = %e, "link failed");
            }

            sections.push(DigestSection {
                index: position + 1,
                source_url: link.clone(),
                outcome,
            });
        }

        let digest = Digest { sections };
        info!(
            sections = digest.len(),
            failures = digest.failures(),
            "digest built"
        );
        digest
    }
}
