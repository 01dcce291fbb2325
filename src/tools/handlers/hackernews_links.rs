use crate::{render, service::HackerDigest, tools::ToolHandler};
use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

#[derive(Clone)]
pub struct HackerNewsLinksTool {
    service: HackerDigest,
}

impl HackerNewsLinksTool {
    pub fn new(service: HackerDigest) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ToolHandler for HackerNewsLinksTool {
    /// Takes no arguments; whatever is passed is ignored.
    #[instrument(skip_all)]
    async fn call(&self, _arguments: Value) -> anyhow::Result<Value> {
        let links = render::links(self.service.top_links().await);
        Ok(serde_json::to_value(links)?)
    }

    fn name(&self) -> &'static str {
        "get_hackernews_links"
    }

    fn description(&self) -> &'static str {
        "Gets the top 5 links from Hacker News home page."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fetcher::{FetchError, MockFetch},
        links::{LinkExtractor, ListingLayout},
        normalizer::Normalizer,
        service::DigestSettings,
    };
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unreachable_listing_is_single_error_entry() {
        let mut mock = MockFetch::new();
        mock.expect_fetch().returning(|url| {
            Err(FetchError::Http {
                url: url.to_string(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            })
        });
        let extractor = LinkExtractor::new(ListingLayout::hacker_news()).unwrap();
        let tool = HackerNewsLinksTool::new(HackerDigest::new(
            Arc::new(mock),
            Normalizer::default(),
            extractor,
            &DigestSettings::default(),
        ));

        let result = tool.call(Value::Null).await.unwrap();
        let entries = result.as_array().unwrap();

        assert_eq!(entries.len(), 1);
        let entry = entries[0].as_str().unwrap();
        assert!(entry.starts_with("Error fetching Hacker News: "));
        assert!(entry.contains("503"));
        assert_ne!(result, json!([]));
    }
}
