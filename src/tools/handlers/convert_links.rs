use crate::{render, service::HackerDigest, tools::ToolHandler};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::parse_arguments;

#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertLinksArgs {
    pub links: Vec<String>,
}

#[derive(Clone)]
pub struct ConvertLinksTool {
    service: HackerDigest,
}

impl ConvertLinksTool {
    pub fn new(service: HackerDigest) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ToolHandler for ConvertLinksTool {
    #[instrument(skip_all)]
    async fn call(&self, arguments: Value) -> anyhow::Result<Value> {
        let args: ConvertLinksArgs = parse_arguments(self.name(), arguments)?;
        let digest = self.service.digest(&args.links).await;
        Ok(Value::String(render::digest(&digest)))
    }

    fn name(&self) -> &'static str {
        "fetch_and_convert_links"
    }

    fn description(&self) -> &'static str {
        "Fetches a list of links and converts their content to markdown."
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

    fn tool(mock: MockFetch) -> ConvertLinksTool {
        let extractor = LinkExtractor::new(ListingLayout::hacker_news()).unwrap();
        ConvertLinksTool::new(HackerDigest::new(
            Arc::new(mock),
            Normalizer::default(),
            extractor,
            &DigestSettings::default(),
        ))
    }

    #[tokio::test]
    async fn test_every_link_gets_a_section() {
        let mut mock = MockFetch::new();
        mock.expect_fetch().times(2).returning(|url| {
            Err(FetchError::Connect {
                url: url.to_string(),
                reason: "dns error".to_string(),
            })
        });

        let result = tool(mock)
            .call(json!({"links": ["https://a.example", "https://b.example"]}))
            .await
            .unwrap();
        let text = result.as_str().unwrap();

        assert_eq!(text.matches("## Link ").count(), 2);
        assert!(text.contains("## Link 1: https://a.example\n\nError: "));
        assert!(text.contains("## Link 2: https://b.example\n\nError: "));
    }

    #[tokio::test]
    async fn test_empty_list_is_empty_digest() {
        let mut mock = MockFetch::new();
        mock.expect_fetch().never();

        let result = tool(mock).call(json!({"links": []})).await.unwrap();
        assert_eq!(result, json!(""));
    }

    #[tokio::test]
    async fn test_links_must_be_a_list() {
        let mut mock = MockFetch::new();
        mock.expect_fetch().never();

        assert!(tool(mock).call(json!({"links": "https://a.example"})).await.is_err());
    }
}
