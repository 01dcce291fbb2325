use crate::{render, service::HackerDigest, tools::ToolHandler};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::parse_arguments;

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeLinkArgs {
    pub link: String,
}

#[derive(Clone)]
pub struct SummarizeLinkTool {
    service: HackerDigest,
}

impl SummarizeLinkTool {
    pub fn new(service: HackerDigest) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ToolHandler for SummarizeLinkTool {
    #[instrument(skip_all)]
    async fn call(&self, arguments: Value) -> anyhow::Result<Value> {
        let args: SummarizeLinkArgs = parse_arguments(self.name(), arguments)?;
        let result = self.service.summarize_link(&args.link).await;
        Ok(Value::String(render::summary(&args.link, &result)))
    }

    fn name(&self) -> &'static str {
        "summarize_link"
    }

    fn description(&self) -> &'static str {
        "Fetches a link and returns a summary of its content."
    }
}
