pub mod convert_links;
pub mod hackernews_links;
pub mod summarize_link;

pub use convert_links::ConvertLinksTool;
pub use hackernews_links::HackerNewsLinksTool;
pub use summarize_link::SummarizeLinkTool;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Tools without arguments are commonly called with `null` instead of `{}`.
pub(crate) fn parse_arguments<T: DeserializeOwned>(
    tool: &str,
    arguments: Value,
) -> anyhow::Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| anyhow::anyhow!("invalid arguments for {}: {}", tool, e))
}
