use async_trait::async_trait;
use serde_json::Value;

/// A named operation callable by the transport with JSON arguments.
#[async_trait]
pub trait ToolHandler: Send + Sync + 'static {
    /// Run the tool. Errors mean the call itself was malformed.
    async fn call(&self, arguments: Value) -> anyhow::Result<Value>;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;
}
