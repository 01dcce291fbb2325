use crate::{
    service::HackerDigest,
    tools::{ConvertLinksTool, HackerNewsLinksTool, SummarizeLinkTool, ToolHandler},
};
use anyhow::{Result, anyhow};
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};
use tracing::{Instrument, info_span};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Registry of tool handlers by name
#[derive(Default, Clone)]
pub struct ToolRegistry {
    handlers: BTreeMap<&'static str, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// All three pipeline tools backed by `service`.
    pub fn with_pipeline(service: HackerDigest) -> Self {
        let mut registry = Self::new();
        registry.register(SummarizeLinkTool::new(service.clone()));
        registry.register(HackerNewsLinksTool::new(service.clone()));
        registry.register(ConvertLinksTool::new(service));
        registry
    }

    /// Register a handler; a later handler with the same name replaces the earlier one.
    pub fn register<H: ToolHandler>(&mut self, handler: H) {
        self.handlers.insert(handler.name(), Arc::new(handler));
    }

    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| anyhow!("No tool registered with name: {}", name))?;

        handler
            .call(arguments)
            .instrument(info_span!("tool", name = %name))
            .await
    }

    /// Registered tools, sorted by name
    pub fn tools(&self) -> Vec<ToolInfo> {
        self.handlers
            .values()
            .map(|h| ToolInfo {
                name: h.name(),
                description: h.description(),
            })
            .collect()
    }
}
