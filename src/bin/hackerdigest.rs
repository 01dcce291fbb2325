//! Line-oriented JSON transport over stdin/stdout.
//!
//! Each input line is `{"id": .., "tool": "<name>", "arguments": {..}}`; each
//! output line is `{"id": .., "result": ..}` or `{"id": .., "error": ".."}`.
//! The pseudo-tool `list_tools` returns the registered tools. Logs go to stderr.

use anyhow::Result;
use hackerdigest::{
    HackerDigest,
    config::{Config, LogFormat},
    tools::ToolRegistry,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    signal,
    sync::mpsc,
};
use tracing::{Instrument, debug, info, info_span, warn};
use tracing_subscriber::EnvFilter;

const LIST_TOOLS: &str = "list_tools";

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    tool: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Serialize)]
struct Response {
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Response {
    fn from_result(id: Value, result: Result<Value>) -> Self {
        match result {
            Ok(value) => Self {
                id,
                result: Some(value),
                error: None,
            },
            Err(e) => Self {
                id,
                result: None,
                error: Some(format!("{:#}", e)),
            },
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn handle(registry: &ToolRegistry, request: Request) -> Response {
    let result = if request.tool == LIST_TOOLS {
        serde_json::to_value(registry.tools()).map_err(anyhow::Error::from)
    } else {
        registry.call(&request.tool, request.arguments).await
    };

    if let Err(e) = &result {
        warn!(tool = %request.tool, error = %e, "tool call rejected");
    }

    Response::from_result(request.id, result)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format());

    let service = HackerDigest::from_settings(&config.digest_settings())?;
    let registry = Arc::new(ToolRegistry::with_pipeline(service));

    info!(
        listing = config.listing_url(),
        timeout_secs = config.timeout().as_secs(),
        concurrency = config.concurrency(),
        tools = registry.tools().len(),
        "hackerdigest ready"
    );

    // Single writer so concurrent responses never interleave within a line
    let (response_sender, mut response_receiver) = mpsc::channel::<Response>(64);
    let writer_handle = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(response) = response_receiver.recv().await {
            let mut line = serde_json::to_string(&response)?;
            line.push('\n');
            stdout.write_all(line.as_bytes()).await?;
            stdout.flush().await?;
        }
        Ok::<_, anyhow::Error>(())
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received shutdown signal, finishing in-flight calls...");
                break;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "malformed request line");
                let response = Response::from_result(
                    Value::Null,
                    Err(anyhow::anyhow!("malformed request: {}", e)),
                );
                if response_sender.send(response).await.is_err() {
                    break;
                }
                continue;
            }
        };

        let registry = registry.clone();
        let response_sender = response_sender.clone();
        let span = info_span!("request", id = %request.id, tool = %request.tool);
        tokio::spawn(
            async move {
                let response = handle(&registry, request).await;
                if response_sender.send(response).await.is_err() {
                    warn!("Response writer dropped");
                }
            }
            .instrument(span),
        );
    }

    // The writer exits once every in-flight call has sent its response
    drop(response_sender);
    writer_handle.await??;

    Ok(())
}
