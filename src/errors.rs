use thiserror::Error;

use crate::{fetcher::FetchError, links::ParseError, normalizer::ConversionError};

/// Why one pipeline operation could not produce its result.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("task for {url} aborted: {reason}")]
    Aborted { url: String, reason: String },
}
