//! Human-readable rendering of pipeline results. Failures become text here and
//! nowhere else.

use crate::{
    digest::{Digest, DigestSection},
    errors::PipelineError,
};

pub const LISTING_ERROR_PREFIX: &str = "Error fetching Hacker News";
pub const SECTION_RULE: &str = "---";

pub fn summary(link: &str, result: &Result<String, PipelineError>) -> String {
    match result {
        Ok(preview) => format!("Summary of {link}:\n{preview}"),
        Err(e) => format!("Error fetching {link}: {e}"),
    }
}

pub fn links(result: Result<Vec<String>, PipelineError>) -> Vec<String> {
    match result {
        Ok(links) => links,
        Err(e) => vec![format!("{LISTING_ERROR_PREFIX}: {e}")],
    }
}

pub fn section(section: &DigestSection) -> String {
    let body = match &section.outcome {
        Ok(text) => text.clone(),
        Err(e) => format!("Error: {e}"),
    };
    format!(
        "## Link {}: {}\n\n{}\n\n{}\n",
        section.index, section.source_url, body, SECTION_RULE
    )
}

pub fn digest(digest: &Digest) -> String {
    digest
        .sections
        .iter()
        .map(section)
        .collect::<Vec<_>>()
        .join("\n")
}
