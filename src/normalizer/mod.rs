pub mod model;

pub use model::{ConversionError, NormalizedDocument, normalize_whitespace};

use ammonia::Builder;
use tracing::{debug, instrument};

/// Column width html2text wraps rendered text at.
pub const DEFAULT_RENDER_WIDTH: usize = 120;

/// Turns fetched markup into plain text. Pure: no network or filesystem access.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    width: usize,
}

impl Normalizer {
    pub fn new(width: usize) -> Self {
        Self { width: width.max(1) }
    }

    #[instrument(skip_all, fields(url = %source_url, bytes = body.len()))]
    pub fn normalize(
        &self,
        source_url: &str,
        body: &[u8],
    ) -> Result<NormalizedDocument, ConversionError> {
        let markup = String::from_utf8_lossy(body);

        // Drops script, style and other non-content elements along with their text
        let clean_html = Builder::default().clean(&markup).to_string();

        let rendered =
            html2text::from_read(clean_html.as_bytes(), self.width).map_err(|e| {
                ConversionError {
                    url: source_url.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let text = normalize_whitespace(&rendered);
        debug!(chars = text.chars().count(), "normalized");

        Ok(NormalizedDocument {
            source_url: source_url.to_string(),
            text,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_WIDTH)
    }
}
