use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::locator::{
    FALLBACK_PAGE_NUMBER, LocatorConfig, MissReason, highlight_on_page, normalize,
};
use crate::model::{FragmentRange, HighlightRect};
use crate::provider::DocumentProvider;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightResponse {
    pub doc_name: String,
    pub page_number: u32,
    pub located: bool,
    pub miss_reason: Option<String>,
    pub score: Option<f64>,
    pub fragment_range: Option<FragmentRange>,
    pub rectangles: Vec<HighlightRect>,
}

impl HighlightResponse {
    fn fallback(doc_name: &str, reason: MissReason) -> Self {
        Self {
            doc_name: doc_name.to_string(),
            page_number: FALLBACK_PAGE_NUMBER,
            located: false,
            miss_reason: Some(reason.as_str().to_string()),
            score: None,
            fragment_range: None,
            rectangles: Vec::new(),
        }
    }
}

// Drives the scan through the provider page by page; pages past the first
// accepted one are never fetched. Locate misses degrade to the page-1
// fallback, provider failures propagate.
pub async fn locate_with_provider(
    provider: &dyn DocumentProvider,
    chunk: &str,
    config: &LocatorConfig,
) -> Result<HighlightResponse> {
    let page_count = provider.page_count().await?;
    if page_count == 0 {
        return Ok(HighlightResponse::fallback(
            provider.doc_name(),
            MissReason::EmptyDocument,
        ));
    }

    let chunk_normalized = normalize(chunk);
    if chunk_normalized.is_empty() {
        return Ok(HighlightResponse::fallback(
            provider.doc_name(),
            MissReason::EmptyChunk,
        ));
    }

    let span_len = chunk_normalized.chars().count();
    let needle = chunk_normalized
        .chars()
        .take(config.probe_length)
        .collect::<String>();

    for page_number in 1..=page_count as u32 {
        let page = provider.fetch_page(page_number).await?;
        let Some(found) = highlight_on_page(&page, &needle, span_len, config) else {
            continue;
        };

        debug!(
            page = found.page_number,
            score = found.score,
            rectangles = found.rectangles.len(),
            "chunk located"
        );
        return Ok(HighlightResponse {
            doc_name: provider.doc_name().to_string(),
            page_number: found.page_number,
            located: true,
            miss_reason: None,
            score: Some(found.score),
            fragment_range: Some(found.fragment_range),
            rectangles: found.rectangles,
        });
    }

    Ok(HighlightResponse::fallback(
        provider.doc_name(),
        MissReason::BelowThreshold,
    ))
}

pub struct HighlightSession {
    provider: Arc<dyn DocumentProvider>,
    config: LocatorConfig,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl HighlightSession {
    pub fn new(provider: Arc<dyn DocumentProvider>, config: LocatorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            provider,
            config,
            in_flight: Mutex::new(None),
        })
    }

    // Newest request wins: any in-flight locate is aborted before this one
    // starts, so a stale result can never be applied over a newer one. A
    // superseded request reports back as Ok(None).
    pub async fn request(&self, chunk: &str) -> Result<Option<HighlightResponse>> {
        let provider = Arc::clone(&self.provider);
        let config = self.config.clone();
        let chunk = chunk.to_string();

        // The slot is locked across the spawn so the new task's abort handle
        // is registered before the task can observe anything, and the
        // previous registration is aborted under the same guard.
        let handle = {
            let mut in_flight = match self.in_flight.lock() {
                Ok(guard) => guard,
                // a poisoning panic happened inside another request; the slot
                // itself is still usable
                Err(poisoned) => poisoned.into_inner(),
            };

            let handle = tokio::spawn(async move {
                locate_with_provider(provider.as_ref(), &chunk, &config).await
            });
            if let Some(previous) = in_flight.replace(handle.abort_handle()) {
                previous.abort();
            }
            handle
        };

        match handle.await {
            Ok(result) => result.map(Some),
            Err(join_error) if join_error.is_cancelled() => Ok(None),
            Err(join_error) => Err(join_error).context("highlight task failed"),
        }
    }
}
