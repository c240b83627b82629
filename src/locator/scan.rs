use crate::model::ExtractedPage;

use super::LocatorConfig;
use super::normalize::normalize;

// One placeholder per fragment boundary, so fragment i starts at
// sum(normalized_len(fragment_j) + 1) over all j < i. resolve_fragment_range
// walks the identical accounting.
pub(crate) const FRAGMENT_SEPARATOR: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMatch {
    pub page_number: u32,
    pub normalized_offset: usize,
    pub score: f64,
}

pub fn locate_chunk(
    pages: &[ExtractedPage],
    chunk: &str,
    config: &LocatorConfig,
) -> Option<PageMatch> {
    let chunk_normalized = normalize(chunk);
    if chunk_normalized.is_empty() {
        return None;
    }

    let needle = chunk_normalized
        .chars()
        .take(config.probe_length)
        .collect::<String>();

    pages
        .iter()
        .find_map(|page| scan_page(page, &needle, config))
}

pub(crate) fn scan_page(
    page: &ExtractedPage,
    needle: &str,
    config: &LocatorConfig,
) -> Option<PageMatch> {
    let page_text = page_normalized_text(page);
    if page_text.trim().is_empty() {
        return None;
    }

    let needle_chars = needle.chars().count();
    if needle_chars == 0 {
        return None;
    }

    // Byte offset of every char boundary, so windows can be sliced without
    // splitting multi-byte letters.
    let mut boundaries = page_text
        .char_indices()
        .map(|(offset, _)| offset)
        .collect::<Vec<usize>>();
    boundaries.push(page_text.len());
    let total_chars = boundaries.len() - 1;

    let stride = config.scan_stride.max(1);
    let mut start = 0usize;
    while start < total_chars {
        let end = (start + needle_chars).min(total_chars);
        let window = &page_text[boundaries[start]..boundaries[end]];
        let score = strsim::normalized_levenshtein(window, needle);

        if score >= config.acceptance_threshold {
            return Some(PageMatch {
                page_number: page.page_number,
                normalized_offset: start,
                score,
            });
        }

        start += stride;
    }

    None
}

pub(crate) fn page_normalized_text(page: &ExtractedPage) -> String {
    let mut text = String::new();
    for (index, fragment) in page.fragments.iter().enumerate() {
        if index > 0 {
            text.push(FRAGMENT_SEPARATOR);
        }
        text.push_str(&normalize(&fragment.text));
    }
    text
}
