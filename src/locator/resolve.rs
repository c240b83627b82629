use crate::model::{ExtractedPage, FragmentRange};

use super::normalize::normalized_char_count;

// Walks the page's fragments with the same cumulative accounting the scan
// used: each fragment spans its normalized length plus one trailing
// separator unit. A span that runs past the end of the extracted text
// resolves to the last fragment on the page.
pub fn resolve_fragment_range(
    page: &ExtractedPage,
    normalized_start: usize,
    span_len: usize,
) -> Option<FragmentRange> {
    let span_end = normalized_start.saturating_add(span_len);
    let mut cursor = 0usize;
    let mut start_index: Option<usize> = None;

    for (index, fragment) in page.fragments.iter().enumerate() {
        let text_end = cursor + normalized_char_count(&fragment.text);
        let slot_end = text_end + 1;

        if start_index.is_none() && normalized_start < slot_end {
            start_index = Some(index);
        }

        if let Some(start) = start_index {
            if text_end >= span_end {
                return Some(FragmentRange { start, end: index });
            }
        }

        cursor = slot_end;
    }

    start_index.map(|start| FragmentRange {
        start,
        end: page.fragments.len().saturating_sub(1),
    })
}
