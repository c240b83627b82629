use crate::model::{HighlightRect, PageViewport, TextFragment};

// Fragment anchors are baseline-relative in page space with the y axis
// pointing up; viewport pixels have the y axis pointing down. Rectangles are
// drawn upward from the converted baseline.
pub fn build_rectangles(
    fragments: &[TextFragment],
    viewport: &PageViewport,
    fallback_height: f64,
) -> Vec<HighlightRect> {
    fragments
        .iter()
        .filter(|fragment| !fragment.text.trim().is_empty())
        .map(|fragment| {
            let x = fragment.transform[4] * viewport.scale;
            let baseline_y = viewport.height - fragment.transform[5] * viewport.scale;
            let width = fragment.width * viewport.scale;
            let height = fragment.height.unwrap_or(fallback_height) * viewport.scale;

            HighlightRect {
                x,
                y: baseline_y - height,
                width,
                height,
            }
        })
        .collect()
}
