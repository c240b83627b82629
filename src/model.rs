use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub doc_name: String,
    pub pages: Vec<ExtractedPage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub page_number: u32,
    pub viewport: PageViewport,
    pub fragments: Vec<TextFragment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageViewport {
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub transform: [f64; 6],
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReference {
    pub document_name: String,
    pub chunk_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TuningValues {
    pub probe_length: usize,
    pub acceptance_threshold: f64,
    pub scan_stride: usize,
    pub fallback_fragment_height: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocateReport {
    pub manifest_version: u32,
    pub generated_at: String,
    pub doc_name: String,
    pub source_sha256: String,
    pub chunk_chars: usize,
    pub tuning: TuningValues,
    pub outcome: String,
    pub miss_reason: Option<String>,
    pub page_number: u32,
    pub score: Option<f64>,
    pub fragment_range: Option<FragmentRange>,
    pub rectangles: Vec<HighlightRect>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub document_name: String,
    pub chunk_preview: String,
    pub outcome: String,
    pub miss_reason: Option<String>,
    pub page_number: u32,
    pub score: Option<f64>,
    pub rectangle_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub manifest_version: u32,
    pub generated_at: String,
    pub citation_count: usize,
    pub located_count: usize,
    pub fallback_count: usize,
    pub tuning: TuningValues,
    pub results: Vec<BatchEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageStats {
    pub page_number: u32,
    pub fragment_count: usize,
    pub blank_fragment_count: usize,
    pub normalized_chars: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub manifest_version: u32,
    pub generated_at: String,
    pub doc_name: String,
    pub source_sha256: String,
    pub page_count: usize,
    pub fragment_count: usize,
    pub empty_page_count: usize,
    pub normalized_char_count: usize,
    pub pages: Vec<PageStats>,
}
