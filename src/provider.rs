use std::path::Path;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use crate::model::{ExtractedDocument, ExtractedPage};
use crate::util::sha256_hex;

#[async_trait]
pub trait DocumentProvider: Send + Sync {
    fn doc_name(&self) -> &str;

    async fn page_count(&self) -> Result<usize>;

    async fn fetch_page(&self, page_number: u32) -> Result<ExtractedPage>;
}

// Serves one extraction file produced by the text-extraction service. The
// document is held immutably for the lifetime of the provider.
#[derive(Debug)]
pub struct FileDocumentProvider {
    document: ExtractedDocument,
    source_sha256: String,
}

impl FileDocumentProvider {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read extraction file: {}", path.display()))?;

        let document: ExtractedDocument = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse extraction file: {}", path.display()))?;

        Ok(Self {
            source_sha256: sha256_hex(&raw),
            document,
        })
    }

    pub fn document(&self) -> &ExtractedDocument {
        &self.document
    }

    pub fn source_sha256(&self) -> &str {
        &self.source_sha256
    }
}

#[async_trait]
impl DocumentProvider for FileDocumentProvider {
    fn doc_name(&self) -> &str {
        &self.document.doc_name
    }

    async fn page_count(&self) -> Result<usize> {
        Ok(self.document.pages.len())
    }

    async fn fetch_page(&self, page_number: u32) -> Result<ExtractedPage> {
        let Some(index) = (page_number as usize).checked_sub(1) else {
            bail!("page numbers are 1-indexed, got 0");
        };

        self.document.pages.get(index).cloned().with_context(|| {
            format!(
                "page {page_number} is out of range for {}",
                self.document.doc_name
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{DocumentProvider, FileDocumentProvider};

    fn extraction_json() -> &'static str {
        r#"
        {
          "doc_name": "pracovni-rad.pdf",
          "pages": [
            {
              "page_number": 1,
              "viewport": { "scale": 1.5, "width": 892.5, "height": 1263.0 },
              "fragments": [
                { "text": "Pracovní řád", "transform": [12.0, 0.0, 0.0, 12.0, 56.7, 780.2], "width": 64.0 }
              ]
            },
            {
              "page_number": 2,
              "viewport": { "scale": 1.5, "width": 892.5, "height": 1263.0 },
              "fragments": []
            }
          ]
        }
        "#
    }

    fn scratch_file(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("citepin-{label}-{}.json", std::process::id()))
    }

    #[tokio::test]
    async fn load_serves_pages_and_records_the_source_hash() {
        let path = scratch_file("provider-load");
        std::fs::write(&path, extraction_json()).expect("scratch file should be writable");

        let provider = FileDocumentProvider::load(&path)
            .await
            .expect("extraction file should load");
        std::fs::remove_file(&path).ok();

        assert_eq!(provider.doc_name(), "pracovni-rad.pdf");
        assert_eq!(provider.source_sha256().len(), 64);
        assert_eq!(provider.page_count().await.expect("page count"), 2);

        let page = provider.fetch_page(1).await.expect("page 1 should exist");
        assert_eq!(page.page_number, 1);
        assert_eq!(page.fragments.len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_pages_are_provider_errors() {
        let path = scratch_file("provider-range");
        std::fs::write(&path, extraction_json()).expect("scratch file should be writable");

        let provider = FileDocumentProvider::load(&path)
            .await
            .expect("extraction file should load");
        std::fs::remove_file(&path).ok();

        assert!(provider.fetch_page(0).await.is_err());
        assert!(provider.fetch_page(3).await.is_err());
    }

    #[tokio::test]
    async fn missing_extraction_file_is_reported_with_its_path() {
        let path = scratch_file("provider-missing");
        let error = FileDocumentProvider::load(&path)
            .await
            .expect_err("missing file should not load");
        assert!(error.to_string().contains("failed to read extraction file"));
    }
}
