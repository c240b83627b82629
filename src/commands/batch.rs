use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use citepin::locator::LocatorConfig;
use citepin::model::{BatchEntry, BatchReport, SourceReference, TuningValues};
use citepin::provider::FileDocumentProvider;
use citepin::session::HighlightSession;
use citepin::util::{now_utc_string, preview, write_json_pretty};

use crate::cli::BatchArgs;

pub fn run(args: BatchArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(run_async(args))
}

async fn run_async(args: BatchArgs) -> Result<()> {
    let config = LocatorConfig {
        probe_length: args.probe_length,
        acceptance_threshold: args.acceptance_threshold,
        scan_stride: args.scan_stride,
        fallback_fragment_height: args.fallback_fragment_height,
    };
    config.validate()?;

    let raw = tokio::fs::read(&args.citations)
        .await
        .with_context(|| format!("failed to read citation file: {}", args.citations.display()))?;
    let citations: Vec<SourceReference> = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse citation file: {}", args.citations.display()))?;

    if citations.is_empty() {
        bail!("no citations found in {}", args.citations.display());
    }

    // One provider and session per document; citations referencing the same
    // document reuse the loaded extraction.
    let mut sessions = HashMap::<String, HighlightSession>::new();
    let mut results = Vec::with_capacity(citations.len());

    for citation in &citations {
        let session = match sessions.entry(citation.document_name.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = args
                    .extraction_root
                    .join(format!("{}.json", citation.document_name));
                let provider = FileDocumentProvider::load(&path).await?;
                entry.insert(HighlightSession::new(Arc::new(provider), config.clone())?)
            }
        };

        let response = session
            .request(&citation.chunk_text)
            .await?
            .context("batch request was superseded")?;

        if !response.located {
            warn!(
                doc = %citation.document_name,
                reason = response.miss_reason.as_deref().unwrap_or_default(),
                "citation fell back to page 1"
            );
        }

        results.push(BatchEntry {
            document_name: citation.document_name.clone(),
            chunk_preview: preview(&citation.chunk_text, 60),
            outcome: if response.located { "found" } else { "fallback" }.to_string(),
            miss_reason: response.miss_reason.clone(),
            page_number: response.page_number,
            score: response.score,
            rectangle_count: response.rectangles.len(),
        });
    }

    let located_count = results
        .iter()
        .filter(|entry| entry.outcome == "found")
        .count();
    let report = BatchReport {
        manifest_version: 1,
        generated_at: now_utc_string(),
        citation_count: results.len(),
        located_count,
        fallback_count: results.len() - located_count,
        tuning: TuningValues {
            probe_length: args.probe_length,
            acceptance_threshold: args.acceptance_threshold,
            scan_stride: args.scan_stride,
            fallback_fragment_height: args.fallback_fragment_height,
        },
        results,
    };

    if let Some(report_path) = &args.report_path {
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote batch report");
    }

    info!(
        citations = report.citation_count,
        located = report.located_count,
        fallbacks = report.fallback_count,
        "batch completed"
    );

    if args.json {
        write_json_report(&report)
    } else {
        write_text_report(&report)
    }
}

fn write_json_report(report: &BatchReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, report).context("failed to serialize batch report")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_text_report(report: &BatchReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(
        output,
        "Citations: {} located={} fallback={}",
        report.citation_count, report.located_count, report.fallback_count
    )?;

    for (index, entry) in report.results.iter().enumerate() {
        let score = entry
            .score
            .map(|value| format!("{value:.6}"))
            .unwrap_or_else(|| "-".to_string());

        writeln!(
            output,
            "{}.\t{}\tpage {}\t{}\tscore={}\trects={}",
            index + 1,
            entry.document_name,
            entry.page_number,
            entry.outcome,
            score,
            entry.rectangle_count,
        )?;
        writeln!(output, "\tchunk: {}", entry.chunk_preview)?;
        if let Some(reason) = &entry.miss_reason {
            writeln!(output, "\treason: {reason}")?;
        }
    }

    output.flush()?;
    Ok(())
}
