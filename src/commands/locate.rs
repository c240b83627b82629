use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use citepin::locator::LocatorConfig;
use citepin::model::{LocateReport, TuningValues};
use citepin::provider::{DocumentProvider, FileDocumentProvider};
use citepin::session::{HighlightResponse, HighlightSession};
use citepin::util::{now_utc_string, preview};

use crate::cli::LocateArgs;

pub fn run(args: LocateArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(run_async(args))
}

async fn run_async(args: LocateArgs) -> Result<()> {
    let config = LocatorConfig {
        probe_length: args.probe_length,
        acceptance_threshold: args.acceptance_threshold,
        scan_stride: args.scan_stride,
        fallback_fragment_height: args.fallback_fragment_height,
    };

    let provider = FileDocumentProvider::load(&args.extraction).await?;
    let source_sha256 = provider.source_sha256().to_string();

    info!(
        doc = %provider.doc_name(),
        pages = provider.document().pages.len(),
        chunk_chars = args.chunk.chars().count(),
        "locating chunk"
    );

    let session = HighlightSession::new(Arc::new(provider), config)?;
    let response = session
        .request(&args.chunk)
        .await?
        .context("highlight request was superseded")?;

    if response.located {
        info!(
            page = response.page_number,
            rectangles = response.rectangles.len(),
            "chunk located"
        );
    } else {
        warn!(
            reason = response.miss_reason.as_deref().unwrap_or_default(),
            fallback_page = response.page_number,
            "chunk not located"
        );
    }

    let report = build_report(&args, source_sha256, &response);

    if args.json {
        write_json_report(&report)
    } else {
        write_text_report(&report, &args.chunk)
    }
}

fn build_report(
    args: &LocateArgs,
    source_sha256: String,
    response: &HighlightResponse,
) -> LocateReport {
    let outcome = if response.located { "found" } else { "fallback" };

    LocateReport {
        manifest_version: 1,
        generated_at: now_utc_string(),
        doc_name: response.doc_name.clone(),
        source_sha256,
        chunk_chars: args.chunk.chars().count(),
        tuning: TuningValues {
            probe_length: args.probe_length,
            acceptance_threshold: args.acceptance_threshold,
            scan_stride: args.scan_stride,
            fallback_fragment_height: args.fallback_fragment_height,
        },
        outcome: outcome.to_string(),
        miss_reason: response.miss_reason.clone(),
        page_number: response.page_number,
        score: response.score,
        fragment_range: response.fragment_range,
        rectangles: response.rectangles.clone(),
    }
}

fn write_json_report(report: &LocateReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, report)
        .context("failed to serialize locate report")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_text_report(report: &LocateReport, chunk: &str) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(output, "Document: {}", report.doc_name)?;
    writeln!(output, "Source: sha256={}", report.source_sha256)?;
    writeln!(output, "Chunk: {}", preview(chunk, 80))?;
    writeln!(
        output,
        "Tuning: probe={} threshold={:.2} stride={} fallback_height={:.1}",
        report.tuning.probe_length,
        report.tuning.acceptance_threshold,
        report.tuning.scan_stride,
        report.tuning.fallback_fragment_height,
    )?;

    match (&report.score, &report.fragment_range) {
        (Some(score), Some(range)) => {
            writeln!(
                output,
                "Outcome: found page={} score={:.6} fragments={}..{} rectangles={}",
                report.page_number,
                score,
                range.start,
                range.end,
                report.rectangles.len(),
            )?;
            for (index, rect) in report.rectangles.iter().enumerate() {
                writeln!(
                    output,
                    "\trect[{index}]: x={:.2} y={:.2} w={:.2} h={:.2}",
                    rect.x, rect.y, rect.width, rect.height
                )?;
            }
        }
        _ => {
            writeln!(
                output,
                "Outcome: fallback page={} reason={}",
                report.page_number,
                report.miss_reason.as_deref().unwrap_or("unknown"),
            )?;
        }
    }

    output.flush()?;
    Ok(())
}
