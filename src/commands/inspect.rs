use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use citepin::locator::normalize;
use citepin::model::{ExtractedDocument, InspectReport, PageStats};
use citepin::util::{now_utc_string, sha256_hex};

use crate::cli::InspectArgs;

pub fn run(args: InspectArgs) -> Result<()> {
    let raw = fs::read(&args.extraction).with_context(|| {
        format!(
            "failed to read extraction file: {}",
            args.extraction.display()
        )
    })?;
    let document: ExtractedDocument = serde_json::from_slice(&raw).with_context(|| {
        format!(
            "failed to parse extraction file: {}",
            args.extraction.display()
        )
    })?;

    let pages = document
        .pages
        .iter()
        .map(|page| {
            let normalized_chars = page
                .fragments
                .iter()
                .map(|fragment| normalize(&fragment.text).chars().count())
                .sum();

            PageStats {
                page_number: page.page_number,
                fragment_count: page.fragments.len(),
                blank_fragment_count: page
                    .fragments
                    .iter()
                    .filter(|fragment| fragment.text.trim().is_empty())
                    .count(),
                normalized_chars,
            }
        })
        .collect::<Vec<PageStats>>();

    let report = InspectReport {
        manifest_version: 1,
        generated_at: now_utc_string(),
        doc_name: document.doc_name,
        source_sha256: sha256_hex(&raw),
        page_count: pages.len(),
        fragment_count: pages.iter().map(|page| page.fragment_count).sum(),
        empty_page_count: pages
            .iter()
            .filter(|page| page.normalized_chars == 0)
            .count(),
        normalized_char_count: pages.iter().map(|page| page.normalized_chars).sum(),
        pages,
    };

    info!(
        doc = %report.doc_name,
        pages = report.page_count,
        fragments = report.fragment_count,
        empty_pages = report.empty_page_count,
        "inspected extraction file"
    );

    if args.json {
        write_json_report(&report)
    } else {
        write_text_report(&report)
    }
}

fn write_json_report(report: &InspectReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, report)
        .context("failed to serialize inspect report")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_text_report(report: &InspectReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(output, "Document: {}", report.doc_name)?;
    writeln!(output, "Source: sha256={}", report.source_sha256)?;
    writeln!(
        output,
        "Pages: {} fragments={} empty_pages={} normalized_chars={}",
        report.page_count,
        report.fragment_count,
        report.empty_page_count,
        report.normalized_char_count,
    )?;

    for page in &report.pages {
        writeln!(
            output,
            "\tpage {}\tfragments={}\tblank={}\tnormalized_chars={}",
            page.page_number, page.fragment_count, page.blank_fragment_count, page.normalized_chars,
        )?;
    }

    output.flush()?;
    Ok(())
}
