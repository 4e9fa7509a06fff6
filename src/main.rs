// Entry point: load cleaned market records, build the share insight payload
// for one brand (or every brand), write it to disk and print a preview.
//
// Settings come from command-line flags or SHARE_INSIGHT_* environment
// variables; see `config`.
use clap::Parser;
use share_insight::config::Config;
use share_insight::error::Result;
use share_insight::insight::{build_all_insights, build_insight};
use share_insight::util::format_int;
use share_insight::{loader, logging, output};
use std::process::ExitCode;
use tracing::error;

fn run(config: &Config) -> Result<()> {
    let (records, report) = loader::load_records(&config.input)?;
    println!(
        "Processing dataset... ({} rows read, {} loaded)",
        format_int(report.total_rows),
        format_int(report.loaded_rows)
    );
    if report.parse_errors + report.missing_brand > 0 {
        println!(
            "Note: {} rows skipped ({} unreadable, {} without brand).",
            format_int(report.parse_errors + report.missing_brand),
            format_int(report.parse_errors),
            format_int(report.missing_brand)
        );
    }
    if report.missing_dates > 0 {
        println!(
            "Info: {} rows have no usable date and are left out of period figures.",
            format_int(report.missing_dates)
        );
    }
    println!();

    let limits = config.limits();
    let payloads = match config.brand() {
        Some(brand) => vec![build_insight(&records, brand, limits)],
        None => build_all_insights(&records, limits),
    };
    if payloads.is_empty() {
        println!("No brands found in {}.", config.input.display());
        return Ok(());
    }

    for payload in &payloads {
        let files = output::write_insight(&config.output_dir, payload)?;
        output::preview_payload(payload, limits.top_n);
        for f in files {
            println!("(exported to {})", f.display());
        }
        println!();
    }
    Ok(())
}

fn main() -> ExitCode {
    let config = Config::parse();
    logging::init();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, input = %config.input.display(), "insight run failed");
            ExitCode::FAILURE
        }
    }
}
