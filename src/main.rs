// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod api;
mod cli;
mod config;
mod coverage;
mod descriptor;
mod git;
mod junit;
mod publish;
mod report;
mod types;
mod ui;

use config::ReportOptions;
use log::{error, warn};
use report::{MultiReport, ReportRow};
use std::path::PathBuf;

/// Rendered report ready for export
struct Rendered {
    markdown: String,
    rows: Vec<ReportRow>,
    multi: Option<MultiReport>,
}

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Build the immutable base options
    let options = match config::build_options(&args) {
        Ok(o) => o,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };

    let rendered = match render(&options) {
        Ok(r) => r,
        Err(e) if args.keep_going => {
            error!("Error generating summary report: {}", e);
            Rendered { markdown: String::new(), rows: Vec::new(), multi: None }
        }
        Err(e) => {
            ui::print_error(&format!("Failed to generate report: {}", e));
            std::process::exit(1);
        }
    };

    print!("{}", rendered.markdown);

    // Export files
    let mut written: Vec<PathBuf> = Vec::new();
    match report::export_markdown_report(&rendered.markdown, &args.output) {
        Ok(_) => {
            ui::status(&format!("Markdown report saved to: {}", args.output.display()));
            written.push(args.output.clone());
        }
        Err(e) => {
            ui::print_error(&format!("Failed to save markdown report {}: {}", args.output.display(), e));
            std::process::exit(1);
        }
    }

    if let Some(ref json_path) = args.json {
        let shape = rendered.multi.as_ref().and_then(MultiReport::shape);
        match report::export_json_report(&rendered.rows, shape, options.is_multi_file(), &options.title, json_path) {
            Ok(_) => {
                ui::status(&format!("JSON report saved to: {}", json_path.display()));
                written.push(json_path.clone());
            }
            Err(e) => warn!("Failed to save JSON report {}: {}", json_path.display(), e),
        }
    }

    // Publish to the remote branch if requested
    if args.publish {
        if let Err(e) = publish_files(&args, &written) {
            ui::print_error(&format!("Publishing failed: {}", e));
            std::process::exit(1);
        }
    }
}

/// Render the multi-file table, or the single coverage report
fn render(options: &ReportOptions) -> Result<Rendered, String> {
    if options.is_multi_file() {
        let multi = report::render_multi_report(options, coverage::get_coverage_report, junit::get_parsed_xml)?;
        if matches!(multi, MultiReport::NoDescriptors) {
            warn!(
                "None of the {} multi-file entries is a valid 'title, coverage-file[, junit-file]' line",
                options.multiple_files.len()
            );
        }
        let markdown = multi.markdown().to_string();
        let rows = multi.rows().to_vec();
        Ok(Rendered { markdown, rows, multi: Some(multi) })
    } else {
        let row = report::build_single_row(options, coverage::get_coverage_report, junit::get_parsed_xml)?;
        let markdown = report::render_single(options, &row);
        Ok(Rendered { markdown, rows: vec![row], multi: None })
    }
}

/// Commit the written report files to the target branch
fn publish_files(args: &cli::CliArgs, files: &[PathBuf]) -> Result<(), String> {
    let target = config::resolve_publish_target(args)?;
    ui::status(&format!("Publishing {} file(s) to {}/{}@{}", files.len(), target.owner, target.repo, target.branch));

    let client = api::GitHubClient::from_target(&target);
    let sha = publish::upload_to_repo(&client, files, &target.repo, &target.branch, &target.message)?;

    ui::status(&format!("Committed {} to {}", sha, target.branch));
    Ok(())
}
