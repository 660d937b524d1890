use anyhow::Context;
use clap::ArgMatches;
use commands::command_argument_builder;
use indicatif::{ProgressBar, ProgressStyle};
use linkcheck_crawler::{Crawler, FetchConfig, build_http_client};
use linkcheck_report::{ReportFormat, generate_json_report, generate_text_report, save_report};
use std::path::PathBuf;
use std::time::Duration;

mod commands;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    match chosen_command.subcommand() {
        Some(("check", sub_matches)) => {
            if let Err(e) = handle_check(sub_matches).await {
                eprintln!("error: {e:#}");
                std::process::exit(1);
            }
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

async fn handle_check(sub_matches: &ArgMatches) -> anyhow::Result<()> {
    let address = sub_matches.get_one::<String>("address").unwrap();
    let depth = *sub_matches.get_one::<usize>("depth").unwrap();
    let timeout = *sub_matches.get_one::<u64>("timeout").unwrap();
    let concurrency = *sub_matches.get_one::<usize>("concurrency").unwrap();
    let format = sub_matches.get_one::<String>("format").unwrap();
    let output = sub_matches.get_one::<PathBuf>("output");
    let quiet = sub_matches.get_flag("quiet");

    let format = ReportFormat::from_str(format)
        .with_context(|| format!("unsupported report format: {format}"))?;

    let client = build_http_client(&FetchConfig {
        timeout: Duration::from_secs(timeout),
        ..FetchConfig::default()
    })
    .context("failed to build HTTP client")?;
    let crawler = Crawler::new(client).with_max_concurrency(concurrency);

    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Crawling {address} to depth {depth}..."));
        Some(pb)
    };

    let result = crawler.crawl(depth, address).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let report = result.with_context(|| format!("crawl of {address} failed"))?;

    if !quiet {
        println!(
            "Crawled {} page(s) in {} ms",
            report.total_pages_crawled, report.elapsed_millis
        );
    }

    let rendered = match format {
        ReportFormat::Text => generate_text_report(&report),
        ReportFormat::Json => generate_json_report(&report)?,
    };

    match output {
        Some(path) => {
            save_report(&rendered, path)
                .with_context(|| format!("failed to save report to {}", path.display()))?;
            if !quiet {
                println!("Report saved to {}", path.display());
            }
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
