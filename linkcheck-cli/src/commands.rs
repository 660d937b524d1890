use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkcheck")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkcheck")
        .styles(CLAP_STYLING)
        .subcommand_required(true)
        .subcommand(
            command!("check")
                .about(
                    "Crawl a site breadth-first from a root address, validating every \
                link found up to the requested depth.",
                )
                .arg(
                    arg!(-a --"address" <ADDRESS>)
                        .required(true)
                        .help("The absolute address to start crawling from"),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(true)
                        .help("How many levels of links to follow (1-5)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-c --"concurrency" <NUM>)
                        .required(false)
                        .help("Maximum in-flight fetches per crawl level")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("16"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-q --"quiet" "Suppress progress output")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
